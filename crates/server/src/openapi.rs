use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(ToSchema)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(ToSchema)]
pub struct RefreshRequest {
    pub refresh: String,
}

#[derive(ToSchema)]
pub struct PatientRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// ISO date, never in the future.
    pub date_of_birth: String,
    /// One of M, F, O, N.
    pub gender: String,
    pub blood_group: Option<String>,
    pub allergies: Option<String>,
    pub medical_history: Option<String>,
    pub current_medications: Option<String>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub postal_code: Option<String>,
}

#[derive(ToSchema)]
pub struct DoctorRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    /// Specialization code, e.g. `cardiology` or `other`.
    pub specialization: String,
    pub license_number: String,
    pub years_of_experience: Option<i32>,
    pub qualification: Option<String>,
    pub bio: Option<String>,
    /// Decimal string, non-negative.
    pub consultation_fee: Option<String>,
    pub is_available: Option<bool>,
    pub hospital_name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
}

#[derive(ToSchema)]
pub struct MappingRequest {
    pub patient: Uuid,
    pub doctor: Uuid,
    pub notes: Option<String>,
    pub is_primary: Option<bool>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::auth::register,
        crate::routes::auth::login,
        crate::routes::auth::logout,
        crate::routes::auth::refresh,
        crate::routes::auth::me,
        crate::routes::patients::list,
        crate::routes::patients::create,
        crate::routes::patients::get,
        crate::routes::patients::update_full,
        crate::routes::patients::update_partial,
        crate::routes::patients::delete,
        crate::routes::doctors::list,
        crate::routes::doctors::create,
        crate::routes::doctors::get,
        crate::routes::doctors::update_full,
        crate::routes::doctors::update_partial,
        crate::routes::doctors::delete,
        crate::routes::mappings::list,
        crate::routes::mappings::create,
        crate::routes::mappings::doctors_for_patient,
        crate::routes::mappings::get,
        crate::routes::mappings::delete,
    ),
    components(
        schemas(
            HealthResponse,
            RegisterRequest,
            LoginRequest,
            RefreshRequest,
            PatientRequest,
            DoctorRequest,
            MappingRequest,
        )
    ),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "patients"),
        (name = "doctors"),
        (name = "mappings"),
    )
)]
pub struct ApiDoc;
