use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use models::doctor::{self, specialization_display};
use service::doctor::domain::{DoctorFilters, DoctorInput, DoctorRecord};
use service::doctor::repository::SeaOrmDoctorRepository;
use service::doctor::DoctorService;

use crate::auth::{CurrentUser, ServerState};
use crate::envelope::Envelope;
use crate::errors::ApiError;

/// Lightweight shape for list responses.
#[derive(Serialize)]
pub struct DoctorSummary {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub display_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub specialization: String,
    pub specialization_display: String,
    pub license_number: String,
    pub years_of_experience: i32,
    pub is_available: bool,
    pub hospital_name: Option<String>,
    pub city: Option<String>,
    pub created_at: DateTime<FixedOffset>,
}

impl From<doctor::Model> for DoctorSummary {
    fn from(m: doctor::Model) -> Self {
        let full_name = m.full_name();
        let display_name = m.display_name();
        let specialization_display = specialization_display(&m.specialization).to_string();
        Self {
            id: m.id,
            first_name: m.first_name,
            last_name: m.last_name,
            full_name,
            display_name,
            email: m.email,
            phone: m.phone,
            specialization: m.specialization,
            specialization_display,
            license_number: m.license_number,
            years_of_experience: m.years_of_experience,
            is_available: m.is_available,
            hospital_name: m.hospital_name,
            city: m.city,
            created_at: m.created_at,
        }
    }
}

/// Full shape for detail responses.
#[derive(Serialize)]
pub struct DoctorDetail {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub display_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub specialization: String,
    pub specialization_display: String,
    pub license_number: String,
    pub years_of_experience: i32,
    pub qualification: Option<String>,
    pub bio: Option<String>,
    pub consultation_fee: Option<Decimal>,
    pub is_available: bool,
    pub hospital_name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_by_name: Option<String>,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

impl From<DoctorRecord> for DoctorDetail {
    fn from(record: DoctorRecord) -> Self {
        let m = record.doctor;
        let full_name = m.full_name();
        let display_name = m.display_name();
        let specialization_display = specialization_display(&m.specialization).to_string();
        Self {
            id: m.id,
            first_name: m.first_name,
            last_name: m.last_name,
            full_name,
            display_name,
            email: m.email,
            phone: m.phone,
            specialization: m.specialization,
            specialization_display,
            license_number: m.license_number,
            years_of_experience: m.years_of_experience,
            qualification: m.qualification,
            bio: m.bio,
            consultation_fee: m.consultation_fee,
            is_available: m.is_available,
            hospital_name: m.hospital_name,
            address: m.address,
            city: m.city,
            state: m.state,
            country: m.country,
            created_by: m.created_by,
            created_by_name: record.created_by_name,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

fn doctor_service(state: &ServerState) -> DoctorService<SeaOrmDoctorRepository> {
    DoctorService::new(Arc::new(SeaOrmDoctorRepository { db: state.db.clone() }))
}

#[utoipa::path(get, path = "/doctors", tag = "doctors", responses((status = 200, description = "All directory entries")))]
pub async fn list(
    State(state): State<ServerState>,
    Query(filters): Query<DoctorFilters>,
) -> Result<Json<Envelope<Vec<DoctorSummary>>>, ApiError> {
    let rows = doctor_service(&state)
        .list(&filters)
        .await
        .map_err(|e| ApiError::from_service(e, "Failed to list doctors."))?;
    Ok(Json(Envelope::list(rows.into_iter().map(Into::into).collect())))
}

#[utoipa::path(post, path = "/doctors", tag = "doctors", request_body = crate::openapi::DoctorRequest, responses((status = 201, description = "Created"), (status = 400, description = "Validation failed")))]
pub async fn create(
    State(state): State<ServerState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(input): Json<DoctorInput>,
) -> Result<(StatusCode, Json<Envelope<DoctorDetail>>), ApiError> {
    let created = doctor_service(&state)
        .create(user.id, input)
        .await
        .map_err(|e| ApiError::from_service(e, "Failed to create doctor."))?;
    Ok((
        StatusCode::CREATED,
        Json(Envelope::with_message("Doctor created successfully.", DoctorDetail::from(created))),
    ))
}

#[utoipa::path(get, path = "/doctors/{id}", tag = "doctors", params(("id" = Uuid, Path, description = "Doctor id")), responses((status = 200, description = "Doctor detail"), (status = 404, description = "Not found")))]
pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Envelope<DoctorDetail>>, ApiError> {
    let record = doctor_service(&state)
        .get(id)
        .await
        .map_err(|e| ApiError::from_service(e, "Failed to fetch doctor."))?;
    Ok(Json(Envelope::data(DoctorDetail::from(record))))
}

async fn update(
    state: ServerState,
    id: Uuid,
    input: DoctorInput,
    partial: bool,
) -> Result<Json<Envelope<DoctorDetail>>, ApiError> {
    let updated = doctor_service(&state)
        .update(id, input, partial)
        .await
        .map_err(|e| ApiError::from_service(e, "Failed to update doctor."))?;
    Ok(Json(Envelope::with_message("Doctor updated successfully.", DoctorDetail::from(updated))))
}

#[utoipa::path(put, path = "/doctors/{id}", tag = "doctors", params(("id" = Uuid, Path, description = "Doctor id")), request_body = crate::openapi::DoctorRequest, responses((status = 200, description = "Updated"), (status = 400, description = "Validation failed"), (status = 404, description = "Not found")))]
pub async fn update_full(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(input): Json<DoctorInput>,
) -> Result<Json<Envelope<DoctorDetail>>, ApiError> {
    update(state, id, input, false).await
}

#[utoipa::path(patch, path = "/doctors/{id}", tag = "doctors", params(("id" = Uuid, Path, description = "Doctor id")), request_body = crate::openapi::DoctorRequest, responses((status = 200, description = "Updated"), (status = 400, description = "Validation failed"), (status = 404, description = "Not found")))]
pub async fn update_partial(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(input): Json<DoctorInput>,
) -> Result<Json<Envelope<DoctorDetail>>, ApiError> {
    update(state, id, input, true).await
}

#[utoipa::path(delete, path = "/doctors/{id}", tag = "doctors", params(("id" = Uuid, Path, description = "Doctor id")), responses((status = 200, description = "Deleted"), (status = 404, description = "Not found")))]
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Envelope<()>>, ApiError> {
    let removed = doctor_service(&state)
        .delete(id)
        .await
        .map_err(|e| ApiError::from_service(e, "Failed to delete doctor."))?;
    Ok(Json(Envelope::message(format!(
        "Doctor \"{}\" deleted successfully.",
        removed.display_name()
    ))))
}
