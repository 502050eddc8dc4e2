use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::Serialize;
use uuid::Uuid;

use models::patient;
use service::patient::domain::{PatientFilters, PatientInput};
use service::patient::repository::SeaOrmPatientRepository;
use service::patient::PatientService;

use crate::auth::{CurrentUser, ServerState};
use crate::envelope::Envelope;
use crate::errors::ApiError;

/// Lightweight shape for list responses.
#[derive(Serialize)]
pub struct PatientSummary {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth: NaiveDate,
    pub gender: String,
    pub blood_group: Option<String>,
    pub created_at: DateTime<FixedOffset>,
}

impl From<patient::Model> for PatientSummary {
    fn from(m: patient::Model) -> Self {
        let full_name = m.full_name();
        Self {
            id: m.id,
            first_name: m.first_name,
            last_name: m.last_name,
            full_name,
            email: m.email,
            phone: m.phone,
            date_of_birth: m.date_of_birth,
            gender: m.gender,
            blood_group: m.blood_group,
            created_at: m.created_at,
        }
    }
}

/// Full shape for detail responses.
#[derive(Serialize)]
pub struct PatientDetail {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth: NaiveDate,
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
    pub created_by: Uuid,
    pub created_by_name: Option<String>,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

impl PatientDetail {
    fn new(m: patient::Model, created_by_name: Option<String>) -> Self {
        let full_name = m.full_name();
        Self {
            id: m.id,
            first_name: m.first_name,
            last_name: m.last_name,
            full_name,
            email: m.email,
            phone: m.phone,
            date_of_birth: m.date_of_birth,
            gender: m.gender,
            blood_group: m.blood_group,
            allergies: m.allergies,
            medical_history: m.medical_history,
            current_medications: m.current_medications,
            emergency_contact_name: m.emergency_contact_name,
            emergency_contact_phone: m.emergency_contact_phone,
            address: m.address,
            city: m.city,
            state: m.state,
            country: m.country,
            postal_code: m.postal_code,
            created_by: m.created_by,
            created_by_name,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

fn patient_service(state: &ServerState) -> PatientService<SeaOrmPatientRepository> {
    PatientService::new(Arc::new(SeaOrmPatientRepository { db: state.db.clone() }))
}

#[utoipa::path(get, path = "/patients", tag = "patients", responses((status = 200, description = "Patients owned by the caller")))]
pub async fn list(
    State(state): State<ServerState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Query(filters): Query<PatientFilters>,
) -> Result<Json<Envelope<Vec<PatientSummary>>>, ApiError> {
    let rows = patient_service(&state)
        .list(user.id, &filters)
        .await
        .map_err(|e| ApiError::from_service(e, "Failed to list patients."))?;
    Ok(Json(Envelope::list(rows.into_iter().map(Into::into).collect())))
}

#[utoipa::path(post, path = "/patients", tag = "patients", request_body = crate::openapi::PatientRequest, responses((status = 201, description = "Created"), (status = 400, description = "Validation failed")))]
pub async fn create(
    State(state): State<ServerState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(input): Json<PatientInput>,
) -> Result<(StatusCode, Json<Envelope<PatientDetail>>), ApiError> {
    let created = patient_service(&state)
        .create(user.id, input)
        .await
        .map_err(|e| ApiError::from_service(e, "Failed to create patient."))?;
    Ok((
        StatusCode::CREATED,
        Json(Envelope::with_message(
            "Patient created successfully.",
            PatientDetail::new(created, Some(user.name.clone())),
        )),
    ))
}

#[utoipa::path(get, path = "/patients/{id}", tag = "patients", params(("id" = Uuid, Path, description = "Patient id")), responses((status = 200, description = "Patient detail"), (status = 404, description = "Not found or not owned")))]
pub async fn get(
    State(state): State<ServerState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Envelope<PatientDetail>>, ApiError> {
    let row = patient_service(&state)
        .get(user.id, id)
        .await
        .map_err(|e| ApiError::from_service(e, "Failed to fetch patient."))?;
    Ok(Json(Envelope::data(PatientDetail::new(row, Some(user.name.clone())))))
}

async fn update(
    state: ServerState,
    user: service::auth::domain::AuthUser,
    id: Uuid,
    input: PatientInput,
    partial: bool,
) -> Result<Json<Envelope<PatientDetail>>, ApiError> {
    let updated = patient_service(&state)
        .update(user.id, id, input, partial)
        .await
        .map_err(|e| ApiError::from_service(e, "Failed to update patient."))?;
    Ok(Json(Envelope::with_message(
        "Patient updated successfully.",
        PatientDetail::new(updated, Some(user.name.clone())),
    )))
}

#[utoipa::path(put, path = "/patients/{id}", tag = "patients", params(("id" = Uuid, Path, description = "Patient id")), request_body = crate::openapi::PatientRequest, responses((status = 200, description = "Updated"), (status = 400, description = "Validation failed"), (status = 404, description = "Not found")))]
pub async fn update_full(
    State(state): State<ServerState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(input): Json<PatientInput>,
) -> Result<Json<Envelope<PatientDetail>>, ApiError> {
    update(state, user, id, input, false).await
}

#[utoipa::path(patch, path = "/patients/{id}", tag = "patients", params(("id" = Uuid, Path, description = "Patient id")), request_body = crate::openapi::PatientRequest, responses((status = 200, description = "Updated"), (status = 400, description = "Validation failed"), (status = 404, description = "Not found")))]
pub async fn update_partial(
    State(state): State<ServerState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(input): Json<PatientInput>,
) -> Result<Json<Envelope<PatientDetail>>, ApiError> {
    update(state, user, id, input, true).await
}

#[utoipa::path(delete, path = "/patients/{id}", tag = "patients", params(("id" = Uuid, Path, description = "Patient id")), responses((status = 200, description = "Deleted"), (status = 404, description = "Not found")))]
pub async fn delete(
    State(state): State<ServerState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Envelope<()>>, ApiError> {
    let removed = patient_service(&state)
        .delete(user.id, id)
        .await
        .map_err(|e| ApiError::from_service(e, "Failed to delete patient."))?;
    Ok(Json(Envelope::message(format!(
        "Patient \"{}\" deleted successfully.",
        removed.full_name()
    ))))
}
