use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use uuid::Uuid;

use service::mapping::domain::{MappingFilters, MappingInput};
use service::mapping::repository::{MappingRecord, SeaOrmMappingRepository};
use service::mapping::MappingService;

use super::doctors::DoctorSummary;
use super::patients::PatientSummary;
use crate::auth::{CurrentUser, ServerState};
use crate::envelope::Envelope;
use crate::errors::ApiError;

/// Full mapping shape with both endpoints embedded.
#[derive(Serialize)]
pub struct MappingDetail {
    pub id: Uuid,
    pub patient: Uuid,
    pub patient_detail: PatientSummary,
    pub doctor: Uuid,
    pub doctor_detail: DoctorSummary,
    pub assigned_by: Option<Uuid>,
    pub assigned_by_name: Option<String>,
    pub notes: Option<String>,
    pub is_primary: bool,
    pub assigned_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

impl From<MappingRecord> for MappingDetail {
    fn from(record: MappingRecord) -> Self {
        Self {
            id: record.mapping.id,
            patient: record.mapping.patient_id,
            patient_detail: PatientSummary::from(record.patient),
            doctor: record.mapping.doctor_id,
            doctor_detail: DoctorSummary::from(record.doctor),
            assigned_by: record.mapping.assigned_by,
            assigned_by_name: record.assigned_by_name,
            notes: record.mapping.notes,
            is_primary: record.mapping.is_primary,
            assigned_at: record.mapping.assigned_at,
            updated_at: record.mapping.updated_at,
        }
    }
}

/// Row shape for the per-patient listing.
#[derive(Serialize)]
pub struct PatientDoctorRow {
    pub id: Uuid,
    pub doctor: Uuid,
    pub doctor_detail: DoctorSummary,
    pub notes: Option<String>,
    pub is_primary: bool,
    pub assigned_at: DateTime<FixedOffset>,
}

#[derive(Serialize)]
pub struct PatientBrief {
    pub id: Uuid,
    pub full_name: String,
}

/// Per-patient listing keeps the patient identity summary alongside the
/// usual count + data pair.
#[derive(Serialize)]
pub struct PatientDoctorsResponse {
    pub success: bool,
    pub patient: PatientBrief,
    pub count: usize,
    pub data: Vec<PatientDoctorRow>,
}

fn mapping_service(state: &ServerState) -> MappingService<SeaOrmMappingRepository> {
    MappingService::new(Arc::new(SeaOrmMappingRepository { db: state.db.clone() }))
}

fn mapping_label(record: &MappingRecord) -> String {
    format!("{} → {}", record.patient.full_name(), record.doctor.display_name())
}

#[utoipa::path(get, path = "/mappings", tag = "mappings", responses((status = 200, description = "All assignments")))]
pub async fn list(
    State(state): State<ServerState>,
    Query(filters): Query<MappingFilters>,
) -> Result<Json<Envelope<Vec<MappingDetail>>>, ApiError> {
    let rows = mapping_service(&state)
        .list(&filters)
        .await
        .map_err(|e| ApiError::from_service(e, "Failed to list mappings."))?;
    Ok(Json(Envelope::list(rows.into_iter().map(Into::into).collect())))
}

#[utoipa::path(post, path = "/mappings", tag = "mappings", request_body = crate::openapi::MappingRequest, responses((status = 201, description = "Assigned"), (status = 400, description = "Duplicate pair or bad payload"), (status = 404, description = "Unknown patient or doctor")))]
pub async fn create(
    State(state): State<ServerState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(input): Json<MappingInput>,
) -> Result<(StatusCode, Json<Envelope<MappingDetail>>), ApiError> {
    let record = mapping_service(&state)
        .create(user.id, &user.name, input)
        .await
        .map_err(|e| ApiError::from_service(e, "Failed to create mapping."))?;
    Ok((
        StatusCode::CREATED,
        Json(Envelope::with_message(
            "Doctor assigned to patient successfully.",
            MappingDetail::from(record),
        )),
    ))
}

#[utoipa::path(get, path = "/mappings/{patient_id}", tag = "mappings", params(("patient_id" = Uuid, Path, description = "Patient id")), responses((status = 200, description = "Doctors assigned to the patient"), (status = 404, description = "Unknown patient")))]
pub async fn doctors_for_patient(
    State(state): State<ServerState>,
    Path(patient_id): Path<Uuid>,
) -> Result<Json<PatientDoctorsResponse>, ApiError> {
    let (patient, rows) = mapping_service(&state)
        .for_patient(patient_id)
        .await
        .map_err(|e| ApiError::from_service(e, "Failed to list patient doctors."))?;
    let data: Vec<PatientDoctorRow> = rows
        .into_iter()
        .map(|(m, d)| PatientDoctorRow {
            id: m.id,
            doctor: m.doctor_id,
            doctor_detail: DoctorSummary::from(d),
            notes: m.notes,
            is_primary: m.is_primary,
            assigned_at: m.assigned_at,
        })
        .collect();
    Ok(Json(PatientDoctorsResponse {
        success: true,
        patient: PatientBrief { id: patient.id, full_name: patient.full_name() },
        count: data.len(),
        data,
    }))
}

#[utoipa::path(get, path = "/mappings/detail/{id}", tag = "mappings", params(("id" = Uuid, Path, description = "Mapping id")), responses((status = 200, description = "Mapping detail"), (status = 404, description = "Not found")))]
pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Envelope<MappingDetail>>, ApiError> {
    let record = mapping_service(&state)
        .get(id)
        .await
        .map_err(|e| ApiError::from_service(e, "Failed to fetch mapping."))?;
    Ok(Json(Envelope::data(MappingDetail::from(record))))
}

#[utoipa::path(delete, path = "/mappings/detail/{id}", tag = "mappings", params(("id" = Uuid, Path, description = "Mapping id")), responses((status = 200, description = "Removed"), (status = 404, description = "Not found")))]
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Envelope<()>>, ApiError> {
    let removed = mapping_service(&state)
        .delete(id)
        .await
        .map_err(|e| ApiError::from_service(e, "Failed to delete mapping."))?;
    Ok(Json(Envelope::message(format!(
        "Mapping \"{}\" removed successfully.",
        mapping_label(&removed)
    ))))
}
