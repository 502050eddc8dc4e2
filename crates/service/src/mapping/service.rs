use std::sync::Arc;

use tracing::{info, instrument};
use uuid::Uuid;

use super::domain::{MappingFilters, MappingInput};
use super::repository::{MappingRecord, MappingRepository};
use crate::errors::ServiceError;
use crate::validation::{self, FieldErrors};
use models::patient;

/// Application service for the assignment ledger. Endpoint resolution is a
/// not-found concern; a duplicate pair is a validation failure.
pub struct MappingService<R: MappingRepository> {
    repo: Arc<R>,
}

impl<R: MappingRepository> MappingService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn list(&self, filters: &MappingFilters) -> Result<Vec<MappingRecord>, ServiceError> {
        self.repo.list(filters).await
    }

    #[instrument(skip(self, input), fields(caller = %caller_id))]
    pub async fn create(
        &self,
        caller_id: Uuid,
        caller_name: &str,
        input: MappingInput,
    ) -> Result<MappingRecord, ServiceError> {
        let mut errors = FieldErrors::new();
        if input.patient.is_none() {
            errors.add("patient", "This field is required.");
        }
        if input.doctor.is_none() {
            errors.add("doctor", "This field is required.");
        }
        let (Some(patient_id), Some(doctor_id)) = (input.patient, input.doctor) else {
            return Err(ServiceError::Validation(errors));
        };

        let patient = self
            .repo
            .find_patient(patient_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Patient"))?;
        let doctor = self
            .repo
            .find_doctor(doctor_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Doctor"))?;

        if self.repo.pair_exists(patient_id, doctor_id).await? {
            let mut errors = FieldErrors::new();
            errors.add_non_field(format!(
                "Doctor \"{}\" is already assigned to patient \"{}\".",
                doctor.display_name(),
                patient.full_name()
            ));
            return Err(ServiceError::Validation(errors));
        }

        let mapping = self
            .repo
            .insert(
                patient_id,
                doctor_id,
                caller_id,
                validation::clean_optional(&input.notes),
                input.is_primary.unwrap_or(false),
            )
            .await?;
        info!(mapping_id = %mapping.id, %patient_id, %doctor_id, "doctor_assigned");
        Ok(MappingRecord {
            mapping,
            patient,
            doctor,
            assigned_by_name: Some(caller_name.to_string()),
        })
    }

    pub async fn get(&self, id: Uuid) -> Result<MappingRecord, ServiceError> {
        self.repo
            .get(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Mapping"))
    }

    /// All doctors assigned to one patient, with the patient row for the
    /// identity summary. Unknown patient is a not-found, an empty ledger
    /// is not.
    pub async fn for_patient(
        &self,
        patient_id: Uuid,
    ) -> Result<(patient::Model, Vec<(models::mapping::Model, models::doctor::Model)>), ServiceError> {
        let patient = self
            .repo
            .find_patient(patient_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Patient"))?;
        let rows = self.repo.for_patient(patient_id).await?;
        Ok((patient, rows))
    }

    /// Delete and return the removed record (for the response message).
    #[instrument(skip(self), fields(mapping_id = %id))]
    pub async fn delete(&self, id: Uuid) -> Result<MappingRecord, ServiceError> {
        let record = self.get(id).await?;
        self.repo.delete(record.mapping.clone()).await?;
        info!(mapping_id = %record.mapping.id, "mapping_removed");
        Ok(record)
    }
}
