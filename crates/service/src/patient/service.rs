use std::sync::Arc;

use tracing::{info, instrument};
use uuid::Uuid;

use super::domain::{self, PatientFilters, PatientInput};
use super::repository::PatientRepository;
use crate::errors::ServiceError;
use models::patient;

/// Application service encapsulating the patient registry rules: strict
/// owner scoping and collect-all-errors validation before any write.
pub struct PatientService<R: PatientRepository> {
    repo: Arc<R>,
}

impl<R: PatientRepository> PatientService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn list(&self, owner: Uuid, filters: &PatientFilters) -> Result<Vec<patient::Model>, ServiceError> {
        self.repo.list(owner, filters).await
    }

    #[instrument(skip(self, input), fields(owner = %owner))]
    pub async fn create(&self, owner: Uuid, input: PatientInput) -> Result<patient::Model, ServiceError> {
        let fields = domain::validate_full(&input).map_err(ServiceError::Validation)?;
        let created = self.repo.insert(owner, &fields).await?;
        info!(patient_id = %created.id, "patient_created");
        Ok(created)
    }

    pub async fn get(&self, owner: Uuid, id: Uuid) -> Result<patient::Model, ServiceError> {
        self.repo
            .find_owned(owner, id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Patient"))
    }

    #[instrument(skip(self, input), fields(owner = %owner, patient_id = %id))]
    pub async fn update(
        &self,
        owner: Uuid,
        id: Uuid,
        input: PatientInput,
        partial: bool,
    ) -> Result<patient::Model, ServiceError> {
        let current = self.get(owner, id).await?;
        let updated = if partial {
            let changes = domain::validate_partial(&input).map_err(ServiceError::Validation)?;
            self.repo.apply(current, &changes).await?
        } else {
            let fields = domain::validate_full(&input).map_err(ServiceError::Validation)?;
            self.repo.replace(current, &fields).await?
        };
        info!(patient_id = %updated.id, "patient_updated");
        Ok(updated)
    }

    /// Delete and return the removed row; assignments referencing it are
    /// cascaded away by the schema.
    #[instrument(skip(self), fields(owner = %owner, patient_id = %id))]
    pub async fn delete(&self, owner: Uuid, id: Uuid) -> Result<patient::Model, ServiceError> {
        let current = self.get(owner, id).await?;
        self.repo.delete(current.clone()).await?;
        info!(patient_id = %current.id, "patient_deleted");
        Ok(current)
    }
}
