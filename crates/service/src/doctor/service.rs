use std::sync::Arc;

use tracing::{info, instrument};
use uuid::Uuid;

use super::domain::{self, DoctorFilters, DoctorInput, DoctorRecord};
use super::repository::DoctorRepository;
use crate::errors::ServiceError;
use crate::validation::{self, FieldErrors};
use models::doctor;

/// Application service for the doctor directory. Field validation and
/// store-backed uniqueness checks are collected into one error set so a
/// caller sees every violation at once.
pub struct DoctorService<R: DoctorRepository> {
    repo: Arc<R>,
}

impl<R: DoctorRepository> DoctorService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn list(&self, filters: &DoctorFilters) -> Result<Vec<doctor::Model>, ServiceError> {
        self.repo.list(filters).await
    }

    #[instrument(skip(self, input), fields(caller = %caller))]
    pub async fn create(&self, caller: Uuid, input: DoctorInput) -> Result<DoctorRecord, ServiceError> {
        let uniqueness = self.uniqueness_errors(&input, None).await?;
        let fields = match domain::validate_full(&input) {
            Ok(fields) if uniqueness.is_empty() => fields,
            Ok(_) => return Err(ServiceError::Validation(uniqueness)),
            Err(mut errors) => {
                errors.merge(uniqueness);
                return Err(ServiceError::Validation(errors));
            }
        };
        let created = self.repo.insert(caller, &fields).await?;
        info!(doctor_id = %created.id, "doctor_created");
        let created_by_name = self.repo.creator_name(created.created_by).await?;
        Ok(DoctorRecord { doctor: created, created_by_name })
    }

    pub async fn get(&self, id: Uuid) -> Result<DoctorRecord, ServiceError> {
        let doctor = self
            .repo
            .get(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Doctor"))?;
        let created_by_name = self.repo.creator_name(doctor.created_by).await?;
        Ok(DoctorRecord { doctor, created_by_name })
    }

    #[instrument(skip(self, input), fields(doctor_id = %id))]
    pub async fn update(&self, id: Uuid, input: DoctorInput, partial: bool) -> Result<DoctorRecord, ServiceError> {
        let current = self
            .repo
            .get(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Doctor"))?;

        let uniqueness = self.uniqueness_errors(&input, Some(current.id)).await?;
        let updated = if partial {
            match domain::validate_partial(&input) {
                Ok(changes) if uniqueness.is_empty() => self.repo.apply(current, &changes).await?,
                Ok(_) => return Err(ServiceError::Validation(uniqueness)),
                Err(mut errors) => {
                    errors.merge(uniqueness);
                    return Err(ServiceError::Validation(errors));
                }
            }
        } else {
            match domain::validate_full(&input) {
                Ok(fields) if uniqueness.is_empty() => self.repo.replace(current, &fields).await?,
                Ok(_) => return Err(ServiceError::Validation(uniqueness)),
                Err(mut errors) => {
                    errors.merge(uniqueness);
                    return Err(ServiceError::Validation(errors));
                }
            }
        };
        info!(doctor_id = %updated.id, "doctor_updated");
        let created_by_name = self.repo.creator_name(updated.created_by).await?;
        Ok(DoctorRecord { doctor: updated, created_by_name })
    }

    /// Delete and return the removed row; assignments referencing it are
    /// cascaded away by the schema.
    #[instrument(skip(self), fields(doctor_id = %id))]
    pub async fn delete(&self, id: Uuid) -> Result<doctor::Model, ServiceError> {
        let current = self
            .repo
            .get(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Doctor"))?;
        self.repo.delete(current.clone()).await?;
        info!(doctor_id = %current.id, "doctor_deleted");
        Ok(current)
    }

    /// Store-backed uniqueness checks on email and license number. Only
    /// fields that parse cleanly are checked; shape errors are reported by
    /// the field validators.
    async fn uniqueness_errors(&self, input: &DoctorInput, exclude: Option<Uuid>) -> Result<FieldErrors, ServiceError> {
        let mut errors = FieldErrors::new();

        if let Some(email) = input.email.as_deref().and_then(|raw| validation::normalize_email(raw).ok()) {
            if self.repo.find_by_email(&email, exclude).await?.is_some() {
                errors.add("email", "A doctor with this email already exists.");
            }
        }
        if let Some(license) = input.license_number.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            if self.repo.find_by_license(license, exclude).await?.is_some() {
                errors.add("license_number", "A doctor with this license number already exists.");
            }
        }
        Ok(errors)
    }
}
