use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::{extension::postgres::PgExpr, Expr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, ModelTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::domain::{DoctorFilters, DoctorInput, ValidDoctor};
use crate::errors::ServiceError;
use models::{doctor, user};

#[async_trait]
pub trait DoctorRepository: Send + Sync {
    async fn list(&self, filters: &DoctorFilters) -> Result<Vec<doctor::Model>, ServiceError>;
    async fn get(&self, id: Uuid) -> Result<Option<doctor::Model>, ServiceError>;
    /// Case-insensitive email lookup, optionally excluding a row (updates).
    async fn find_by_email(&self, email: &str, exclude: Option<Uuid>) -> Result<Option<doctor::Model>, ServiceError>;
    /// Exact license lookup, optionally excluding a row (updates).
    async fn find_by_license(&self, license: &str, exclude: Option<Uuid>) -> Result<Option<doctor::Model>, ServiceError>;
    async fn insert(&self, created_by: Uuid, fields: &ValidDoctor) -> Result<doctor::Model, ServiceError>;
    async fn replace(&self, current: doctor::Model, fields: &ValidDoctor) -> Result<doctor::Model, ServiceError>;
    async fn apply(&self, current: doctor::Model, changes: &DoctorInput) -> Result<doctor::Model, ServiceError>;
    async fn delete(&self, row: doctor::Model) -> Result<(), ServiceError>;
    async fn creator_name(&self, user_id: Option<Uuid>) -> Result<Option<String>, ServiceError>;
}

/// SeaORM-backed repository implementation.
pub struct SeaOrmDoctorRepository {
    pub db: DatabaseConnection,
}

fn db_err(e: sea_orm::DbErr) -> ServiceError {
    ServiceError::Repository(e.to_string())
}

#[async_trait]
impl DoctorRepository for SeaOrmDoctorRepository {
    async fn list(&self, filters: &DoctorFilters) -> Result<Vec<doctor::Model>, ServiceError> {
        let mut query = doctor::Entity::find();

        if let Some(spec) = filters.specialization.as_deref().filter(|s| !s.is_empty()) {
            query = query.filter(doctor::Column::Specialization.eq(spec));
        }
        if let Some(avail) = filters.is_available.as_deref() {
            query = query.filter(doctor::Column::IsAvailable.eq(avail.eq_ignore_ascii_case("true")));
        }
        if let Some(search) = filters.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let pattern = format!("%{}%", search);
            query = query.filter(
                Condition::any()
                    .add(Expr::col(doctor::Column::FirstName).ilike(pattern.clone()))
                    .add(Expr::col(doctor::Column::LastName).ilike(pattern.clone()))
                    .add(Expr::col(doctor::Column::HospitalName).ilike(pattern)),
            );
        }
        if let Some(city) = filters.city.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            query = query.filter(Expr::col(doctor::Column::City).ilike(format!("%{}%", city)));
        }

        query
            .order_by_desc(doctor::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)
    }

    async fn get(&self, id: Uuid) -> Result<Option<doctor::Model>, ServiceError> {
        doctor::Entity::find_by_id(id).one(&self.db).await.map_err(db_err)
    }

    async fn find_by_email(&self, email: &str, exclude: Option<Uuid>) -> Result<Option<doctor::Model>, ServiceError> {
        // Stored emails are lowercased, so an eq on the lowered needle is
        // a case-insensitive match.
        let mut query = doctor::Entity::find().filter(doctor::Column::Email.eq(email.to_lowercase()));
        if let Some(id) = exclude {
            query = query.filter(doctor::Column::Id.ne(id));
        }
        query.one(&self.db).await.map_err(db_err)
    }

    async fn find_by_license(&self, license: &str, exclude: Option<Uuid>) -> Result<Option<doctor::Model>, ServiceError> {
        let mut query = doctor::Entity::find().filter(doctor::Column::LicenseNumber.eq(license));
        if let Some(id) = exclude {
            query = query.filter(doctor::Column::Id.ne(id));
        }
        query.one(&self.db).await.map_err(db_err)
    }

    async fn insert(&self, created_by: Uuid, fields: &ValidDoctor) -> Result<doctor::Model, ServiceError> {
        let now = Utc::now().into();
        let am = doctor::ActiveModel {
            id: Set(Uuid::new_v4()),
            first_name: Set(fields.first_name.clone()),
            last_name: Set(fields.last_name.clone()),
            email: Set(fields.email.clone()),
            phone: Set(fields.phone.clone()),
            specialization: Set(fields.specialization.clone()),
            license_number: Set(fields.license_number.clone()),
            years_of_experience: Set(fields.years_of_experience),
            qualification: Set(fields.qualification.clone()),
            bio: Set(fields.bio.clone()),
            consultation_fee: Set(fields.consultation_fee),
            is_available: Set(fields.is_available),
            hospital_name: Set(fields.hospital_name.clone()),
            address: Set(fields.address.clone()),
            city: Set(fields.city.clone()),
            state: Set(fields.state.clone()),
            country: Set(fields.country.clone()),
            created_by: Set(Some(created_by)),
            created_at: Set(now),
            updated_at: Set(now),
        };
        am.insert(&self.db).await.map_err(db_err)
    }

    async fn replace(&self, current: doctor::Model, fields: &ValidDoctor) -> Result<doctor::Model, ServiceError> {
        let mut am: doctor::ActiveModel = current.into();
        am.first_name = Set(fields.first_name.clone());
        am.last_name = Set(fields.last_name.clone());
        am.email = Set(fields.email.clone());
        am.phone = Set(fields.phone.clone());
        am.specialization = Set(fields.specialization.clone());
        am.license_number = Set(fields.license_number.clone());
        am.years_of_experience = Set(fields.years_of_experience);
        am.qualification = Set(fields.qualification.clone());
        am.bio = Set(fields.bio.clone());
        am.consultation_fee = Set(fields.consultation_fee);
        am.is_available = Set(fields.is_available);
        am.hospital_name = Set(fields.hospital_name.clone());
        am.address = Set(fields.address.clone());
        am.city = Set(fields.city.clone());
        am.state = Set(fields.state.clone());
        am.country = Set(fields.country.clone());
        am.updated_at = Set(Utc::now().into());
        am.update(&self.db).await.map_err(db_err)
    }

    async fn apply(&self, current: doctor::Model, changes: &DoctorInput) -> Result<doctor::Model, ServiceError> {
        let mut am: doctor::ActiveModel = current.into();
        if let Some(v) = &changes.first_name {
            am.first_name = Set(v.clone());
        }
        if let Some(v) = &changes.last_name {
            am.last_name = Set(v.clone());
        }
        if let Some(v) = &changes.email {
            am.email = Set(v.clone());
        }
        if changes.phone.is_some() {
            am.phone = Set(changes.phone.clone());
        }
        if let Some(v) = &changes.specialization {
            am.specialization = Set(v.clone());
        }
        if let Some(v) = &changes.license_number {
            am.license_number = Set(v.clone());
        }
        if let Some(v) = changes.years_of_experience {
            am.years_of_experience = Set(v);
        }
        if changes.qualification.is_some() {
            am.qualification = Set(changes.qualification.clone());
        }
        if changes.bio.is_some() {
            am.bio = Set(changes.bio.clone());
        }
        if changes.consultation_fee.is_some() {
            am.consultation_fee = Set(changes.consultation_fee);
        }
        if let Some(v) = changes.is_available {
            am.is_available = Set(v);
        }
        if changes.hospital_name.is_some() {
            am.hospital_name = Set(changes.hospital_name.clone());
        }
        if changes.address.is_some() {
            am.address = Set(changes.address.clone());
        }
        if changes.city.is_some() {
            am.city = Set(changes.city.clone());
        }
        if changes.state.is_some() {
            am.state = Set(changes.state.clone());
        }
        if changes.country.is_some() {
            am.country = Set(changes.country.clone());
        }
        am.updated_at = Set(Utc::now().into());
        am.update(&self.db).await.map_err(db_err)
    }

    async fn delete(&self, row: doctor::Model) -> Result<(), ServiceError> {
        row.delete(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn creator_name(&self, user_id: Option<Uuid>) -> Result<Option<String>, ServiceError> {
        let Some(id) = user_id else {
            return Ok(None);
        };
        let found = user::Entity::find_by_id(id).one(&self.db).await.map_err(db_err)?;
        Ok(found.map(|u| u.name))
    }
}
