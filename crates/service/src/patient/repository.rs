use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::{extension::postgres::PgExpr, Expr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, ModelTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::domain::{PatientFilters, PatientInput, ValidPatient};
use crate::errors::ServiceError;
use models::patient;

#[async_trait]
pub trait PatientRepository: Send + Sync {
    async fn list(&self, owner: Uuid, filters: &PatientFilters) -> Result<Vec<patient::Model>, ServiceError>;
    /// Owner-scoped lookup: a row someone else created is reported absent.
    async fn find_owned(&self, owner: Uuid, id: Uuid) -> Result<Option<patient::Model>, ServiceError>;
    async fn insert(&self, owner: Uuid, fields: &ValidPatient) -> Result<patient::Model, ServiceError>;
    async fn replace(&self, current: patient::Model, fields: &ValidPatient) -> Result<patient::Model, ServiceError>;
    async fn apply(&self, current: patient::Model, changes: &PatientInput) -> Result<patient::Model, ServiceError>;
    async fn delete(&self, row: patient::Model) -> Result<(), ServiceError>;
}

/// SeaORM-backed repository implementation.
pub struct SeaOrmPatientRepository {
    pub db: DatabaseConnection,
}

fn db_err(e: sea_orm::DbErr) -> ServiceError {
    ServiceError::Repository(e.to_string())
}

#[async_trait]
impl PatientRepository for SeaOrmPatientRepository {
    async fn list(&self, owner: Uuid, filters: &PatientFilters) -> Result<Vec<patient::Model>, ServiceError> {
        let mut query = patient::Entity::find().filter(patient::Column::CreatedBy.eq(owner));

        if let Some(search) = filters.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let pattern = format!("%{}%", search);
            query = query.filter(
                Condition::any()
                    .add(Expr::col(patient::Column::FirstName).ilike(pattern.clone()))
                    .add(Expr::col(patient::Column::LastName).ilike(pattern.clone()))
                    .add(Expr::col(patient::Column::Email).ilike(pattern)),
            );
        }
        if let Some(gender) = filters.gender.as_deref().filter(|g| !g.is_empty()) {
            query = query.filter(patient::Column::Gender.eq(gender));
        }

        query
            .order_by_desc(patient::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)
    }

    async fn find_owned(&self, owner: Uuid, id: Uuid) -> Result<Option<patient::Model>, ServiceError> {
        patient::Entity::find()
            .filter(patient::Column::Id.eq(id))
            .filter(patient::Column::CreatedBy.eq(owner))
            .one(&self.db)
            .await
            .map_err(db_err)
    }

    async fn insert(&self, owner: Uuid, fields: &ValidPatient) -> Result<patient::Model, ServiceError> {
        let now = Utc::now().into();
        let am = patient::ActiveModel {
            id: Set(Uuid::new_v4()),
            first_name: Set(fields.first_name.clone()),
            last_name: Set(fields.last_name.clone()),
            email: Set(fields.email.clone()),
            phone: Set(fields.phone.clone()),
            date_of_birth: Set(fields.date_of_birth),
            gender: Set(fields.gender.clone()),
            blood_group: Set(fields.blood_group.clone()),
            allergies: Set(fields.allergies.clone()),
            medical_history: Set(fields.medical_history.clone()),
            current_medications: Set(fields.current_medications.clone()),
            emergency_contact_name: Set(fields.emergency_contact_name.clone()),
            emergency_contact_phone: Set(fields.emergency_contact_phone.clone()),
            address: Set(fields.address.clone()),
            city: Set(fields.city.clone()),
            state: Set(fields.state.clone()),
            country: Set(fields.country.clone()),
            postal_code: Set(fields.postal_code.clone()),
            created_by: Set(owner),
            created_at: Set(now),
            updated_at: Set(now),
        };
        am.insert(&self.db).await.map_err(db_err)
    }

    async fn replace(&self, current: patient::Model, fields: &ValidPatient) -> Result<patient::Model, ServiceError> {
        let mut am: patient::ActiveModel = current.into();
        am.first_name = Set(fields.first_name.clone());
        am.last_name = Set(fields.last_name.clone());
        am.email = Set(fields.email.clone());
        am.phone = Set(fields.phone.clone());
        am.date_of_birth = Set(fields.date_of_birth);
        am.gender = Set(fields.gender.clone());
        am.blood_group = Set(fields.blood_group.clone());
        am.allergies = Set(fields.allergies.clone());
        am.medical_history = Set(fields.medical_history.clone());
        am.current_medications = Set(fields.current_medications.clone());
        am.emergency_contact_name = Set(fields.emergency_contact_name.clone());
        am.emergency_contact_phone = Set(fields.emergency_contact_phone.clone());
        am.address = Set(fields.address.clone());
        am.city = Set(fields.city.clone());
        am.state = Set(fields.state.clone());
        am.country = Set(fields.country.clone());
        am.postal_code = Set(fields.postal_code.clone());
        am.updated_at = Set(Utc::now().into());
        am.update(&self.db).await.map_err(db_err)
    }

    async fn apply(&self, current: patient::Model, changes: &PatientInput) -> Result<patient::Model, ServiceError> {
        let mut am: patient::ActiveModel = current.into();
        if let Some(v) = &changes.first_name {
            am.first_name = Set(v.clone());
        }
        if let Some(v) = &changes.last_name {
            am.last_name = Set(v.clone());
        }
        if changes.email.is_some() {
            am.email = Set(changes.email.clone());
        }
        if changes.phone.is_some() {
            am.phone = Set(changes.phone.clone());
        }
        if let Some(v) = changes.date_of_birth {
            am.date_of_birth = Set(v);
        }
        if let Some(v) = &changes.gender {
            am.gender = Set(v.clone());
        }
        if changes.blood_group.is_some() {
            am.blood_group = Set(changes.blood_group.clone());
        }
        if changes.allergies.is_some() {
            am.allergies = Set(changes.allergies.clone());
        }
        if changes.medical_history.is_some() {
            am.medical_history = Set(changes.medical_history.clone());
        }
        if changes.current_medications.is_some() {
            am.current_medications = Set(changes.current_medications.clone());
        }
        if changes.emergency_contact_name.is_some() {
            am.emergency_contact_name = Set(changes.emergency_contact_name.clone());
        }
        if changes.emergency_contact_phone.is_some() {
            am.emergency_contact_phone = Set(changes.emergency_contact_phone.clone());
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
        if changes.postal_code.is_some() {
            am.postal_code = Set(changes.postal_code.clone());
        }
        am.updated_at = Set(Utc::now().into());
        am.update(&self.db).await.map_err(db_err)
    }

    async fn delete(&self, row: patient::Model) -> Result<(), ServiceError> {
        row.delete(&self.db).await.map_err(db_err)?;
        Ok(())
    }
}
