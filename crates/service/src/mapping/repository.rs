use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, Set,
};
use tracing::warn;
use uuid::Uuid;

use super::domain::MappingFilters;
use crate::errors::ServiceError;
use models::{doctor, mapping, patient, user};

/// A mapping row with both endpoints and the assigning user's name resolved.
#[derive(Debug, Clone)]
pub struct MappingRecord {
    pub mapping: mapping::Model,
    pub patient: patient::Model,
    pub doctor: doctor::Model,
    pub assigned_by_name: Option<String>,
}

#[async_trait]
pub trait MappingRepository: Send + Sync {
    async fn list(&self, filters: &MappingFilters) -> Result<Vec<MappingRecord>, ServiceError>;
    async fn get(&self, id: Uuid) -> Result<Option<MappingRecord>, ServiceError>;
    async fn pair_exists(&self, patient_id: Uuid, doctor_id: Uuid) -> Result<bool, ServiceError>;
    async fn insert(
        &self,
        patient_id: Uuid,
        doctor_id: Uuid,
        assigned_by: Uuid,
        notes: Option<String>,
        is_primary: bool,
    ) -> Result<mapping::Model, ServiceError>;
    async fn delete(&self, row: mapping::Model) -> Result<(), ServiceError>;

    async fn find_patient(&self, id: Uuid) -> Result<Option<patient::Model>, ServiceError>;
    async fn find_doctor(&self, id: Uuid) -> Result<Option<doctor::Model>, ServiceError>;
    /// All assignments for one patient, newest first, with doctors attached.
    async fn for_patient(&self, patient_id: Uuid) -> Result<Vec<(mapping::Model, doctor::Model)>, ServiceError>;
}

/// SeaORM-backed repository implementation.
pub struct SeaOrmMappingRepository {
    pub db: DatabaseConnection,
}

fn db_err(e: sea_orm::DbErr) -> ServiceError {
    ServiceError::Repository(e.to_string())
}

impl SeaOrmMappingRepository {
    /// Batch-load both endpoints and assigner names for a page of rows.
    async fn hydrate(&self, rows: Vec<mapping::Model>) -> Result<Vec<MappingRecord>, ServiceError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let patient_ids: Vec<Uuid> = rows.iter().map(|m| m.patient_id).collect();
        let doctor_ids: Vec<Uuid> = rows.iter().map(|m| m.doctor_id).collect();
        let user_ids: Vec<Uuid> = rows.iter().filter_map(|m| m.assigned_by).collect();

        let patients: HashMap<Uuid, patient::Model> = patient::Entity::find()
            .filter(patient::Column::Id.is_in(patient_ids))
            .all(&self.db)
            .await
            .map_err(db_err)?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();
        let doctors: HashMap<Uuid, doctor::Model> = doctor::Entity::find()
            .filter(doctor::Column::Id.is_in(doctor_ids))
            .all(&self.db)
            .await
            .map_err(db_err)?
            .into_iter()
            .map(|d| (d.id, d))
            .collect();
        let users: HashMap<Uuid, String> = if user_ids.is_empty() {
            HashMap::new()
        } else {
            user::Entity::find()
                .filter(user::Column::Id.is_in(user_ids))
                .all(&self.db)
                .await
                .map_err(db_err)?
                .into_iter()
                .map(|u| (u.id, u.name))
                .collect()
        };

        Ok(rows
            .into_iter()
            .filter_map(|m| match (patients.get(&m.patient_id), doctors.get(&m.doctor_id)) {
                (Some(p), Some(d)) => {
                    let assigned_by_name = m.assigned_by.and_then(|id| users.get(&id).cloned());
                    Some(MappingRecord {
                        patient: p.clone(),
                        doctor: d.clone(),
                        assigned_by_name,
                        mapping: m,
                    })
                }
                _ => {
                    // FKs cascade, so a dangling endpoint means the row was
                    // deleted between the two queries.
                    warn!(mapping_id = %m.id, "mapping endpoint vanished during hydration");
                    None
                }
            })
            .collect())
    }
}

#[async_trait]
impl MappingRepository for SeaOrmMappingRepository {
    async fn list(&self, filters: &MappingFilters) -> Result<Vec<MappingRecord>, ServiceError> {
        let mut query = mapping::Entity::find();
        if let Some(patient_id) = filters.patient_id {
            query = query.filter(mapping::Column::PatientId.eq(patient_id));
        }
        if let Some(doctor_id) = filters.doctor_id {
            query = query.filter(mapping::Column::DoctorId.eq(doctor_id));
        }
        if let Some(flag) = filters.is_primary.as_deref() {
            query = query.filter(mapping::Column::IsPrimary.eq(flag.eq_ignore_ascii_case("true")));
        }
        let rows = query
            .order_by_desc(mapping::Column::AssignedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        self.hydrate(rows).await
    }

    async fn get(&self, id: Uuid) -> Result<Option<MappingRecord>, ServiceError> {
        let Some(row) = mapping::Entity::find_by_id(id).one(&self.db).await.map_err(db_err)? else {
            return Ok(None);
        };
        Ok(self.hydrate(vec![row]).await?.into_iter().next())
    }

    async fn pair_exists(&self, patient_id: Uuid, doctor_id: Uuid) -> Result<bool, ServiceError> {
        let found = mapping::Entity::find()
            .filter(mapping::Column::PatientId.eq(patient_id))
            .filter(mapping::Column::DoctorId.eq(doctor_id))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(found.is_some())
    }

    async fn insert(
        &self,
        patient_id: Uuid,
        doctor_id: Uuid,
        assigned_by: Uuid,
        notes: Option<String>,
        is_primary: bool,
    ) -> Result<mapping::Model, ServiceError> {
        let now = Utc::now().into();
        let am = mapping::ActiveModel {
            id: Set(Uuid::new_v4()),
            patient_id: Set(patient_id),
            doctor_id: Set(doctor_id),
            assigned_by: Set(Some(assigned_by)),
            notes: Set(notes),
            is_primary: Set(is_primary),
            assigned_at: Set(now),
            updated_at: Set(now),
        };
        am.insert(&self.db).await.map_err(db_err)
    }

    async fn delete(&self, row: mapping::Model) -> Result<(), ServiceError> {
        row.delete(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn find_patient(&self, id: Uuid) -> Result<Option<patient::Model>, ServiceError> {
        patient::Entity::find_by_id(id).one(&self.db).await.map_err(db_err)
    }

    async fn find_doctor(&self, id: Uuid) -> Result<Option<doctor::Model>, ServiceError> {
        doctor::Entity::find_by_id(id).one(&self.db).await.map_err(db_err)
    }

    async fn for_patient(&self, patient_id: Uuid) -> Result<Vec<(mapping::Model, doctor::Model)>, ServiceError> {
        let rows = mapping::Entity::find()
            .filter(mapping::Column::PatientId.eq(patient_id))
            .order_by_desc(mapping::Column::AssignedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let doctor_ids: Vec<Uuid> = rows.iter().map(|m| m.doctor_id).collect();
        let doctors: HashMap<Uuid, doctor::Model> = doctor::Entity::find()
            .filter(doctor::Column::Id.is_in(doctor_ids))
            .all(&self.db)
            .await
            .map_err(db_err)?
            .into_iter()
            .map(|d| (d.id, d))
            .collect();
        Ok(rows
            .into_iter()
            .filter_map(|m| doctors.get(&m.doctor_id).cloned().map(|d| (m, d)))
            .collect())
    }
}
