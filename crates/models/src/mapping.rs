use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{doctor, patient, user};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "patient_doctor_mappings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub assigned_by: Option<Uuid>,
    pub notes: Option<String>,
    pub is_primary: bool,
    pub assigned_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Patient,
    Doctor,
    AssignedBy,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Patient => Entity::belongs_to(patient::Entity)
                .from(Column::PatientId)
                .to(patient::Column::Id)
                .into(),
            Relation::Doctor => Entity::belongs_to(doctor::Entity)
                .from(Column::DoctorId)
                .to(doctor::Column::Id)
                .into(),
            Relation::AssignedBy => Entity::belongs_to(user::Entity)
                .from(Column::AssignedBy)
                .to(user::Column::Id)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}
