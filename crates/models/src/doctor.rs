use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::user;

/// Specialization codes and display labels for the directory.
pub const SPECIALIZATION_CHOICES: &[(&str, &str)] = &[
    ("general", "General Practitioner"),
    ("cardiology", "Cardiology"),
    ("dermatology", "Dermatology"),
    ("endocrinology", "Endocrinology"),
    ("gastroenterology", "Gastroenterology"),
    ("hematology", "Hematology"),
    ("infectious_disease", "Infectious Disease"),
    ("internal_medicine", "Internal Medicine"),
    ("nephrology", "Nephrology"),
    ("neurology", "Neurology"),
    ("obstetrics_gynecology", "Obstetrics & Gynecology"),
    ("oncology", "Oncology"),
    ("ophthalmology", "Ophthalmology"),
    ("orthopedics", "Orthopedics"),
    ("pediatrics", "Pediatrics"),
    ("psychiatry", "Psychiatry"),
    ("pulmonology", "Pulmonology"),
    ("radiology", "Radiology"),
    ("rheumatology", "Rheumatology"),
    ("surgery", "Surgery"),
    ("urology", "Urology"),
    ("other", "Other"),
];

pub fn is_valid_specialization(code: &str) -> bool {
    SPECIALIZATION_CHOICES.iter().any(|(c, _)| *c == code)
}

/// Display label for a specialization code; unknown codes echo back as-is.
pub fn specialization_display(code: &str) -> &str {
    SPECIALIZATION_CHOICES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, label)| *label)
        .unwrap_or(code)
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "doctors")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub specialization: String,
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
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Creator }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Creator => Entity::belongs_to(user::Entity)
                .from(Column::CreatedBy)
                .to(user::Column::Id)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn display_name(&self) -> String {
        format!("Dr. {} {}", self.first_name, self.last_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn specialization_lookup() {
        assert!(is_valid_specialization("cardiology"));
        assert!(!is_valid_specialization("alchemy"));
        assert_eq!(specialization_display("general"), "General Practitioner");
        assert_eq!(specialization_display("unknown_code"), "unknown_code");
    }
}
