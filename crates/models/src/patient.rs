use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::user;

/// Gender codes and display labels.
pub const GENDER_CHOICES: &[(&str, &str)] = &[
    ("M", "Male"),
    ("F", "Female"),
    ("O", "Other"),
    ("N", "Prefer not to say"),
];

/// ABO/Rh blood group codes and display labels.
pub const BLOOD_GROUP_CHOICES: &[(&str, &str)] = &[
    ("A+", "A Positive"),
    ("A-", "A Negative"),
    ("B+", "B Positive"),
    ("B-", "B Negative"),
    ("AB+", "AB Positive"),
    ("AB-", "AB Negative"),
    ("O+", "O Positive"),
    ("O-", "O Negative"),
];

pub fn is_valid_gender(code: &str) -> bool {
    GENDER_CHOICES.iter().any(|(c, _)| *c == code)
}

pub fn is_valid_blood_group(code: &str) -> bool {
    BLOOD_GROUP_CHOICES.iter().any(|(c, _)| *c == code)
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "patients")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth: Date,
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
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Owner }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Owner => Entity::belongs_to(user::Entity)
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
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn choice_tables_cover_the_codes() {
        assert!(is_valid_gender("M"));
        assert!(is_valid_gender("N"));
        assert!(!is_valid_gender("X"));
        assert!(is_valid_blood_group("AB-"));
        assert!(!is_valid_blood_group("AB"));
    }
}
