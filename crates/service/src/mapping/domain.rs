use serde::Deserialize;
use uuid::Uuid;

/// Wire-level assignment payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MappingInput {
    #[serde(alias = "patient_id")]
    pub patient: Option<Uuid>,
    #[serde(alias = "doctor_id")]
    pub doctor: Option<Uuid>,
    pub notes: Option<String>,
    pub is_primary: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MappingFilters {
    pub patient_id: Option<Uuid>,
    pub doctor_id: Option<Uuid>,
    pub is_primary: Option<String>,
}
