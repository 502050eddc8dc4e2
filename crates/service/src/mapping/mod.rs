//! Assignment ledger: the patient-doctor join records, with pair
//! uniqueness enforced before insert and by the schema.

pub mod domain;
pub mod repository;
pub mod service;

pub use service::MappingService;
