//! Patient registry: CRUD scoped to the owning user. Ownership misses are
//! indistinguishable from missing rows.

pub mod domain;
pub mod repository;
pub mod service;

pub use service::PatientService;
