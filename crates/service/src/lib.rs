//! Service layer providing business-oriented operations on top of models.
//! - Separates business logic from data access via repository traits.
//! - Runs the collect-all-errors validation pipeline before any write.
//! - Provides clear error types and documented interfaces.

pub mod errors;
pub mod validation;
pub mod auth;
pub mod patient;
pub mod doctor;
pub mod mapping;
