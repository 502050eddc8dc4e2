//! Doctor directory: globally visible CRUD with unique email and license
//! number enforcement.

pub mod domain;
pub mod repository;
pub mod service;

pub use service::DoctorService;
