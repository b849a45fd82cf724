//! Loan application domain module
//!
//! Contains models, validation, storage and the lifecycle service.

mod error;
mod model;
mod pg_repository;
mod repository;
mod service;
mod validation;

pub use error::{ApplicationError, FieldErrors, RepositoryError};
pub use model::*;
pub use pg_repository::PgApplicationRepository;
pub use repository::{ApplicationRepository, InMemoryApplicationRepository};
pub use service::ApplicationService;
pub use validation::validate_submission;
