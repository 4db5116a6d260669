//! Domain error taxonomy
//!
//! One canonical error enum for the whole core. Repositories map
//! `sea_orm::DbErr` into `Internal`, the booking service maps processor
//! failures into `Payment`, and nothing below the HTTP layer ever sees a
//! status code.

use thiserror::Error;

pub type DomainResult<T> = Result<T, DomainError>;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Validation: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Payment failure: {0}")]
    Payment(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    /// Whether this error is likely transient (e.g. DB connection lost,
    /// processor transport blip) and the operation may succeed if retried.
    pub fn is_transient(&self) -> bool {
        matches!(self, DomainError::Internal(_))
    }
}
