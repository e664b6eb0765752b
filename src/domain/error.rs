//! Domain errors

use thiserror::Error;

use crate::domain::booking::BookingStatus;

/// Domain-level error types. Every failure a caller can branch on has
/// its own variant; nothing is collapsed into a generic error.
#[derive(Debug, Clone, Error)]
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

    #[error("Invalid transition: {from} -> {to}")]
    InvalidTransition {
        from: BookingStatus,
        to: BookingStatus,
    },

    #[error("Expired: {0}")]
    Expired(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
