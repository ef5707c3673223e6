//! Domain error types

use thiserror::Error;

use crate::validation::ValidationErrors;

/// Domain-level errors that can occur during validation or processing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The request body could not be encoded or decoded.
    #[error("invalid body: {0}")]
    InvalidBody(String),

    /// One or more form fields failed validation.
    #[error("{0}")]
    Validation(#[from] ValidationErrors),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
