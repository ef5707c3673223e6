//! Application error types

use hrm_domain::{AuthError, DomainError, ValidationErrors};
use thiserror::Error;

use crate::ports::{HttpClientError, StorageError};

/// Application-level errors.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Form input was rejected before anything was sent, or by the server
    /// on a per-field basis.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// A domain value could not be built or decoded.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// An authentication call failed.
    #[error("authentication failed: {0}")]
    Auth(#[from] AuthError),

    /// The request could not be completed, or the session expired while
    /// it was in flight.
    #[error("HTTP error: {0}")]
    Transport(#[from] HttpClientError),

    /// The API answered with a non-success status.
    #[error("request failed with status {status}: {body}")]
    Http {
        /// HTTP status.
        status: u16,
        /// Response body, as text.
        body: String,
    },

    /// The API reported a domain-level failure in the response body.
    #[error("rejected: {message}")]
    Rejected {
        /// Message reported by the API.
        message: String,
    },

    /// Session state could not be persisted.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl ApplicationError {
    /// Returns true if the session ended because the token refresh failed.
    #[must_use]
    pub const fn is_session_expired(&self) -> bool {
        matches!(self, Self::Transport(HttpClientError::SessionExpired(_)))
    }

    /// Returns the HTTP status when the API rejected the request.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } | Self::Auth(AuthError::Rejected { status, .. }) => {
                Some(*status)
            }
            _ => None,
        }
    }
}

/// Result type alias for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
