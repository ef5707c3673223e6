//! HTTP client port
//!
//! Every stage of the request pipeline implements [`HttpClient`], so the
//! request authenticator can wrap the raw transport and be used in its
//! place.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use hrm_domain::{ApiRequest, ApiResponse, AuthError};
use thiserror::Error;

/// Errors raised while executing a request.
///
/// Error statuses (4xx/5xx) are not errors at this level: they come back
/// as an [`ApiResponse`].
#[derive(Debug, Error)]
pub enum HttpClientError {
    /// The URL could not be parsed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The request did not complete in time.
    #[error("request timed out after {timeout_ms} ms")]
    Timeout {
        /// Configured timeout.
        timeout_ms: u64,
    },

    /// The host name could not be resolved.
    #[error("could not resolve {host}: {message}")]
    DnsError {
        /// Host that failed to resolve.
        host: String,
        /// Underlying error.
        message: String,
    },

    /// The server refused the connection.
    #[error("connection refused by {host}:{port}")]
    ConnectionRefused {
        /// Target host.
        host: String,
        /// Target port.
        port: u16,
    },

    /// The connection could not be established.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The redirect limit was exceeded.
    #[error("too many redirects (max {max})")]
    TooManyRedirects {
        /// Redirect limit.
        max: usize,
    },

    /// The token refresh failed; the session has been cleared.
    #[error("session expired: {0}")]
    SessionExpired(AuthError),

    /// Any other transport failure.
    #[error("{0}")]
    Other(String),
}

/// Boxed future returned by [`HttpClient::execute`].
pub type HttpFuture<'a> =
    Pin<Box<dyn Future<Output = Result<ApiResponse, HttpClientError>> + Send + 'a>>;

/// Port for executing requests against the API.
pub trait HttpClient: Send + Sync {
    /// Sends `request` and returns the response, whatever its status.
    fn execute(&self, request: ApiRequest) -> HttpFuture<'_>;
}

impl<T: HttpClient + ?Sized> HttpClient for Arc<T> {
    fn execute(&self, request: ApiRequest) -> HttpFuture<'_> {
        (**self).execute(request)
    }
}
