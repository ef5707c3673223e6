//! Response specification type
//!
//! Contains types for representing HTTP responses: status code,
//! headers and the raw body.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// HTTP status code with semantic helpers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatusCode(pub u16);

impl StatusCode {
    /// 200 OK.
    pub const OK: Self = Self(200);
    /// 201 Created.
    pub const CREATED: Self = Self(201);
    /// 401 Unauthorized, the trigger for a token refresh.
    pub const UNAUTHORIZED: Self = Self(401);

    /// Creates a new `StatusCode`.
    #[must_use]
    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    /// Returns the numeric status code.
    #[must_use]
    pub const fn as_u16(&self) -> u16 {
        self.0
    }

    /// Returns true if this is a 2xx success status.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.0 >= 200 && self.0 < 300
    }

    /// Returns true if the request lacked valid credentials.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        self.0 == 401
    }

    /// Returns true if this is any error status (4xx or 5xx).
    #[must_use]
    pub const fn is_error(&self) -> bool {
        self.0 >= 400 && self.0 < 600
    }

    /// Returns the canonical reason phrase for common status codes.
    #[must_use]
    pub const fn reason_phrase(&self) -> &'static str {
        match self.0 {
            200 => "OK",
            201 => "Created",
            204 => "No Content",
            400 => "Bad Request",
            401 => "Unauthorized",
            403 => "Forbidden",
            404 => "Not Found",
            409 => "Conflict",
            422 => "Unprocessable Entity",
            500 => "Internal Server Error",
            502 => "Bad Gateway",
            503 => "Service Unavailable",
            _ => "Unknown",
        }
    }
}

impl std::fmt::Display for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.0, self.reason_phrase())
    }
}

impl From<u16> for StatusCode {
    fn from(code: u16) -> Self {
        Self(code)
    }
}

/// A response received from the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    /// HTTP status.
    pub status: StatusCode,
    /// Response headers, names lowercased.
    pub headers: HashMap<String, String>,
    /// Raw body bytes.
    pub body: Vec<u8>,
}

impl ApiResponse {
    /// Creates a new response.
    #[must_use]
    pub fn new(
        status: impl Into<StatusCode>,
        headers: HashMap<String, String>,
        body: Vec<u8>,
    ) -> Self {
        Self {
            status: status.into(),
            headers,
            body,
        }
    }

    /// Creates a response with a JSON body and no headers.
    #[must_use]
    pub fn json_body(status: impl Into<StatusCode>, body: &serde_json::Value) -> Self {
        Self::new(status, HashMap::new(), body.to_string().into_bytes())
    }

    /// Returns true if the status is 2xx.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Returns true if the status is 401.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        self.status.is_unauthorized()
    }

    /// Returns the body as text, replacing invalid UTF-8.
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Decodes the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidBody` if the body does not match `T`.
    pub fn json<T: DeserializeOwned>(&self) -> DomainResult<T> {
        serde_json::from_slice(&self.body).map_err(|e| DomainError::InvalidBody(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_status_categories() {
        assert!(StatusCode::OK.is_success());
        assert!(StatusCode::CREATED.is_success());
        assert!(StatusCode::UNAUTHORIZED.is_unauthorized());
        assert!(StatusCode::UNAUTHORIZED.is_error());
        assert!(!StatusCode::new(403).is_unauthorized());
    }

    #[test]
    fn test_status_display() {
        assert_eq!(StatusCode::UNAUTHORIZED.to_string(), "401 Unauthorized");
        assert_eq!(StatusCode::new(299).to_string(), "299 Unknown");
    }

    #[test]
    fn test_json_decoding() {
        let response = ApiResponse::json_body(200, &serde_json::json!({"data": [1, 2]}));
        let value: serde_json::Value = response.json().unwrap();
        assert_eq!(value["data"][1], 2);

        let broken = ApiResponse::new(200, HashMap::new(), b"not json".to_vec());
        assert!(broken.json::<serde_json::Value>().is_err());
        assert_eq!(broken.text(), "not json");
    }
}
