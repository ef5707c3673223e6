//! Request specification type

use serde::Serialize;

use super::HttpMethod;
use crate::auth::bearer_header;
use crate::error::{DomainError, DomainResult};

/// Name of the credential header.
pub const AUTHORIZATION: &str = "Authorization";

/// Name of the content type header.
pub const CONTENT_TYPE: &str = "Content-Type";

/// Content type for JSON bodies.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// A fully resolved request to the API.
///
/// Header names are matched case-insensitively; setting a header replaces
/// any previous value under the same name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: HttpMethod,
    /// Absolute URL.
    pub url: String,
    /// Headers in insertion order.
    pub headers: Vec<(String, String)>,
    /// Encoded body, if any.
    pub body: Option<Vec<u8>>,
}

impl ApiRequest {
    /// Creates a request without headers or body.
    #[must_use]
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Creates a GET request.
    #[must_use]
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, url)
    }

    /// Creates a POST request.
    #[must_use]
    pub fn post(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, url)
    }

    /// Creates a PUT request.
    #[must_use]
    pub fn put(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, url)
    }

    /// Creates a DELETE request.
    #[must_use]
    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, url)
    }

    /// Encodes `value` as the JSON body and sets the content type.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidBody` if the value cannot be serialized.
    pub fn json<T: Serialize + ?Sized>(mut self, value: &T) -> DomainResult<Self> {
        let body =
            serde_json::to_vec(value).map_err(|e| DomainError::InvalidBody(e.to_string()))?;
        self.set_header(CONTENT_TYPE, JSON_CONTENT_TYPE);
        self.body = Some(body);
        Ok(self)
    }

    /// Sets a header, replacing any existing value with the same name.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        self.headers.retain(|(n, _)| !n.eq_ignore_ascii_case(&name));
        self.headers.push((name, value.into()));
    }

    /// Returns the value of a header, if set.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns a copy of this request carrying `access_token` as a bearer credential.
    #[must_use]
    pub fn with_bearer(&self, access_token: &str) -> Self {
        let mut request = self.clone();
        request.set_header(AUTHORIZATION, bearer_header(access_token));
        request
    }

    /// Returns the `Authorization` header value, if set.
    #[must_use]
    pub fn authorization(&self) -> Option<&str> {
        self.header(AUTHORIZATION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_json_body_sets_content_type() {
        let request = ApiRequest::post("http://api.test/auth/login")
            .json(&serde_json::json!({"email": "a@b.co"}))
            .unwrap();

        assert_eq!(request.header("content-type"), Some(JSON_CONTENT_TYPE));
        assert_eq!(request.body.as_deref(), Some(br#"{"email":"a@b.co"}"#.as_slice()));
    }

    #[test]
    fn test_set_header_replaces_case_insensitively() {
        let mut request = ApiRequest::get("http://api.test/branch");
        request.set_header("authorization", "Bearer old");
        request.set_header(AUTHORIZATION, "Bearer new");

        assert_eq!(request.headers.len(), 1);
        assert_eq!(request.authorization(), Some("Bearer new"));
    }

    #[test]
    fn test_with_bearer_leaves_original_untouched() {
        let original = ApiRequest::get("http://api.test/branch");
        let authed = original.with_bearer("tok");

        assert_eq!(original.authorization(), None);
        assert_eq!(authed.authorization(), Some("Bearer tok"));
    }
}
