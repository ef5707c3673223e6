//! HTTP Client implementation using reqwest.
//!
//! This adapter implements the `HttpClient` port using the reqwest library.
//! It is the raw transport underneath the request authenticator.

use std::collections::HashMap;
use std::time::Duration;

use hrm_application::ports::{HttpClient, HttpClientError, HttpFuture};
use hrm_domain::{ApiRequest, ApiResponse, HttpMethod};
use reqwest::{Client, Method, Url};
use tracing::debug;

const MAX_REDIRECTS: usize = 10;

/// HTTP client implementation using reqwest.
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: Client,
    timeout_ms: u64,
}

impl ReqwestHttpClient {
    /// Creates a client whose requests time out after `timeout_ms`.
    ///
    /// Redirects are followed up to ten times and TLS verification is on.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be created.
    pub fn new(timeout_ms: u64) -> Result<Self, HttpClientError> {
        let client = Client::builder()
            .user_agent(concat!("hrm-console/", env!("CARGO_PKG_VERSION")))
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| HttpClientError::Other(e.to_string()))?;

        Ok(Self { client, timeout_ms })
    }

    /// Wraps an existing reqwest client.
    #[must_use]
    pub const fn with_client(client: Client, timeout_ms: u64) -> Self {
        Self { client, timeout_ms }
    }

    const fn to_reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Delete => Method::DELETE,
        }
    }

    /// Maps reqwest errors to the port's `HttpClientError`.
    fn map_error(error: &reqwest::Error, timeout_ms: u64) -> HttpClientError {
        if error.is_timeout() {
            return HttpClientError::Timeout { timeout_ms };
        }

        let host = || {
            error
                .url()
                .and_then(Url::host_str)
                .unwrap_or("unknown")
                .to_string()
        };

        if error.is_connect() {
            let message = error.to_string();
            let lower = message.to_lowercase();
            if lower.contains("dns") || lower.contains("resolve") {
                return HttpClientError::DnsError {
                    host: host(),
                    message,
                };
            }
            if lower.contains("refused") {
                return HttpClientError::ConnectionRefused {
                    host: host(),
                    port: error
                        .url()
                        .and_then(Url::port_or_known_default)
                        .unwrap_or(80),
                };
            }
            return HttpClientError::ConnectionFailed(message);
        }

        if error.is_redirect() {
            return HttpClientError::TooManyRedirects { max: MAX_REDIRECTS };
        }

        HttpClientError::Other(error.to_string())
    }
}

impl HttpClient for ReqwestHttpClient {
    fn execute(&self, request: ApiRequest) -> HttpFuture<'_> {
        Box::pin(async move {
            let url = Url::parse(&request.url)
                .map_err(|e| HttpClientError::InvalidUrl(format!("{e}: {}", request.url)))?;
            debug!(method = %request.method, %url, "sending request");

            let mut builder = self
                .client
                .request(Self::to_reqwest_method(request.method), url);
            for (name, value) in &request.headers {
                builder = builder.header(name, value);
            }
            if let Some(body) = request.body {
                builder = builder.body(body);
            }

            let response = builder
                .send()
                .await
                .map_err(|e| Self::map_error(&e, self.timeout_ms))?;

            let status = response.status().as_u16();
            let headers: HashMap<String, String> = response
                .headers()
                .iter()
                .map(|(k, v)| {
                    (
                        k.as_str().to_lowercase(),
                        v.to_str().unwrap_or("<binary>").to_string(),
                    )
                })
                .collect();
            let body = response
                .bytes()
                .await
                .map_err(|e| HttpClientError::Other(format!("Failed to read body: {e}")))?
                .to_vec();

            debug!(status, "response received");
            Ok(ApiResponse::new(status, headers, body))
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_to_reqwest_method() {
        assert_eq!(
            ReqwestHttpClient::to_reqwest_method(HttpMethod::Get),
            Method::GET
        );
        assert_eq!(
            ReqwestHttpClient::to_reqwest_method(HttpMethod::Put),
            Method::PUT
        );
        assert_eq!(
            ReqwestHttpClient::to_reqwest_method(HttpMethod::Delete),
            Method::DELETE
        );
    }

    #[test]
    fn test_client_creation() {
        assert!(ReqwestHttpClient::new(5_000).is_ok());
    }

    #[tokio::test]
    async fn test_invalid_url() {
        let client = ReqwestHttpClient::new(5_000).unwrap();

        let result = client.execute(ApiRequest::get("not a url")).await;

        assert!(matches!(result, Err(HttpClientError::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn test_connection_refused() {
        let client = ReqwestHttpClient::new(5_000).unwrap();

        // Port 9 (discard) is closed on test machines.
        let result = client.execute(ApiRequest::get("http://127.0.0.1:9/")).await;

        assert!(matches!(
            result,
            Err(HttpClientError::ConnectionRefused { .. } | HttpClientError::ConnectionFailed(_))
        ));
    }
}
