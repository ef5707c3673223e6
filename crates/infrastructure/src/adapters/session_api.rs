//! HTTP implementation of the session API.

use async_trait::async_trait;
use hrm_application::ports::{HttpClient, SessionApi};
use hrm_domain::{
    ApiRequest, ApiResponse, AuthError, Credentials, CurrentUser, LoginOutcome, RefreshedTokens,
    StatusResponse, TokenPair,
};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::debug;

/// Session API over an HTTP client.
///
/// The client must be the raw transport: these calls carry no bearer
/// token and must not trigger the refresh flow themselves.
#[derive(Debug, Clone)]
pub struct HttpSessionApi<C> {
    client: C,
    base_url: String,
}

impl<C: HttpClient> HttpSessionApi<C> {
    /// Creates the API for the server at `base_url`.
    pub fn new(client: C, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url.trim_end_matches('/'))
    }

    async fn post<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<ApiResponse, AuthError> {
        let request = ApiRequest::post(self.url(path))
            .json(body)
            .map_err(|e| AuthError::InvalidResponse {
                message: e.to_string(),
            })?;
        debug!(path, "calling session endpoint");
        self.client
            .execute(request)
            .await
            .map_err(|e| AuthError::Network {
                message: e.to_string(),
            })
    }

    /// Posts to a status endpoint.
    ///
    /// Client errors that carry a JSON body are returned as a status body so
    /// per-field messages reach the caller.
    async fn post_status<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<StatusResponse, AuthError> {
        let response = self.post(path, body).await?;
        let status = response.status.as_u16();
        let parsed = response.json::<StatusResponse>().ok();

        match parsed {
            Some(mut body) if response.is_success() || (400..500).contains(&status) => {
                if body.status.is_none() && body.code.is_none() {
                    body.status = Some(status);
                }
                Ok(body)
            }
            None if response.is_success() => Ok(StatusResponse {
                status: Some(status),
                ..StatusResponse::default()
            }),
            _ => Err(rejected(&response)),
        }
    }
}

#[async_trait]
impl<C: HttpClient> SessionApi for HttpSessionApi<C> {
    async fn login(&self, credentials: &Credentials) -> Result<LoginOutcome, AuthError> {
        let response = self
            .post(
                "auth/login",
                &json!({"email": credentials.email, "password": credentials.password}),
            )
            .await?;
        if !response.is_success() {
            return Err(rejected(&response));
        }

        let body: Value = response.json().map_err(invalid)?;
        let data = body.get("data").unwrap_or(&Value::Null);
        let access_token = data
            .get("accessToken")
            .and_then(Value::as_str)
            .ok_or_else(|| AuthError::InvalidResponse {
                message: "login response has no access token".to_string(),
            })?;
        // Servers that do not issue a separate refresh token accept the
        // access token in its place.
        let refresh_token = data
            .get("refreshToken")
            .and_then(Value::as_str)
            .unwrap_or(access_token);

        let user = CurrentUser::from_value(data.get("user").unwrap_or(data));

        Ok(LoginOutcome {
            tokens: TokenPair::new(access_token, refresh_token),
            user,
        })
    }

    async fn refresh_token(&self, refresh_token: &str) -> Result<RefreshedTokens, AuthError> {
        let response = self
            .post("auth/refresh-token", &json!({"refreshToken": refresh_token}))
            .await?;
        if !response.is_success() {
            return Err(rejected(&response));
        }

        let body: Value = response.json().map_err(invalid)?;
        let tokens = match body.get("data") {
            Some(data) if data.get("accessToken").is_some() => data.clone(),
            _ => body,
        };
        serde_json::from_value(tokens).map_err(|e| AuthError::InvalidResponse {
            message: e.to_string(),
        })
    }

    async fn register(
        &self,
        email: &str,
        password: &str,
        organization_name: &str,
    ) -> Result<StatusResponse, AuthError> {
        self.post_status(
            "auth/register",
            &json!({
                "email": email,
                "password": password,
                "organizationName": organization_name,
            }),
        )
        .await
    }

    async fn request_otp(&self, email: &str) -> Result<StatusResponse, AuthError> {
        self.post_status("auth/get-otp", &json!({"email": email})).await
    }

    async fn verify_otp(&self, otp: &str) -> Result<StatusResponse, AuthError> {
        self.post_status("auth/verify-otp", &json!({"otp": otp})).await
    }

    async fn reset_password(
        &self,
        email: &str,
        new_password: &str,
    ) -> Result<StatusResponse, AuthError> {
        self.post_status(
            "auth/reset-password",
            &json!({"email": email, "newPassword": new_password}),
        )
        .await
    }
}

fn invalid(error: hrm_domain::DomainError) -> AuthError {
    AuthError::InvalidResponse {
        message: error.to_string(),
    }
}

/// Builds a rejection, preferring the `message` field of a JSON body.
fn rejected(response: &ApiResponse) -> AuthError {
    let message = response
        .json::<Value>()
        .ok()
        .and_then(|body| body.get("message").and_then(Value::as_str).map(str::to_string))
        .or_else(|| Some(response.text()).filter(|text| !text.trim().is_empty()))
        .unwrap_or_else(|| response.status.reason_phrase().to_string());
    AuthError::Rejected {
        status: response.status.as_u16(),
        message,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use hrm_application::ports::{HttpClientError, HttpFuture};
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    /// Answers every request with one canned response.
    struct Canned {
        status: u16,
        body: Value,
        seen: Mutex<Vec<ApiRequest>>,
    }

    impl Canned {
        fn new(status: u16, body: Value) -> Self {
            Self {
                status,
                body,
                seen: Mutex::new(Vec::new()),
            }
        }

        fn last_body(&self) -> Value {
            let seen = self.seen.lock().unwrap();
            serde_json::from_slice(seen.last().unwrap().body.as_deref().unwrap()).unwrap()
        }
    }

    impl HttpClient for Canned {
        fn execute(&self, request: ApiRequest) -> HttpFuture<'_> {
            self.seen.lock().unwrap().push(request);
            let response = ApiResponse::json_body(self.status, &self.body);
            Box::pin(async move { Ok(response) })
        }
    }

    struct Offline;

    impl HttpClient for Offline {
        fn execute(&self, _request: ApiRequest) -> HttpFuture<'_> {
            Box::pin(async { Err(HttpClientError::ConnectionFailed("offline".to_string())) })
        }
    }

    fn api(status: u16, body: Value) -> HttpSessionApi<Canned> {
        HttpSessionApi::new(Canned::new(status, body), "http://api.test/api/")
    }

    #[tokio::test]
    async fn test_login_reads_tokens_from_data() {
        let api = api(
            200,
            json!({"data": {
                "accessToken": "a1",
                "refreshToken": "r1",
                "user": {"email": "hr@acme.vn", "role": "Admin"}
            }}),
        );

        let outcome = api
            .login(&Credentials::new("hr@acme.vn", "Secret#123"))
            .await
            .unwrap();

        assert_eq!(outcome.tokens, TokenPair::new("a1", "r1"));
        assert!(outcome.user.unwrap().is_admin());
        let seen = api.client.seen.lock().unwrap();
        assert_eq!(seen[0].url, "http://api.test/api/auth/login");
        assert_eq!(seen[0].authorization(), None);
    }

    #[tokio::test]
    async fn test_login_without_refresh_token_reuses_access_token() {
        let api = api(200, json!({"data": {"accessToken": "a1"}}));

        let outcome = api
            .login(&Credentials::new("hr@acme.vn", "Secret#123"))
            .await
            .unwrap();

        assert_eq!(outcome.tokens, TokenPair::new("a1", "a1"));
        assert_eq!(outcome.user, None);
    }

    #[tokio::test]
    async fn test_login_rejected_uses_message() {
        let api = api(401, json!({"message": "Invalid credentials"}));

        let error = api
            .login(&Credentials::new("hr@acme.vn", "nope"))
            .await
            .unwrap_err();

        assert_eq!(
            error,
            AuthError::Rejected {
                status: 401,
                message: "Invalid credentials".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_refresh_accepts_top_level_or_wrapped() {
        let top = api(200, json!({"accessToken": "a2"}));
        let wrapped = api(200, json!({"data": {"accessToken": "a3", "refreshToken": "r3"}}));

        let first = top.refresh_token("r1").await.unwrap();
        let second = wrapped.refresh_token("r1").await.unwrap();

        assert_eq!(first.access_token, "a2");
        assert_eq!(first.refresh_token, None);
        assert_eq!(second.refresh_token.as_deref(), Some("r3"));
        assert_eq!(top.client.last_body(), json!({"refreshToken": "r1"}));
    }

    #[tokio::test]
    async fn test_refresh_rejected() {
        let api = api(401, json!({"message": "Refresh token expired"}));

        let error = api.refresh_token("r1").await.unwrap_err();

        assert_eq!(error.status(), Some(401));
    }

    #[tokio::test]
    async fn test_register_body_and_status() {
        let api = api(201, json!({"status": 201, "data": {"email": "hr@acme.vn"}}));

        let response = api
            .register("hr@acme.vn", "Secret#123", "Acme Vietnam")
            .await
            .unwrap();

        assert!(response.is_created());
        assert_eq!(
            api.client.last_body(),
            json!({
                "email": "hr@acme.vn",
                "password": "Secret#123",
                "organizationName": "Acme Vietnam",
            })
        );
    }

    #[tokio::test]
    async fn test_client_error_keeps_field_messages() {
        let api = api(400, json!({"message": {"email": "Email already exists"}}));

        let response = api
            .register("hr@acme.vn", "Secret#123", "Acme Vietnam")
            .await
            .unwrap();

        assert!(!response.is_created());
        assert_eq!(response.status, Some(400));
        assert_eq!(response.field_errors().len(), 1);
    }

    #[tokio::test]
    async fn test_server_error_is_rejected() {
        let api = api(500, json!({"message": "boom"}));

        let error = api.verify_otp("123456").await.unwrap_err();

        assert_eq!(error.status(), Some(500));
    }

    #[tokio::test]
    async fn test_transport_failure_is_network_error() {
        let api = HttpSessionApi::new(Offline, "http://api.test");

        let error = api.request_otp("hr@acme.vn").await.unwrap_err();

        assert!(matches!(error, AuthError::Network { .. }));
    }
}
