//! Session API port
//!
//! The authentication endpoints of the HRM API. Implementations talk to
//! the raw transport; these calls never go through the request
//! authenticator.

use async_trait::async_trait;
use hrm_domain::{AuthError, Credentials, LoginOutcome, RefreshedTokens, StatusResponse};

/// Port for the authentication endpoints.
#[async_trait]
pub trait SessionApi: Send + Sync {
    /// Exchanges credentials for a token pair and the user profile.
    async fn login(&self, credentials: &Credentials) -> Result<LoginOutcome, AuthError>;

    /// Exchanges a refresh token for a new access token.
    async fn refresh_token(&self, refresh_token: &str) -> Result<RefreshedTokens, AuthError>;

    /// Registers a new organization and its administrator.
    async fn register(
        &self,
        email: &str,
        password: &str,
        organization_name: &str,
    ) -> Result<StatusResponse, AuthError>;

    /// Sends (or re-sends) a one-time password to `email`.
    async fn request_otp(&self, email: &str) -> Result<StatusResponse, AuthError>;

    /// Confirms a registration with the one-time password.
    async fn verify_otp(&self, otp: &str) -> Result<StatusResponse, AuthError>;

    /// Replaces the password of the account registered under `email`.
    async fn reset_password(
        &self,
        email: &str,
        new_password: &str,
    ) -> Result<StatusResponse, AuthError>;
}
