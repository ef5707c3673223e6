//! Login, registration and password-reset flows.

use std::sync::Arc;

use hrm_domain::auth::{validate_email, validate_otp};
use hrm_domain::{
    AuthError, Credentials, CurrentUser, PasswordResetForm, RegistrationForm, StatusResponse,
    ValidationErrors, ValidationIssue,
};
use tracing::info;

use super::TokenStore;
use crate::error::{ApplicationError, ApplicationResult};
use crate::ports::{Notifier, SessionApi};

/// Authentication flows over a [`SessionApi`].
///
/// Forms are validated before anything is sent. Outcomes are reported
/// through the [`Notifier`] as well as returned.
pub struct AuthService<A> {
    api: A,
    tokens: Arc<TokenStore>,
    notifier: Arc<dyn Notifier>,
}

impl<A: SessionApi> AuthService<A> {
    /// Creates the service.
    pub fn new(api: A, tokens: Arc<TokenStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            api,
            tokens,
            notifier,
        }
    }

    /// The token store sessions are written to.
    #[must_use]
    pub const fn token_store(&self) -> &Arc<TokenStore> {
        &self.tokens
    }

    /// Signs in and stores the new session.
    ///
    /// # Errors
    ///
    /// Returns a validation error for malformed credentials, the API's
    /// rejection, or a storage error if the session could not be saved.
    pub async fn login(&self, credentials: &Credentials) -> ApplicationResult<CurrentUser> {
        credentials.validate()?;

        let outcome = self
            .api
            .login(credentials)
            .await
            .inspect_err(|e| self.report_auth_error("Login failed", e))?;

        let user = outcome
            .user
            .unwrap_or_else(|| CurrentUser::with_email(credentials.email.clone()));
        self.tokens
            .start_session(&outcome.tokens, user.clone())
            .await?;

        info!(email = %credentials.email, "signed in");
        self.notifier
            .success("Login successful", &format!("Welcome back, {}!", user.display_name()));
        Ok(user)
    }

    /// Registers an organization; an OTP is then sent to the email.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an invalid form or for fields the
    /// server rejected, or the API's rejection.
    pub async fn register(&self, form: &RegistrationForm) -> ApplicationResult<StatusResponse> {
        form.validate()?;
        let response = self
            .api
            .register(&form.email, &form.password, &form.organization_name)
            .await;
        self.complete("Registration", response, "Check your email for the verification code.")
            .await
    }

    /// Sends a fresh OTP to `email`.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a malformed email, or the API's
    /// rejection.
    pub async fn request_otp(&self, email: &str) -> ApplicationResult<StatusResponse> {
        validate_email(email)?;
        let response = self.api.request_otp(email).await;
        self.complete("Verification code", response, "A new code has been sent.")
            .await
    }

    /// Confirms a registration with its OTP.
    ///
    /// # Errors
    ///
    /// Returns a validation error unless `otp` is six digits, or the API's
    /// rejection.
    pub async fn verify_otp(&self, otp: &str) -> ApplicationResult<StatusResponse> {
        validate_otp(otp)?;
        let response = self.api.verify_otp(otp).await;
        self.complete("Verification", response, "Your account is verified.")
            .await
    }

    /// Replaces the password of an account.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an invalid form, or the API's
    /// rejection.
    pub async fn reset_password(
        &self,
        form: &PasswordResetForm,
    ) -> ApplicationResult<StatusResponse> {
        form.validate()?;
        let response = self.api.reset_password(&form.email, &form.new_password).await;
        self.complete("Password reset", response, "Your password has been changed.")
            .await
    }

    /// Ends the session.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the stored session could not be removed.
    /// The in-process session ends regardless.
    pub async fn logout(&self) -> ApplicationResult<()> {
        self.tokens.clear().await?;
        info!("signed out");
        self.notifier.success("Signed out", "See you soon.");
        Ok(())
    }

    /// Checks a body-level status and publishes any returned user.
    async fn complete(
        &self,
        action: &str,
        response: Result<StatusResponse, AuthError>,
        success_message: &str,
    ) -> ApplicationResult<StatusResponse> {
        let response = response.inspect_err(|e| self.report_auth_error(action, e))?;

        if !response.is_created() {
            let error = rejection(&response);
            self.notifier
                .error(&format!("{action} failed"), &error.to_string());
            return Err(error);
        }

        if let Some(user) = response.user() {
            self.tokens.set_current_user(Some(user)).await?;
        }
        self.notifier
            .success(&format!("{action} successful"), success_message);
        Ok(response)
    }

    fn report_auth_error(&self, title: &str, error: &AuthError) {
        let message = match error {
            AuthError::Rejected { message, .. } => message.clone(),
            other => other.to_string(),
        };
        self.notifier.error(title, &message);
    }
}

/// Converts a failed status body into field errors or a plain rejection.
fn rejection(response: &StatusResponse) -> ApplicationError {
    let fields = response.field_errors();
    if fields.is_empty() {
        return ApplicationError::Rejected {
            message: response
                .message_text()
                .unwrap_or("request was not accepted")
                .to_string(),
        };
    }

    let mut errors = ValidationErrors::new();
    for (field, message) in fields {
        errors.add(field, ValidationIssue::Server(message));
    }
    ApplicationError::Validation(errors)
}
