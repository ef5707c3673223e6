//! Authentication forms and their validation.

use crate::validation::{
    EMAIL, FieldRules, OTP, ValidationErrors, ValidationIssue, is_strong_password,
};

const MAX_LEN: usize = 255;
const MIN_PASSWORD_LEN: usize = 8;
const MIN_ORGANIZATION_LEN: usize = 5;

/// Login form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Login email.
    pub email: String,
    /// Plain-text password.
    pub password: String,
}

impl Credentials {
    /// Creates a login form.
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Checks the form before it is submitted.
    ///
    /// # Errors
    ///
    /// Returns the failing fields.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        FieldRules::new(&mut errors, "email", &self.email)
            .required()
            .pattern(&EMAIL);
        FieldRules::new(&mut errors, "password", &self.password).required();
        errors.into_result()
    }
}

/// Organization sign-up form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RegistrationForm {
    /// Administrator email, receives the OTP.
    pub email: String,
    /// Chosen password.
    pub password: String,
    /// Repeated password.
    pub confirm_password: String,
    /// Name of the organization being registered.
    pub organization_name: String,
    /// Whether the terms of service were accepted.
    pub accept_terms: bool,
}

impl RegistrationForm {
    /// Checks the form before it is submitted.
    ///
    /// # Errors
    ///
    /// Returns the failing fields.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        FieldRules::new(&mut errors, "email", &self.email)
            .required()
            .pattern(&EMAIL)
            .max_len(MAX_LEN);
        check_new_password(&mut errors, "password", &self.password);
        FieldRules::new(&mut errors, "organizationName", &self.organization_name)
            .required()
            .min_len(MIN_ORGANIZATION_LEN)
            .max_len(MAX_LEN);
        FieldRules::new(&mut errors, "confirmPassword", &self.confirm_password)
            .required()
            .check(
                self.confirm_password == self.password,
                ValidationIssue::MustMatch,
            );
        if !self.accept_terms {
            errors.add("acceptTerms", ValidationIssue::MustAccept);
        }
        errors.into_result()
    }
}

/// Password reset form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordResetForm {
    /// Account email.
    pub email: String,
    /// Replacement password.
    pub new_password: String,
}

impl PasswordResetForm {
    /// Checks the form before it is submitted.
    ///
    /// # Errors
    ///
    /// Returns the failing fields.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        FieldRules::new(&mut errors, "email", &self.email)
            .required()
            .pattern(&EMAIL);
        check_new_password(&mut errors, "newPassword", &self.new_password);
        errors.into_result()
    }
}

/// Checks a one-time password: exactly six digits.
///
/// # Errors
///
/// Returns the failure under the `otp` field.
pub fn validate_otp(otp: &str) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    FieldRules::new(&mut errors, "otp", otp).required().pattern(&OTP);
    errors.into_result()
}

/// Checks an email on its own, as the OTP resend flow does.
///
/// # Errors
///
/// Returns the failure under the `email` field.
pub fn validate_email(email: &str) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    FieldRules::new(&mut errors, "email", email)
        .required()
        .pattern(&EMAIL);
    errors.into_result()
}

fn check_new_password(errors: &mut ValidationErrors, field: &'static str, password: &str) {
    FieldRules::new(errors, field, password)
        .required()
        .min_len(MIN_PASSWORD_LEN)
        .max_len(MAX_LEN)
        .check(is_strong_password(password), ValidationIssue::Pattern);
}
