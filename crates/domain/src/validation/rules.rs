//! Reusable field rules.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use super::{ValidationErrors, ValidationIssue};

/// Generic email shape accepted for login and registration.
pub(crate) static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)*$",
    )
    .expect("valid regex")
});

/// Lowercase email with a 2-4 letter top-level domain, required for branches.
pub(crate) static ORG_EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,4}$").expect("valid regex")
});

/// Ten-digit Vietnamese mobile number.
pub(crate) static PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(03|05|07|08|09)[0-9]{8}$").expect("valid regex"));

pub(crate) static TAX_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{10}$").expect("valid regex"));

pub(crate) static DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+$").expect("valid regex"));

pub(crate) static NO_DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^0-9]+$").expect("valid regex"));

pub(crate) static OTP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{6}$").expect("valid regex"));

/// Returns true if the password mixes a digit, a lowercase letter, an
/// uppercase letter and a non-word character.
#[must_use]
pub fn is_strong_password(password: &str) -> bool {
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_symbol = password
        .chars()
        .any(|c| !(c.is_ascii_alphanumeric() || c == '_'));
    has_digit && has_lower && has_upper && has_symbol
}

/// Chained checks for one field, recording failures into a shared error set.
///
/// Only `required` fires on an empty value; every other rule skips it.
pub struct FieldRules<'a> {
    errors: &'a mut ValidationErrors,
    field: &'static str,
    value: &'a str,
}

impl<'a> FieldRules<'a> {
    /// Starts checking `value` under the name `field`.
    pub const fn new(
        errors: &'a mut ValidationErrors,
        field: &'static str,
        value: &'a str,
    ) -> Self {
        Self {
            errors,
            field,
            value,
        }
    }

    fn fail(&mut self, issue: ValidationIssue) {
        self.errors.add(self.field, issue);
    }

    /// Rejects an empty value.
    pub fn required(&mut self) -> &mut Self {
        if self.value.is_empty() {
            self.fail(ValidationIssue::Required);
        }
        self
    }

    /// Rejects values shorter than `min` characters.
    pub fn min_len(&mut self, min: usize) -> &mut Self {
        if !self.value.is_empty() && self.value.chars().count() < min {
            self.fail(ValidationIssue::MinLength(min));
        }
        self
    }

    /// Rejects values longer than `max` characters.
    pub fn max_len(&mut self, max: usize) -> &mut Self {
        if self.value.chars().count() > max {
            self.fail(ValidationIssue::MaxLength(max));
        }
        self
    }

    /// Rejects values that do not match `pattern`.
    pub fn pattern(&mut self, pattern: &Regex) -> &mut Self {
        if !self.value.is_empty() && !pattern.is_match(self.value) {
            self.fail(ValidationIssue::Pattern);
        }
        self
    }

    /// Records `issue` when `ok` is false and the value is present.
    pub fn check(&mut self, ok: bool, issue: ValidationIssue) -> &mut Self {
        if !self.value.is_empty() && !ok {
            self.fail(issue);
        }
        self
    }

    /// Rejects `YYYY-MM-DD` dates after `today`.
    pub fn not_in_future(&mut self, today: NaiveDate) -> &mut Self {
        if self.value.is_empty() {
            return self;
        }
        match NaiveDate::parse_from_str(self.value, "%Y-%m-%d") {
            Ok(date) => {
                if let Some(issue) = check_not_in_future(date, today) {
                    self.fail(issue);
                }
            }
            Err(_) => self.fail(ValidationIssue::Pattern),
        }
        self
    }
}

/// Returns `FutureDate` when `date` is after `today`.
#[must_use]
pub fn check_not_in_future(date: NaiveDate, today: NaiveDate) -> Option<ValidationIssue> {
    (date > today).then_some(ValidationIssue::FutureDate)
}
