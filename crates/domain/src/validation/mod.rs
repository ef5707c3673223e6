//! Field-level form validation
//!
//! Validation runs before any request is sent. Failures are collected per
//! field so callers can show every problem at once.

mod rules;

use std::collections::BTreeMap;
use std::fmt;

pub use rules::{FieldRules, check_not_in_future, is_strong_password};
pub(crate) use rules::{DIGITS, EMAIL, NO_DIGITS, ORG_EMAIL, OTP, PHONE, TAX_CODE};

/// A single reason a field was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    /// The field is empty.
    Required,
    /// The value is shorter than allowed.
    MinLength(usize),
    /// The value is longer than allowed.
    MaxLength(usize),
    /// The value does not have the expected shape.
    Pattern,
    /// Another record already uses this value.
    Duplicate,
    /// The confirmation does not equal the original value.
    MustMatch,
    /// The date lies after today.
    FutureDate,
    /// A checkbox that must be ticked is not.
    MustAccept,
    /// The server rejected the value.
    Server(String),
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required => write!(f, "is required"),
            Self::MinLength(n) => write!(f, "must be at least {n} characters"),
            Self::MaxLength(n) => write!(f, "must be at most {n} characters"),
            Self::Pattern => write!(f, "has an invalid format"),
            Self::Duplicate => write!(f, "is already in use"),
            Self::MustMatch => write!(f, "does not match"),
            Self::FutureDate => write!(f, "must not be in the future"),
            Self::MustAccept => write!(f, "must be accepted"),
            Self::Server(message) => write!(f, "{message}"),
        }
    }
}

/// Validation failures keyed by field name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationErrors {
    fields: BTreeMap<String, Vec<ValidationIssue>>,
}

impl ValidationErrors {
    /// Creates an empty error set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an issue for a field.
    pub fn add(&mut self, field: impl Into<String>, issue: ValidationIssue) {
        self.fields.entry(field.into()).or_default().push(issue);
    }

    /// Returns true if no field failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Issues recorded for a field.
    #[must_use]
    pub fn field(&self, field: &str) -> &[ValidationIssue] {
        self.fields.get(field).map_or(&[], Vec::as_slice)
    }

    /// Returns true if `field` carries `issue`.
    #[must_use]
    pub fn has(&self, field: &str, issue: &ValidationIssue) -> bool {
        self.field(field).contains(issue)
    }

    /// Iterates over failing fields in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[ValidationIssue])> {
        self.fields
            .iter()
            .map(|(field, issues)| (field.as_str(), issues.as_slice()))
    }

    /// Moves every issue of `other` into `self`.
    pub fn merge(&mut self, other: Self) {
        for (field, issues) in other.fields {
            self.fields.entry(field).or_default().extend(issues);
        }
    }

    /// Converts into `Ok(())` when empty.
    ///
    /// # Errors
    ///
    /// Returns `self` if any field failed.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, issues) in &self.fields {
            for issue in issues {
                if !first {
                    write!(f, "; ")?;
                }
                write!(f, "{field} {issue}")?;
                first = false;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_collects_issues_per_field() {
        let mut errors = ValidationErrors::new();
        errors.add("email", ValidationIssue::Required);
        errors.add("taxCode", ValidationIssue::Pattern);
        errors.add("taxCode", ValidationIssue::Duplicate);

        assert!(errors.has("taxCode", &ValidationIssue::Duplicate));
        assert_eq!(errors.field("phoneNumber"), &[]);
        assert_eq!(
            errors.to_string(),
            "email is required; taxCode has an invalid format; taxCode is already in use"
        );
    }

    #[test]
    fn test_into_result() {
        assert!(ValidationErrors::new().into_result().is_ok());

        let mut errors = ValidationErrors::new();
        errors.add("otp", ValidationIssue::Pattern);
        assert!(errors.into_result().is_err());
    }

    #[test]
    fn test_merge() {
        let mut left = ValidationErrors::new();
        left.add("email", ValidationIssue::Pattern);
        let mut right = ValidationErrors::new();
        right.add("email", ValidationIssue::Duplicate);

        left.merge(right);
        assert_eq!(
            left.field("email"),
            &[ValidationIssue::Pattern, ValidationIssue::Duplicate]
        );
    }
}
