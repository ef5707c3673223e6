//! HRM Domain - Core business types
//!
//! This crate defines the domain model for the HRM Console client:
//! session credentials, request/response values, form validation and
//! the organizational records managed through the API.
//! All types here are pure Rust with no I/O dependencies.

pub mod auth;
pub mod error;
pub mod organization;
pub mod request;
pub mod response;
pub mod validation;

pub use auth::{
    AuthError, Credentials, CurrentUser, LoginOutcome, PasswordResetForm, RefreshedTokens,
    RegistrationForm, Role, Session, StatusResponse, TokenPair,
};
pub use error::{DomainError, DomainResult};
pub use organization::{
    Branch, BranchForm, DeleteRequest, Department, DepartmentForm, DepartmentPayload, FormMode,
    ListView, RecordId, Searchable,
};
pub use request::{ApiRequest, HttpMethod};
pub use response::{ApiResponse, StatusCode};
pub use validation::{ValidationErrors, ValidationIssue};
