//! HRM Application - Use cases and ports
//!
//! This crate holds the session core (token store and request
//! authenticator), the authentication flows, and the organization
//! services. External systems are reached through the traits in
//! [`ports`].

pub mod auth;
pub mod error;
pub mod ports;
pub mod use_cases;

#[cfg(test)]
mod testing;

pub use auth::{AuthService, RefreshState, RequestAuthenticator, TokenStore, UserSubscription};
pub use error::{ApplicationError, ApplicationResult};
pub use use_cases::{BranchService, DepartmentService};
