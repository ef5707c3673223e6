//! Authentication module for the HRM Console client.
//!
//! This module provides:
//! - The persisted token store and its current-user channel
//! - The request authenticator that refreshes expired sessions
//! - Login, registration and password-reset flows

mod authenticator;
mod service;
mod token_store;

pub use authenticator::{RefreshState, RequestAuthenticator};
pub use service::AuthService;
pub use token_store::{TokenStore, UserSubscription};
