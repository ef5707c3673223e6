//! Authentication domain types

mod forms;
mod types;

pub use forms::{
    Credentials, PasswordResetForm, RegistrationForm, validate_email, validate_otp,
};
pub use types::{
    AuthError, CREATED_STATUS, CurrentUser, LoginOutcome, RefreshedTokens, Role, Session,
    StatusResponse, TokenPair, bearer_header,
};
