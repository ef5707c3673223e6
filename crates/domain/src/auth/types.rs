//! Session and credential types

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// HTTP-level status the API uses in response bodies to signal success of
/// registration, OTP and password-reset flows.
pub const CREATED_STATUS: u16 = 201;

/// Role of the signed-in user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Organization administrator.
    Admin,
    /// Regular client account.
    Client,
}

/// Last-known profile of the signed-in user.
///
/// Used for UI-level checks only; the API enforces authorization.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    /// Server-side identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Login email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Given name, used in welcome messages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// Family name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Role, when the API reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

impl CurrentUser {
    /// Creates a profile carrying only an email.
    #[must_use]
    pub fn with_email(email: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            ..Self::default()
        }
    }

    /// Reads a profile out of an API payload.
    ///
    /// Every field is optional on the wire, so a payload counts as a user
    /// only when it carries an `id` or an `email`.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        Self::deserialize(value)
            .ok()
            .filter(|user| user.id.is_some() || user.email.is_some())
    }

    /// Returns true if the user has the admin role.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Some(Role::Admin)
    }

    /// Returns true if the user has the client role.
    #[must_use]
    pub fn is_client(&self) -> bool {
        self.role == Some(Role::Client)
    }

    /// Name to greet the user with.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.first_name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or("there")
    }
}

/// Access and refresh credential pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    /// Short-lived bearer credential attached to every request.
    pub access_token: String,
    /// Longer-lived credential used only to obtain a new access token.
    pub refresh_token: String,
}

impl TokenPair {
    /// Creates a new token pair.
    #[must_use]
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
        }
    }

    /// Returns the `Authorization` header value for the access token.
    #[must_use]
    pub fn authorization_header(&self) -> String {
        bearer_header(&self.access_token)
    }
}

/// Formats a bearer `Authorization` header value.
#[must_use]
pub fn bearer_header(access_token: &str) -> String {
    format!("Bearer {access_token}")
}

/// Snapshot of the authenticated state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Current credentials.
    pub tokens: TokenPair,
    /// Last-known user profile, if any.
    pub current_user: Option<CurrentUser>,
}

/// Result of a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    /// Issued credentials.
    pub tokens: TokenPair,
    /// Profile returned alongside the tokens.
    pub user: Option<CurrentUser>,
}

/// Result of a successful token refresh.
///
/// The refresh token is omitted when the server keeps the previous one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshedTokens {
    /// New access token.
    pub access_token: String,
    /// Rotated refresh token, when issued.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

/// Body-level status envelope returned by registration, OTP and
/// password-reset endpoints.
///
/// The API reports the outcome either as `status` or as `code`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Outcome status.
    #[serde(default)]
    pub status: Option<u16>,
    /// Outcome code, used interchangeably with `status`.
    #[serde(default)]
    pub code: Option<u16>,
    /// Human-readable message, or a map of field name to server error.
    #[serde(default)]
    pub message: Option<Value>,
    /// Payload, typically the affected user.
    #[serde(default)]
    pub data: Option<Value>,
}

impl StatusResponse {
    /// Returns true if the API reported domain-level success.
    #[must_use]
    pub fn is_created(&self) -> bool {
        self.status == Some(CREATED_STATUS) || self.code == Some(CREATED_STATUS)
    }

    /// Returns the message when it is plain text.
    #[must_use]
    pub fn message_text(&self) -> Option<&str> {
        self.message.as_ref().and_then(Value::as_str)
    }

    /// Returns field-level server errors when the message is an object.
    #[must_use]
    pub fn field_errors(&self) -> Vec<(String, String)> {
        let Some(Value::Object(map)) = &self.message else {
            return Vec::new();
        };
        map.iter()
            .map(|(field, value)| {
                let text = value
                    .as_str()
                    .map_or_else(|| value.to_string(), str::to_owned);
                (field.clone(), text)
            })
            .collect()
    }

    /// Returns the user carried in `data`, if it is one.
    #[must_use]
    pub fn user(&self) -> Option<CurrentUser> {
        self.data.as_ref().and_then(CurrentUser::from_value)
    }
}

/// Authentication errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// No refresh token is stored, so the session cannot be renewed.
    #[error("no refresh token available")]
    MissingRefreshToken,

    /// The API rejected the call.
    #[error("request rejected with status {status}: {message}")]
    Rejected {
        /// HTTP status returned by the API.
        status: u16,
        /// Error description from the response body.
        message: String,
    },

    /// The API answered with a body that could not be understood.
    #[error("invalid response: {message}")]
    InvalidResponse {
        /// Error description.
        message: String,
    },

    /// The API could not be reached.
    #[error("network error: {message}")]
    Network {
        /// Error description.
        message: String,
    },
}

impl AuthError {
    /// Returns the HTTP status when the API rejected the call.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}
