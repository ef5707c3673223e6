//! Client configuration from environment variables.
//!
//! | Variable         | Default                        |
//! |------------------|--------------------------------|
//! | `HRM_API_URL`    | `http://localhost:3000/api`    |
//! | `HRM_STATE_DIR`  | `<platform data dir>/hrm`      |
//! | `HRM_TIMEOUT_MS` | `30000`                        |

use std::path::PathBuf;

use thiserror::Error;
use url::Url;

/// Variable holding the API base URL.
pub const API_URL_VAR: &str = "HRM_API_URL";
/// Variable holding the directory for persisted session state.
pub const STATE_DIR_VAR: &str = "HRM_STATE_DIR";
/// Variable holding the request timeout in milliseconds.
pub const TIMEOUT_VAR: &str = "HRM_TIMEOUT_MS";

/// Default API base URL.
pub const DEFAULT_API_URL: &str = "http://localhost:3000/api";
/// Default request timeout.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Errors raised while reading configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The API URL is malformed or not HTTP(S).
    #[error("HRM_API_URL is not a valid HTTP URL ({value}): {message}")]
    InvalidApiUrl {
        /// Configured value.
        value: String,
        /// Why it was rejected.
        message: String,
    },

    /// The timeout is not a positive integer.
    #[error("HRM_TIMEOUT_MS must be a positive number of milliseconds, got {0:?}")]
    InvalidTimeout(String),

    /// No state directory was configured and the platform has none.
    #[error("no data directory found; set HRM_STATE_DIR")]
    NoStateDir,
}

/// Settings for the HRM client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the API, without a trailing slash.
    pub api_url: String,
    /// Directory holding `session.json`.
    pub state_dir: PathBuf,
    /// Per-request timeout.
    pub timeout_ms: u64,
}

impl ClientConfig {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable holds an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads the configuration through `lookup`, falling back to defaults
    /// for unset or blank variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable holds an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let api_url = parse_api_url(get(API_URL_VAR).as_deref().unwrap_or(DEFAULT_API_URL))?;

        let state_dir = match get(STATE_DIR_VAR) {
            Some(dir) => PathBuf::from(dir),
            None => dirs::data_dir().ok_or(ConfigError::NoStateDir)?.join("hrm"),
        };

        let timeout_ms = match get(TIMEOUT_VAR) {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|ms| *ms > 0)
                .ok_or(ConfigError::InvalidTimeout(raw))?,
            None => DEFAULT_TIMEOUT_MS,
        };

        Ok(Self {
            api_url,
            state_dir,
            timeout_ms,
        })
    }
}

fn parse_api_url(value: &str) -> Result<String, ConfigError> {
    let invalid = |message: String| ConfigError::InvalidApiUrl {
        value: value.to_string(),
        message,
    };
    let url = Url::parse(value.trim()).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme {}", url.scheme())));
    }
    Ok(url.as_str().trim_end_matches('/').to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_explicit_values() {
        let config = ClientConfig::from_lookup(lookup(&[
            (API_URL_VAR, "https://hrm.example.com/api/"),
            (STATE_DIR_VAR, "/tmp/hrm-state"),
            (TIMEOUT_VAR, "5000"),
        ]))
        .unwrap();

        assert_eq!(
            config,
            ClientConfig {
                api_url: "https://hrm.example.com/api".to_string(),
                state_dir: PathBuf::from("/tmp/hrm-state"),
                timeout_ms: 5000,
            }
        );
    }

    #[test]
    fn test_defaults() {
        let config =
            ClientConfig::from_lookup(lookup(&[(STATE_DIR_VAR, "/tmp/hrm-state")])).unwrap();

        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.timeout_ms, DEFAULT_TIMEOUT_MS);
    }

    #[test]
    fn test_blank_values_use_defaults() {
        let config = ClientConfig::from_lookup(lookup(&[
            (API_URL_VAR, "  "),
            (STATE_DIR_VAR, "/tmp/hrm-state"),
        ]))
        .unwrap();

        assert_eq!(config.api_url, DEFAULT_API_URL);
    }

    #[test]
    fn test_rejects_non_http_url() {
        let error = ClientConfig::from_lookup(lookup(&[
            (API_URL_VAR, "ftp://hrm.example.com"),
            (STATE_DIR_VAR, "/tmp/hrm-state"),
        ]))
        .unwrap_err();

        assert!(matches!(error, ConfigError::InvalidApiUrl { .. }));
    }

    #[test]
    fn test_rejects_bad_timeout() {
        for raw in ["0", "-5", "soon"] {
            let error = ClientConfig::from_lookup(lookup(&[
                (STATE_DIR_VAR, "/tmp/hrm-state"),
                (TIMEOUT_VAR, raw),
            ]))
            .unwrap_err();
            assert_eq!(error, ConfigError::InvalidTimeout(raw.to_string()));
        }
    }
}
