//! Configuration
//!
//! Suite settings come from the environment, with an optional `.env` file
//! for local runs. Nothing is required: without a token the suites still
//! run and exercise the unauthenticated paths.

use std::env;
use std::time::Duration;
use thiserror::Error;

/// Environment variable naming the API base URL
pub const ENV_BASE_URL: &str = "API_BASE_URL";

/// Environment variable naming the bearer token
pub const ENV_TOKEN: &str = "API_TOKEN";

/// Environment variable naming the request timeout in seconds
pub const ENV_TIMEOUT_SECS: &str = "API_TIMEOUT_SECS";

/// Default request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// Suite settings
#[derive(Debug, Clone)]
pub struct Settings {
    /// API base URL
    pub base_url: String,
    /// Bearer token; `None` runs unauthenticated
    pub token: Option<String>,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: crate::api::DEFAULT_BASE_URL.to_string(),
            token: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl Settings {
    /// Load settings from the environment, reading `.env` first if present.
    ///
    /// Blank variables count as unset. Variables already in the process
    /// environment win over `.env` entries.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let mut settings = Self::default();

        if let Some(url) = non_blank(ENV_BASE_URL) {
            settings.base_url = url;
        }
        settings.token = non_blank(ENV_TOKEN);

        if let Some(secs) = non_blank(ENV_TIMEOUT_SECS) {
            let secs: u64 = secs.parse().map_err(|_| ConfigError::Invalid {
                var: ENV_TIMEOUT_SECS,
                reason: format!("expected a number of seconds, got '{}'", secs),
            })?;
            settings.timeout = Duration::from_secs(secs);
        }

        settings.validate()?;
        Ok(settings)
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_valid_http_url(&self.base_url) {
            return Err(ConfigError::Invalid {
                var: ENV_BASE_URL,
                reason: "must be an http(s) URL with a host".into(),
            });
        }

        if self.timeout.is_zero() {
            return Err(ConfigError::Invalid {
                var: ENV_TIMEOUT_SECS,
                reason: "must be greater than zero".into(),
            });
        }

        Ok(())
    }
}

/// Read an environment variable, mapping unset and blank to `None`
fn non_blank(var: &str) -> Option<String> {
    env::var(var).ok().filter(|v| !v.trim().is_empty())
}

/// Validate that a URL starts with http:// or https:// and names a host
fn is_valid_http_url(url: &str) -> bool {
    url.strip_prefix("http://")
        .or_else(|| url.strip_prefix("https://"))
        .is_some_and(|rest| !rest.is_empty() && !rest.starts_with('/'))
}
