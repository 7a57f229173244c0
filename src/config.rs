//! Endpoint and timeout configuration for the answer service.
//!
//! Values are resolved from the environment with fixed defaults, one setting
//! at a time, so the client builder only consults variables it still needs.
//! The binary loads a `.env` file first, so either source works.

use std::time::Duration;

use thiserror::Error;

/// Environment variable holding the answer service base URL.
pub const URL_ENV: &str = "STOREQA_AI_URL";
/// Environment variable holding the request timeout in seconds.
pub const TIMEOUT_ENV: &str = "STOREQA_AI_TIMEOUT_SECS";
/// Environment variable holding the connect timeout in seconds.
pub const CONNECT_TIMEOUT_ENV: &str = "STOREQA_AI_CONNECT_TIMEOUT_SECS";

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Errors raised while resolving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A timeout variable was not a positive whole number of seconds
    #[error("Invalid timeout in {var}: {value:?} (expected a positive number of seconds)")]
    InvalidTimeout { var: &'static str, value: String },

    /// A timeout passed in code was zero
    #[error("Invalid {setting}: must be greater than zero")]
    ZeroTimeout { setting: &'static str },
}

/// Where the answer service lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }
}

impl ServiceConfig {
    /// Resolves configuration from the process environment.
    ///
    /// Unset variables fall back to the defaults. A trailing `/` on the URL
    /// is trimmed so endpoint paths can be appended directly.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: base_url_from_env(),
            timeout: timeout_from_env()?,
            connect_timeout: connect_timeout_from_env()?,
        })
    }
}

/// Reads `STOREQA_AI_URL`, falling back to the default when unset or blank.
pub fn base_url_from_env() -> String {
    let url = std::env::var(URL_ENV)
        .ok()
        .filter(|url| !url.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
    normalize_base_url(&url)
}

/// Reads `STOREQA_AI_TIMEOUT_SECS`, falling back to the default when unset.
pub fn timeout_from_env() -> Result<Duration, ConfigError> {
    secs_from_env(TIMEOUT_ENV, DEFAULT_TIMEOUT)
}

/// Reads `STOREQA_AI_CONNECT_TIMEOUT_SECS`, falling back to the default when unset.
pub fn connect_timeout_from_env() -> Result<Duration, ConfigError> {
    secs_from_env(CONNECT_TIMEOUT_ENV, DEFAULT_CONNECT_TIMEOUT)
}

/// Rejects a zero duration for the named setting.
pub fn ensure_nonzero(setting: &'static str, timeout: Duration) -> Result<Duration, ConfigError> {
    if timeout.is_zero() {
        return Err(ConfigError::ZeroTimeout { setting });
    }
    Ok(timeout)
}

/// Strips surrounding whitespace and trailing slashes from a base URL.
pub fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

/// Parses a positive number of seconds.
pub fn parse_timeout_secs(var: &'static str, value: &str) -> Result<Duration, ConfigError> {
    match value.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::InvalidTimeout {
            var,
            value: value.to_string(),
        }),
    }
}

fn secs_from_env(var: &'static str, default: Duration) -> Result<Duration, ConfigError> {
    match std::env::var(var) {
        Ok(value) => parse_timeout_secs(var, &value),
        Err(_) => Ok(default),
    }
}
