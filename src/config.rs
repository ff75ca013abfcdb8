//! Client configuration parsed from environment variables.

use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_REQUIRED_ROLE: &str = "FUNC";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid base URL (expected http:// or https://): {0}")]
    InvalidBaseUrl(String),
    #[error("required role must not be empty")]
    EmptyRole,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Timeouts {
    #[must_use]
    pub fn request(&self) -> Duration {
        Duration::from_secs(self.request_secs)
    }

    #[must_use]
    pub fn connect(&self) -> Duration {
        Duration::from_secs(self.connect_secs)
    }
}

impl Default for Timeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend host, without trailing slash.
    pub base_url: String,
    pub timeouts: Timeouts,
    /// Role tag a user must carry for login to succeed.
    pub required_role: String,
}

impl ClientConfig {
    /// Build a config for `base_url` with default timeouts and role.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] if the URL is not http(s).
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: normalize_base_url(base_url)?,
            timeouts: Timeouts::default(),
            required_role: DEFAULT_REQUIRED_ROLE.to_owned(),
        })
    }

    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `WELLNESS_API_BASE_URL`: default `http://localhost:8080`
    /// - `WELLNESS_REQUEST_TIMEOUT_SECS`: default 10
    /// - `WELLNESS_CONNECT_TIMEOUT_SECS`: default 5
    /// - `WELLNESS_REQUIRED_ROLE`: default `FUNC`
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is not http(s) or the role is blank.
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw_url = std::env::var("WELLNESS_API_BASE_URL").unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_owned());
        let base_url = normalize_base_url(&raw_url)?;
        let timeouts = Timeouts {
            request_secs: env_parse_u64("WELLNESS_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: env_parse_u64("WELLNESS_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
        };
        let required_role = std::env::var("WELLNESS_REQUIRED_ROLE").unwrap_or_else(|_| DEFAULT_REQUIRED_ROLE.to_owned());
        if required_role.trim().is_empty() {
            return Err(ConfigError::EmptyRole);
        }

        Ok(Self { base_url, timeouts, required_role })
    }

    /// Replace the base URL, keeping every other setting.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] if the URL is not http(s).
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, ConfigError> {
        self.base_url = normalize_base_url(base_url)?;
        Ok(self)
    }
}

fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let has_host = trimmed
        .strip_prefix("http://")
        .or_else(|| trimmed.strip_prefix("https://"))
        .is_some_and(|rest| !rest.is_empty());
    if !has_host {
        return Err(ConfigError::InvalidBaseUrl(raw.to_owned()));
    }
    Ok(trimmed.to_owned())
}

fn env_parse_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
