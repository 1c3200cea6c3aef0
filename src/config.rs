//! API endpoint configuration parsed from environment variables.

use std::time::Duration;

use crate::transport::{ApiRequest, Scope};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_API_PREFIX: &str = "/api/v1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_HEALTH_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),
}

/// Where the evaluation service lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Service root without trailing slash (e.g. `http://localhost:8000`).
    pub base_url: String,
    /// Versioned API root appended to `base_url` for [`Scope::Api`] requests.
    pub api_prefix: String,
    pub timeout: Duration,
    pub health_timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            api_prefix: DEFAULT_API_PREFIX.to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            health_timeout: Duration::from_secs(DEFAULT_HEALTH_TIMEOUT_SECS),
        }
    }
}

impl ApiConfig {
    /// Build config from environment variables.
    ///
    /// Optional:
    /// - `EVAL_API_URL`: service root, default `http://localhost:8000`
    /// - `EVAL_API_PREFIX`: default `/api/v1`
    /// - `EVAL_API_TIMEOUT_SECS`: default 10
    /// - `EVAL_HEALTH_TIMEOUT_SECS`: default 5
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] if `EVAL_API_URL` is not an
    /// http(s) URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] if the base URL is not http(s).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup("EVAL_API_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_owned());
        let api_prefix = lookup("EVAL_API_PREFIX").unwrap_or_else(|| DEFAULT_API_PREFIX.to_owned());
        let timeout_secs = parse_secs("EVAL_API_TIMEOUT_SECS", lookup("EVAL_API_TIMEOUT_SECS"), DEFAULT_TIMEOUT_SECS);
        let health_secs =
            parse_secs("EVAL_HEALTH_TIMEOUT_SECS", lookup("EVAL_HEALTH_TIMEOUT_SECS"), DEFAULT_HEALTH_TIMEOUT_SECS);

        Ok(Self {
            base_url: normalize_base_url(&base_url)?,
            api_prefix: normalize_prefix(&api_prefix),
            timeout: Duration::from_secs(timeout_secs),
            health_timeout: Duration::from_secs(health_secs),
        })
    }

    /// Replace the base URL, validating it the same way as `from_env`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] if the URL is not http(s).
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, ConfigError> {
        self.base_url = normalize_base_url(base_url)?;
        Ok(self)
    }

    /// Absolute URL for a request, including its encoded query string.
    #[must_use]
    pub fn url_for(&self, request: &ApiRequest) -> String {
        match request.scope {
            Scope::Api => format!("{}{}{}", self.base_url, self.api_prefix, request.path_and_query()),
            Scope::Root => format!("{}{}", self.base_url, request.path_and_query()),
        }
    }

    /// Effective timeout for a request (per-request override or the default).
    #[must_use]
    pub fn timeout_for(&self, request: &ApiRequest) -> Duration {
        request.timeout.unwrap_or(self.timeout)
    }
}

fn parse_secs(key: &str, raw: Option<String>, default: u64) -> u64 {
    let Some(raw) = raw else {
        return default;
    };
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => secs,
        _ => {
            tracing::warn!(key, value = %raw, default, "invalid timeout; using default");
            default
        }
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

fn normalize_prefix(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() { String::new() } else { format!("/{trimmed}") }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
