//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;

/// Upper bound on `cache_max_entries`.
const MAX_CACHE_ENTRIES: u64 = 1_000_000;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },

    #[error("missing required configuration: {field} ({hint})")]
    Missing { field: String, hint: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if `base_url` is empty, and
    /// `ConfigError::Invalid` if:
    /// - `base_url` is not an absolute http(s) URL
    /// - `user_agent` is empty
    /// - `cache_max_entries` is 0 or exceeds 1,000,000
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::Missing {
                field: "base_url".into(),
                hint: "Set MCP_WEATHER_BASE_URL environment variable".into(),
            });
        }

        let parsed = url::Url::parse(&self.base_url)
            .map_err(|e| ConfigError::Invalid { field: "base_url".into(), reason: e.to_string() })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid {
                field: "base_url".into(),
                reason: format!("unsupported scheme: {}", parsed.scheme()),
            });
        }
        if parsed.cannot_be_a_base() {
            return Err(ConfigError::Invalid { field: "base_url".into(), reason: "must be a base URL".into() });
        }

        if self.user_agent.is_empty() {
            return Err(ConfigError::Invalid { field: "user_agent".into(), reason: "must not be empty".into() });
        }

        if self.cache_max_entries == 0 {
            return Err(ConfigError::Invalid {
                field: "cache_max_entries".into(),
                reason: "must be greater than 0".into(),
            });
        }
        if self.cache_max_entries > MAX_CACHE_ENTRIES {
            return Err(ConfigError::Invalid {
                field: "cache_max_entries".into(),
                reason: format!("must not exceed {MAX_CACHE_ENTRIES}"),
            });
        }

        if parsed.scheme() == "http" {
            tracing::warn!(base_url = %self.base_url, "weather service configured over plain http");
        }

        Ok(())
    }
}
