//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (MCP_WEATHER_*)
//! 2. TOML config file (if MCP_WEATHER_CONFIG_FILE set)
//! 3. Built-in defaults
//!
//! Retry timing (attempts, backoff, per-attempt timeout, cache TTL) is fixed
//! by the lookup policy and intentionally absent here.

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (MCP_WEATHER_*)
/// 2. TOML config file (if MCP_WEATHER_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base URL of the plaintext weather service.
    ///
    /// Set via MCP_WEATHER_BASE_URL environment variable.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// User-Agent string for HTTP requests.
    ///
    /// Set via MCP_WEATHER_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Maximum number of cities held in the lookup cache.
    ///
    /// Set via MCP_WEATHER_CACHE_MAX_ENTRIES environment variable.
    #[serde(default = "default_cache_max_entries")]
    pub cache_max_entries: u64,
}

fn default_base_url() -> String {
    "https://wttr.in".into()
}

fn default_user_agent() -> String {
    "mcp-weather/0.1".into()
}

fn default_cache_max_entries() -> u64 {
    crate::cache::memory::DEFAULT_MAX_ENTRIES
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            cache_max_entries: default_cache_max_entries(),
        }
    }
}

impl AppConfig {
    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `MCP_WEATHER_`
    /// 2. TOML file from `MCP_WEATHER_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("MCP_WEATHER_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("MCP_WEATHER_")
                .ignore(&["config_file"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.base_url, "https://wttr.in");
        assert_eq!(config.user_agent, "mcp-weather/0.1");
        assert_eq!(config.cache_max_entries, 1_000);
    }

    #[test]
    fn test_load_defaults() {
        Jail::expect_with(|_jail| {
            let config = AppConfig::load().map_err(|e| e.to_string())?;
            assert_eq!(config.base_url, "https://wttr.in");
            Ok(())
        });
    }

    #[test]
    fn test_load_env_overrides() {
        Jail::expect_with(|jail| {
            jail.set_env("MCP_WEATHER_BASE_URL", "http://127.0.0.1:8080");
            jail.set_env("MCP_WEATHER_CACHE_MAX_ENTRIES", "25");

            let config = AppConfig::load().map_err(|e| e.to_string())?;
            assert_eq!(config.base_url, "http://127.0.0.1:8080");
            assert_eq!(config.cache_max_entries, 25);
            Ok(())
        });
    }

    #[test]
    fn test_load_toml_file_below_env() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "weather.toml",
                r#"
                user_agent = "from-file/1.0"
                cache_max_entries = 50
                "#,
            )?;
            jail.set_env("MCP_WEATHER_CONFIG_FILE", "weather.toml");
            jail.set_env("MCP_WEATHER_CACHE_MAX_ENTRIES", "75");

            let config = AppConfig::load().map_err(|e| e.to_string())?;
            assert_eq!(config.user_agent, "from-file/1.0");
            assert_eq!(config.cache_max_entries, 75);
            Ok(())
        });
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        Jail::expect_with(|jail| {
            jail.set_env("MCP_WEATHER_CACHE_MAX_ENTRIES", "0");

            let result = AppConfig::load();
            assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "cache_max_entries"));
            Ok(())
        });
    }
}
