//! Configuration structures
//!
//! Every field has a default so a missing file or a missing environment
//! variable degrades to a working local setup rather than failing startup.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_API_MAX_ATTEMPTS, DEFAULT_API_TIMEOUT_SECS, DEFAULT_FLAGS_ENDPOINT, DEFAULT_LOG_LEVEL,
    DEFAULT_ORIGIN, DEFAULT_RETRY_BACKOFF_MS,
};

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub flags: FlagsConfig,
    pub logging: LoggingConfig,
}

/// REST API client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Absolute API base URL. When unset, the URL is derived from `origin`
    /// and the deployment base path of `page_path`.
    pub base_url: Option<String>,
    pub origin: String,
    pub page_path: String,
    pub timeout_secs: u64,
    /// Total attempts per request (initial try + retries). `1` disables
    /// retries.
    pub max_attempts: usize,
    pub retry_backoff_ms: u64,
    pub user_agent: Option<String>,
}

impl ApiConfig {
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub const fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            origin: DEFAULT_ORIGIN.to_string(),
            page_path: "/".to_string(),
            timeout_secs: DEFAULT_API_TIMEOUT_SECS,
            max_attempts: DEFAULT_API_MAX_ATTEMPTS,
            retry_backoff_ms: DEFAULT_RETRY_BACKOFF_MS,
            user_agent: None,
        }
    }
}

/// Feature flag source configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlagsConfig {
    pub api_key: Option<String>,
    pub dev_mode_secret: Option<String>,
    pub endpoint: String,
    /// Background refresh period. `None` fetches once at setup.
    pub refresh_interval_secs: Option<u64>,
}

impl FlagsConfig {
    /// The credential, if one is configured and non-empty.
    pub fn credential(&self) -> Option<&str> {
        self.api_key.as_deref().map(str::trim).filter(|key| !key.is_empty())
    }
}

impl Default for FlagsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            dev_mode_secret: None,
            endpoint: DEFAULT_FLAGS_ENDPOINT.to_string(),
            refresh_interval_secs: None,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default `EnvFilter` directive when `RUST_LOG` is unset.
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: DEFAULT_LOG_LEVEL.to_string(), json: false }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api.timeout(), Duration::from_secs(15));
        assert_eq!(config.api.max_attempts, 1);
        assert_eq!(config.api.page_path, "/");
        assert!(config.flags.credential().is_none());
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_blank_credential_is_absent() {
        let flags = FlagsConfig { api_key: Some("   ".into()), ..Default::default() };
        assert!(flags.credential().is_none());

        let flags = FlagsConfig { api_key: Some("rox-key".into()), ..Default::default() };
        assert_eq!(flags.credential(), Some("rox-key"));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: Config =
            serde_json::from_str(r#"{ "api": { "timeout_secs": 5 } }"#).unwrap();
        assert_eq!(config.api.timeout_secs, 5);
        assert_eq!(config.api.origin, DEFAULT_ORIGIN);
        assert_eq!(config.flags, FlagsConfig::default());
    }
}
