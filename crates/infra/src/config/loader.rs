//! Configuration loader
//!
//! Loads application configuration from an optional file, then overlays
//! environment variables.
//!
//! ## Loading Strategy
//! 1. Probe the standard locations for a config file (JSON or TOML)
//! 2. Start from that file, or from defaults when none exists
//! 3. Overlay every `ACCOUNTSTACK_*` variable that is set and non-empty
//!
//! ## Environment Variables
//! - `ACCOUNTSTACK_API_BASE_URL`: Absolute API base URL
//! - `ACCOUNTSTACK_ORIGIN`: Origin the API path is joined to
//! - `ACCOUNTSTACK_PAGE_PATH`: Page path used for base path detection
//! - `ACCOUNTSTACK_API_TIMEOUT_SECS`: Request timeout in seconds
//! - `ACCOUNTSTACK_API_MAX_ATTEMPTS`: Attempts per request (1 = no retry)
//! - `ACCOUNTSTACK_FLAGS_API_KEY`: Flag service credential
//! - `ACCOUNTSTACK_FLAGS_DEV_MODE_SECRET`: Flag service dev-mode secret
//! - `ACCOUNTSTACK_FLAGS_ENDPOINT`: Flag service endpoint
//! - `ACCOUNTSTACK_FLAGS_REFRESH_SECS`: Flag refresh interval in seconds
//! - `ACCOUNTSTACK_LOG_LEVEL`: Default log filter
//! - `ACCOUNTSTACK_LOG_JSON`: JSON log output (true/false)
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./accountstack.{json,toml}` or `./config.{json,toml}` (current working
//!    directory)
//! 2. The same names in the parent directory
//! 3. The same names next to the executable

use std::path::{Path, PathBuf};
use std::str::FromStr;

use accountstack_domain::{AccountStackError, Config, Result};

const CONFIG_FILE_NAMES: [&str; 4] =
    ["accountstack.json", "accountstack.toml", "config.json", "config.toml"];

/// Load configuration from the first config file found, overlaid with
/// environment variables
///
/// A missing config file is not an error; defaults are used instead.
///
/// # Errors
/// Returns `AccountStackError::Config` if a config file exists but cannot be
/// parsed, or an environment variable holds a malformed value.
pub fn load() -> Result<Config> {
    let config = match probe_config_paths() {
        Some(path) => load_from_file(Some(path))?,
        None => {
            tracing::debug!("No config file found, using defaults");
            Config::default()
        }
    };

    apply_env_overrides(config, |key| std::env::var(key).ok())
}

/// Load configuration from defaults and environment variables only
///
/// # Errors
/// Returns `AccountStackError::Config` if a variable holds a malformed value.
pub fn load_from_env() -> Result<Config> {
    apply_env_overrides(Config::default(), |key| std::env::var(key).ok())
}

/// Overlay environment values on `config`
///
/// `lookup` resolves a variable name to its value. Unset and empty values
/// leave the corresponding field untouched.
///
/// # Errors
/// Returns `AccountStackError::Config` naming the variable when a numeric or
/// boolean value cannot be parsed.
pub fn apply_env_overrides<F>(mut config: Config, lookup: F) -> Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    let var = |key: &str| lookup(key).map(|value| value.trim().to_string()).filter(|v| !v.is_empty());

    if let Some(url) = var("ACCOUNTSTACK_API_BASE_URL") {
        config.api.base_url = Some(url);
    }
    if let Some(origin) = var("ACCOUNTSTACK_ORIGIN") {
        config.api.origin = origin;
    }
    if let Some(page_path) = var("ACCOUNTSTACK_PAGE_PATH") {
        config.api.page_path = page_path;
    }
    if let Some(value) = var("ACCOUNTSTACK_API_TIMEOUT_SECS") {
        config.api.timeout_secs = parse_number("ACCOUNTSTACK_API_TIMEOUT_SECS", &value)?;
    }
    if let Some(value) = var("ACCOUNTSTACK_API_MAX_ATTEMPTS") {
        config.api.max_attempts = parse_number("ACCOUNTSTACK_API_MAX_ATTEMPTS", &value)?;
    }

    if let Some(key) = var("ACCOUNTSTACK_FLAGS_API_KEY") {
        config.flags.api_key = Some(key);
    }
    if let Some(secret) = var("ACCOUNTSTACK_FLAGS_DEV_MODE_SECRET") {
        config.flags.dev_mode_secret = Some(secret);
    }
    if let Some(endpoint) = var("ACCOUNTSTACK_FLAGS_ENDPOINT") {
        config.flags.endpoint = endpoint;
    }
    if let Some(value) = var("ACCOUNTSTACK_FLAGS_REFRESH_SECS") {
        config.flags.refresh_interval_secs =
            Some(parse_number("ACCOUNTSTACK_FLAGS_REFRESH_SECS", &value)?);
    }

    if let Some(level) = var("ACCOUNTSTACK_LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Some(value) = var("ACCOUNTSTACK_LOG_JSON") {
        config.logging.json = parse_bool("ACCOUNTSTACK_LOG_JSON", &value)?;
    }

    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `AccountStackError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(AccountStackError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            AccountStackError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| AccountStackError::Config(format!("Failed to read config file: {}", e)))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| AccountStackError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| AccountStackError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(AccountStackError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut dirs = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        if let Some(parent) = cwd.parent() {
            dirs.push(cwd.clone());
            dirs.push(parent.to_path_buf());
        } else {
            dirs.push(cwd);
        }
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            dirs.push(exe_dir.to_path_buf());
        }
    }

    dirs.iter()
        .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.exists())
}

fn parse_number<T>(key: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.parse::<T>().map_err(|e| AccountStackError::Config(format!("Invalid {key} '{value}': {e}")))
}

/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(AccountStackError::Config(format!("Invalid {key} '{value}': expected a boolean"))),
    }
}
