use std::time::Duration;

use accountstack_domain::{AccountStackError, LoggingConfig};
use accountstack_infra::{ApiError, ApiErrorCategory};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` takes precedence; otherwise `config.level` is used as the
/// filter directive. Output is JSON when `config.json` is set.
pub fn init_tracing(config: &LoggingConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|err| anyhow::anyhow!("invalid log filter '{}': {err}", config.level))?;

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(false);
    let result = if config.json { builder.json().try_init() } else { builder.try_init() };

    result.map_err(|err| anyhow::anyhow!("failed to install tracing subscriber: {err}"))
}

/// Log the outcome of a command execution with structured fields.
#[inline]
pub fn log_command_execution(command: &str, elapsed: Duration, success: bool) {
    let duration_ms = elapsed.as_millis() as u64;

    if success {
        info!(command, duration_ms, "command_execution_success");
    } else {
        warn!(command, duration_ms, "command_execution_failure");
    }
}

/// Log the outcome of a feature flag evaluation.
#[inline]
pub fn log_feature_flag_check(flag_name: &str, is_enabled: bool) {
    info!(flag_name, is_enabled, "feature_flag_evaluated");
}

/// Convert an `AccountStackError` into a stable label suitable for logging.
#[inline]
pub fn error_label(error: &AccountStackError) -> &'static str {
    match error {
        AccountStackError::Config(_) => "config",
        AccountStackError::Network(_) => "network",
        AccountStackError::Auth(_) => "auth",
        AccountStackError::InvalidInput(_) => "invalid_input",
        AccountStackError::FlagSource(_) => "flag_source",
        AccountStackError::Internal(_) => "internal",
    }
}

/// Stable label for an API failure category.
#[inline]
pub fn api_error_label(error: &ApiError) -> &'static str {
    match error.category() {
        ApiErrorCategory::Server => "server",
        ApiErrorCategory::Network => "network",
        ApiErrorCategory::Request => "request",
    }
}
