//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application.

// API client
pub const DEFAULT_API_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_API_MAX_ATTEMPTS: usize = 1;
pub const DEFAULT_RETRY_BACKOFF_MS: u64 = 200;
pub const DEFAULT_ORIGIN: &str = "http://localhost:3000";
pub const API_PATH_SEGMENT: &str = "api";

// Local persistent storage
pub const AUTH_TOKEN_KEY: &str = "authToken";
pub const TOKEN_STORE_SERVICE: &str = "accountstack";

// Feature flags
pub const FLAG_NAMESPACE: &str = "accountstack";
pub const DEFAULT_FLAGS_ENDPOINT: &str = "https://flags.accountstack.local/v1/config";
pub const FLAG_API_KEY_HEADER: &str = "X-Api-Key";
pub const FLAG_DEV_MODE_SECRET_HEADER: &str = "X-Dev-Mode-Secret";

// Logging
pub const DEFAULT_LOG_LEVEL: &str = "info";
