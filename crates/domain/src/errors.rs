//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for AccountStack
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum AccountStackError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The remote flag evaluation source could not be registered or set up.
    #[error("Flag source error: {0}")]
    FlagSource(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for AccountStack operations
pub type Result<T> = std::result::Result<T, AccountStackError>;
