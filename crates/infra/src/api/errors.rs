//! API-specific error types
//!
//! Every failure of an API operation lands in one of three categories:
//! the server answered with an error, no response arrived, or the request
//! could not be constructed.

use std::time::Duration;

use accountstack_domain::AccountStackError;
use thiserror::Error;

/// Categories of API errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorCategory {
    /// A response arrived with a non-success status, or a malformed body
    Server,
    /// The request was sent but no response arrived
    Network,
    /// The request could not be constructed
    Request,
}

/// API operation errors
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    #[error("Server responded with {status} for {url}: {body}")]
    Server { status: u16, url: String, body: String },

    #[error("Invalid response envelope from {url}: {message}")]
    InvalidEnvelope { url: String, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("Request error: {0}")]
    Request(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ApiError {
    /// Get the error category for this error
    pub const fn category(&self) -> ApiErrorCategory {
        match self {
            Self::Server { .. } | Self::InvalidEnvelope { .. } => ApiErrorCategory::Server,
            Self::Network(_) | Self::Timeout(_) => ApiErrorCategory::Network,
            Self::Request(_) | Self::Config(_) => ApiErrorCategory::Request,
        }
    }

    /// HTTP status of a server error response
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the transport may retry this failure when retries are enabled
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Server { status, .. } => *status >= 500,
            Self::Network(_) | Self::Timeout(_) => true,
            Self::InvalidEnvelope { .. } | Self::Request(_) | Self::Config(_) => false,
        }
    }

    /// Classify a transport failure
    pub(crate) fn from_transport(err: &reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            Self::Timeout(timeout)
        } else if err.is_builder() {
            Self::Request(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<ApiError> for AccountStackError {
    fn from(err: ApiError) -> Self {
        match &err {
            ApiError::Server { status: 401 | 403, .. } => Self::Auth(err.to_string()),
            ApiError::Server { .. } | ApiError::InvalidEnvelope { .. } | ApiError::Network(_) => {
                Self::Network(err.to_string())
            }
            ApiError::Timeout(_) => Self::Network(err.to_string()),
            ApiError::Request(_) => Self::InvalidInput(err.to_string()),
            ApiError::Config(_) => Self::Config(err.to_string()),
        }
    }
}
