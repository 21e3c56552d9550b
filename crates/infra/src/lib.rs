//! # AccountStack Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - HTTP client with timeout and optional retry
//! - The middleware-composed REST API client and its typed operations
//! - Flag source adapters (remote HTTP, local)
//! - Token stores (OS keychain, in-memory)
//! - Configuration loading (files + environment)
//!
//! ## Architecture
//! - Implements traits defined in `accountstack-core`
//! - Depends on `accountstack-domain` and `accountstack-core`
//! - Contains all "impure" code (network, keychain, filesystem)

pub mod api;
pub mod config;
pub mod errors;
pub mod http;
pub mod integrations;

// Re-export commonly used items
pub use api::{
    ApiClient, ApiClientBuilder, ApiCommands, ApiError, ApiErrorCategory, InMemoryTokenStore,
    KeychainTokenStore,
};
pub use errors::InfraError;
pub use http::HttpClient;
pub use integrations::feature_flags::{LocalFlagSource, RemoteFlagSource};
