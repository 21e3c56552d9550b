//! AccountStack REST API client
//!
//! Typed operations over a middleware-composed HTTP client.
//!
//! # Architecture
//!
//! - [`HttpClient`](crate::http::HttpClient) owns timeout and retry
//! - [`ApiClient`] resolves the base URL, runs the middleware chain and
//!   unwraps the response envelope
//! - [`ApiCommands`] exposes one method per REST operation
//! - Bearer tokens come from a [`TokenStore`](accountstack_core::TokenStore)

pub mod auth;
pub mod client;
pub mod commands;
pub mod errors;
pub mod middleware;

pub use auth::{InMemoryTokenStore, KeychainTokenStore};
pub use client::{ApiClient, ApiClientBuilder};
pub use commands::ApiCommands;
pub use errors::{ApiError, ApiErrorCategory};
pub use middleware::{AuthTokenMiddleware, ErrorLoggingMiddleware, Middleware, Next};
