//! # AccountStack Domain
//!
//! Business domain types and models for the AccountStack client.
//!
//! This crate contains:
//! - Domain entities (User, Account, Transaction, Insight) and the response
//!   envelope
//! - Feature flag value types
//! - Domain error types and Result definitions
//! - Configuration structures
//! - Deployment base-path utilities
//!
//! ## Architecture
//! - No dependencies on other AccountStack crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;
pub mod utils;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
pub use utils::base_path::{api_base_path, detect_base_path};
