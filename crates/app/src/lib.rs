//! # AccountStack App
//!
//! Application layer - wiring and entry point.
//!
//! This crate contains:
//! - Application context (dependency injection)
//! - Commands consumed by the UI (flag reads, dashboard loading)
//! - Logging setup
//!
//! ## Architecture
//! - Depends on `domain`, `core`, and `infra`
//! - Wires up the hexagonal architecture

pub mod commands;
pub mod context;
pub mod utils;

// Re-export for convenience
pub use commands::*;
pub use context::*;
