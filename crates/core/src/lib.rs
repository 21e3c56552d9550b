//! # AccountStack Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Feature flag declarations and the kill-switch composition rules
//! - The flag store and the flag resolution service
//! - Port interfaces (traits) for the flag source and the token store
//!
//! ## Architecture Principles
//! - Only depends on `accountstack-domain`
//! - No HTTP, keychain or file I/O
//! - All external dependencies via traits

pub mod flags;

// Infrastructure ports
pub mod feature_flags_ports;
pub mod token_store_ports;

pub use feature_flags_ports::{ConfigurationFetchedHandler, DebugLevel, FlagSource, SetupOptions};
pub use flags::{
    resolve, resolve_flag, DefaultsReason, FlagInitOutcome, FlagResolutionService, FlagStore,
    FlagWriter,
};
pub use token_store_ports::TokenStore;
