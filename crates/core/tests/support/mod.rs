//! Shared test helpers for `accountstack-core` integration tests.

pub mod flag_sources;
