//! External service integrations

pub mod feature_flags;
