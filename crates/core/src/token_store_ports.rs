//! Token store port for locally persisted credentials.
//!
//! The API client reads the bearer token from here on every request. A
//! missing token is a normal state (signed-out user), not an error.

use accountstack_domain::Result;

/// Key/value store for credentials that survive restarts.
pub trait TokenStore: Send + Sync {
    /// Stored token under `key`, if any.
    fn token(&self, key: &str) -> Option<String>;

    /// Persist `token` under `key`, replacing any previous value.
    ///
    /// # Errors
    /// Returns `AccountStackError::Auth` if the backing store rejects the
    /// write.
    fn set_token(&self, key: &str, token: &str) -> Result<()>;

    /// Remove the token under `key`. Removing a missing token succeeds.
    ///
    /// # Errors
    /// Returns `AccountStackError::Auth` if the backing store rejects the
    /// deletion.
    fn clear_token(&self, key: &str) -> Result<()>;
}
