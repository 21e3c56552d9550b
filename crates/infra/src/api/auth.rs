//! Token stores for the API bearer token
//!
//! [`KeychainTokenStore`] persists tokens in the OS keychain so a session
//! survives restarts; [`InMemoryTokenStore`] keeps them for the lifetime of
//! the process.

use std::collections::HashMap;

use accountstack_core::TokenStore;
use accountstack_domain::constants::TOKEN_STORE_SERVICE;
use accountstack_domain::{AccountStackError, Result};
use keyring::Entry;
use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::errors::InfraError;

/// Token store backed by the system keyring.
#[derive(Debug, Clone)]
pub struct KeychainTokenStore {
    service: String,
}

impl KeychainTokenStore {
    pub fn new() -> Self {
        Self::with_service(TOKEN_STORE_SERVICE)
    }

    /// Store entries under a custom keychain service name.
    pub fn with_service(service: impl Into<String>) -> Self {
        Self { service: service.into() }
    }

    fn entry(&self, key: &str) -> Result<Entry> {
        Entry::new(&self.service, key).map_err(|err| AccountStackError::from(InfraError::from(err)))
    }
}

impl Default for KeychainTokenStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenStore for KeychainTokenStore {
    fn token(&self, key: &str) -> Option<String> {
        let entry = match self.entry(key) {
            Ok(entry) => entry,
            Err(err) => {
                warn!(error = %err, key, "Failed to open keychain entry");
                return None;
            }
        };

        match entry.get_password() {
            Ok(token) => Some(token),
            Err(keyring::Error::NoEntry) => None,
            Err(err) => {
                warn!(error = %err, key, "Failed to read token from keychain");
                None
            }
        }
    }

    fn set_token(&self, key: &str, token: &str) -> Result<()> {
        self.entry(key)?
            .set_password(token)
            .map_err(|err| AccountStackError::from(InfraError::from(err)))?;
        debug!(key, "Token stored in keychain");
        Ok(())
    }

    fn clear_token(&self, key: &str) -> Result<()> {
        match self.entry(key)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(err) => Err(InfraError::from(err).into()),
        }
    }
}

/// Process-local token store.
#[derive(Debug, Default)]
pub struct InMemoryTokenStore {
    tokens: RwLock<HashMap<String, String>>,
}

impl InMemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a token, e.g. one obtained from a login flow or a fixture.
    pub fn insert(&self, key: impl Into<String>, token: impl Into<String>) {
        self.tokens.write().insert(key.into(), token.into());
    }
}

impl TokenStore for InMemoryTokenStore {
    fn token(&self, key: &str) -> Option<String> {
        self.tokens.read().get(key).cloned()
    }

    fn set_token(&self, key: &str, token: &str) -> Result<()> {
        self.insert(key, token);
        Ok(())
    }

    fn clear_token(&self, key: &str) -> Result<()> {
        self.tokens.write().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_memory_store_roundtrip() {
        let store = InMemoryTokenStore::new();
        assert_eq!(store.token("authToken"), None);

        store.set_token("authToken", "abc").unwrap();
        assert_eq!(store.token("authToken").as_deref(), Some("abc"));

        store.clear_token("authToken").unwrap();
        assert_eq!(store.token("authToken"), None);
        store.clear_token("authToken").unwrap();
    }

    #[test]
    fn keychain_store_reports_missing_token_as_none() {
        let store = KeychainTokenStore::with_service("accountstack-test-missing");
        assert_eq!(store.token("no-such-token"), None);
    }
}
