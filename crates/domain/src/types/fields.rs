//! Lenient field extraction for server entities
//!
//! Entity payloads are decoded field by field: a known key whose value has
//! the expected JSON type populates the typed field, anything else (missing,
//! `null`, or a different type) stays in [`ExtraFields`] untouched. Decoding
//! an entity therefore only fails when the payload is not a JSON object.

use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::ExtraFields;

/// The raw key/value pairs of an entity payload.
#[derive(Debug, Deserialize)]
#[serde(transparent)]
pub(crate) struct PayloadFields(ExtraFields);

impl PayloadFields {
    /// Remove `key` if its value decodes as `T`; otherwise leave it in place.
    pub(crate) fn take<T: DeserializeOwned>(&mut self, key: &str) -> Option<T> {
        let value = self.0.remove(key)?;
        match T::deserialize(&value) {
            Ok(typed) => Some(typed),
            Err(_) => {
                self.0.insert(key.to_string(), value);
                None
            }
        }
    }

    /// The entity id. Empty when absent or not a string.
    pub(crate) fn take_id(&mut self) -> String {
        self.take("id").unwrap_or_default()
    }

    pub(crate) fn into_extra(self) -> ExtraFields {
        self.0
    }
}
