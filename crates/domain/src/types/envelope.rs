//! Wire-level response envelope
//!
//! Every successful API response body has the shape `{ "data": T, ... }`.
//! Metadata keys next to `data` are accepted and ignored.

use serde::{Deserialize, Serialize};

/// Envelope wrapping every successful API payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub data: T,
}

impl<T> ApiResponse<T> {
    /// Unwrap the payload, discarding the envelope.
    pub fn into_data(self) -> T {
        self.data
    }
}
