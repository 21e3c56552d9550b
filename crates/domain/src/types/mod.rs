//! Domain types and models

pub mod account;
pub mod envelope;
mod fields;
pub mod flags;
pub mod insight;
pub mod transaction;
pub mod user;

pub use account::{Account, AccountDraft};
pub use envelope::ApiResponse;
pub use flags::{FeatureFlag, FetcherResults, FetcherStatus, FlagValues, ResolvedFlags};
pub use insight::{Insight, InsightFilters};
pub use transaction::{Transaction, TransactionDraft, TransactionFilters};
pub use user::User;

/// Fields the client does not model explicitly, kept verbatim so an entity
/// re-serializes to the object the server sent.
pub type ExtraFields = serde_json::Map<String, serde_json::Value>;
