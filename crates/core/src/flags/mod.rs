//! Feature flag resolution
//!
//! Raw flag values arrive asynchronously from a [`FlagSource`] and are held in
//! a [`FlagStore`]. Consumers never read raw values directly; they read
//! [`ResolvedFlags`], recomputed from the latest snapshot on every call.
//!
//! [`FlagSource`]: crate::FlagSource
//! [`ResolvedFlags`]: accountstack_domain::ResolvedFlags

pub mod resolution;
pub mod service;
pub mod store;

pub use resolution::{kill_switch_for, resolve, resolve_flag, KILL_SWITCHES};
pub use service::{DefaultsReason, FlagInitOutcome, FlagResolutionService};
pub use store::{FlagStore, FlagWriter};
