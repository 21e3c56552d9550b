//! Process-wide flag values with a single-writer / many-reader channel
//!
//! The store hands out [`FlagWriter`] handles to flag sources; readers copy
//! the whole [`FlagValues`] snapshot out under a read lock, so a read never
//! observes a half-applied update.

use std::fmt;
use std::sync::Arc;

use accountstack_domain::{FeatureFlag, FlagValues};
use parking_lot::RwLock;
use tracing::debug;

/// Owner of the current raw flag values.
#[derive(Clone)]
pub struct FlagStore {
    values: Arc<RwLock<FlagValues>>,
}

impl FlagStore {
    /// Store holding the declared defaults.
    pub fn new() -> Self {
        Self::with_values(FlagValues::defaults())
    }

    pub fn with_values(values: FlagValues) -> Self {
        Self { values: Arc::new(RwLock::new(values)) }
    }

    /// Consistent copy of the current raw values.
    pub fn snapshot(&self) -> FlagValues {
        *self.values.read()
    }

    /// Update channel for a flag source.
    pub fn writer(&self) -> FlagWriter {
        FlagWriter { values: Arc::clone(&self.values) }
    }
}

impl Default for FlagStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FlagStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlagStore").field("values", &self.snapshot()).finish()
    }
}

/// Write handle given to flag sources.
///
/// Every method applies its change atomically and reports whether any value
/// actually changed.
#[derive(Clone)]
pub struct FlagWriter {
    values: Arc<RwLock<FlagValues>>,
}

impl FlagWriter {
    pub fn set(&self, flag: FeatureFlag, enabled: bool) -> bool {
        self.apply([(flag, enabled)])
    }

    /// Apply a partial update. Flags not mentioned keep their value.
    pub fn apply<I>(&self, updates: I) -> bool
    where
        I: IntoIterator<Item = (FeatureFlag, bool)>,
    {
        let mut values = self.values.write();
        let before = *values;
        for (flag, enabled) in updates {
            values.set(flag, enabled);
        }
        let changed = *values != before;
        drop(values);

        if changed {
            debug!("feature flag values updated");
        }
        changed
    }

    /// Replace every value at once.
    pub fn replace(&self, next: FlagValues) -> bool {
        let mut values = self.values.write();
        let changed = *values != next;
        *values = next;
        changed
    }
}

impl fmt::Debug for FlagWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlagWriter").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_store_holds_defaults() {
        assert_eq!(FlagStore::new().snapshot(), FlagValues::defaults());
    }

    #[test]
    fn test_writer_updates_are_visible_to_store() {
        let store = FlagStore::new();
        let writer = store.writer();

        assert!(writer.set(FeatureFlag::InsightsV2, true));
        assert!(store.snapshot().get(FeatureFlag::InsightsV2));

        // Same value again is not a change.
        assert!(!writer.set(FeatureFlag::InsightsV2, true));
    }

    #[test]
    fn test_apply_is_partial() {
        let store = FlagStore::new();
        let changed = store
            .writer()
            .apply([(FeatureFlag::AlertsBanner, false), (FeatureFlag::KillInsights, true)]);

        assert!(changed);
        let snapshot = store.snapshot();
        assert!(!snapshot.get(FeatureFlag::AlertsBanner));
        assert!(snapshot.get(FeatureFlag::KillInsights));
        assert!(snapshot.get(FeatureFlag::DashboardCardsV2));
    }

    #[test]
    fn test_replace() {
        let store = FlagStore::new();
        let next = FlagValues::defaults().with(FeatureFlag::TransactionsFilters, false);
        assert!(store.writer().replace(next));
        assert_eq!(store.snapshot(), next);
        assert!(!store.writer().replace(next));
    }

    #[test]
    fn test_clones_share_state() {
        let store = FlagStore::new();
        let other = store.clone();
        store.writer().set(FeatureFlag::DashboardCardsV2, false);
        assert!(!other.snapshot().get(FeatureFlag::DashboardCardsV2));
    }
}
