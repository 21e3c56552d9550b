//! Offline flag source

use accountstack_core::{FlagSource, SetupOptions};
use accountstack_domain::{FeatureFlag, FetcherResults, FetcherStatus, FlagValues, Result};
use async_trait::async_trait;
use tracing::debug;

/// Flag source that never leaves the process.
///
/// Setup always succeeds and pushes the configured overrides, if any, on top
/// of the declared defaults.
#[derive(Debug, Clone, Default)]
pub struct LocalFlagSource {
    overrides: Vec<(FeatureFlag, bool)>,
}

impl LocalFlagSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_overrides(overrides: impl IntoIterator<Item = (FeatureFlag, bool)>) -> Self {
        Self { overrides: overrides.into_iter().collect() }
    }
}

#[async_trait]
impl FlagSource for LocalFlagSource {
    async fn register(&self, namespace: &str, _defaults: FlagValues) -> Result<()> {
        debug!(namespace, "Local flag source registered");
        Ok(())
    }

    async fn setup(&self, _credential: &str, options: SetupOptions) -> Result<()> {
        let has_changes = options.writer.apply(self.overrides.iter().copied());
        options.notify_fetched(FetcherResults {
            has_changes,
            fetcher_status: FetcherStatus::AppliedFromEmbedded,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use accountstack_core::FlagStore;

    use super::*;

    #[tokio::test]
    async fn setup_without_overrides_keeps_defaults() {
        let store = FlagStore::new();
        let source = LocalFlagSource::new();
        source.register("accountstack", store.snapshot()).await.unwrap();
        source.setup("unused", SetupOptions::new(store.writer())).await.unwrap();

        assert_eq!(store.snapshot(), FlagValues::defaults());
    }

    #[tokio::test]
    async fn overrides_are_applied_and_reported() {
        let store = FlagStore::new();
        let reports = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&reports);

        let mut options = SetupOptions::new(store.writer());
        options.configuration_fetched = Some(Arc::new(move |results| sink.lock().unwrap().push(results)));

        LocalFlagSource::with_overrides([(FeatureFlag::InsightsV2, true)])
            .setup("unused", options)
            .await
            .unwrap();

        assert!(store.snapshot().get(FeatureFlag::InsightsV2));
        let reports = reports.lock().unwrap();
        assert_eq!(reports.len(), 1);
        assert!(reports[0].has_changes);
        assert_eq!(reports[0].fetcher_status, FetcherStatus::AppliedFromEmbedded);
    }
}
