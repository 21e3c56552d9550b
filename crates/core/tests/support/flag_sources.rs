//! Scriptable in-memory flag source
//!
//! Records every call and keeps the writer handed to `setup`, so tests can
//! push updates the way a remote source would after its network round trip.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use accountstack_core::{FlagSource, FlagWriter, SetupOptions};
use accountstack_domain::{
    AccountStackError, FeatureFlag, FetcherResults, FetcherStatus, FlagValues, Result,
};
use async_trait::async_trait;
use parking_lot::Mutex;

#[derive(Default)]
pub struct ScriptedFlagSource {
    fail_register: bool,
    fail_setup: bool,
    setup_delay: Option<Duration>,
    initial_values: Vec<(FeatureFlag, bool)>,
    pub register_calls: AtomicUsize,
    pub setup_calls: AtomicUsize,
    pub shutdown_calls: AtomicUsize,
    pub registered: Mutex<Option<(String, FlagValues)>>,
    pub credential: Mutex<Option<String>>,
    writer: Mutex<Option<FlagWriter>>,
}

impl ScriptedFlagSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_register() -> Self {
        Self { fail_register: true, ..Self::default() }
    }

    pub fn failing_setup() -> Self {
        Self { fail_setup: true, ..Self::default() }
    }

    /// Values delivered during setup, as if fetched from the network.
    pub fn delivering(values: &[(FeatureFlag, bool)]) -> Self {
        Self { initial_values: values.to_vec(), ..Self::default() }
    }

    pub fn with_setup_delay(mut self, delay: Duration) -> Self {
        self.setup_delay = Some(delay);
        self
    }

    /// Push an update after setup, like an asynchronous refresh would.
    pub fn push(&self, updates: &[(FeatureFlag, bool)]) -> bool {
        let writer = self.writer.lock().clone();
        writer.map(|w| w.apply(updates.iter().copied())).unwrap_or(false)
    }

    pub fn setup_count(&self) -> usize {
        self.setup_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FlagSource for ScriptedFlagSource {
    async fn register(&self, namespace: &str, defaults: FlagValues) -> Result<()> {
        self.register_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_register {
            return Err(AccountStackError::FlagSource("registration rejected".into()));
        }
        *self.registered.lock() = Some((namespace.to_string(), defaults));
        Ok(())
    }

    async fn setup(&self, credential: &str, options: SetupOptions) -> Result<()> {
        self.setup_calls.fetch_add(1, Ordering::SeqCst);
        *self.credential.lock() = Some(credential.to_string());

        if let Some(delay) = self.setup_delay {
            tokio::time::sleep(delay).await;
        }

        if self.fail_setup {
            options.notify_fetched(FetcherResults {
                has_changes: false,
                fetcher_status: FetcherStatus::ErrorFetchFailed,
            });
            return Err(AccountStackError::FlagSource("connection refused".into()));
        }

        let has_changes = options.writer.apply(self.initial_values.iter().copied());
        options.notify_fetched(FetcherResults {
            has_changes,
            fetcher_status: FetcherStatus::AppliedFromNetwork,
        });
        *self.writer.lock() = Some(options.writer);
        Ok(())
    }

    async fn shutdown(&self) {
        self.shutdown_calls.fetch_add(1, Ordering::SeqCst);
    }
}
