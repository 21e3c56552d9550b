//! Flag resolution service - owns the flag store and the flag source
//!
//! Initialization never fails from the caller's point of view: any problem
//! with the flag source is logged and the service keeps serving the declared
//! defaults (or the last values the source delivered).

use std::sync::Arc;

use accountstack_domain::constants::FLAG_NAMESPACE;
use accountstack_domain::{FeatureFlag, FetcherResults, FlagValues, FlagsConfig, ResolvedFlags};
use tokio::sync::OnceCell;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use super::resolution::{resolve, resolve_flag};
use super::store::FlagStore;
use crate::feature_flags_ports::{DebugLevel, FlagSource, SetupOptions};

/// How initialization ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlagInitOutcome {
    /// The flag source is connected and delivering values.
    Live,
    /// The service is serving defaults.
    Defaults(DefaultsReason),
}

impl FlagInitOutcome {
    pub const fn is_live(&self) -> bool {
        matches!(self, Self::Live)
    }
}

/// Why the service fell back to defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultsReason {
    NoCredential,
    RegistrationFailed(String),
    SetupFailed(String),
}

/// Flag resolution service
///
/// Create one per application and share it behind an `Arc`.
pub struct FlagResolutionService {
    source: Arc<dyn FlagSource>,
    store: FlagStore,
    outcome: OnceCell<FlagInitOutcome>,
}

impl FlagResolutionService {
    /// Create a service serving the declared defaults.
    pub fn new(source: Arc<dyn FlagSource>) -> Self {
        Self::with_store(source, FlagStore::new())
    }

    /// Create a service around an existing store.
    pub fn with_store(source: Arc<dyn FlagSource>, store: FlagStore) -> Self {
        Self { source, store, outcome: OnceCell::new() }
    }

    /// Register the declared flags and connect the flag source.
    ///
    /// Runs at most once; later and concurrent calls wait for and return the
    /// first call's outcome without touching the source again.
    pub async fn initialize(&self, config: &FlagsConfig) -> FlagInitOutcome {
        self.outcome.get_or_init(|| self.connect(config)).await.clone()
    }

    /// Run [`Self::initialize`] in the background so startup is not blocked.
    pub fn spawn_initialize(self: &Arc<Self>, config: FlagsConfig) -> JoinHandle<FlagInitOutcome> {
        let service = Arc::clone(self);
        tokio::spawn(async move { service.initialize(&config).await })
    }

    /// Outcome of initialization, if it has completed.
    pub fn outcome(&self) -> Option<FlagInitOutcome> {
        self.outcome.get().cloned()
    }

    /// Current resolved flags. Synchronous, no I/O, safe on every render.
    pub fn read_resolved_flags(&self) -> ResolvedFlags {
        resolve(&self.store.snapshot())
    }

    /// Current raw values, before composition.
    pub fn raw_values(&self) -> FlagValues {
        self.store.snapshot()
    }

    /// Resolved value of a single flag.
    pub fn is_enabled(&self, flag: FeatureFlag) -> bool {
        resolve_flag(&self.store.snapshot(), flag)
    }

    pub fn is_dashboard_cards_v2_enabled(&self) -> bool {
        self.is_enabled(FeatureFlag::DashboardCardsV2)
    }

    /// Insights V2, suppressed whenever the insights kill switch is on.
    pub fn is_insights_v2_enabled(&self) -> bool {
        self.is_enabled(FeatureFlag::InsightsV2)
    }

    pub fn is_alerts_banner_enabled(&self) -> bool {
        self.is_enabled(FeatureFlag::AlertsBanner)
    }

    pub fn is_transactions_filters_enabled(&self) -> bool {
        self.is_enabled(FeatureFlag::TransactionsFilters)
    }

    pub fn is_insights_killed(&self) -> bool {
        self.is_enabled(FeatureFlag::KillInsights)
    }

    /// Stop the flag source's background activity.
    pub async fn shutdown(&self) {
        if self.outcome().is_some_and(|outcome| outcome.is_live()) {
            self.source.shutdown().await;
            info!("Feature flag source shutdown complete");
        }
    }

    async fn connect(&self, config: &FlagsConfig) -> FlagInitOutcome {
        if let Err(err) = self.source.register(FLAG_NAMESPACE, self.store.snapshot()).await {
            error!(error = %err, namespace = FLAG_NAMESPACE, "Failed to register feature flags");
            return FlagInitOutcome::Defaults(DefaultsReason::RegistrationFailed(err.to_string()));
        }

        let Some(credential) = config.credential() else {
            warn!(
                "No feature flag API key provided, using default flag values. Set \
                 ACCOUNTSTACK_FLAGS_API_KEY to connect to the flag service."
            );
            self.log_values("Feature flags initialized with defaults");
            return FlagInitOutcome::Defaults(DefaultsReason::NoCredential);
        };

        let options = SetupOptions {
            debug_level: DebugLevel::Verbose,
            dev_mode_secret: config.dev_mode_secret.clone(),
            writer: self.store.writer(),
            configuration_fetched: Some(Arc::new(log_configuration_fetched)),
        };

        match self.source.setup(credential, options).await {
            Ok(()) => {
                info!("Feature flag service initialized successfully");
                self.log_values("Feature flags initialized");
                FlagInitOutcome::Live
            }
            Err(err) => {
                error!(error = %err, "Failed to initialize feature flag service, using defaults");
                FlagInitOutcome::Defaults(DefaultsReason::SetupFailed(err.to_string()))
            }
        }
    }

    fn log_values(&self, message: &str) {
        let resolved = self.read_resolved_flags();
        info!(
            dashboard_cards_v2 = resolved.dashboard_cards_v2,
            insights_v2 = resolved.insights_v2,
            alerts_banner = resolved.alerts_banner,
            transactions_filters = resolved.transactions_filters,
            kill_insights = resolved.kill_insights,
            "{message}"
        );
    }
}

fn log_configuration_fetched(results: FetcherResults) {
    info!(
        has_changes = results.has_changes,
        source = %results.fetcher_status,
        "Feature flag configuration fetched"
    );
}
