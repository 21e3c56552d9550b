//! HTTP flag source
//!
//! Fetches `GET {endpoint}/{namespace}` with the credential in the
//! `X-Api-Key` header. The response body maps qualified flag names to their
//! evaluated values:
//!
//! ```json
//! { "flags": { "accountstack.insightsV2": true, "accountstack.killInsights": false } }
//! ```
//!
//! Names outside the registered namespace or not declared by this client are
//! ignored; flags missing from the body keep their current value.

use std::collections::HashMap;
use std::time::Duration;

use accountstack_core::{DebugLevel, FlagSource, SetupOptions};
use accountstack_domain::constants::{FLAG_API_KEY_HEADER, FLAG_DEV_MODE_SECRET_HEADER};
use accountstack_domain::{
    AccountStackError, FeatureFlag, FetcherResults, FetcherStatus, FlagValues, FlagsConfig, Result,
};
use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::Method;
use serde::Deserialize;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use urlencoding::encode;

use crate::http::HttpClient;

const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Deserialize)]
struct FlagConfiguration {
    #[serde(default)]
    flags: HashMap<String, bool>,
}

/// Flag source backed by the remote flag service.
pub struct RemoteFlagSource {
    http: HttpClient,
    endpoint: String,
    refresh_interval: Option<Duration>,
    namespace: Mutex<Option<String>>,
    cancellation_token: CancellationToken,
    refresh_task: Mutex<Option<JoinHandle<()>>>,
}

impl RemoteFlagSource {
    /// Create a source for `endpoint` that fetches once during setup.
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        Ok(Self::with_http(HttpClient::new()?, endpoint))
    }

    /// Create a source from configuration.
    pub fn from_config(config: &FlagsConfig) -> Result<Self> {
        let source = Self::new(config.endpoint.clone())?;
        Ok(match config.refresh_interval_secs.filter(|secs| *secs > 0) {
            Some(secs) => source.refresh_every(Duration::from_secs(secs)),
            None => source,
        })
    }

    pub fn with_http(http: HttpClient, endpoint: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            refresh_interval: None,
            namespace: Mutex::new(None),
            cancellation_token: CancellationToken::new(),
            refresh_task: Mutex::new(None),
        }
    }

    /// Keep refetching in the background after a successful setup.
    #[must_use]
    pub fn refresh_every(mut self, interval: Duration) -> Self {
        self.refresh_interval = Some(interval);
        self
    }

    /// Whether the background refresh task is active.
    pub fn is_refreshing(&self) -> bool {
        self.refresh_task.lock().as_ref().is_some_and(|handle| !handle.is_finished())
    }

    async fn refresh_loop(
        fetcher: ConfigurationFetcher,
        options: SetupOptions,
        interval: Duration,
        cancel: CancellationToken,
    ) {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!("Flag refresh loop cancelled");
                    break;
                }
                _ = tokio::time::sleep(interval) => {
                    if let Err(err) = fetcher.fetch_and_apply(&options).await {
                        warn!(error = %err, "Feature flag refresh failed, keeping current values");
                    }
                }
            }
        }
    }
}

#[async_trait]
impl FlagSource for RemoteFlagSource {
    async fn register(&self, namespace: &str, defaults: FlagValues) -> Result<()> {
        if namespace.trim().is_empty() {
            return Err(AccountStackError::FlagSource("flag namespace must not be empty".into()));
        }

        debug!(
            namespace,
            flags = ?defaults.iter().map(|(flag, _)| flag.qualified_name(namespace)).collect::<Vec<_>>(),
            "Registering feature flags"
        );
        *self.namespace.lock() = Some(namespace.to_string());
        Ok(())
    }

    async fn setup(&self, credential: &str, options: SetupOptions) -> Result<()> {
        let namespace = self.namespace.lock().clone().ok_or_else(|| {
            AccountStackError::FlagSource("setup called before flags were registered".into())
        })?;

        let fetcher = ConfigurationFetcher {
            http: self.http.clone(),
            url: format!("{}/{}", self.endpoint, encode(&namespace)),
            namespace,
            credential: credential.to_string(),
            dev_mode_secret: options.dev_mode_secret.clone(),
            debug_level: options.debug_level,
        };

        fetcher.fetch_and_apply(&options).await?;

        if let Some(interval) = self.refresh_interval {
            info!(interval_secs = interval.as_secs(), "Starting feature flag refresh");
            let cancel = self.cancellation_token.clone();
            let handle = tokio::spawn(Self::refresh_loop(fetcher, options, interval, cancel));
            if let Some(previous) = self.refresh_task.lock().replace(handle) {
                previous.abort();
            }
        }

        Ok(())
    }

    async fn shutdown(&self) {
        self.cancellation_token.cancel();

        let handle = self.refresh_task.lock().take();
        if let Some(handle) = handle {
            match tokio::time::timeout(SHUTDOWN_TIMEOUT, handle).await {
                Ok(Ok(())) => debug!("Flag refresh task stopped"),
                Ok(Err(err)) => warn!(error = %err, "Flag refresh task panicked"),
                Err(_) => warn!("Flag refresh task did not stop within timeout"),
            }
        }
    }
}

impl Drop for RemoteFlagSource {
    fn drop(&mut self) {
        if !self.cancellation_token.is_cancelled() {
            self.cancellation_token.cancel();
        }
    }
}

#[derive(Clone)]
struct ConfigurationFetcher {
    http: HttpClient,
    url: String,
    namespace: String,
    credential: String,
    dev_mode_secret: Option<String>,
    debug_level: DebugLevel,
}

impl ConfigurationFetcher {
    /// Fetch once, push the values through the writer and report the fetch.
    async fn fetch_and_apply(&self, options: &SetupOptions) -> Result<()> {
        match self.fetch().await {
            Ok(updates) => {
                let has_changes = options.writer.apply(updates);
                options.notify_fetched(FetcherResults {
                    has_changes,
                    fetcher_status: FetcherStatus::AppliedFromNetwork,
                });
                Ok(())
            }
            Err(err) => {
                options.notify_fetched(FetcherResults {
                    has_changes: false,
                    fetcher_status: FetcherStatus::ErrorFetchFailed,
                });
                Err(err)
            }
        }
    }

    async fn fetch(&self) -> Result<Vec<(FeatureFlag, bool)>> {
        let mut request =
            self.http.request(Method::GET, &self.url).header(FLAG_API_KEY_HEADER, &self.credential);
        if let Some(secret) = &self.dev_mode_secret {
            request = request.header(FLAG_DEV_MODE_SECRET_HEADER, secret);
        }

        let response = self.http.send(request).await.map_err(|err| {
            AccountStackError::FlagSource(format!("flag configuration request failed: {err}"))
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AccountStackError::FlagSource(format!(
                "flag configuration request returned {status}"
            )));
        }

        let configuration: FlagConfiguration = response.json().await.map_err(|err| {
            AccountStackError::FlagSource(format!("invalid flag configuration: {err}"))
        })?;

        Ok(self.declared_values(configuration))
    }

    fn declared_values(&self, configuration: FlagConfiguration) -> Vec<(FeatureFlag, bool)> {
        let prefix = format!("{}.", self.namespace);
        let verbose = self.debug_level == DebugLevel::Verbose;

        configuration
            .flags
            .into_iter()
            .filter_map(|(name, enabled)| {
                let flag = name.strip_prefix(&prefix).and_then(|short| short.parse::<FeatureFlag>().ok());
                if verbose {
                    match flag {
                        Some(flag) => debug!(%flag, enabled, "Received feature flag value"),
                        None => debug!(name = %name, "Ignoring undeclared feature flag"),
                    }
                }
                flag.map(|flag| (flag, enabled))
            })
            .collect()
    }
}
