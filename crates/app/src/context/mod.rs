//! Application context - dependency injection container

use std::sync::Arc;

use accountstack_core::{FlagInitOutcome, FlagResolutionService, FlagSource, TokenStore};
use accountstack_domain::{AccountStackError, Config, Result};
use accountstack_infra::{
    ApiClient, ApiCommands, KeychainTokenStore, LocalFlagSource, RemoteFlagSource,
};
use tokio::task::JoinHandle;
use tracing::info;

/// Application context - holds all services and dependencies
pub struct AppContext {
    pub config: Config,
    pub flags: Arc<FlagResolutionService>,
    pub api: ApiCommands,
    pub tokens: Arc<dyn TokenStore>,
}

impl AppContext {
    /// Create the production context: keychain-backed tokens, and the remote
    /// flag source unless no flag endpoint is configured.
    pub fn new(config: Config) -> Result<Self> {
        let source: Arc<dyn FlagSource> = if config.flags.endpoint.trim().is_empty() {
            info!("No feature flag endpoint configured, using local flag source");
            Arc::new(LocalFlagSource::new())
        } else {
            Arc::new(RemoteFlagSource::from_config(&config.flags)?)
        };

        Self::with_parts(config, source, Arc::new(KeychainTokenStore::new()))
    }

    /// Create a context around explicit adapters
    ///
    /// Tests use this to swap in local flag sources and in-memory tokens.
    pub fn with_parts(
        config: Config,
        source: Arc<dyn FlagSource>,
        tokens: Arc<dyn TokenStore>,
    ) -> Result<Self> {
        let client = ApiClient::new(&config.api, Arc::clone(&tokens))
            .map_err(|err| AccountStackError::Config(format!("failed to build API client: {err}")))?;
        info!(base_url = %client.base_url(), "API client ready");

        Ok(Self {
            flags: Arc::new(FlagResolutionService::new(source)),
            api: ApiCommands::new(Arc::new(client)),
            tokens,
            config,
        })
    }

    /// Start flag initialization in the background.
    ///
    /// Flag reads are valid immediately and serve defaults until this
    /// completes.
    pub fn start_feature_flags(&self) -> JoinHandle<FlagInitOutcome> {
        self.flags.spawn_initialize(self.config.flags.clone())
    }

    pub async fn shutdown(&self) {
        self.flags.shutdown().await;
        info!("AccountStack shutdown complete");
    }
}
