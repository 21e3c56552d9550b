//! Flag source port for remote flag evaluation.
//!
//! A flag source is the third-party service that evaluates flags remotely.
//! The core only consumes already-evaluated booleans: the source is told which
//! flags exist ([`FlagSource::register`]), is connected once with a credential
//! ([`FlagSource::setup`]), and from then on pushes values through the
//! [`FlagWriter`] it was handed.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use accountstack_core::{FlagResolutionService, FlagSource};
//! use accountstack_domain::FlagsConfig;
//!
//! async fn start(source: Arc<dyn FlagSource>) {
//!     let flags = Arc::new(FlagResolutionService::new(source));
//!     let _pending = flags.spawn_initialize(FlagsConfig::default());
//!     // Reads are valid immediately; they return defaults until the source answers.
//!     let resolved = flags.read_resolved_flags();
//!     assert!(!resolved.insights_v2);
//! }
//! ```

use std::fmt;
use std::sync::Arc;

use accountstack_domain::{FetcherResults, FlagValues, Result};
use async_trait::async_trait;

use crate::flags::FlagWriter;

/// Called after every configuration fetch, successful or not.
pub type ConfigurationFetchedHandler = Arc<dyn Fn(FetcherResults) + Send + Sync>;

/// Diagnostic verbosity requested from the flag source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DebugLevel {
    #[default]
    Verbose,
    Quiet,
}

/// Options passed to [`FlagSource::setup`].
#[derive(Clone)]
pub struct SetupOptions {
    pub debug_level: DebugLevel,
    pub dev_mode_secret: Option<String>,
    /// Update channel into the flag store.
    pub writer: FlagWriter,
    pub configuration_fetched: Option<ConfigurationFetchedHandler>,
}

impl SetupOptions {
    pub fn new(writer: FlagWriter) -> Self {
        Self {
            debug_level: DebugLevel::default(),
            dev_mode_secret: None,
            writer,
            configuration_fetched: None,
        }
    }

    /// Invoke the configuration-fetched handler, if one was supplied.
    pub fn notify_fetched(&self, results: FetcherResults) {
        if let Some(handler) = &self.configuration_fetched {
            handler(results);
        }
    }
}

impl fmt::Debug for SetupOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SetupOptions")
            .field("debug_level", &self.debug_level)
            .field("dev_mode_secret", &self.dev_mode_secret.as_ref().map(|_| "<redacted>"))
            .field("configuration_fetched", &self.configuration_fetched.is_some())
            .finish_non_exhaustive()
    }
}

/// Port for the remote flag evaluation service.
#[async_trait]
pub trait FlagSource: Send + Sync {
    /// Declare the flag set under `namespace` with its default values.
    ///
    /// Called before [`FlagSource::setup`].
    async fn register(&self, namespace: &str, defaults: FlagValues) -> Result<()>;

    /// Connect with `credential` and start delivering values through
    /// `options.writer`.
    ///
    /// # Errors
    /// Returns `AccountStackError::FlagSource` when the connection or the
    /// initial fetch fails. Callers treat this as non-fatal.
    async fn setup(&self, credential: &str, options: SetupOptions) -> Result<()>;

    /// Stop any background activity. The default does nothing.
    async fn shutdown(&self) {}
}
