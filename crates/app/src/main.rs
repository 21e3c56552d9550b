//! AccountStack - client core entry point
//!
//! Loads configuration, starts the feature flag service in the background
//! and fetches the dashboard data once.

use std::time::Duration;

use accountstack_app::utils::logging::init_tracing;
use accountstack_app::{load_dashboard, AppContext};
use tracing::{error, info, warn};

const FLAG_INIT_WAIT: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before reading configuration so its values participate
    let dotenv = dotenvy::dotenv();

    let config = accountstack_infra::config::load()?;
    init_tracing(&config.logging)?;

    match dotenv {
        Ok(path) => info!(path = %path.display(), "Loaded .env"),
        Err(e) => warn!(error = %e, "Could not load .env file"),
    }

    info!("AccountStack starting...");
    let ctx = AppContext::new(config)?;
    let flags_ready = ctx.start_feature_flags();

    match load_dashboard(&ctx).await {
        Ok(dashboard) => info!(
            accounts = dashboard.accounts.len(),
            insights_v2 = dashboard.flags.insights_v2,
            "Dashboard data fetched"
        ),
        Err(err) => error!(error = %err, "Failed to fetch dashboard data"),
    }

    match tokio::time::timeout(FLAG_INIT_WAIT, flags_ready).await {
        Ok(Ok(outcome)) => info!(?outcome, "Feature flag initialization finished"),
        Ok(Err(err)) => error!(error = %err, "Feature flag initialization task failed"),
        Err(_) => warn!("Feature flag initialization still pending at shutdown"),
    }

    ctx.shutdown().await;
    Ok(())
}
