//! Startup dashboard load

use std::time::Instant;

use accountstack_domain::{Account, Insight, InsightFilters, ResolvedFlags, User};
use accountstack_infra::ApiError;
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::utils::logging::{api_error_label, log_command_execution};
use crate::AppContext;

/// Data rendered on the dashboard.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub user: User,
    pub accounts: Vec<Account>,
    /// Undismissed insights; `None` while the insights panel is disabled.
    pub insights: Option<Vec<Insight>>,
    pub flags: ResolvedFlags,
}

/// Fetch the signed-in user, their accounts and, when the insights panel is
/// enabled, their open insights.
#[instrument(skip(ctx))]
pub async fn load_dashboard(ctx: &AppContext) -> Result<DashboardSnapshot, ApiError> {
    let start = Instant::now();
    let result = fetch_dashboard(ctx).await;

    log_command_execution("dashboard::load_dashboard", start.elapsed(), result.is_ok());
    if let Err(err) = &result {
        warn!(error_type = api_error_label(err), "Dashboard load failed");
    }

    result
}

async fn fetch_dashboard(ctx: &AppContext) -> Result<DashboardSnapshot, ApiError> {
    let flags = ctx.flags.read_resolved_flags();

    let user = ctx.api.get_current_user().await?;
    let accounts = ctx.api.list_accounts().await?;

    let insights = if flags.insights_v2 {
        let filters = InsightFilters { dismissed: Some(false), ..InsightFilters::default() };
        Some(ctx.api.list_insights(Some(&filters)).await?)
    } else {
        None
    };

    info!(
        user = %user.display_name(),
        accounts = accounts.len(),
        insights = insights.as_ref().map(Vec::len),
        "Dashboard loaded"
    );

    Ok(DashboardSnapshot { user, accounts, insights, flags })
}
