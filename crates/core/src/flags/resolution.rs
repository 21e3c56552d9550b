//! Kill-switch composition
//!
//! A flag `F` paired with a kill switch `K` resolves to `raw(F) && !raw(K)`.
//! Unpaired flags resolve to their raw value. Nothing here is cached.

use accountstack_domain::{FeatureFlag, FlagValues, ResolvedFlags};

/// `(flag, kill switch)` pairs.
pub const KILL_SWITCHES: [(FeatureFlag, FeatureFlag); 1] =
    [(FeatureFlag::InsightsV2, FeatureFlag::KillInsights)];

/// Kill switch paired with `flag`, if any.
pub fn kill_switch_for(flag: FeatureFlag) -> Option<FeatureFlag> {
    KILL_SWITCHES.iter().find(|(guarded, _)| *guarded == flag).map(|(_, kill)| *kill)
}

/// Resolved value of a single flag.
pub fn resolve_flag(raw: &FlagValues, flag: FeatureFlag) -> bool {
    raw.get(flag) && !kill_switch_for(flag).is_some_and(|kill| raw.get(kill))
}

/// Resolve every declared flag from a raw snapshot.
pub fn resolve(raw: &FlagValues) -> ResolvedFlags {
    ResolvedFlags {
        dashboard_cards_v2: resolve_flag(raw, FeatureFlag::DashboardCardsV2),
        insights_v2: resolve_flag(raw, FeatureFlag::InsightsV2),
        alerts_banner: resolve_flag(raw, FeatureFlag::AlertsBanner),
        transactions_filters: resolve_flag(raw, FeatureFlag::TransactionsFilters),
        kill_insights: resolve_flag(raw, FeatureFlag::KillInsights),
    }
}
