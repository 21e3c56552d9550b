//! Feature flag reads for the UI

use std::time::Instant;

use accountstack_core::resolve_flag;
use accountstack_domain::{FeatureFlag, FlagValues, ResolvedFlags};
use serde_json::json;

use crate::utils::logging::{log_command_execution, log_feature_flag_check};
use crate::AppContext;

/// Current resolved flags. Never blocks on the flag source.
pub fn resolved_flags(ctx: &AppContext) -> ResolvedFlags {
    ctx.flags.read_resolved_flags()
}

/// Resolved value of the flag named `flag` (e.g. `"insightsV2"`).
pub fn is_feature_enabled(ctx: &AppContext, flag: &str) -> Result<bool, String> {
    let start = Instant::now();

    let result = flag
        .parse::<FeatureFlag>()
        .map(|parsed| ctx.flags.is_enabled(parsed))
        .map_err(|e| format!("Failed to check feature flag: {e}"));

    log_command_execution("feature_flags::is_feature_enabled", start.elapsed(), result.is_ok());
    if let Ok(is_enabled) = &result {
        log_feature_flag_check(flag, *is_enabled);
    }

    result
}

/// Every declared flag with its resolved, raw and default values.
///
/// All entries come from one snapshot, so `enabled` always agrees with `raw`.
pub fn list_feature_flags(ctx: &AppContext) -> Vec<serde_json::Value> {
    flag_listing(&ctx.flags.raw_values())
}

fn flag_listing(raw: &FlagValues) -> Vec<serde_json::Value> {
    FeatureFlag::ALL
        .into_iter()
        .map(|flag| {
            json!({
                "flag_name": flag.name(),
                "enabled": resolve_flag(raw, flag),
                "raw": raw.get(flag),
                "default": flag.default_value(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_applies_kill_switch_to_the_same_snapshot() {
        let raw = FlagValues::defaults()
            .with(FeatureFlag::InsightsV2, true)
            .with(FeatureFlag::KillInsights, true);

        let listed = flag_listing(&raw);
        let insights = listed
            .iter()
            .find(|entry| entry["flag_name"] == "insightsV2")
            .expect("insightsV2 listed");

        assert_eq!(insights["raw"], true);
        assert_eq!(insights["enabled"], false);
        assert_eq!(insights["default"], false);
        assert_eq!(listed.len(), FeatureFlag::ALL.len());
    }
}
