//! Feature flag value types
//!
//! Flags are a fixed, declared set. Raw values live in [`FlagValues`], a small
//! `Copy` mapping that can be snapshotted without allocation; the composed
//! booleans handed to UI consumers live in [`ResolvedFlags`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Every feature flag declared by this version of the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FeatureFlag {
    /// Enhanced dashboard card design.
    #[serde(rename = "dashboardCardsV2")]
    DashboardCardsV2,
    /// New insights panel.
    #[serde(rename = "insightsV2")]
    InsightsV2,
    /// Top-of-page banner for important alerts.
    #[serde(rename = "alertsBanner")]
    AlertsBanner,
    /// Advanced filtering for the transactions list.
    #[serde(rename = "transactionsFilters")]
    TransactionsFilters,
    /// Kill switch for the insights feature.
    #[serde(rename = "killInsights")]
    KillInsights,
}

impl FeatureFlag {
    /// All declared flags, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::DashboardCardsV2,
        Self::InsightsV2,
        Self::AlertsBanner,
        Self::TransactionsFilters,
        Self::KillInsights,
    ];

    /// Name used on the wire and by UI consumers.
    pub const fn name(self) -> &'static str {
        match self {
            Self::DashboardCardsV2 => "dashboardCardsV2",
            Self::InsightsV2 => "insightsV2",
            Self::AlertsBanner => "alertsBanner",
            Self::TransactionsFilters => "transactionsFilters",
            Self::KillInsights => "killInsights",
        }
    }

    /// Value in effect before the remote source has answered.
    pub const fn default_value(self) -> bool {
        match self {
            Self::DashboardCardsV2 | Self::AlertsBanner | Self::TransactionsFilters => true,
            Self::InsightsV2 | Self::KillInsights => false,
        }
    }

    /// Name under which the flag is registered with the remote source,
    /// e.g. `accountstack.insightsV2`.
    pub fn qualified_name(self, namespace: &str) -> String {
        format!("{namespace}.{}", self.name())
    }

    const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for FeatureFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FeatureFlag {
    type Err = String;

    /// Flag names are case-sensitive, matching the remote source.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|flag| flag.name() == s)
            .ok_or_else(|| format!("Unknown feature flag: {s}"))
    }
}

/// Raw enabled-state of every declared flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagValues {
    values: [bool; FeatureFlag::ALL.len()],
}

impl FlagValues {
    /// Declared defaults for every flag.
    pub const fn defaults() -> Self {
        let mut values = [false; FeatureFlag::ALL.len()];
        let mut i = 0;
        while i < FeatureFlag::ALL.len() {
            values[i] = FeatureFlag::ALL[i].default_value();
            i += 1;
        }
        Self { values }
    }

    pub const fn get(&self, flag: FeatureFlag) -> bool {
        self.values[flag.index()]
    }

    pub fn set(&mut self, flag: FeatureFlag, enabled: bool) {
        self.values[flag.index()] = enabled;
    }

    /// Builder-style variant of [`FlagValues::set`].
    #[must_use]
    pub fn with(mut self, flag: FeatureFlag, enabled: bool) -> Self {
        self.set(flag, enabled);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (FeatureFlag, bool)> + '_ {
        FeatureFlag::ALL.into_iter().map(|flag| (flag, self.get(flag)))
    }
}

impl Default for FlagValues {
    fn default() -> Self {
        Self::defaults()
    }
}

/// Final booleans exposed to UI consumers after composition rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedFlags {
    pub dashboard_cards_v2: bool,
    pub insights_v2: bool,
    pub alerts_banner: bool,
    pub transactions_filters: bool,
    pub kill_insights: bool,
}

/// Where the flag source's most recent configuration came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetcherStatus {
    AppliedFromEmbedded,
    AppliedFromCache,
    AppliedFromNetwork,
    ErrorFetchFailed,
}

crate::impl_domain_status_conversions!(FetcherStatus {
    AppliedFromEmbedded => "applied_from_embedded",
    AppliedFromCache => "applied_from_cache",
    AppliedFromNetwork => "applied_from_network",
    ErrorFetchFailed => "error_fetch_failed",
});

/// Report passed to the configuration-fetched handler after every fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetcherResults {
    pub has_changes: bool,
    pub fetcher_status: FetcherStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declared_defaults() {
        let defaults = FlagValues::defaults();
        assert!(defaults.get(FeatureFlag::DashboardCardsV2));
        assert!(!defaults.get(FeatureFlag::InsightsV2));
        assert!(defaults.get(FeatureFlag::AlertsBanner));
        assert!(defaults.get(FeatureFlag::TransactionsFilters));
        assert!(!defaults.get(FeatureFlag::KillInsights));
        assert_eq!(FlagValues::default(), defaults);
    }

    #[test]
    fn test_name_roundtrip_is_case_sensitive() {
        for flag in FeatureFlag::ALL {
            assert_eq!(flag.name().parse::<FeatureFlag>().unwrap(), flag);
        }
        assert!("insightsv2".parse::<FeatureFlag>().is_err());
        assert!("unknownFlag".parse::<FeatureFlag>().is_err());
    }

    #[test]
    fn test_qualified_name() {
        assert_eq!(FeatureFlag::KillInsights.qualified_name("accountstack"), "accountstack.killInsights");
    }

    #[test]
    fn test_set_only_touches_one_flag() {
        let values = FlagValues::defaults().with(FeatureFlag::InsightsV2, true);
        assert!(values.get(FeatureFlag::InsightsV2));
        let changed: Vec<_> = values
            .iter()
            .zip(FlagValues::defaults().iter())
            .filter(|(a, b)| a != b)
            .map(|((flag, _), _)| flag)
            .collect();
        assert_eq!(changed, vec![FeatureFlag::InsightsV2]);
    }

    #[test]
    fn test_fetcher_status_parsing_is_case_insensitive() {
        assert_eq!(
            "APPLIED_FROM_NETWORK".parse::<FetcherStatus>().unwrap(),
            FetcherStatus::AppliedFromNetwork
        );
        assert_eq!("Applied_From_Cache".parse::<FetcherStatus>().unwrap(), FetcherStatus::AppliedFromCache);
        assert_eq!(FetcherStatus::ErrorFetchFailed.to_string(), "error_fetch_failed");
    }

    #[test]
    fn test_fetcher_status_invalid() {
        let result = "somewhere".parse::<FetcherStatus>();
        assert!(result.unwrap_err().contains("Invalid FetcherStatus: somewhere"));
    }

    #[test]
    fn test_resolved_flags_serialize_with_flag_names() {
        let resolved = ResolvedFlags {
            dashboard_cards_v2: true,
            insights_v2: false,
            alerts_banner: true,
            transactions_filters: true,
            kill_insights: false,
        };
        let value = serde_json::to_value(resolved).unwrap();
        assert_eq!(value["dashboardCardsV2"], true);
        assert_eq!(value["killInsights"], false);
    }
}
