//! Commands consumed by the UI layer

pub mod dashboard;
pub mod feature_flags;

pub use dashboard::{load_dashboard, DashboardSnapshot};
pub use feature_flags::{is_feature_enabled, list_feature_flags, resolved_flags};
