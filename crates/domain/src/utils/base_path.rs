//! Deployment base-path detection
//!
//! The same build is deployed at the site root (local development) and under
//! `/{org}/{env}` prefixes, e.g. `/CB-AccountStack/account-stack-dev`. The
//! prefix is recovered from the current page path at runtime.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::constants::API_PATH_SEGMENT;

#[allow(clippy::expect_used)]
static ORG_ENV_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^/[a-zA-Z0-9_-]+/[a-zA-Z0-9_-]+").expect("valid base path regex"));

/// Detect the deployment base path from a page path.
///
/// Returns the `/{org}/{env}` prefix when the path starts with two segments
/// made of letters, digits, `-` or `_`, and `/` otherwise.
pub fn detect_base_path(page_path: &str) -> String {
    ORG_ENV_PREFIX
        .find(page_path)
        .map_or_else(|| "/".to_string(), |m| m.as_str().to_string())
}

/// API path for a base path: `api` (relative) at the root, `{base}/api`
/// otherwise.
pub fn api_base_path(base_path: &str) -> String {
    if base_path == "/" {
        API_PATH_SEGMENT.to_string()
    } else {
        format!("{base_path}/{API_PATH_SEGMENT}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_org_env_prefix_is_detected() {
        assert_eq!(
            detect_base_path("/CB-AccountStack/account-stack-dev/dashboard"),
            "/CB-AccountStack/account-stack-dev"
        );
        assert_eq!(
            detect_base_path("/CB-AccountStack/account-stack-preprod/"),
            "/CB-AccountStack/account-stack-preprod"
        );
        assert_eq!(detect_base_path("/org_1/env_2"), "/org_1/env_2");
    }

    #[test]
    fn test_root_and_single_segment_paths() {
        assert_eq!(detect_base_path("/"), "/");
        assert_eq!(detect_base_path(""), "/");
        assert_eq!(detect_base_path("/dashboard"), "/");
        assert_eq!(detect_base_path("/dashboard/"), "/");
    }

    #[test]
    fn test_segments_with_other_characters_do_not_match() {
        assert_eq!(detect_base_path("/org.name/env/x"), "/");
        assert_eq!(detect_base_path("//env/x"), "/");
    }

    #[test]
    fn test_api_base_path() {
        assert_eq!(api_base_path("/"), "api");
        assert_eq!(
            api_base_path("/CB-AccountStack/account-stack-dev"),
            "/CB-AccountStack/account-stack-dev/api"
        );
    }
}
