//! Integration tests for the application context
//!
//! Wires the context with a local flag source and in-memory tokens against a
//! wiremock API server.

use std::sync::Arc;

use accountstack_app::{
    is_feature_enabled, list_feature_flags, load_dashboard, resolved_flags, AppContext,
};
use accountstack_core::{DefaultsReason, FlagInitOutcome};
use accountstack_domain::{Config, FeatureFlag};
use accountstack_infra::{InMemoryTokenStore, LocalFlagSource};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn api_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/accounts/me"))
        .and(header("authorization", "Bearer session-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "id": "u1", "firstName": "Ada", "lastName": "Lovelace" }
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/accounts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "id": "a1", "name": "Checking" }, { "id": "a2", "name": "Savings" }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/insights"))
        .and(query_param("dismissed", "false"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "id": "i1", "title": "Dining spend up 20%" }]
        })))
        .mount(&server)
        .await;
    server
}

fn context(server: &MockServer, source: LocalFlagSource, api_key: Option<&str>) -> AppContext {
    let mut config = Config::default();
    config.api.base_url = Some(format!("{}/api", server.uri()));
    config.flags.api_key = api_key.map(str::to_string);

    let tokens = Arc::new(InMemoryTokenStore::new());
    tokens.insert("authToken", "session-token");

    AppContext::with_parts(config, Arc::new(source), tokens).expect("context")
}

#[tokio::test]
async fn dashboard_skips_insights_while_flag_is_off() {
    let server = api_server().await;
    let ctx = context(&server, LocalFlagSource::new(), None);

    let outcome = ctx.start_feature_flags().await.unwrap();
    assert_eq!(outcome, FlagInitOutcome::Defaults(DefaultsReason::NoCredential));

    let dashboard = load_dashboard(&ctx).await.expect("dashboard");
    assert_eq!(dashboard.user.display_name(), "Ada Lovelace");
    assert_eq!(dashboard.accounts.len(), 2);
    assert!(dashboard.insights.is_none());
    assert!(!dashboard.flags.insights_v2);
}

#[tokio::test]
async fn dashboard_includes_insights_when_enabled() {
    let server = api_server().await;
    let source = LocalFlagSource::with_overrides([(FeatureFlag::InsightsV2, true)]);
    let ctx = context(&server, source, Some("local-key"));

    assert!(ctx.start_feature_flags().await.unwrap().is_live());

    let dashboard = load_dashboard(&ctx).await.expect("dashboard");
    let insights = dashboard.insights.expect("insights loaded");
    assert_eq!(insights.len(), 1);
    assert_eq!(insights[0].id, "i1");
}

#[tokio::test]
async fn kill_switch_hides_insights() {
    let server = api_server().await;
    let source = LocalFlagSource::with_overrides([
        (FeatureFlag::InsightsV2, true),
        (FeatureFlag::KillInsights, true),
    ]);
    let ctx = context(&server, source, Some("local-key"));
    ctx.start_feature_flags().await.unwrap();

    assert!(!resolved_flags(&ctx).insights_v2);
    assert_eq!(is_feature_enabled(&ctx, "insightsV2"), Ok(false));
    assert_eq!(is_feature_enabled(&ctx, "killInsights"), Ok(true));
    assert!(load_dashboard(&ctx).await.unwrap().insights.is_none());

    let listed = list_feature_flags(&ctx);
    let insights = listed.iter().find(|f| f["flag_name"] == "insightsV2").unwrap();
    assert_eq!(insights["raw"], true);
    assert_eq!(insights["enabled"], false);

    ctx.shutdown().await;
}

#[tokio::test]
async fn unknown_flag_name_is_rejected() {
    let server = api_server().await;
    let ctx = context(&server, LocalFlagSource::new(), None);

    let err = is_feature_enabled(&ctx, "darkMode").unwrap_err();
    assert!(err.contains("Unknown feature flag: darkMode"));
}

#[tokio::test]
async fn flags_read_defaults_before_initialization() {
    let server = api_server().await;
    let ctx = context(&server, LocalFlagSource::with_overrides([(FeatureFlag::AlertsBanner, false)]), Some("k"));

    assert!(resolved_flags(&ctx).alerts_banner);
    ctx.start_feature_flags().await.unwrap();
    assert!(!resolved_flags(&ctx).alerts_banner);
}
