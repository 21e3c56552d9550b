//! Integration tests for the HTTP flag source
//!
//! Drives `RemoteFlagSource` through `FlagResolutionService` against a
//! wiremock flag service.

use std::sync::Arc;
use std::time::Duration;

use accountstack_core::{DefaultsReason, FlagInitOutcome, FlagResolutionService};
use accountstack_domain::{FeatureFlag, FlagValues, FlagsConfig};
use accountstack_infra::{HttpClient, RemoteFlagSource};
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn flags_config(server: &MockServer) -> FlagsConfig {
    FlagsConfig {
        api_key: Some("rox-key".into()),
        endpoint: format!("{}/v1/config", server.uri()),
        ..FlagsConfig::default()
    }
}

fn flags_body(values: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "flags": values }))
}

#[tokio::test]
async fn fetched_values_are_resolved_with_kill_switch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/config/accountstack"))
        .and(header("x-api-key", "rox-key"))
        .respond_with(flags_body(json!({
            "accountstack.insightsV2": true,
            "accountstack.killInsights": true,
            "accountstack.alertsBanner": false,
            "accountstack.somethingNew": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = flags_config(&server);
    let source = Arc::new(RemoteFlagSource::from_config(&config).unwrap());
    let service = FlagResolutionService::new(source);

    assert_eq!(service.initialize(&config).await, FlagInitOutcome::Live);

    let raw = service.raw_values();
    assert!(raw.get(FeatureFlag::InsightsV2));
    assert!(raw.get(FeatureFlag::KillInsights));

    let resolved = service.read_resolved_flags();
    assert!(!resolved.insights_v2, "kill switch must suppress insightsV2");
    assert!(resolved.kill_insights);
    assert!(!resolved.alerts_banner);
    assert!(resolved.dashboard_cards_v2, "undelivered flags keep defaults");
}

#[tokio::test]
async fn dev_mode_secret_is_forwarded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("x-dev-mode-secret", "dev-secret"))
        .respond_with(flags_body(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let config = FlagsConfig { dev_mode_secret: Some("dev-secret".into()), ..flags_config(&server) };
    let service = FlagResolutionService::new(Arc::new(RemoteFlagSource::from_config(&config).unwrap()));

    assert!(service.initialize(&config).await.is_live());
}

#[tokio::test]
async fn rejected_credential_falls_back_to_defaults() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let config = flags_config(&server);
    let service = FlagResolutionService::new(Arc::new(RemoteFlagSource::from_config(&config).unwrap()));

    match service.initialize(&config).await {
        FlagInitOutcome::Defaults(DefaultsReason::SetupFailed(message)) => {
            assert!(message.contains("401"), "unexpected message: {message}");
        }
        other => panic!("expected setup failure, got {other:?}"),
    }
    assert_eq!(service.raw_values(), FlagValues::defaults());
}

#[tokio::test]
async fn missing_credential_never_contacts_the_service() {
    let server = MockServer::start().await;
    let config = FlagsConfig { api_key: None, ..flags_config(&server) };
    let service = FlagResolutionService::new(Arc::new(RemoteFlagSource::from_config(&config).unwrap()));

    assert_eq!(
        service.initialize(&config).await,
        FlagInitOutcome::Defaults(DefaultsReason::NoCredential)
    );
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn refresh_picks_up_changes_until_shutdown() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(flags_body(json!({ "accountstack.insightsV2": true })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(flags_body(json!({ "accountstack.killInsights": true })))
        .mount(&server)
        .await;

    let config = flags_config(&server);
    let http = HttpClient::new().unwrap();
    let source = Arc::new(
        RemoteFlagSource::with_http(http, config.endpoint.clone())
            .refresh_every(Duration::from_millis(50)),
    );
    let service = FlagResolutionService::new(source.clone());

    assert!(service.initialize(&config).await.is_live());
    assert!(service.is_insights_v2_enabled());
    assert!(source.is_refreshing());

    tokio::time::sleep(Duration::from_millis(300)).await;
    assert!(service.is_insights_killed());
    assert!(!service.is_insights_v2_enabled());

    service.shutdown().await;
    assert!(!source.is_refreshing());

    let fetches = server.received_requests().await.unwrap().len();
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(server.received_requests().await.unwrap().len(), fetches);
}

#[tokio::test]
async fn refresh_failure_keeps_last_values() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(flags_body(json!({ "accountstack.insightsV2": true })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET")).respond_with(ResponseTemplate::new(503)).mount(&server).await;

    let config = flags_config(&server);
    let source = Arc::new(
        RemoteFlagSource::with_http(HttpClient::new().unwrap(), config.endpoint.clone())
            .refresh_every(Duration::from_millis(50)),
    );
    let service = FlagResolutionService::new(source);

    assert!(service.initialize(&config).await.is_live());
    tokio::time::sleep(Duration::from_millis(200)).await;

    assert!(service.is_insights_v2_enabled());
    service.shutdown().await;
}
