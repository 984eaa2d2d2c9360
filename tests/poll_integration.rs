//! Integration tests for the poll client against a mock HTTP backend.

mod common;

use common::{overview_response, service_body, services_response, wait_for};
use fleetwatch::api::ApiClient;
use fleetwatch::poll::{refresh_channel, PollConfig, Poller};
use fleetwatch::store::{ServiceHealth, SnapshotStore};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn setup(uri: &str) -> (Arc<SnapshotStore>, Poller) {
    let store = Arc::new(SnapshotStore::new());
    let api = Arc::new(ApiClient::new(uri, Duration::from_secs(5)));
    let poller = Poller::new(Arc::clone(&store), api, PollConfig::default());
    (store, poller)
}

#[tokio::test]
async fn test_refresh_services_populates_store() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/services"))
        .respond_with(ResponseTemplate::new(200).set_body_json(services_response(vec![
            service_body("ocr", "healthy"),
            service_body("asr", "unhealthy"),
        ])))
        .mount(&mock_server)
        .await;

    let (store, poller) = setup(&mock_server.uri());

    assert!(poller.refresh_services().await);
    assert_eq!(store.service_count(), 2);
    assert_eq!(
        store.service("ocr").unwrap().status,
        ServiceHealth::Healthy
    );
    assert!(store.last_update().is_some());
}

#[tokio::test]
async fn test_refresh_services_replaces_wholesale() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/services"))
        .respond_with(ResponseTemplate::new(200).set_body_json(services_response(vec![
            service_body("ocr", "healthy"),
            service_body("asr", "healthy"),
        ])))
        .mount(&mock_server)
        .await;

    let (store, poller) = setup(&mock_server.uri());
    assert!(poller.refresh_services().await);

    // The next poll no longer reports "asr"; it must be dropped.
    mock_server.reset().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/services"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(services_response(vec![service_body("ocr", "unhealthy")])),
        )
        .mount(&mock_server)
        .await;

    assert!(poller.refresh_services().await);
    assert_eq!(store.service_count(), 1);
    assert!(store.service("asr").is_none());
    assert_eq!(
        store.service("ocr").unwrap().status,
        ServiceHealth::Unhealthy
    );
}

#[tokio::test]
async fn test_poll_http_error_retains_previous_state() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/services"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(services_response(vec![service_body("ocr", "healthy")])),
        )
        .mount(&mock_server)
        .await;

    let (store, poller) = setup(&mock_server.uri());
    assert!(poller.refresh_services().await);
    let populated_at = store.last_update();

    mock_server.reset().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/services"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    assert!(!poller.refresh_services().await);
    assert_eq!(store.service_count(), 1);
    assert_eq!(
        store.service("ocr").unwrap().status,
        ServiceHealth::Healthy
    );
    assert_eq!(store.last_update(), populated_at);
}

#[tokio::test]
async fn test_poll_decode_error_retains_previous_state() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/services"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(services_response(vec![service_body("ocr", "healthy")])),
        )
        .mount(&mock_server)
        .await;

    let (store, poller) = setup(&mock_server.uri());
    assert!(poller.refresh_services().await);

    mock_server.reset().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/services"))
        .respond_with(ResponseTemplate::new(200).set_body_string("surprise, not json"))
        .mount(&mock_server)
        .await;

    assert!(!poller.refresh_services().await);
    assert_eq!(store.service_count(), 1);
}

#[tokio::test]
async fn test_refresh_overview_sets_rollup() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/system/overview"))
        .respond_with(ResponseTemplate::new(200).set_body_json(overview_response(2, 1)))
        .mount(&mock_server)
        .await;

    let (store, poller) = setup(&mock_server.uri());
    assert!(poller.refresh_overview().await);

    let overview = store.snapshot().overview.unwrap();
    assert_eq!(overview.services_count, 3);
    assert_eq!(overview.healthy_services, 2);
    assert_eq!(overview.worker_managers.len(), 1);
}

#[tokio::test]
async fn test_started_poller_fetches_both_collections() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/services"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(services_response(vec![service_body("ocr", "healthy")])),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/system/overview"))
        .respond_with(ResponseTemplate::new(200).set_body_json(overview_response(1, 0)))
        .mount(&mock_server)
        .await;

    let (store, poller) = setup(&mock_server.uri());
    let (_refresh, refresh_rx) = refresh_channel();
    let cancel_token = CancellationToken::new();
    let handle = poller.start(refresh_rx, cancel_token.clone());

    let ready = {
        let store = Arc::clone(&store);
        wait_for(Duration::from_secs(5), move || {
            store.service_count() == 1 && store.snapshot().overview.is_some()
        })
        .await
    };
    assert!(ready, "poller never populated the store");

    cancel_token.cancel();
    handle.await.unwrap();
}

#[tokio::test]
async fn test_refresh_request_triggers_service_fetch() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/services"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(services_response(vec![service_body("ocr", "healthy")])),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/system/overview"))
        .respond_with(ResponseTemplate::new(200).set_body_json(overview_response(1, 0)))
        .mount(&mock_server)
        .await;

    let store = Arc::new(SnapshotStore::new());
    let api = Arc::new(ApiClient::new(&mock_server.uri(), Duration::from_secs(5)));
    // Interval long enough that only the refresh request can explain a
    // second service fetch.
    let poller = Poller::new(
        Arc::clone(&store),
        api,
        PollConfig {
            enabled: true,
            overview_interval_seconds: 3600,
        },
    );

    let (refresh, refresh_rx) = refresh_channel();
    let cancel_token = CancellationToken::new();
    let handle = poller.start(refresh_rx, cancel_token.clone());

    let ready = {
        let store = Arc::clone(&store);
        wait_for(Duration::from_secs(5), move || store.service_count() == 1).await
    };
    assert!(ready);

    mock_server.reset().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/services"))
        .respond_with(ResponseTemplate::new(200).set_body_json(services_response(vec![
            service_body("ocr", "healthy"),
            service_body("asr", "healthy"),
        ])))
        .mount(&mock_server)
        .await;

    refresh.request();

    let refreshed = {
        let store = Arc::clone(&store);
        wait_for(Duration::from_secs(5), move || store.service_count() == 2).await
    };
    assert!(refreshed, "refresh request never caused a re-fetch");

    cancel_token.cancel();
    handle.await.unwrap();
}

#[tokio::test]
async fn test_poller_stops_on_cancellation() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(services_response(vec![])))
        .mount(&mock_server)
        .await;

    let (_store, poller) = setup(&mock_server.uri());
    let (_refresh, refresh_rx) = refresh_channel();
    let cancel_token = CancellationToken::new();
    let handle = poller.start(refresh_rx, cancel_token.clone());

    cancel_token.cancel();
    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("poller did not stop after cancellation")
        .unwrap();
}
