//! End-to-end tests: real transports against a wiremock collection edge.

mod support;

use edge_collect::prelude::*;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use support::RecordingLifecycle;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> NetworkConfig {
    NetworkConfig::builder()
        .collection_url(format!("{}/v1/", server.uri()))
        .property_id("p1")
        .build()
        .unwrap()
}

fn network_for(server: &MockServer, lifecycle: Arc<RecordingLifecycle>) -> Network {
    let network = Network::from_config(config_for(server)).unwrap();
    network.register(lifecycle).unwrap();
    network
}

#[tokio::test]
async fn interact_round_trip_dispatches_fragments() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/p1/interact"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"events": [{"id": "myevent1"}]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "requestId": "r1",
            "handle": [
                {"type": "personalization:decisions", "payload": {"id": "d1"}},
                {"type": "identity:result", "payload": {"id": "i1"}}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let lifecycle = Arc::new(RecordingLifecycle::default());
    let network = network_for(&server, lifecycle.clone());
    assert_eq!(network.selector().general_kind(), TransportKind::Fetch);

    let request = network.new_request(false).unwrap();
    request.payload().add_event(&json!({"id": "myevent1"})).unwrap();
    request.send();
    request.send();

    let summary = request.complete().await.unwrap();
    assert_eq!(summary.request_id.as_deref(), Some("r1"));
    assert_eq!(summary.fragments, 2);

    let types: Vec<String> = lifecycle.fragments().into_iter().map(|(_, t, _)| t).collect();
    assert_eq!(types, vec!["personalization:decisions", "identity:result"]);
}

#[tokio::test]
async fn server_error_surfaces_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/p1/interact"))
        .respond_with(ResponseTemplate::new(500).set_body_string("err"))
        .mount(&server)
        .await;

    let lifecycle = Arc::new(RecordingLifecycle::default());
    let network = network_for(&server, lifecycle.clone());

    let request = network.new_request(false).unwrap();
    request.send();

    let err = request.response().await.unwrap_err();
    assert!(err.is_transport_error());
    assert_eq!(err.status(), Some(500));
    assert_eq!(err.body(), Some("err"));
    assert!(request.complete().await.is_err());
    assert!(lifecycle.fragments().is_empty());
}

#[tokio::test]
async fn no_content_completes_without_fragments() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/p1/interact"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let network = network_for(&server, Arc::default());
    let request = network.new_request(false).unwrap();
    request.send();

    assert_eq!(request.response().await.unwrap().body, "");
    let summary = request.complete().await.unwrap();
    assert!(summary.terminated_by_parse_error);
    assert_eq!(summary.fragments, 0);
}

#[tokio::test]
async fn beacon_is_delivered_to_collect() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/p1/collect"))
        .and(header("content-type", "text/plain; charset=UTF-8"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let lifecycle = Arc::new(RecordingLifecycle::default());
    let network = network_for(&server, lifecycle.clone());
    assert_eq!(network.selector().beacon_kind(), Some(TransportKind::Beacon));

    let request = network.new_request(true).unwrap();
    request.payload().add_event(&json!({"id": "unload"})).unwrap();
    request.send();

    let summary = request.complete().await.unwrap();
    assert_eq!(summary.links, 1);
    assert!(lifecycle.fragments().is_empty());

    let mut received = Vec::new();
    for _ in 0..100 {
        received = server.received_requests().await.unwrap_or_default();
        if !received.is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(received.len(), 1);
    let sent: Value = serde_json::from_slice(&received[0].body).unwrap();
    assert_eq!(sent, json!({"events": [{"id": "unload"}]}));
}
