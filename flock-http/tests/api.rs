use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use std::sync::Arc;
use tower::ServiceExt;

use flock::{ClusterService, ClusterTiming, HttpPeerClient};

fn test_service() -> Arc<ClusterService> {
    let timing = ClusterTiming::default();
    let client = Arc::new(HttpPeerClient::new(timing.request_timeout));
    Arc::new(ClusterService::new("localhost:8010", client, timing))
}

fn json_request(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn join_registers_caller_and_returns_peer_list() {
    let app = flock_http::router(test_service());

    let response = app
        .oneshot(json_request(
            "/nodes/join",
            serde_json::json!({"node_id": "localhost:8011"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["peers"], serde_json::json!(["localhost:8011"]));
}

#[tokio::test]
async fn heartbeat_registers_and_acks() {
    let service = test_service();
    let app = flock_http::router(Arc::clone(&service));

    let response = app
        .oneshot(json_request(
            "/nodes/heartbeat",
            serde_json::json!({"node_id": "localhost:8011"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(service.peers(), vec!["localhost:8011"]);
}

#[tokio::test]
async fn list_peers_reflects_registry() {
    let service = test_service();
    service.add_peer("localhost:8011");
    let app = flock_http::router(service);

    let response = app.oneshot(get_request("/nodes")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["peers"], serde_json::json!(["localhost:8011"]));
}

#[tokio::test]
async fn replicate_applies_once_then_acks_duplicates() {
    let service = test_service();
    let app = flock_http::router(Arc::clone(&service));

    let event = serde_json::json!({"node_id": "localhost:8011", "event_id": "evt-1"});

    let first = app
        .clone()
        .oneshot(json_request("/counter/replicate", event.clone()))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(body_json(first).await["status"], "applied");

    let second = app
        .oneshot(json_request("/counter/replicate", event))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::OK);
    assert_eq!(body_json(second).await["status"], "duplicate");

    assert_eq!(service.counter_value(), 1);
}

#[tokio::test]
async fn increment_mints_an_event_and_counts_it() {
    let service = test_service();
    let app = flock_http::router(Arc::clone(&service));

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/counter/increment")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "accepted");
    assert!(!body["event_id"].as_str().unwrap().is_empty());

    let count = app.oneshot(get_request("/counter/count")).await.unwrap();
    assert_eq!(body_json(count).await["count"], 1);
}

#[tokio::test]
async fn malformed_join_body_is_a_client_error() {
    let app = flock_http::router(test_service());

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/nodes/join")
                .header("content-type", "application/json")
                .body(Body::from("not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn health_reports_node_state() {
    let service = test_service();
    service.add_peer("localhost:8011");
    let app = flock_http::router(service);

    let response = app.oneshot(get_request("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["node_id"], "localhost:8010");
    assert_eq!(body["peer_count"], 1);
    assert_eq!(body["count"], 0);
}
