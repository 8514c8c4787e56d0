//! Integration tests for the gateway.

use std::sync::{Arc, OnceLock};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use ditto_headers::HeadersConfig;
use gateway::AppState;
use gateway::config::Config;
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::{Value, json};
use tower::ServiceExt;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

fn get_metrics_handle() -> PrometheusHandle {
    METRICS_HANDLE
        .get_or_init(|| {
            let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
            builder
                .install_recorder()
                .expect("failed to install Prometheus recorder")
        })
        .clone()
}

fn setup_with_config(config: Config) -> axum::Router {
    gateway::create_app(Arc::new(AppState::new(config)), get_metrics_handle())
}

fn setup() -> axum::Router {
    setup_with_config(Config::default())
}

async fn body_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let app = setup();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "ok");
}

#[tokio::test]
async fn test_translate_headers() {
    let app = setup();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/headers")
                .header("correlation-id", "it-1")
                .header("response-required", "false")
                .header("requested-acks", "twin-persisted")
                .header("ditto-sudo", "true")
                .header("x-tenant", "acme")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["correlation-id"], "it-1");
    assert_eq!(response.headers()["x-tenant"], "acme");
    assert!(response.headers().get("ditto-sudo").is_none());

    let json = body_json(response).await;
    assert_eq!(json["correlation-id"], "it-1");
    assert_eq!(json["response-required"], false);
    assert_eq!(json["requested-acks"], json!(["twin-persisted"]));
    assert!(json.get("ditto-sudo").is_none());
}

#[tokio::test]
async fn test_credentials_are_not_echoed() {
    let app = setup();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/headers")
                .header("authorization", "Bearer s3cret")
                .header("cookie", "session=abc")
                .header("user-agent", "curl/8.0")
                .header("correlation-id", "it-2")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["correlation-id"], "it-2");
    assert!(response.headers().get("authorization").is_none());
    assert!(response.headers().get("cookie").is_none());
    assert!(response.headers().get("user-agent").is_none());
}

#[tokio::test]
async fn test_repeated_headers_are_joined() {
    let app = setup();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/headers")
                .header("requested-acks", "twin-persisted")
                .header("requested-acks", "live-response")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(
        json["requested-acks"],
        json!(["twin-persisted", "live-response"])
    );
}

#[tokio::test]
async fn test_message_headers_keep_their_json_type() {
    let app = setup();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/headers")
                .header("status-code", "204")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status-code"], 204);
}

#[tokio::test]
async fn test_missing_correlation_id_is_generated() {
    let app = setup();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/headers")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["correlation-id"].as_str().unwrap().len(), 36);
}

#[tokio::test]
async fn test_invalid_header_is_rejected() {
    let app = setup();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/headers")
                .header("response-required", "maybe")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["status"], 400);
    assert_eq!(json["error"], "header.invalid");
    assert_eq!(
        json["message"],
        "The value 'maybe' of the header 'response-required' is not a valid boolean."
    );
}

#[tokio::test]
async fn test_timeout_above_maximum_is_rejected() {
    let app = setup();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/headers")
                .header("timeout", "2m")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "timeout.invalid");
}

#[tokio::test]
async fn test_oversized_headers_are_rejected() {
    let app = setup_with_config(Config {
        headers: HeadersConfig {
            max_bytes: 64,
            max_auth_subjects: 100,
        },
        ..Config::default()
    });

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/headers")
                .header("x-large", "x".repeat(100))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response.status(),
        StatusCode::REQUEST_HEADER_FIELDS_TOO_LARGE
    );
    let json = body_json(response).await;
    assert_eq!(json["error"], "headers.too.large");
}

#[tokio::test]
async fn test_publish_thing_event() {
    let app = setup();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/things/org.example:lamp-1/events")
                .header("content-type", "application/json")
                .header("correlation-id", "event-1")
                .body(Body::from(
                    serde_json::to_string(&json!({
                        "type": "things.events:attributeModified",
                        "revision": 5,
                        "attribute": "/on",
                        "value": true
                    }))
                    .unwrap(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["etag"], "\"rev:5\"");
    assert_eq!(response.headers()["correlation-id"], "event-1");

    let json = body_json(response).await;
    assert_eq!(
        json,
        json!({
            "type": "things.events:attributeModified",
            "thingId": "org.example:lamp-1",
            "revision": 5,
            "attribute": "/on",
            "value": true
        })
    );
}

#[tokio::test]
async fn test_publish_rejects_mismatching_thing_id() {
    let app = setup();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/things/org.example:lamp-1/events")
                .header("content-type", "application/json")
                .body(Body::from(
                    serde_json::to_string(&json!({
                        "type": "things.events:thingDeleted",
                        "thingId": "org.example:lamp-2",
                        "revision": 2
                    }))
                    .unwrap(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "things.id.mismatch");
}

#[tokio::test]
async fn test_publish_rejects_non_string_thing_id() {
    let app = setup();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/things/org.example:lamp-1/events")
                .header("content-type", "application/json")
                .body(Body::from(
                    serde_json::to_string(&json!({
                        "type": "things.events:thingDeleted",
                        "thingId": 42,
                        "revision": 2
                    }))
                    .unwrap(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "things.id.mismatch");
    assert_eq!(
        json["message"],
        "The thing ID <42> of the event does not match <org.example:lamp-1> of the path."
    );
}

#[tokio::test]
async fn test_publish_rejects_unknown_event_type() {
    let app = setup();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/things/org.example:lamp-1/events")
                .header("content-type", "application/json")
                .body(Body::from(
                    serde_json::to_string(&json!({
                        "type": "policies.events:policyDeleted",
                        "revision": 2
                    }))
                    .unwrap(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "events.type.unknown");
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let app = setup();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()["content-type"].to_str().unwrap();
    assert!(content_type.starts_with("text/plain"));
}
