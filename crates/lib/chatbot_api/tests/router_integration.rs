//! Integration tests — health endpoint and CORS policy.

mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use tower::ServiceExt;

use common::{CountingStore, ScriptedProvider, app, app_with_config, get, test_config};

#[tokio::test]
async fn health_reports_version_and_store() {
    let app = app(
        Arc::new(CountingStore::default()),
        Arc::new(ScriptedProvider::default()),
    );

    let (status, body) = get(&app, "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["version"], chatbot_core::version());
    assert_eq!(body["store_connected"], true);
}

#[tokio::test]
async fn health_reports_unreachable_store() {
    let store = Arc::new(CountingStore {
        fail_reads: true,
        ..CountingStore::default()
    });
    let app = app(store, Arc::new(ScriptedProvider::default()));

    let (status, body) = get(&app, "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["store_connected"], false);
}

fn preflight(origin: &str) -> Request<Body> {
    Request::builder()
        .method("OPTIONS")
        .uri("/api/chat")
        .header(header::ORIGIN, origin)
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn default_cors_mirrors_any_origin_with_credentials() {
    let app = app(
        Arc::new(CountingStore::default()),
        Arc::new(ScriptedProvider::default()),
    );

    let resp = app.oneshot(preflight("https://anywhere.example")).await.unwrap();
    let headers = resp.headers();
    assert_eq!(
        headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "https://anywhere.example"
    );
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
}

#[tokio::test]
async fn configured_cors_only_allows_listed_origins() {
    let mut config = test_config();
    config.cors_allowed_origins = vec!["https://shop.example".into()];
    let app = app_with_config(
        Arc::new(CountingStore::default()),
        Arc::new(ScriptedProvider::default()),
        config,
    );

    let allowed = app.clone().oneshot(preflight("https://shop.example")).await.unwrap();
    assert_eq!(
        allowed.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "https://shop.example"
    );

    let denied = app.oneshot(preflight("https://evil.example")).await.unwrap();
    assert!(
        denied
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none()
    );
}
