use axum::{
    body::Body,
    http::{header, HeaderMap, Request, StatusCode},
};
use pretty_assertions::assert_eq;
use siteconf_core::{parse_js, parse_json, GlobalName};
use siteconf_server::{create_app, AppState};
use siteconf_types::ConfigRecord;
use tower::ServiceExt;

/// Helper to make a request to the app.
async fn request(app: axum::Router, method: &str, uri: &str) -> (StatusCode, HeaderMap, String) {
    let response = app
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .header(header::ORIGIN, "https://site.example.com")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, headers, String::from_utf8(bytes.to_vec()).unwrap())
}

fn app_with(global_name: &str) -> axum::Router {
    let state = AppState::new(
        &ConfigRecord::default(),
        &GlobalName::parse(global_name).unwrap(),
    )
    .unwrap();
    create_app(state)
}

#[tokio::test]
async fn health_check() {
    let (status, _, body) = request(app_with("LOCAL_CONFIG"), "GET", "/health").await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    assert!(json["uptime_secs"].is_u64());
}

#[tokio::test]
async fn config_js_is_public_and_parses_back() {
    let (status, headers, body) = request(app_with("LOCAL_CONFIG"), "GET", "/config.js").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        headers[header::CONTENT_TYPE],
        "application/javascript; charset=utf-8"
    );
    assert_eq!(headers[header::CACHE_CONTROL], "public, max-age=300");
    assert_eq!(headers[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    assert!(headers
        .get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS)
        .is_none());

    let parsed = parse_js(&body).unwrap();
    assert_eq!(parsed.global_name.as_str(), "LOCAL_CONFIG");
    assert_eq!(parsed.record, ConfigRecord::default());
}

#[tokio::test]
async fn config_js_uses_configured_global_name() {
    let (_, _, body) = request(app_with("SITE_CONFIG"), "GET", "/config.js").await;
    assert!(body.contains("window.SITE_CONFIG = Object.freeze({"));
}

#[tokio::test]
async fn config_json_matches_record() {
    let (status, headers, body) = request(app_with("LOCAL_CONFIG"), "GET", "/config.json").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CONTENT_TYPE], "application/json");
    assert_eq!(headers[header::CACHE_CONTROL], "public, max-age=300");
    assert_eq!(parse_json(&body).unwrap(), ConfigRecord::default());
}

#[tokio::test]
async fn unknown_path_is_json_404() {
    let (status, _, body) = request(app_with("LOCAL_CONFIG"), "GET", "/.env").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["error"], "Not found");
    assert_eq!(json["details"], "Path: /.env");
}

#[tokio::test]
async fn writes_are_rejected() {
    let (status, _, _) = request(app_with("LOCAL_CONFIG"), "POST", "/config.json").await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn preflight_allows_get_only_reads() {
    let response = app_with("LOCAL_CONFIG")
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/config.js")
                .header(header::ORIGIN, "https://site.example.com")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let methods = response.headers()[header::ACCESS_CONTROL_ALLOW_METHODS]
        .to_str()
        .unwrap();
    assert!(methods.contains("GET"));
    assert!(!methods.contains("POST"));
}
