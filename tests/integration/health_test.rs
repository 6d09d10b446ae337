//! Integration tests for service metadata and health endpoints.

mod helpers;

use axum::http::StatusCode;

#[tokio::test]
async fn test_health_is_healthy() {
    let app = helpers::TestApp::new();

    let response = app.get("/health").await;

    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body["status"], "healthy");
    let timestamp = body["timestamp"].as_str().expect("timestamp string");
    assert!(timestamp.contains('T'));
}

#[tokio::test]
async fn test_detailed_health_reports_catalog_and_metrics() {
    let app = helpers::TestApp::new();

    let response = app.get("/health/detailed").await;

    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["converter_count"], 6);
    assert_eq!(body["metrics"]["conversions_started"], 0);
    assert!(body["dependencies"]["tools"].as_array().expect("tools").is_empty());
}

#[tokio::test]
async fn test_root_lists_converter_names() {
    let app = helpers::TestApp::new();

    let response = app.get("/").await;

    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["message"], "Convert-Studio API");
    let names: Vec<&str> = body["data"]["available_converters"]
        .as_array()
        .expect("array")
        .iter()
        .filter_map(|v| v.as_str())
        .collect();
    assert_eq!(
        names,
        vec!["copy2txt", "fail", "hang", "noop", "own_suffix", "png2jpeg"]
    );
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let app = helpers::TestApp::new();
    let response = app.get("/nope").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
