//! Integration tests for the multipart conversion endpoint.

#![cfg(unix)]

mod helpers;

use axum::http::{StatusCode, header};

#[tokio::test]
async fn test_convert_returns_attachment() {
    let app = helpers::TestApp::new();

    let response = app
        .convert(Some("png2jpeg"), Some(("holiday.png", b"not really a png")))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.header(header::CONTENT_TYPE), Some("image/jpeg"));
    assert_eq!(
        response.header(header::CONTENT_DISPOSITION),
        Some("attachment; filename=\"holiday.jpg\"")
    );
    assert_eq!(response.header(header::CONTENT_LENGTH), Some("16"));
    assert_eq!(response.body.as_ref(), b"not really a png");
    assert_eq!(app.leftover_jobs(), 0);
}

#[tokio::test]
async fn test_field_order_does_not_matter() {
    let app = helpers::TestApp::new();

    let body = {
        let mut reversed = Vec::new();
        let file_part = helpers::multipart_body(None, Some(("a.txt", b"abc")));
        let converter_part = helpers::multipart_body(Some("copy2txt"), None);
        // Drop the closing delimiter of the first body so both parts share one stream.
        let closing = b"--convert-studio-test-boundary--\r\n";
        reversed.extend_from_slice(&file_part[..file_part.len() - closing.len()]);
        reversed.extend_from_slice(&converter_part);
        reversed
    };

    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/convert")
        .header(
            header::CONTENT_TYPE,
            "multipart/form-data; boundary=convert-studio-test-boundary",
        )
        .body(axum::body::Body::from(body))
        .expect("request");
    let response = app.send(request).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body.as_ref(), b"abc");
}

#[tokio::test]
async fn test_output_under_tool_chosen_suffix() {
    let app = helpers::TestApp::new();

    let response = app
        .convert(Some("own_suffix"), Some(("scan.jpeg", b"recognised text")))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.header(header::CONTENT_DISPOSITION),
        Some("attachment; filename=\"scan.txt\"")
    );
    assert_eq!(response.body.as_ref(), b"recognised text");
    assert_eq!(app.leftover_jobs(), 0);
}

#[tokio::test]
async fn test_unknown_converter_is_400() {
    let app = helpers::TestApp::new();

    let response = app
        .convert(Some("doesnotexist"), Some(("a.txt", b"abc")))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    let body = response.json();
    assert_eq!(body["error"], "UNKNOWN_CONVERTER");
    assert!(
        body["message"]
            .as_str()
            .expect("message")
            .contains("doesnotexist")
    );
    assert_eq!(body["details"]["available"][0], "copy2txt");
    assert_eq!(app.leftover_jobs(), 0);
}

#[tokio::test]
async fn test_tool_failure_is_500_with_stderr() {
    let app = helpers::TestApp::new();

    let response = app.convert(Some("fail"), Some(("a.txt", b"abc"))).await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    let body = response.json();
    assert_eq!(body["error"], "EXECUTION_FAILED");
    assert!(
        body["message"]
            .as_str()
            .expect("message")
            .contains("unsupported input")
    );
    assert_eq!(app.leftover_jobs(), 0);
}

#[tokio::test]
async fn test_missing_output_is_500() {
    let app = helpers::TestApp::new();

    let response = app.convert(Some("noop"), Some(("a.txt", b"abc"))).await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.json()["error"], "OUTPUT_MISSING");
    assert_eq!(app.leftover_jobs(), 0);
}

#[tokio::test]
async fn test_timeout_is_408() {
    let app = helpers::TestApp::new();

    let start = std::time::Instant::now();
    let response = app.convert(Some("hang"), Some(("a.txt", b"abc"))).await;

    assert_eq!(response.status, StatusCode::REQUEST_TIMEOUT);
    assert_eq!(response.json()["error"], "TIMEOUT");
    assert!(start.elapsed() < std::time::Duration::from_secs(10));
    assert_eq!(app.leftover_jobs(), 0);
}

#[tokio::test]
async fn test_missing_fields_are_400() {
    let app = helpers::TestApp::new();

    let no_file = app.convert(Some("copy2txt"), None).await;
    assert_eq!(no_file.status, StatusCode::BAD_REQUEST);
    assert_eq!(no_file.json()["error"], "VALIDATION_ERROR");

    let no_converter = app.convert(None, Some(("a.txt", b"abc"))).await;
    assert_eq!(no_converter.status, StatusCode::BAD_REQUEST);
    assert_eq!(no_converter.json()["error"], "VALIDATION_ERROR");

    assert_eq!(app.leftover_jobs(), 0);
}

#[tokio::test]
async fn test_hostile_file_name_is_sanitised() {
    let app = helpers::TestApp::new();

    let response = app
        .convert(Some("copy2txt"), Some(("$(touch pwned).txt", b"abc")))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.header(header::CONTENT_DISPOSITION),
        Some("attachment; filename=\"touch_pwned.txt\"")
    );
    assert!(!std::path::Path::new("pwned").exists());
}

#[tokio::test]
async fn test_concurrent_conversions_are_isolated() {
    let app = helpers::TestApp::new();

    let (a, b) = tokio::join!(
        app.convert(Some("copy2txt"), Some(("same.txt", b"first"))),
        app.convert(Some("copy2txt"), Some(("same.txt", b"second"))),
    );

    assert_eq!(a.status, StatusCode::OK);
    assert_eq!(b.status, StatusCode::OK);
    assert_eq!(a.body.as_ref(), b"first");
    assert_eq!(b.body.as_ref(), b"second");
    assert_eq!(app.leftover_jobs(), 0);
}

#[tokio::test]
async fn test_converter_name_must_match_exactly() {
    let app = helpers::TestApp::new();

    let response = app
        .convert(Some(" png2jpeg "), Some(("holiday.png", b"not really a png")))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["error"], "UNKNOWN_CONVERTER");
    assert_eq!(app.leftover_jobs(), 0);
}
