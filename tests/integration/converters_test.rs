//! Integration tests for the converter catalog endpoints.

mod helpers;

use axum::http::StatusCode;

#[tokio::test]
async fn test_list_converters() {
    let app = helpers::TestApp::new();

    let response = app.get("/converters").await;

    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    let converters = body["data"]["converters"].as_object().expect("object");
    assert_eq!(converters.len(), 6);

    let png2jpeg = &converters["png2jpeg"];
    assert_eq!(png2jpeg["output_format"], "jpg");
    assert_eq!(png2jpeg["requirements"][0], "imagemagick");
    assert_eq!(png2jpeg["input_types"][0], "image/png");
}

#[tokio::test]
async fn test_filter_by_input_type() {
    let app = helpers::TestApp::new();

    let response = app.get("/converters?input_type=image/png").await;

    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    let converters = body["data"]["converters"].as_object().expect("object");
    let names: Vec<&String> = converters.keys().collect();
    assert_eq!(names, vec!["png2jpeg"]);
}

#[tokio::test]
async fn test_filter_with_wildcard_entry() {
    let app = helpers::TestApp::new();

    let response = app.get("/converters?input_type=text/csv").await;

    let body = response.json();
    let converters = body["data"]["converters"].as_object().expect("object");
    assert!(converters.contains_key("copy2txt"));
    assert_eq!(converters.len(), 1);
}

#[tokio::test]
async fn test_get_single_converter() {
    let app = helpers::TestApp::new();

    let response = app.get("/converters/png2jpeg").await;

    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body["data"]["label"], "PNG → JPEG");
    assert_eq!(body["data"]["output_format"], "jpg");
}

#[tokio::test]
async fn test_get_unknown_converter_is_404() {
    let app = helpers::TestApp::new();

    let response = app.get("/converters/PNG2JPEG").await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.json()["error"], "NOT_FOUND");
}
