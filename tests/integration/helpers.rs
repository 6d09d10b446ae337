//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use axum::Router;
use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, Request, StatusCode, header};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use convert_api::{AppState, build_router};
use convert_core::config::AppConfig;
use convert_core::types::ConverterDescriptor;
use convert_engine::{ConverterRegistry, DependencyReport};

const BOUNDARY: &str = "convert-studio-test-boundary";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Root under which conversion job directories are created
    pub temp_root: TempDir,
}

/// A captured response.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    /// Body parsed as JSON.
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("response body is JSON")
    }

    /// Header value as a string.
    pub fn header(&self, name: header::HeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// Converters backed by coreutils so tests need no real conversion tools.
pub fn test_registry() -> ConverterRegistry {
    ConverterRegistry::from_descriptors([
        ConverterDescriptor::new("copy2txt", "Copy to text", "cp", &["{input}", "{output}"], "txt")
            .accepts(&["text/plain", "text/*"]),
        ConverterDescriptor::new(
            "png2jpeg",
            "PNG → JPEG",
            "cp",
            &["{input}", "{output}"],
            "jpg",
        )
        .accepts(&["image/png"])
        .requires(&["imagemagick"]),
        ConverterDescriptor::new(
            "own_suffix",
            "Tool picks suffix",
            "cp",
            &["{input}", "{output_base}.alt"],
            "txt",
        ),
        ConverterDescriptor::new(
            "fail",
            "Always fails",
            "sh",
            &["-c", "echo unsupported input >&2; exit 1"],
            "txt",
        ),
        ConverterDescriptor::new("noop", "Writes nothing", "true", &[], "txt"),
        ConverterDescriptor::new("hang", "Never finishes", "sleep", &["30"], "txt"),
    ])
    .expect("valid test registry")
}

impl TestApp {
    /// Create a new test application
    pub fn new() -> Self {
        let temp_root = tempfile::tempdir().expect("temp root");

        let mut config = AppConfig::default();
        config.converters.temp_root = Some(temp_root.path().to_path_buf());
        config.converters.timeout_seconds = 1;
        config.converters.probe_on_startup = false;

        let state = AppState::new(config, Arc::new(test_registry()), DependencyReport::default());

        Self {
            router: build_router(state),
            temp_root,
        }
    }

    /// Number of entries left under the temp root.
    pub fn leftover_jobs(&self) -> usize {
        count_entries(self.temp_root.path())
    }

    /// Send a request through the router.
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");

        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// Issue a GET request.
    pub async fn get(&self, uri: &str) -> TestResponse {
        let request = Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .expect("request");
        self.send(request).await
    }

    /// POST a multipart conversion request.
    pub async fn convert(
        &self,
        converter: Option<&str>,
        file: Option<(&str, &[u8])>,
    ) -> TestResponse {
        let body = multipart_body(converter, file);
        let request = Request::builder()
            .method("POST")
            .uri("/convert")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .expect("request");
        self.send(request).await
    }
}

/// Encode a `multipart/form-data` body with optional `converter` and `file` fields.
pub fn multipart_body(converter: Option<&str>, file: Option<(&str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();

    if let Some(converter) = converter {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"converter\"\r\n\r\n{converter}\r\n"
            )
            .as_bytes(),
        );
    }

    if let Some((file_name, data)) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn count_entries(dir: &Path) -> usize {
    std::fs::read_dir(dir).map(|d| d.count()).unwrap_or(0)
}
