//! Route definitions for the Convert-Studio HTTP API.
//!
//! The router receives `AppState` and passes it to all handlers via Axum's
//! `State` extractor.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::middleware::cors::build_cors_layer;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let max_upload = usize::try_from(state.config.server.max_upload_bytes).unwrap_or(usize::MAX);
    let cors = build_cors_layer(&state.config.server.cors);

    Router::new()
        .route("/", get(handlers::root::index))
        .merge(converter_routes())
        .merge(health_routes())
        .layer(DefaultBodyLimit::max(max_upload))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Catalog and conversion endpoints
fn converter_routes() -> Router<AppState> {
    Router::new()
        .route("/converters", get(handlers::converters::list_converters))
        .route("/converters/{name}", get(handlers::converters::get_converter))
        .route("/convert", post(handlers::convert::convert_file))
}

/// Health endpoints
fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/health/detailed", get(handlers::health::health_detailed))
}
