//! Service metadata handler.

use axum::Json;
use axum::extract::State;

use crate::dto::response::{ApiResponse, ServiceInfo};
use crate::state::AppState;

/// GET /
pub async fn index(State(state): State<AppState>) -> Json<ApiResponse<ServiceInfo>> {
    Json(ApiResponse::ok(ServiceInfo {
        message: "Convert-Studio API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        available_converters: state.registry.names(),
    }))
}
