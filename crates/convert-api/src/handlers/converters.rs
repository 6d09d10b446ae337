//! Converter catalog handlers.

use axum::Json;
use axum::extract::{Path, Query, State};

use convert_core::error::AppError;

use crate::dto::request::ConverterQuery;
use crate::dto::response::{ApiResponse, ConverterEntry, ConverterList};
use crate::error::ApiError;
use crate::state::AppState;

/// GET /converters?input_type=...
pub async fn list_converters(
    State(state): State<AppState>,
    Query(query): Query<ConverterQuery>,
) -> Json<ApiResponse<ConverterList>> {
    let converters = match query.input_type.as_deref() {
        Some(mime) => state
            .registry
            .for_input_type(mime)
            .into_iter()
            .map(|d| (d.name.clone(), ConverterEntry::from(d)))
            .collect(),
        None => state
            .registry
            .list()
            .map(|d| (d.name.clone(), ConverterEntry::from(d)))
            .collect(),
    };

    Json(ApiResponse::ok(ConverterList { converters }))
}

/// GET /converters/{name}
pub async fn get_converter(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<ApiResponse<ConverterEntry>>, ApiError> {
    let descriptor = state
        .registry
        .get(&name)
        .ok_or_else(|| AppError::not_found(format!("Converter '{name}' not found")))?;

    Ok(Json(ApiResponse::ok(ConverterEntry::from(descriptor.as_ref()))))
}
