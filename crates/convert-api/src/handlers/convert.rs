//! Multipart conversion handler.

use axum::body::Body;
use axum::extract::{Multipart, State};
use axum::http::{StatusCode, header};
use axum::response::Response;
use bytes::Bytes;

use convert_core::error::AppError;
use convert_engine::UploadedFile;

use crate::error::ApiError;
use crate::state::AppState;

/// POST /convert: multipart `file` + `converter`
///
/// Responds with the converted file as an attachment.
pub async fn convert_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response, ApiError> {
    let mut converter: Option<String> = None;
    let mut file_name: Option<String> = None;
    let mut data: Option<Bytes> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Multipart error: {e}")))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "converter" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::validation(format!("Read error: {e}")))?;
                converter = Some(text);
            }
            "file" => {
                file_name = Some(field.file_name().unwrap_or("upload").to_string());
                data = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|e| AppError::validation(format!("Read error: {e}")))?,
                );
            }
            _ => {}
        }
    }

    let converter = converter
        .filter(|c| !c.is_empty())
        .ok_or_else(|| AppError::validation("converter is required"))?;
    let data = data.ok_or_else(|| AppError::validation("file is required"))?;
    let file_name = file_name.unwrap_or_else(|| "upload".to_string());

    let converted = state
        .conversions
        .convert(&converter, UploadedFile { file_name, data })
        .await?;

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, converted.content_type)
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", converted.filename),
        )
        .header(header::CONTENT_LENGTH, converted.data.len())
        .body(Body::from(converted.data))
        .map_err(|e| AppError::internal(format!("Response build failed: {e}")))?;

    Ok(response)
}
