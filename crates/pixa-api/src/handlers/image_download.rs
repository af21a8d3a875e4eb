//! Serves stored originals and derived variants

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use pixa_core::AppError;
use pixa_processing::image::EncodeFormat;
use pixa_processing::validator::extension_tag;

use crate::error::HttpAppError;
use crate::state::AppState;

/// Download image handler
///
/// Serves a stored file addressed by its date-partitioned public path. Stored
/// files never change once written, so responses carry an immutable cache
/// policy.
#[tracing::instrument(skip(state), fields(operation = "download_image"))]
pub async fn download_image(
    State(state): State<Arc<AppState>>,
    Path((year, month, day, filename)): Path<(String, String, String, String)>,
) -> Result<impl IntoResponse, HttpAppError> {
    let storage_key = format!("{}/{}/{}/{}", year, month, day, filename);

    tracing::debug!(storage_key = %storage_key, "Serving stored file");

    let data = state.storage.download(&storage_key).await?;

    let content_type = EncodeFormat::from_extension(&extension_tag(&filename))
        .map(EncodeFormat::to_mime_type)
        .unwrap_or("application/octet-stream");

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CACHE_CONTROL, "public, max-age=31536000, immutable")
        .body(Body::from(data))
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to build response");
            AppError::Internal(e.to_string())
        })?;

    Ok(response)
}
