//! Multipart image upload handler

use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    response::IntoResponse,
    Json,
};
use pixa_services::StoredAsset;
use serde::Serialize;

use crate::error::HttpAppError;
use crate::state::AppState;
use crate::utils::upload::extract_multipart_file;

/// Response envelope for a successful upload.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub status: String,
    pub data: StoredAsset,
}

/// Upload image handler
///
/// Accepts a single multipart field named `file`, validates it against the
/// configured extension, MIME, and size limits, then stores the original and
/// derives the profile and thumbnail variants.
///
/// # Errors
/// - `AppError::InvalidInput` - missing/duplicate file field, bad extension or MIME type
/// - `AppError::PayloadTooLarge` - file exceeds the configured size limit
/// - `AppError::ImageProcessing` - undecodable image or storage failure mid-pipeline
#[tracing::instrument(skip(state, multipart), fields(operation = "upload_image"))]
pub async fn upload_image(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let (data, filename, content_type) = extract_multipart_file(multipart).await?;

    let extension = state.image_service.validate(&filename, &content_type)?;

    let asset = state
        .image_service
        .derive_and_store(data, &extension)
        .await?;

    Ok(Json(UploadResponse {
        status: "success".to_string(),
        data: asset,
    }))
}
