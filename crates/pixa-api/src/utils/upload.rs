//! Common utilities for file upload handlers

use axum::extract::Multipart;
use bytes::Bytes;
use pixa_core::AppError;

/// Extract file data, filename, and content type from multipart form.
/// Only one field named "file" is accepted; multiple file fields are rejected.
pub async fn extract_multipart_file(
    mut multipart: Multipart,
) -> Result<(Bytes, String, String), AppError> {
    let mut file_data: Option<Bytes> = None;
    let mut filename: Option<String> = None;
    let mut content_type: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Failed to read multipart: {}", e)))?
    {
        let field_name = field.name().map(|s| s.to_string()).unwrap_or_default();

        if field_name == "file" {
            if file_data.is_some() {
                return Err(AppError::InvalidInput(
                    "Multiple file fields are not allowed; send exactly one field named 'file'"
                        .to_string(),
                ));
            }
            filename = field.file_name().map(|s: &str| s.to_string());
            content_type = field.content_type().map(|s: &str| s.to_string());

            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::InvalidInput(format!("Failed to read file data: {}", e)))?;

            file_data = Some(data);
        }
    }

    let file_data =
        file_data.ok_or_else(|| AppError::InvalidInput("No file provided".to_string()))?;

    let original_filename = filename.unwrap_or_else(|| "unknown".to_string());
    let content_type = content_type
        .as_deref()
        .map(normalize_mime_type)
        .unwrap_or("application/octet-stream")
        .to_string();

    Ok((file_data, original_filename, content_type))
}

/// Normalize MIME type by stripping parameters (e.g. "image/jpeg; charset=utf-8" -> "image/jpeg").
fn normalize_mime_type(content_type: &str) -> &str {
    content_type
        .split(';')
        .next()
        .map(|s| s.trim())
        .unwrap_or(content_type)
}
