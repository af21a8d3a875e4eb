//! Image upload pipeline
//!
//! Orchestrates one upload end to end: validate, persist the original,
//! derive both variants in memory, persist the variants. Any failure after
//! the original lands removes what was already written so repeated failed
//! attempts never accumulate orphaned files.

use std::sync::Arc;

use bytes::Bytes;
use pixa_core::{AppError, Config};
use pixa_processing::image::derive_variants;
use pixa_processing::{UploadValidator, ValidationError};
use pixa_storage::{keys, Storage, StorageError};
use serde::Serialize;
use uuid::Uuid;

/// Relative public paths for the three stored renditions of one upload.
#[derive(Debug, Clone, Serialize)]
pub struct StoredAsset {
    pub original: String,
    pub profile: String,
    pub thumbnail: String,
}

/// Image upload service
///
/// Holds the validator built from configuration and a handle to the storage
/// backend. One instance serves all requests; uploads share no mutable state
/// beyond the filesystem namespace.
pub struct ImageService {
    validator: UploadValidator,
    storage: Arc<dyn Storage>,
}

impl ImageService {
    pub fn new(config: &Config, storage: Arc<dyn Storage>) -> Self {
        Self {
            validator: UploadValidator::new(
                config.max_file_size_bytes,
                config.allowed_extensions.clone(),
                config.allowed_content_types.clone(),
            ),
            storage,
        }
    }

    /// Validate the declared filename and content type of an upload.
    ///
    /// Returns the normalized extension used to name stored files. The
    /// extension check runs before the content-type check and short-circuits.
    pub fn validate(&self, filename: &str, content_type: &str) -> Result<String, AppError> {
        self.validator
            .validate(filename, content_type)
            .map_err(|e| self.rejection(e))
    }

    /// Run the derivation pipeline for a validated upload.
    ///
    /// Writes the original plus profile and thumbnail variants under the
    /// current date partition and returns their public paths.
    pub async fn derive_and_store(
        &self,
        data: Bytes,
        extension: &str,
    ) -> Result<StoredAsset, AppError> {
        // Date partition for the processing instant, created before anything else
        let date_prefix = keys::date_prefix();
        self.storage.ensure_dir(&date_prefix).await.map_err(|e| {
            AppError::Internal(format!("Failed to prepare storage directory: {}", e))
        })?;

        // The size cap applies before any file is written
        self.validator
            .validate_size(data.len())
            .map_err(|e| self.rejection(e))?;

        // One shared basename for all three renditions
        let asset_id = Uuid::new_v4();
        let original_key = keys::variant_key(&date_prefix, asset_id, "original", extension);
        let profile_key = keys::variant_key(&date_prefix, asset_id, "profile", extension);
        let thumbnail_key = keys::variant_key(&date_prefix, asset_id, "thumbnail", extension);

        tracing::info!(
            asset_id = %asset_id,
            extension = %extension,
            size_bytes = data.len(),
            "Processing image upload"
        );

        if let Err(e) = self
            .persist_upload(&data, extension, &original_key, &profile_key, &thumbnail_key)
            .await
        {
            self.cleanup_partial_upload(&[&original_key, &profile_key, &thumbnail_key])
                .await;
            return Err(e);
        }

        tracing::info!(asset_id = %asset_id, key = %original_key, "Image upload stored");

        Ok(StoredAsset {
            original: keys::public_path(&original_key),
            profile: keys::public_path(&profile_key),
            thumbnail: keys::public_path(&thumbnail_key),
        })
    }

    /// Write the original, then derive both variants and write them.
    ///
    /// Both variants are derived in memory before either is written, so a
    /// decode or resize failure leaves only the original behind for cleanup.
    async fn persist_upload(
        &self,
        data: &Bytes,
        extension: &str,
        original_key: &str,
        profile_key: &str,
        thumbnail_key: &str,
    ) -> Result<(), AppError> {
        // The original must be durable before derivation begins
        self.storage
            .upload(original_key, data.to_vec())
            .await
            .map_err(processing_error)?;

        let bytes = data.clone();
        let ext = extension.to_string();
        let variants = tokio::task::spawn_blocking(move || derive_variants(&bytes, &ext))
            .await
            .map_err(|e| AppError::Internal(format!("Failed to process image: {}", e)))?
            .map_err(|e: anyhow::Error| {
                AppError::ImageProcessing(format!("Image processing failed: {:#}", e))
            })?;

        self.storage
            .upload(profile_key, variants.profile.to_vec())
            .await
            .map_err(processing_error)?;

        self.storage
            .upload(thumbnail_key, variants.thumbnail.to_vec())
            .await
            .map_err(processing_error)?;

        Ok(())
    }

    /// Best-effort removal of everything an aborted upload may have written.
    async fn cleanup_partial_upload(&self, storage_keys: &[&str]) {
        for key in storage_keys {
            if let Err(e) = self.storage.delete(key).await {
                tracing::warn!(
                    key = %key,
                    error = %e,
                    "Failed to clean up after aborted upload"
                );
            }
        }
    }

    fn rejection(&self, err: ValidationError) -> AppError {
        tracing::debug!(error = %err, "Upload validation rejected");
        match err {
            ValidationError::InvalidExtension { .. } => AppError::InvalidInput(
                "Invalid file type. Only JPG, PNG, WEBP allowed.".to_string(),
            ),
            ValidationError::InvalidContentType { .. } => {
                AppError::InvalidInput("Invalid MIME type.".to_string())
            }
            ValidationError::FileTooLarge { .. } => AppError::PayloadTooLarge(format!(
                "File too large. Max {}MB.",
                self.validator.max_file_size() / (1024 * 1024)
            )),
        }
    }
}

fn processing_error(err: StorageError) -> AppError {
    AppError::ImageProcessing(format!("Image processing failed: {}", err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, GenericImageView, ImageFormat, Rgba, RgbaImage};
    use pixa_processing::image::decode_image;
    use pixa_storage::LocalStorage;
    use std::io::Cursor;
    use std::path::Path;
    use tempfile::tempdir;

    async fn service_with_root(root: &Path) -> ImageService {
        let storage = LocalStorage::new(root).await.unwrap();
        let config = Config {
            server_port: 8082,
            upload_dir: root.to_string_lossy().to_string(),
            max_file_size_bytes: 5 * 1024 * 1024,
            allowed_extensions: vec![
                "jpg".to_string(),
                "jpeg".to_string(),
                "png".to_string(),
                "webp".to_string(),
            ],
            allowed_content_types: vec![
                "image/jpeg".to_string(),
                "image/png".to_string(),
                "image/webp".to_string(),
            ],
            cors_origins: vec!["*".to_string()],
            app_name: "image-service".to_string(),
            eureka_enabled: false,
            eureka_server: String::new(),
            instance_host: String::new(),
            heartbeat_interval_secs: 30,
        };
        ImageService::new(&config, Arc::new(storage))
    }

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba([50, 100, 150, 255]));
        let mut buffer = Vec::new();
        DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
            .unwrap();
        buffer
    }

    fn count_files(dir: &Path) -> usize {
        let mut count = 0;
        if let Ok(entries) = std::fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.is_dir() {
                    count += count_files(&path);
                } else {
                    count += 1;
                }
            }
        }
        count
    }

    #[tokio::test]
    async fn test_validate_returns_extension() {
        let dir = tempdir().unwrap();
        let service = service_with_root(dir.path()).await;

        let ext = service.validate("photo.PNG", "image/png").unwrap();
        assert_eq!(ext, "png");
    }

    #[tokio::test]
    async fn test_validate_rejects_extension_before_content_type() {
        let dir = tempdir().unwrap();
        let service = service_with_root(dir.path()).await;

        let err = service
            .validate("malware.exe", "application/octet-stream")
            .unwrap_err();
        match err {
            AppError::InvalidInput(msg) => {
                assert_eq!(msg, "Invalid file type. Only JPG, PNG, WEBP allowed.")
            }
            other => panic!("expected InvalidInput, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_validate_rejects_content_type() {
        let dir = tempdir().unwrap();
        let service = service_with_root(dir.path()).await;

        let err = service.validate("photo.png", "text/plain").unwrap_err();
        match err {
            AppError::InvalidInput(msg) => assert_eq!(msg, "Invalid MIME type."),
            other => panic!("expected InvalidInput, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_derive_and_store_writes_three_files() {
        let dir = tempdir().unwrap();
        let service = service_with_root(dir.path()).await;

        let asset = service
            .derive_and_store(Bytes::from(png_bytes(600, 400)), "png")
            .await
            .unwrap();

        assert!(asset.original.starts_with('/'));
        assert!(asset.original.ends_with("_original.png"));
        assert!(asset.profile.ends_with("_profile.png"));
        assert!(asset.thumbnail.ends_with("_thumbnail.png"));

        // All three paths share the same date prefix and id
        let stem = |p: &str, suffix: &str| p.strip_suffix(suffix).unwrap().to_string();
        let base = stem(&asset.original, "_original.png");
        assert_eq!(base, stem(&asset.profile, "_profile.png"));
        assert_eq!(base, stem(&asset.thumbnail, "_thumbnail.png"));

        for path in [&asset.original, &asset.profile, &asset.thumbnail] {
            assert!(dir.path().join(&path[1..]).is_file(), "missing {}", path);
        }
    }

    #[tokio::test]
    async fn test_derive_and_store_variant_dimensions() {
        let dir = tempdir().unwrap();
        let service = service_with_root(dir.path()).await;

        let input = png_bytes(600, 400);
        let asset = service
            .derive_and_store(Bytes::from(input.clone()), "png")
            .await
            .unwrap();

        let read = |p: &str| std::fs::read(dir.path().join(&p[1..])).unwrap();

        // Original is stored verbatim
        assert_eq!(read(&asset.original), input);

        // 600x400 already fits the 800 bound, thumbnail scales to 200x133
        let profile = decode_image(&read(&asset.profile)).unwrap();
        assert_eq!(profile.dimensions(), (600, 400));

        let thumbnail = decode_image(&read(&asset.thumbnail)).unwrap();
        assert_eq!(thumbnail.dimensions(), (200, 133));
    }

    #[tokio::test]
    async fn test_oversize_rejected_before_any_write() {
        let dir = tempdir().unwrap();
        let service = service_with_root(dir.path()).await;

        let data = Bytes::from(vec![0u8; 5 * 1024 * 1024 + 1]);
        let err = service.derive_and_store(data, "png").await.unwrap_err();
        match err {
            AppError::PayloadTooLarge(msg) => assert_eq!(msg, "File too large. Max 5MB."),
            other => panic!("expected PayloadTooLarge, got {:?}", other),
        }

        assert_eq!(count_files(dir.path()), 0);
    }

    #[tokio::test]
    async fn test_corrupt_bytes_cleans_up_original() {
        let dir = tempdir().unwrap();
        let service = service_with_root(dir.path()).await;

        let err = service
            .derive_and_store(Bytes::from_static(b"not an image at all"), "png")
            .await
            .unwrap_err();
        match err {
            AppError::ImageProcessing(msg) => {
                assert!(msg.starts_with("Image processing failed:"), "got {}", msg)
            }
            other => panic!("expected ImageProcessing, got {:?}", other),
        }

        // The already-written original was removed
        assert_eq!(count_files(dir.path()), 0);
    }

    #[tokio::test]
    async fn test_same_day_uploads_get_distinct_ids() {
        let dir = tempdir().unwrap();
        let service = service_with_root(dir.path()).await;

        let first = service
            .derive_and_store(Bytes::from(png_bytes(64, 64)), "png")
            .await
            .unwrap();
        let second = service
            .derive_and_store(Bytes::from(png_bytes(64, 64)), "png")
            .await
            .unwrap();

        assert_ne!(first.original, second.original);
        assert_eq!(count_files(dir.path()), 6);
    }
}
