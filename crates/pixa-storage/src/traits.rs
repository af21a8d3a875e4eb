//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use async_trait::async_trait;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage abstraction trait
///
/// The upload pipeline works against this trait so it stays decoupled from
/// where the bytes land. Keys follow the date-partitioned layout described
/// in the crate root documentation.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Create a directory prefix if it does not exist yet. Idempotent.
    async fn ensure_dir(&self, prefix: &str) -> StorageResult<()>;

    /// Write a file at the given storage key, overwriting any previous content.
    async fn upload(&self, storage_key: &str, data: Vec<u8>) -> StorageResult<()>;

    /// Read a file by its storage key.
    async fn download(&self, storage_key: &str) -> StorageResult<Vec<u8>>;

    /// Delete a file by its storage key. Deleting a missing file is not an error.
    async fn delete(&self, storage_key: &str) -> StorageResult<()>;

    /// Check if a file exists
    async fn exists(&self, storage_key: &str) -> StorageResult<bool>;
}
