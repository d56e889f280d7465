//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use crate::StorageBackend;
use async_trait::async_trait;
use std::pin::Pin;
use thiserror::Error;
use tokio::io::AsyncRead;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Listing containers failed: {0}")]
    ListFailed(String),

    #[error("Creating container {container} failed: {message}")]
    CreateContainerFailed { container: String, message: String },

    #[error("Container not found: {0}")]
    ContainerNotFound(String),

    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage abstraction trait
///
/// All storage backends (S3, local filesystem) must implement this trait.
/// Objects are addressed by `(container, key)`; keys are built by the `keys`
/// module so every backend sees the same layout.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Names of every container visible to the caller.
    async fn list_containers(&self) -> StorageResult<Vec<String>>;

    /// Create a container. Backends treat "already exists and owned by the
    /// caller" as success.
    async fn create_container(&self, container: &str) -> StorageResult<()>;

    /// Upload data to a specific storage key, overwriting any existing object.
    /// Returns the URL of the stored object.
    async fn upload_with_key(
        &self,
        container: &str,
        storage_key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> StorageResult<String>;

    /// Upload from a reader, consuming it until EOF.
    ///
    /// Returns `(bytes_written, url)`.
    async fn upload_stream(
        &self,
        container: &str,
        storage_key: &str,
        content_type: &str,
        content_length: Option<u64>,
        reader: Pin<Box<dyn AsyncRead + Send + Unpin>>,
    ) -> StorageResult<(u64, String)>;

    /// Download an object by its storage key
    async fn download(&self, container: &str, storage_key: &str) -> StorageResult<Vec<u8>>;

    /// Check if an object exists
    async fn exists(&self, container: &str, storage_key: &str) -> StorageResult<bool>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
