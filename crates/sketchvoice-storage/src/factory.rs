#[cfg(feature = "storage-local")]
use crate::LocalStorage;
#[cfg(feature = "storage-s3")]
use crate::S3Storage;
use crate::{Storage, StorageBackend, StorageError, StorageResult};
use aws_config::SdkConfig;
use sketchvoice_core::PipelineConfig;
use std::sync::Arc;

/// Create a storage backend based on configuration
///
/// `sdk_config` is only consulted for the S3 backend.
#[cfg(feature = "storage-s3")]
pub async fn create_storage(
    config: &PipelineConfig,
    sdk_config: &SdkConfig,
) -> StorageResult<Arc<dyn Storage>> {
    match config.storage_backend {
        StorageBackend::S3 => {
            let region = config.s3_region().map(String::from);
            let endpoint = config.s3_endpoint.clone();

            let storage = S3Storage::new(sdk_config, region, endpoint);
            Ok(Arc::new(storage))
        }
        StorageBackend::Local => create_local_storage(config).await,
    }
}

/// Create a storage backend based on configuration
#[cfg(not(feature = "storage-s3"))]
pub async fn create_storage(
    config: &PipelineConfig,
    _sdk_config: &SdkConfig,
) -> StorageResult<Arc<dyn Storage>> {
    match config.storage_backend {
        StorageBackend::S3 => Err(StorageError::ConfigError(
            "S3 storage backend not available (storage-s3 feature not enabled)".to_string(),
        )),
        StorageBackend::Local => create_local_storage(config).await,
    }
}

#[cfg(feature = "storage-local")]
async fn create_local_storage(config: &PipelineConfig) -> StorageResult<Arc<dyn Storage>> {
    let base_path = config.local_storage_path().ok_or_else(|| {
        StorageError::ConfigError("LOCAL_STORAGE_PATH not configured".to_string())
    })?;

    let storage = LocalStorage::new(base_path).await?;
    Ok(Arc::new(storage))
}

#[cfg(not(feature = "storage-local"))]
async fn create_local_storage(_config: &PipelineConfig) -> StorageResult<Arc<dyn Storage>> {
    Err(StorageError::ConfigError(
        "Local storage backend not available (storage-local feature not enabled)".to_string(),
    ))
}
