use crate::keys::validate_key;
use crate::traits::{Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use tokio::fs;
use tokio::io::{AsyncRead, AsyncWriteExt};

/// Local filesystem storage implementation
///
/// Every container is a directory directly under `base_path`; object keys map
/// onto relative paths inside it.
#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory holding one sub-directory per container
    pub async fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage { base_path })
    }

    fn container_path(&self, container: &str) -> StorageResult<PathBuf> {
        if container.is_empty()
            || container.contains("..")
            || container.contains('/')
            || container.contains('\\')
        {
            return Err(StorageError::InvalidKey(format!(
                "Invalid container name: {}",
                container
            )));
        }
        Ok(self.base_path.join(container))
    }

    /// Convert container + storage key to a filesystem path with security validation
    ///
    /// Fails with `ContainerNotFound` when the container directory is missing, so
    /// writes never create containers implicitly.
    async fn key_to_path(&self, container: &str, storage_key: &str) -> StorageResult<PathBuf> {
        validate_key(storage_key)?;
        let container_path = self.container_path(container)?;

        if !fs::try_exists(&container_path).await.unwrap_or(false) {
            return Err(StorageError::ContainerNotFound(container.to_string()));
        }

        let path = container_path.join(storage_key);

        let container_canonical = container_path.canonicalize().map_err(|e| {
            StorageError::ConfigError(format!("Failed to canonicalize container path: {}", e))
        })?;

        if let Ok(canonical) = path.canonicalize() {
            if canonical.strip_prefix(&container_canonical).is_err() {
                return Err(StorageError::InvalidKey(
                    "Storage key resolves outside container directory".to_string(),
                ));
            }
        }

        Ok(path)
    }

    /// Generate URL for file
    fn generate_url(&self, container: &str, key: &str) -> String {
        format!("file://{}/{}/{}", self.base_path.display(), container, key)
    }

    /// Ensure parent directory exists
    async fn ensure_parent_dir(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn list_containers(&self) -> StorageResult<Vec<String>> {
        let mut entries = fs::read_dir(&self.base_path)
            .await
            .map_err(|e| StorageError::ListFailed(e.to_string()))?;

        let mut names = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StorageError::ListFailed(e.to_string()))?
        {
            let is_dir = entry
                .file_type()
                .await
                .map(|t| t.is_dir())
                .unwrap_or(false);
            if is_dir {
                if let Some(name) = entry.file_name().to_str() {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    async fn create_container(&self, container: &str) -> StorageResult<()> {
        let path = self.container_path(container)?;
        fs::create_dir_all(&path)
            .await
            .map_err(|e| StorageError::CreateContainerFailed {
                container: container.to_string(),
                message: e.to_string(),
            })?;

        tracing::info!(
            path = %path.display(),
            container = %container,
            "Local storage container created"
        );
        Ok(())
    }

    async fn upload_with_key(
        &self,
        container: &str,
        storage_key: &str,
        data: Vec<u8>,
        _content_type: &str,
    ) -> StorageResult<String> {
        let path = self.key_to_path(container, storage_key).await?;
        let size = data.len();

        self.ensure_parent_dir(&path).await?;

        let start = std::time::Instant::now();

        let mut file = fs::File::create(&path).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to create file {}: {}", path.display(), e))
        })?;

        file.write_all(&data).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        tracing::info!(
            path = %path.display(),
            key = %storage_key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage upload successful"
        );

        Ok(self.generate_url(container, storage_key))
    }

    async fn upload_stream(
        &self,
        container: &str,
        storage_key: &str,
        _content_type: &str,
        _content_length: Option<u64>,
        mut reader: Pin<Box<dyn AsyncRead + Send + Unpin>>,
    ) -> StorageResult<(u64, String)> {
        let path = self.key_to_path(container, storage_key).await?;
        let start = std::time::Instant::now();

        self.ensure_parent_dir(&path).await?;

        let mut file = fs::File::create(&path).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to create file {}: {}", path.display(), e))
        })?;

        let bytes_copied = tokio::io::copy(&mut reader, &mut file).await.map_err(|e| {
            StorageError::UploadFailed(format!(
                "Failed to write stream to file {}: {}",
                path.display(),
                e
            ))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        tracing::info!(
            path = %path.display(),
            key = %storage_key,
            size_bytes = bytes_copied,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage stream upload successful"
        );

        Ok((bytes_copied, self.generate_url(container, storage_key)))
    }

    async fn download(&self, container: &str, storage_key: &str) -> StorageResult<Vec<u8>> {
        let path = self.key_to_path(container, storage_key).await?;

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Err(StorageError::NotFound(storage_key.to_string()));
        }

        fs::read(&path).await.map_err(|e| {
            StorageError::DownloadFailed(format!("Failed to read file {}: {}", path.display(), e))
        })
    }

    async fn exists(&self, container: &str, storage_key: &str) -> StorageResult<bool> {
        match self.key_to_path(container, storage_key).await {
            Ok(path) => Ok(fs::try_exists(&path).await.unwrap_or(false)),
            Err(StorageError::ContainerNotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}
