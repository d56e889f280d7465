//! In-memory stand-ins for storage and the managed services.

use std::collections::{BTreeSet, HashMap};
use std::pin::Pin;
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use sketchvoice_services::{
    ServiceError, ServiceResult, SpeechRequest, SpeechSynthesizer, TextRecognizer,
};
use sketchvoice_storage::{Storage, StorageBackend, StorageError, StorageResult};
use tokio::io::{AsyncRead, AsyncReadExt};

#[derive(Debug, Clone)]
pub struct StoredObject {
    pub data: Vec<u8>,
    pub content_type: String,
}

/// Keeps objects in a map and records every call it receives.
#[derive(Default)]
pub struct MemoryStorage {
    containers: Mutex<BTreeSet<String>>,
    objects: Mutex<HashMap<(String, String), StoredObject>>,
    calls: Mutex<Vec<String>>,
    fail_listing: bool,
    rejected_prefix: Option<String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_container(container: &str) -> Self {
        let storage = Self::default();
        storage
            .containers
            .lock()
            .unwrap()
            .insert(container.to_string());
        storage
    }

    pub fn failing_listing() -> Self {
        Self {
            fail_listing: true,
            ..Self::default()
        }
    }

    /// Refuses writes to keys under `prefix`.
    pub fn rejecting_writes_under(container: &str, prefix: &str) -> Self {
        let storage = Self {
            rejected_prefix: Some(format!("{}/", prefix)),
            ..Self::default()
        };
        storage
            .containers
            .lock()
            .unwrap()
            .insert(container.to_string());
        storage
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn create_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| call.starts_with("create_container"))
            .count()
    }

    pub fn object(&self, container: &str, key: &str) -> Option<StoredObject> {
        self.objects
            .lock()
            .unwrap()
            .get(&(container.to_string(), key.to_string()))
            .cloned()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn put(
        &self,
        container: &str,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> StorageResult<()> {
        if let Some(prefix) = &self.rejected_prefix {
            if key.starts_with(prefix.as_str()) {
                return Err(StorageError::UploadFailed(format!("write refused: {}", key)));
            }
        }
        if !self.containers.lock().unwrap().contains(container) {
            return Err(StorageError::ContainerNotFound(container.to_string()));
        }
        self.objects.lock().unwrap().insert(
            (container.to_string(), key.to_string()),
            StoredObject {
                data,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn list_containers(&self) -> StorageResult<Vec<String>> {
        self.record("list_containers".to_string());
        if self.fail_listing {
            return Err(StorageError::ListFailed("access denied".to_string()));
        }
        Ok(self.containers.lock().unwrap().iter().cloned().collect())
    }

    async fn create_container(&self, container: &str) -> StorageResult<()> {
        self.record(format!("create_container {}", container));
        self.containers
            .lock()
            .unwrap()
            .insert(container.to_string());
        Ok(())
    }

    async fn upload_with_key(
        &self,
        container: &str,
        storage_key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> StorageResult<String> {
        self.record(format!("upload {}/{}", container, storage_key));
        self.put(container, storage_key, data, content_type)?;
        Ok(format!("memory://{}/{}", container, storage_key))
    }

    async fn upload_stream(
        &self,
        container: &str,
        storage_key: &str,
        content_type: &str,
        _content_length: Option<u64>,
        mut reader: Pin<Box<dyn AsyncRead + Send + Unpin>>,
    ) -> StorageResult<(u64, String)> {
        self.record(format!("upload_stream {}/{}", container, storage_key));
        let mut data = Vec::new();
        reader.read_to_end(&mut data).await?;
        let len = data.len() as u64;
        self.put(container, storage_key, data, content_type)?;
        Ok((len, format!("memory://{}/{}", container, storage_key)))
    }

    async fn download(&self, container: &str, storage_key: &str) -> StorageResult<Vec<u8>> {
        self.object(container, storage_key)
            .map(|object| object.data)
            .ok_or_else(|| StorageError::NotFound(storage_key.to_string()))
    }

    async fn exists(&self, container: &str, storage_key: &str) -> StorageResult<bool> {
        Ok(self.object(container, storage_key).is_some())
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

/// Returns fixed fragments (or a fixed error) and records the keys it was asked about.
pub struct FakeRecognizer {
    outcome: Result<Vec<String>, fn() -> ServiceError>,
    seen: Mutex<Vec<(String, String)>>,
}

impl FakeRecognizer {
    pub fn returning(fragments: &[&str]) -> Self {
        Self {
            outcome: Ok(fragments.iter().map(|f| f.to_string()).collect()),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: fn() -> ServiceError) -> Self {
        Self {
            outcome: Err(error),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn seen(&self) -> Vec<(String, String)> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextRecognizer for FakeRecognizer {
    fn name(&self) -> &'static str {
        "fake"
    }

    async fn detect_text(
        &self,
        container: &str,
        storage_key: &str,
    ) -> ServiceResult<Vec<String>> {
        self.seen
            .lock()
            .unwrap()
            .push((container.to_string(), storage_key.to_string()));
        match &self.outcome {
            Ok(fragments) => Ok(fragments.clone()),
            Err(error) => Err(error()),
        }
    }
}

/// Returns fixed audio (or a fixed error) and records every request.
pub struct FakeSynthesizer {
    outcome: Result<Bytes, fn() -> ServiceError>,
    requests: Mutex<Vec<SpeechRequest>>,
}

impl FakeSynthesizer {
    pub fn returning(audio: &'static [u8]) -> Self {
        Self {
            outcome: Ok(Bytes::from_static(audio)),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: fn() -> ServiceError) -> Self {
        Self {
            outcome: Err(error),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<SpeechRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl SpeechSynthesizer for FakeSynthesizer {
    fn name(&self) -> &'static str {
        "fake"
    }

    async fn synthesize(&self, request: &SpeechRequest) -> ServiceResult<Bytes> {
        self.requests.lock().unwrap().push(request.clone());
        match &self.outcome {
            Ok(audio) => Ok(audio.clone()),
            Err(error) => Err(error()),
        }
    }
}
