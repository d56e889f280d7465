//! Shared fixtures for pipeline integration tests.
//!
//! Storage is the real local backend rooted in a temp dir; the managed
//! services are scripted fakes.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use sketchvoice_core::{AudioDestination, PipelineConfig, StorageBackend};
use sketchvoice_pipeline::PipelineRunner;
use sketchvoice_services::{ServiceResult, SpeechRequest, SpeechSynthesizer, TextRecognizer};
use sketchvoice_storage::LocalStorage;
use tempfile::TempDir;

pub const SAMPLE_PNG: &[u8] = b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDR sketch";
pub const FAKE_MP3: &[u8] = b"ID3\x04\x00fake-mp3-frames";

pub struct ScriptedRecognizer {
    pub lines: Vec<String>,
}

#[async_trait]
impl TextRecognizer for ScriptedRecognizer {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn detect_text(
        &self,
        _container: &str,
        _storage_key: &str,
    ) -> ServiceResult<Vec<String>> {
        Ok(self.lines.clone())
    }
}

#[derive(Default)]
pub struct RecordingSynthesizer {
    pub requests: Mutex<Vec<SpeechRequest>>,
}

#[async_trait]
impl SpeechSynthesizer for RecordingSynthesizer {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn synthesize(&self, request: &SpeechRequest) -> ServiceResult<Bytes> {
        self.requests.lock().unwrap().push(request.clone());
        Ok(Bytes::from_static(FAKE_MP3))
    }
}

/// A working directory with `sample.png`, a storage root and an audio dir.
pub struct TestWorkspace {
    pub dir: TempDir,
    pub storage: Arc<LocalStorage>,
}

impl TestWorkspace {
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        tokio::fs::write(dir.path().join("sample.png"), SAMPLE_PNG)
            .await
            .unwrap();
        let storage = Arc::new(LocalStorage::new(dir.path().join("store")).await.unwrap());
        Self { dir, storage }
    }

    pub fn audio_dir(&self) -> PathBuf {
        self.dir.path().join("audio-out")
    }

    pub fn config(&self) -> PipelineConfig {
        PipelineConfig {
            source_file: self.dir.path().join("sample.png"),
            storage_backend: StorageBackend::Local,
            local_storage_path: Some(
                self.dir
                    .path()
                    .join("store")
                    .to_string_lossy()
                    .to_string(),
            ),
            audio_destination: AudioDestination::Disk {
                dir: self.audio_dir(),
            },
            ..PipelineConfig::default()
        }
    }

    pub fn runner(
        &self,
        config: PipelineConfig,
        recognizer: Arc<dyn TextRecognizer>,
        synthesizer: Arc<dyn SpeechSynthesizer>,
    ) -> PipelineRunner {
        PipelineRunner::new(config, self.storage.clone(), recognizer, synthesizer)
    }
}

pub fn recognizer(lines: &[&str]) -> Arc<ScriptedRecognizer> {
    Arc::new(ScriptedRecognizer {
        lines: lines.iter().map(|l| l.to_string()).collect(),
    })
}
