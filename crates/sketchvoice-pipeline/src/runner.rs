//! Sequential sketch-to-voice runner

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use chrono::Utc;
use sketchvoice_core::{AudioDestination, PipelineConfig};
use sketchvoice_services::{join_fragments, SpeechRequest, SpeechSynthesizer, TextRecognizer};
use sketchvoice_storage::{keys, Storage, StorageError};
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tracing::Instrument;
use uuid::Uuid;

use crate::error::{PipelineError, PipelineResult, PipelineStage};
use crate::report::{AudioLocation, PipelineReport};
use crate::source::SourceDocument;

const TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// Runs the seven pipeline steps against injected storage and services.
pub struct PipelineRunner {
    config: PipelineConfig,
    storage: Arc<dyn Storage>,
    recognizer: Arc<dyn TextRecognizer>,
    synthesizer: Arc<dyn SpeechSynthesizer>,
}

impl PipelineRunner {
    pub fn new(
        config: PipelineConfig,
        storage: Arc<dyn Storage>,
        recognizer: Arc<dyn TextRecognizer>,
        synthesizer: Arc<dyn SpeechSynthesizer>,
    ) -> Self {
        Self {
            config,
            storage,
            recognizer,
            synthesizer,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    fn source_filename(&self) -> PipelineResult<&str> {
        self.config.source_filename().ok_or_else(|| {
            PipelineError::Config(format!(
                "Source path {} has no usable file name",
                self.config.source_file.display()
            ))
        })
    }

    /// Open the configured source image.
    #[tracing::instrument(skip(self), fields(path = %self.config.source_file.display()))]
    pub async fn open_source(&self) -> PipelineResult<SourceDocument> {
        let filename = self.source_filename()?;
        let source = SourceDocument::open(&self.config.source_file, filename).await?;
        tracing::debug!(size_bytes = source.size_bytes(), "Source opened");
        Ok(source)
    }

    /// Create `container` unless it is already listed. Returns true when it
    /// was created by this call.
    #[tracing::instrument(skip(self))]
    pub async fn ensure_container(&self, container: &str) -> PipelineResult<bool> {
        let wrap = |source: StorageError| PipelineError::ContainerCreateFailed {
            container: container.to_string(),
            source,
        };

        let existing = self.storage.list_containers().await.map_err(wrap)?;
        if existing.iter().any(|name| name == container) {
            tracing::debug!("Container already exists");
            return Ok(false);
        }

        self.storage.create_container(container).await.map_err(wrap)?;
        tracing::info!("Container created");
        Ok(true)
    }

    /// Stream the source into `key`, replacing any existing object.
    #[tracing::instrument(skip(self, source), fields(
        path = %source.path().display(),
        size_bytes = source.size_bytes()
    ))]
    pub async fn upload(
        &self,
        container: &str,
        key: &str,
        source: SourceDocument,
    ) -> PipelineResult<String> {
        let content_type = source.content_type();
        let size = source.size_bytes();

        self.storage
            .upload_stream(container, key, content_type, Some(size), source.into_reader())
            .await
            .map_err(|source| PipelineError::UploadFailed {
                container: container.to_string(),
                key: key.to_string(),
                source,
            })?;

        Ok(key.to_string())
    }

    /// Run OCR on the stored object and join the detected lines.
    #[tracing::instrument(skip(self), fields(recognizer = self.recognizer.name()))]
    pub async fn recognize_text(&self, container: &str, key: &str) -> PipelineResult<String> {
        let fragments = self
            .recognizer
            .detect_text(container, key)
            .await
            .map_err(|source| {
                PipelineError::from_service(PipelineStage::RecognizeText, source, |source| {
                    PipelineError::RecognitionFailed {
                        key: key.to_string(),
                        source,
                    }
                })
            })?;

        let text = join_fragments(&fragments);
        tracing::info!(lines = fragments.len(), text_length = text.len(), "Text recognized");
        Ok(text)
    }

    /// Write `text` verbatim to `key`.
    #[tracing::instrument(skip(self, text), fields(text_length = text.len()))]
    pub async fn store_text(&self, container: &str, key: &str, text: &str) -> PipelineResult<()> {
        self.storage
            .upload_with_key(container, key, text.as_bytes().to_vec(), TEXT_CONTENT_TYPE)
            .await
            .map_err(|source| PipelineError::TextPersistFailed {
                key: key.to_string(),
                source,
            })?;
        Ok(())
    }

    /// Synthesize `text` with the configured voice.
    #[tracing::instrument(skip(self, text), fields(
        synthesizer = self.synthesizer.name(),
        voice_id = %self.config.voice.voice_id,
        text_length = text.len()
    ))]
    pub async fn synthesize_speech(&self, text: &str) -> PipelineResult<Bytes> {
        let request = SpeechRequest {
            text: text.to_string(),
            voice: self.config.voice.clone(),
        };

        self.synthesizer.synthesize(&request).await.map_err(|source| {
            PipelineError::from_service(PipelineStage::SynthesizeSpeech, source, |source| {
                PipelineError::SynthesisFailed {
                    text_length: text.len(),
                    source,
                }
            })
        })
    }

    /// Write the audio for `filename` to `destination`.
    #[tracing::instrument(skip(self, audio), fields(size_bytes = audio.len()))]
    pub async fn persist_audio(
        &self,
        audio: &Bytes,
        filename: &str,
        destination: &AudioDestination,
    ) -> PipelineResult<AudioLocation> {
        let format = self.config.voice.output_format;

        match destination {
            AudioDestination::Disk { dir } => {
                let path = dir.join(keys::audio_key("", filename, format.extension()));
                write_audio_file(&path, audio)
                    .await
                    .map_err(|source| PipelineError::AudioPersistFailed {
                        destination: path.display().to_string(),
                        source: StorageError::IoError(source),
                    })?;

                tracing::info!(path = %path.display(), "Audio written to disk");
                Ok(AudioLocation::File { path })
            }
            AudioDestination::Bucket => {
                let container = self.config.bucket.as_str();
                let key = keys::audio_key(&self.config.audio_prefix, filename, format.extension());
                self.storage
                    .upload_with_key(container, &key, audio.to_vec(), format.mime_type())
                    .await
                    .map_err(|source| PipelineError::AudioPersistFailed {
                        destination: format!("{}/{}", container, key),
                        source,
                    })?;

                Ok(AudioLocation::Object {
                    container: container.to_string(),
                    key,
                })
            }
        }
    }

    /// Run every step in order, stopping at the first failure.
    pub async fn run(&self) -> PipelineResult<PipelineReport> {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("pipeline_run", %run_id, bucket = %self.config.bucket);

        async move {
            let started_at = Utc::now();
            let start = Instant::now();
            let container = self.config.bucket.as_str();

            let source = self.open_source().await?;
            let filename = source.filename().to_string();
            let sketch_bytes = source.size_bytes();

            let container_created = self.ensure_container(container).await?;

            let sketch_key = keys::sketch_key(&self.config.sketch_prefix, &filename);
            let sketch_key = self.upload(container, &sketch_key, source).await?;

            let text = self.recognize_text(container, &sketch_key).await?;

            let text_key = keys::text_key(&self.config.text_prefix, &filename);
            self.store_text(container, &text_key, &text).await?;

            let audio = self.synthesize_speech(&text).await?;
            let audio_location = self
                .persist_audio(&audio, &filename, &self.config.audio_destination)
                .await?;

            tracing::info!(
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Pipeline run completed"
            );

            Ok(PipelineReport {
                run_id,
                started_at,
                finished_at: Utc::now(),
                container: container.to_string(),
                container_created,
                sketch_key,
                sketch_bytes,
                text_key,
                text_lines: text.lines().count(),
                text_bytes: text.len(),
                audio: audio_location,
                audio_bytes: audio.len(),
            })
        }
        .instrument(span)
        .await
    }
}

async fn write_audio_file(path: &Path, audio: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }

    // File::create truncates, so a shorter clip never leaves stale tail bytes.
    let mut file = File::create(path).await?;
    file.write_all(audio).await?;
    file.flush().await?;
    file.sync_all().await?;
    Ok(())
}
