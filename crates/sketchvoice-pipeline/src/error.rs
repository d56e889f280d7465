//! Pipeline error types
//!
//! One variant per step. Every variant keeps the step context (path, container,
//! key) in its message and the underlying failure as its source, so the CLI can
//! print the whole chain.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::io;
use std::path::PathBuf;

use serde::Serialize;
use sketchvoice_core::{ErrorMetadata, LogLevel};
use sketchvoice_services::ServiceError;
use sketchvoice_storage::StorageError;

/// Steps of a pipeline run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    OpenSource,
    EnsureContainer,
    Upload,
    RecognizeText,
    StoreText,
    SynthesizeSpeech,
    PersistAudio,
}

impl Display for PipelineStage {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let name = match self {
            PipelineStage::OpenSource => "open_source",
            PipelineStage::EnsureContainer => "ensure_container",
            PipelineStage::Upload => "upload",
            PipelineStage::RecognizeText => "recognize_text",
            PipelineStage::StoreText => "store_text",
            PipelineStage::SynthesizeSpeech => "synthesize_speech",
            PipelineStage::PersistAudio => "persist_audio",
        };
        f.write_str(name)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Source file {} not found", .path.display())]
    SourceNotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Source file {} could not be read", .path.display())]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Ensuring container {container} failed")]
    ContainerCreateFailed {
        container: String,
        #[source]
        source: StorageError,
    },

    #[error("Upload of {key} to {container} failed")]
    UploadFailed {
        container: String,
        key: String,
        #[source]
        source: StorageError,
    },

    #[error("Recognition failed for key {key}")]
    RecognitionFailed {
        key: String,
        #[source]
        source: ServiceError,
    },

    #[error("Storing text at {key} failed")]
    TextPersistFailed {
        key: String,
        #[source]
        source: StorageError,
    },

    #[error("Speech synthesis failed for {text_length} characters of text")]
    SynthesisFailed {
        text_length: usize,
        #[source]
        source: ServiceError,
    },

    #[error("Persisting audio to {destination} failed")]
    AudioPersistFailed {
        destination: String,
        #[source]
        source: StorageError,
    },

    #[error("Stage {stage} is not implemented")]
    NotImplemented {
        stage: PipelineStage,
        #[source]
        source: ServiceError,
    },
}

/// Result type for pipeline steps
pub type PipelineResult<T> = Result<T, PipelineError>;

impl PipelineError {
    /// Step that produced this error, when it maps onto one.
    pub fn stage(&self) -> Option<PipelineStage> {
        match self {
            PipelineError::Config(_) => None,
            PipelineError::SourceNotFound { .. } | PipelineError::SourceUnreadable { .. } => {
                Some(PipelineStage::OpenSource)
            }
            PipelineError::ContainerCreateFailed { .. } => Some(PipelineStage::EnsureContainer),
            PipelineError::UploadFailed { .. } => Some(PipelineStage::Upload),
            PipelineError::RecognitionFailed { .. } => Some(PipelineStage::RecognizeText),
            PipelineError::TextPersistFailed { .. } => Some(PipelineStage::StoreText),
            PipelineError::SynthesisFailed { .. } => Some(PipelineStage::SynthesizeSpeech),
            PipelineError::AudioPersistFailed { .. } => Some(PipelineStage::PersistAudio),
            PipelineError::NotImplemented { stage, .. } => Some(*stage),
        }
    }

    /// Wrap a service failure, keeping unwired stages distinguishable.
    pub(crate) fn from_service(
        stage: PipelineStage,
        source: ServiceError,
        wrap: impl FnOnce(ServiceError) -> PipelineError,
    ) -> PipelineError {
        if source.is_not_implemented() {
            PipelineError::NotImplemented { stage, source }
        } else {
            wrap(source)
        }
    }
}

/// Static metadata for each variant: (error_code, recoverable, suggested_action, log_level).
fn pipeline_error_static_metadata(
    err: &PipelineError,
) -> (&'static str, bool, Option<&'static str>, LogLevel) {
    match err {
        PipelineError::Config(_) => (
            "CONFIG_INVALID",
            false,
            Some("Check the environment variables and .env file"),
            LogLevel::Error,
        ),
        PipelineError::SourceNotFound { .. } => (
            "SOURCE_NOT_FOUND",
            false,
            Some("Place the source image in the working directory or set SOURCE_FILE"),
            LogLevel::Warn,
        ),
        PipelineError::SourceUnreadable { .. } => (
            "SOURCE_UNREADABLE",
            false,
            Some("Check file permissions on the source image"),
            LogLevel::Error,
        ),
        PipelineError::ContainerCreateFailed { .. } => (
            "CONTAINER_CREATE_FAILED",
            true,
            Some("Check credentials and that the bucket name is not taken"),
            LogLevel::Error,
        ),
        PipelineError::UploadFailed { .. } => (
            "UPLOAD_FAILED",
            true,
            Some("Retry the run"),
            LogLevel::Error,
        ),
        PipelineError::RecognitionFailed { source, .. } => (
            "RECOGNITION_FAILED",
            !matches!(source, ServiceError::Rejected { .. }),
            Some("Check that the image is a supported format (PNG, JPEG, PDF, TIFF)"),
            LogLevel::Error,
        ),
        PipelineError::TextPersistFailed { .. } => (
            "TEXT_PERSIST_FAILED",
            true,
            Some("Retry the run"),
            LogLevel::Error,
        ),
        PipelineError::SynthesisFailed { source, .. } => (
            "SYNTHESIS_FAILED",
            !matches!(source, ServiceError::Rejected { .. }),
            Some("Check the configured voice and language, and the text length"),
            LogLevel::Error,
        ),
        PipelineError::AudioPersistFailed { .. } => (
            "AUDIO_PERSIST_FAILED",
            true,
            Some("Check that the audio destination is writable"),
            LogLevel::Error,
        ),
        PipelineError::NotImplemented { .. } => (
            "NOT_IMPLEMENTED",
            false,
            Some("Configure a provider for this stage"),
            LogLevel::Warn,
        ),
    }
}

impl ErrorMetadata for PipelineError {
    fn error_code(&self) -> &'static str {
        pipeline_error_static_metadata(self).0
    }

    fn is_recoverable(&self) -> bool {
        pipeline_error_static_metadata(self).1
    }

    fn suggested_action(&self) -> Option<&'static str> {
        pipeline_error_static_metadata(self).2
    }

    fn log_level(&self) -> LogLevel {
        pipeline_error_static_metadata(self).3
    }
}
