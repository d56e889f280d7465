//! SketchVoice Core Library
//!
//! This crate provides the configuration, shared enums and error metadata
//! used by every SketchVoice component.

pub mod config;
pub mod error;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::PipelineConfig;
pub use error::{ErrorMetadata, LogLevel};
pub use models::{AudioDestination, AudioFormat, RecognitionProvider, SpeechProvider, VoiceSettings};
pub use storage_types::StorageBackend;
