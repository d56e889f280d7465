//! Configuration module
//!
//! `PipelineConfig` holds every name the pipeline uses (source file, bucket,
//! key prefixes, voice) together with backend selection. Defaults reproduce the
//! historical fixed names; each field can be overridden from the environment
//! (optionally through a `.env` file).

use std::env;
use std::path::{Path, PathBuf};

use crate::models::{
    AudioDestination, AudioFormat, RecognitionProvider, SpeechProvider, VoiceSettings,
};
use crate::storage_types::StorageBackend;

// Common constants
pub const DEFAULT_SOURCE_FILE: &str = "sample.png";
pub const DEFAULT_BUCKET: &str = "project-sketch-to-voice";
pub const DEFAULT_SKETCH_PREFIX: &str = "sketch";
pub const DEFAULT_TEXT_PREFIX: &str = "text";
pub const DEFAULT_AUDIO_PREFIX: &str = "audio";

const MIN_BUCKET_NAME_LEN: usize = 3;
const MAX_BUCKET_NAME_LEN: usize = 63;

/// Pipeline configuration, built once at startup and handed to the runner.
#[derive(Clone, Debug)]
pub struct PipelineConfig {
    /// Local image to process, relative to the working directory
    pub source_file: PathBuf,
    /// Container (bucket) receiving every stored object
    pub bucket: String,
    pub sketch_prefix: String,
    pub text_prefix: String,
    pub audio_prefix: String,
    pub voice: VoiceSettings,
    pub audio_destination: AudioDestination,
    // Backend selection
    pub storage_backend: StorageBackend,
    pub recognition_provider: RecognitionProvider,
    pub speech_provider: SpeechProvider,
    // AWS settings. Credentials come from the SDK default provider chain.
    pub aws_region: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers (MinIO, etc.)
    pub local_storage_path: Option<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            source_file: PathBuf::from(DEFAULT_SOURCE_FILE),
            bucket: DEFAULT_BUCKET.to_string(),
            sketch_prefix: DEFAULT_SKETCH_PREFIX.to_string(),
            text_prefix: DEFAULT_TEXT_PREFIX.to_string(),
            audio_prefix: DEFAULT_AUDIO_PREFIX.to_string(),
            voice: VoiceSettings::default(),
            audio_destination: AudioDestination::default(),
            storage_backend: StorageBackend::default(),
            recognition_provider: RecognitionProvider::default(),
            speech_provider: SpeechProvider::default(),
            aws_region: None,
            s3_region: None,
            s3_endpoint: None,
            local_storage_path: None,
        }
    }
}

impl PipelineConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build a configuration from an arbitrary variable source.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|s| !s.trim().is_empty());
        let defaults = VoiceSettings::default();

        let output_format = match var("SPEECH_OUTPUT_FORMAT") {
            Some(s) => s
                .parse::<AudioFormat>()
                .map_err(|e| anyhow::anyhow!("SPEECH_OUTPUT_FORMAT: {}", e))?,
            None => defaults.output_format,
        };

        let audio_destination = match var("AUDIO_DESTINATION").map(|s| s.to_lowercase()) {
            None => AudioDestination::Disk {
                dir: var("AUDIO_OUTPUT_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from(".")),
            },
            Some(s) if s == "disk" => AudioDestination::Disk {
                dir: var("AUDIO_OUTPUT_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from(".")),
            },
            Some(s) if s == "bucket" || s == "s3" => AudioDestination::Bucket,
            Some(other) => {
                return Err(anyhow::anyhow!(
                    "AUDIO_DESTINATION must be 'disk' or 'bucket', got '{}'",
                    other
                ))
            }
        };

        let storage_backend = match var("STORAGE_BACKEND") {
            Some(s) => s.parse()?,
            None => StorageBackend::S3,
        };
        let recognition_provider = match var("RECOGNITION_PROVIDER") {
            Some(s) => s.parse()?,
            None => RecognitionProvider::Textract,
        };
        let speech_provider = match var("SPEECH_PROVIDER") {
            Some(s) => s.parse()?,
            None => SpeechProvider::Polly,
        };

        let config = PipelineConfig {
            source_file: var("SOURCE_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SOURCE_FILE)),
            bucket: var("S3_BUCKET").unwrap_or_else(|| DEFAULT_BUCKET.to_string()),
            sketch_prefix: var("SKETCH_PREFIX")
                .unwrap_or_else(|| DEFAULT_SKETCH_PREFIX.to_string()),
            text_prefix: var("TEXT_PREFIX").unwrap_or_else(|| DEFAULT_TEXT_PREFIX.to_string()),
            audio_prefix: var("AUDIO_PREFIX").unwrap_or_else(|| DEFAULT_AUDIO_PREFIX.to_string()),
            voice: VoiceSettings {
                language_code: var("SPEECH_LANGUAGE_CODE").unwrap_or(defaults.language_code),
                voice_id: var("SPEECH_VOICE_ID").unwrap_or(defaults.voice_id),
                output_format,
            },
            audio_destination,
            storage_backend,
            recognition_provider,
            speech_provider,
            aws_region: var("AWS_REGION"),
            s3_region: var("S3_REGION"),
            s3_endpoint: var("S3_ENDPOINT"),
            local_storage_path: var("LOCAL_STORAGE_PATH"),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.source_filename().is_none() {
            return Err(anyhow::anyhow!(
                "SOURCE_FILE must name a file, got '{}'",
                self.source_file.display()
            ));
        }

        validate_bucket_name(&self.bucket)?;

        for (name, prefix) in [
            ("SKETCH_PREFIX", &self.sketch_prefix),
            ("TEXT_PREFIX", &self.text_prefix),
            ("AUDIO_PREFIX", &self.audio_prefix),
        ] {
            if prefix.is_empty() || prefix.starts_with('/') || prefix.ends_with('/') {
                return Err(anyhow::anyhow!(
                    "{} must be non-empty and must not start or end with '/'",
                    name
                ));
            }
            if prefix.split('/').any(|segment| segment == "..") {
                return Err(anyhow::anyhow!("{} must not contain a '..' segment", name));
            }
        }

        if self.voice.language_code.is_empty() || self.voice.voice_id.is_empty() {
            return Err(anyhow::anyhow!(
                "SPEECH_LANGUAGE_CODE and SPEECH_VOICE_ID must not be empty"
            ));
        }

        if self.storage_backend == StorageBackend::Local && self.local_storage_path.is_none() {
            return Err(anyhow::anyhow!(
                "LOCAL_STORAGE_PATH must be set when using local storage backend"
            ));
        }

        Ok(())
    }

    /// File name component of the source path; used to build every object key.
    pub fn source_filename(&self) -> Option<&str> {
        self.source_file
            .file_name()
            .and_then(|name| name.to_str())
            .filter(|name| *name != "..")
    }

    /// Region for S3 requests: `S3_REGION`, falling back to `AWS_REGION`.
    pub fn s3_region(&self) -> Option<&str> {
        self.s3_region.as_deref().or(self.aws_region.as_deref())
    }

    pub fn aws_region(&self) -> Option<&str> {
        self.aws_region.as_deref()
    }

    pub fn local_storage_path(&self) -> Option<&Path> {
        self.local_storage_path.as_deref().map(Path::new)
    }
}

/// Check the S3 bucket naming rules that apply to every region.
pub fn validate_bucket_name(bucket: &str) -> Result<(), anyhow::Error> {
    if bucket.len() < MIN_BUCKET_NAME_LEN || bucket.len() > MAX_BUCKET_NAME_LEN {
        return Err(anyhow::anyhow!(
            "S3_BUCKET must be between {} and {} characters long",
            MIN_BUCKET_NAME_LEN,
            MAX_BUCKET_NAME_LEN
        ));
    }

    let valid_chars = bucket
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '.');
    let valid_edges = bucket
        .chars()
        .next()
        .zip(bucket.chars().last())
        .map(|(first, last)| first.is_ascii_alphanumeric() && last.is_ascii_alphanumeric())
        .unwrap_or(false);

    if !valid_chars || !valid_edges || bucket.contains("..") {
        return Err(anyhow::anyhow!(
            "S3_BUCKET '{}' is not a valid bucket name (lowercase letters, digits, '-' and '.')",
            bucket
        ));
    }

    Ok(())
}
