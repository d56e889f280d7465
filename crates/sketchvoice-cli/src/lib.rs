//! Shared setup for the `sketch-to-voice` binary.

use std::path::PathBuf;

use aws_config::{BehaviorVersion, Region, SdkConfig};
use sketchvoice_core::{AudioDestination, ErrorMetadata, LogLevel, PipelineConfig};
use sketchvoice_pipeline::PipelineError;

/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

/// Log a failed run at the level its metadata asks for.
pub fn log_run_error(err: &PipelineError) {
    let error_code = err.error_code();
    let stage = err.stage().map(|stage| stage.to_string()).unwrap_or_default();
    let recoverable = err.is_recoverable();
    let suggested_action = err.suggested_action().unwrap_or("");

    match err.log_level() {
        LogLevel::Debug => {
            tracing::debug!(
                error = %err,
                error_code,
                %stage,
                recoverable,
                suggested_action,
                "Pipeline run failed"
            );
        }
        LogLevel::Warn => {
            tracing::warn!(
                error = %err,
                error_code,
                %stage,
                recoverable,
                suggested_action,
                "Pipeline run failed"
            );
        }
        LogLevel::Error => {
            tracing::error!(
                error = %err,
                error_code,
                %stage,
                recoverable,
                suggested_action,
                "Pipeline run failed"
            );
        }
    }
}

/// Load the shared AWS configuration once; every client is built from it.
///
/// Credentials come from the default provider chain. `region` overrides the
/// chain's region when set.
pub async fn load_aws_config(region: Option<&str>) -> SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());
    if let Some(region) = region {
        loader = loader.region(Region::new(region.to_string()));
    }
    loader.load().await
}

/// Command-line overrides applied on top of the environment configuration.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub source: Option<PathBuf>,
    pub bucket: Option<String>,
    pub audio_to_bucket: bool,
    pub audio_dir: Option<PathBuf>,
}

impl Overrides {
    pub fn apply(self, mut config: PipelineConfig) -> PipelineConfig {
        if let Some(source) = self.source {
            config.source_file = source;
        }
        if let Some(bucket) = self.bucket {
            config.bucket = bucket;
        }
        if self.audio_to_bucket {
            config.audio_destination = AudioDestination::Bucket;
        } else if let Some(dir) = self.audio_dir {
            config.audio_destination = AudioDestination::Disk { dir };
        }
        config
    }
}
