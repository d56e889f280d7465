//! Summary of a completed run, printed by the CLI as JSON.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Where the audio of a run was written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase", tag = "kind")]
pub enum AudioLocation {
    File { path: PathBuf },
    Object { container: String, key: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub container: String,
    /// False when the container already existed.
    pub container_created: bool,
    pub sketch_key: String,
    pub sketch_bytes: u64,
    pub text_key: String,
    pub text_lines: usize,
    pub text_bytes: usize,
    pub audio: AudioLocation,
    pub audio_bytes: usize,
}
