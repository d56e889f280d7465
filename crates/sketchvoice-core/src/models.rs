//! Shared value types for the speech and recognition stages.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::PathBuf;
use std::str::FromStr;

/// Audio format produced by the speech stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioFormat {
    #[default]
    Mp3,
    OggVorbis,
    Pcm,
}

impl AudioFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Mp3 => "audio/mpeg",
            Self::OggVorbis => "audio/ogg",
            Self::Pcm => "audio/pcm",
        }
    }

    /// File extension (without the dot) for files and object keys.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::OggVorbis => "ogg",
            Self::Pcm => "pcm",
        }
    }

    /// Identifier used by the speech service wire format.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::OggVorbis => "ogg_vorbis",
            Self::Pcm => "pcm",
        }
    }
}

impl FromStr for AudioFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mp3" => Ok(AudioFormat::Mp3),
            "ogg_vorbis" | "ogg" => Ok(AudioFormat::OggVorbis),
            "pcm" => Ok(AudioFormat::Pcm),
            _ => Err(anyhow::anyhow!("Invalid audio output format: {}", s)),
        }
    }
}

impl Display for AudioFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Fixed language/voice/format triple sent with every synthesis request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceSettings {
    /// BCP-47 language code, e.g. "en-AU"
    pub language_code: String,
    /// Service voice identifier, e.g. "Aditi"
    pub voice_id: String,
    pub output_format: AudioFormat,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            language_code: "en-AU".to_string(),
            voice_id: "Aditi".to_string(),
            output_format: AudioFormat::Mp3,
        }
    }
}

/// Where synthesized audio ends up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind")]
pub enum AudioDestination {
    /// Local file inside `dir`, named `{source filename}.{ext}`.
    Disk { dir: PathBuf },
    /// Object under the audio prefix of the pipeline container.
    Bucket,
}

impl Default for AudioDestination {
    fn default() -> Self {
        AudioDestination::Disk {
            dir: PathBuf::from("."),
        }
    }
}

/// Text recognition backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecognitionProvider {
    #[default]
    Textract,
    /// Stage is not wired to a service; runs fail with `NotImplemented`.
    Disabled,
}

impl FromStr for RecognitionProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "textract" => Ok(RecognitionProvider::Textract),
            "disabled" | "none" => Ok(RecognitionProvider::Disabled),
            _ => Err(anyhow::anyhow!("Invalid recognition provider: {}", s)),
        }
    }
}

/// Speech synthesis backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeechProvider {
    #[default]
    Polly,
    /// Stage is not wired to a service; runs fail with `NotImplemented`.
    Disabled,
}

impl FromStr for SpeechProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "polly" => Ok(SpeechProvider::Polly),
            "disabled" | "none" => Ok(SpeechProvider::Disabled),
            _ => Err(anyhow::anyhow!("Invalid speech provider: {}", s)),
        }
    }
}
