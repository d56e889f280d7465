//! Speech synthesis (text-to-speech)

#[cfg(feature = "speech-polly")]
pub mod polly;

use async_trait::async_trait;
use bytes::Bytes;
use sketchvoice_core::VoiceSettings;

use crate::error::{ServiceError, ServiceResult};

/// A synthesis request: the text plus the fixed voice configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechRequest {
    pub text: String,
    pub voice: VoiceSettings,
}

/// Returns raw audio bytes in `request.voice.output_format`.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    fn name(&self) -> &'static str;

    async fn synthesize(&self, request: &SpeechRequest) -> ServiceResult<Bytes>;
}

/// Speech stage without a backing service.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnwiredSynthesizer;

#[async_trait]
impl SpeechSynthesizer for UnwiredSynthesizer {
    fn name(&self) -> &'static str {
        "unwired"
    }

    async fn synthesize(&self, _request: &SpeechRequest) -> ServiceResult<Bytes> {
        Err(ServiceError::NotImplemented {
            service: "speech synthesis",
        })
    }
}
