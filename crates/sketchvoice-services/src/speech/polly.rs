//! AWS Polly speech synthesis

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_polly::error::DisplayErrorContext;
use aws_sdk_polly::types::{LanguageCode, OutputFormat, TextType, VoiceId};
use aws_sdk_polly::Client as PollyClient;
use bytes::Bytes;
use sketchvoice_core::AudioFormat;
use std::fmt::{Debug, Formatter, Result as FmtResult};

use super::{SpeechRequest, SpeechSynthesizer};
use crate::error::{ServiceError, ServiceResult};

const SERVICE: &str = "polly";

/// Calls `SynthesizeSpeech` with plain-text input.
#[derive(Clone)]
pub struct PollySynthesizer {
    client: PollyClient,
}

impl Debug for PollySynthesizer {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("PollySynthesizer").finish()
    }
}

impl PollySynthesizer {
    pub fn new(sdk_config: &SdkConfig) -> Self {
        Self {
            client: PollyClient::new(sdk_config),
        }
    }
}

fn output_format(format: AudioFormat) -> OutputFormat {
    match format {
        AudioFormat::Mp3 => OutputFormat::Mp3,
        AudioFormat::OggVorbis => OutputFormat::OggVorbis,
        AudioFormat::Pcm => OutputFormat::Pcm,
    }
}

#[async_trait]
impl SpeechSynthesizer for PollySynthesizer {
    fn name(&self) -> &'static str {
        SERVICE
    }

    #[tracing::instrument(skip(self, request), fields(
        aws.service.name = "polly",
        aws.polly.operation = "SynthesizeSpeech",
        voice_id = %request.voice.voice_id,
        language_code = %request.voice.language_code,
        text_length = request.text.len()
    ))]
    async fn synthesize(&self, request: &SpeechRequest) -> ServiceResult<Bytes> {
        let start = std::time::Instant::now();

        let output = self
            .client
            .synthesize_speech()
            .text(&request.text)
            .text_type(TextType::Text)
            .language_code(LanguageCode::from(request.voice.language_code.as_str()))
            .voice_id(VoiceId::from(request.voice.voice_id.as_str()))
            .output_format(output_format(request.voice.output_format))
            .send()
            .await
            .map_err(|e| {
                let service_error = e.into_service_error();
                let message = DisplayErrorContext(&service_error).to_string();
                tracing::error!(
                    error = %message,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Polly synthesize speech failed"
                );

                let rejected = service_error.is_text_length_exceeded_exception()
                    || service_error.is_language_not_supported_exception()
                    || service_error.is_invalid_ssml_exception()
                    || service_error.is_engine_not_supported_exception()
                    || service_error.is_lexicon_not_found_exception();
                if rejected {
                    ServiceError::Rejected {
                        service: SERVICE,
                        message,
                    }
                } else {
                    ServiceError::Backend {
                        service: SERVICE,
                        message,
                    }
                }
            })?;

        let audio = output
            .audio_stream
            .collect()
            .await
            .map_err(|e| ServiceError::Backend {
                service: SERVICE,
                message: format!("Failed to read audio stream: {}", e),
            })?
            .into_bytes();

        tracing::info!(
            size_bytes = audio.len() as u64,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Polly speech synthesis completed"
        );

        Ok(audio)
    }
}
