use std::sync::Arc;

use aws_config::SdkConfig;
use sketchvoice_core::{PipelineConfig, RecognitionProvider, SpeechProvider};

use crate::recognition::{TextRecognizer, UnwiredRecognizer};
use crate::speech::{SpeechSynthesizer, UnwiredSynthesizer};

/// Create the text recognizer selected by `RECOGNITION_PROVIDER`.
#[cfg(feature = "recognition-textract")]
pub fn create_recognizer(
    config: &PipelineConfig,
    sdk_config: &SdkConfig,
) -> Arc<dyn TextRecognizer> {
    match config.recognition_provider {
        RecognitionProvider::Textract => {
            Arc::new(crate::recognition::textract::TextractRecognizer::new(sdk_config))
        }
        RecognitionProvider::Disabled => {
            tracing::warn!("Text recognition is disabled; runs will stop after the upload step");
            Arc::new(UnwiredRecognizer)
        }
    }
}

/// Create the text recognizer selected by `RECOGNITION_PROVIDER`.
///
/// Without the `recognition-textract` feature every provider is unwired.
#[cfg(not(feature = "recognition-textract"))]
pub fn create_recognizer(
    config: &PipelineConfig,
    _sdk_config: &SdkConfig,
) -> Arc<dyn TextRecognizer> {
    if config.recognition_provider != RecognitionProvider::Disabled {
        tracing::warn!(
            provider = ?config.recognition_provider,
            "Recognition provider not compiled in (recognition-textract feature not enabled)"
        );
    }
    Arc::new(UnwiredRecognizer)
}

/// Create the speech synthesizer selected by `SPEECH_PROVIDER`.
#[cfg(feature = "speech-polly")]
pub fn create_synthesizer(
    config: &PipelineConfig,
    sdk_config: &SdkConfig,
) -> Arc<dyn SpeechSynthesizer> {
    match config.speech_provider {
        SpeechProvider::Polly => Arc::new(crate::speech::polly::PollySynthesizer::new(sdk_config)),
        SpeechProvider::Disabled => {
            tracing::warn!("Speech synthesis is disabled; runs will stop after the text is stored");
            Arc::new(UnwiredSynthesizer)
        }
    }
}

/// Create the speech synthesizer selected by `SPEECH_PROVIDER`.
///
/// Without the `speech-polly` feature every provider is unwired.
#[cfg(not(feature = "speech-polly"))]
pub fn create_synthesizer(
    config: &PipelineConfig,
    _sdk_config: &SdkConfig,
) -> Arc<dyn SpeechSynthesizer> {
    if config.speech_provider != SpeechProvider::Disabled {
        tracing::warn!(
            provider = ?config.speech_provider,
            "Speech provider not compiled in (speech-polly feature not enabled)"
        );
    }
    Arc::new(UnwiredSynthesizer)
}
