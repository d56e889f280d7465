//! SketchVoice Services
//!
//! Adapters for the managed services the pipeline calls: text recognition
//! (OCR) and speech synthesis. Each service sits behind a trait so the
//! pipeline can run against in-process fakes, and each trait has an
//! "unwired" implementation that fails with `ServiceError::NotImplemented`.

pub mod error;
pub mod factory;
pub mod recognition;
pub mod speech;

pub use error::{ServiceError, ServiceResult};
pub use factory::{create_recognizer, create_synthesizer};
pub use recognition::{join_fragments, TextRecognizer, UnwiredRecognizer};
pub use speech::{SpeechRequest, SpeechSynthesizer, UnwiredSynthesizer};

#[cfg(feature = "recognition-textract")]
pub use recognition::textract::TextractRecognizer;
#[cfg(feature = "speech-polly")]
pub use speech::polly::PollySynthesizer;
