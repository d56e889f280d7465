//! SketchVoice Pipeline
//!
//! The pipeline runner: open the source image, make sure the container exists,
//! upload, recognize text, store the text, synthesize speech and persist the
//! audio. Steps run strictly in order and the first failure aborts the run.

pub mod error;
pub mod report;
pub mod runner;
pub mod source;

#[cfg(test)]
mod test_support;

pub use error::{PipelineError, PipelineResult, PipelineStage};
pub use report::{AudioLocation, PipelineReport};
pub use runner::PipelineRunner;
pub use source::SourceDocument;
