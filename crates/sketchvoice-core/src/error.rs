//! Error metadata shared across components
//!
//! Concrete error enums live next to the code that produces them
//! (`StorageError`, `ServiceError`, `PipelineError`). This module only defines
//! how an error describes itself to the CLI and to the logs.

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like a missing input file
    Debug,
    /// Warning level - for rejections that a user can fix
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error reporting - defines how an error should be presented
pub trait ErrorMetadata {
    /// Machine-readable error code (e.g., "SOURCE_NOT_FOUND")
    fn error_code(&self) -> &'static str;

    /// Whether re-running the pipeline might succeed without changes
    fn is_recoverable(&self) -> bool;

    /// Suggested action for the operator
    fn suggested_action(&self) -> Option<&'static str>;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}
