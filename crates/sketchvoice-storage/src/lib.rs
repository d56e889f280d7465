//! SketchVoice Storage Library
//!
//! This crate provides the storage abstraction used by the pipeline and its
//! implementations for S3 and the local filesystem.
//!
//! # Storage key format
//!
//! Objects are addressed by `(container, key)`. Keys are namespaced by a
//! configurable prefix:
//!
//! - **Sketch**: `{sketch_prefix}/{filename}`
//! - **Text**: `{text_prefix}/{filename}.txt`
//! - **Audio**: `{audio_prefix}/{filename}.{ext}`
//!
//! Keys must not contain `..` or a leading `/`. Key generation is centralized in the
//! `keys` module so all backends stay consistent.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use sketchvoice_core::StorageBackend;
pub use traits::{Storage, StorageError, StorageResult};
