//! Shared key generation for storage backends.
//!
//! Key format: `{prefix}/{filename}` for the uploaded sketch,
//! `{prefix}/{filename}.txt` for recognized text and
//! `{prefix}/{filename}.{ext}` for synthesized audio.

use crate::traits::{StorageError, StorageResult};
use std::path::Path;

/// Key of the uploaded source image.
pub fn sketch_key(prefix: &str, filename: &str) -> String {
    format!("{}/{}", prefix, filename)
}

/// Key of the recognized text object.
pub fn text_key(prefix: &str, filename: &str) -> String {
    format!("{}/{}.txt", prefix, filename)
}

/// Key (or local file name when `prefix` is empty) of the synthesized audio.
pub fn audio_key(prefix: &str, filename: &str, extension: &str) -> String {
    if prefix.is_empty() {
        format!("{}.{}", filename, extension)
    } else {
        format!("{}/{}.{}", prefix, filename, extension)
    }
}

/// Reject keys that could escape a container on path-based backends.
pub fn validate_key(storage_key: &str) -> StorageResult<()> {
    if storage_key.is_empty() {
        return Err(StorageError::InvalidKey("Storage key is empty".to_string()));
    }
    let traversal = storage_key.split('/').any(|segment| segment == "..");
    if traversal || storage_key.starts_with('/') || storage_key.contains('\\') {
        return Err(StorageError::InvalidKey(format!(
            "Storage key contains invalid characters: {}",
            storage_key
        )));
    }
    Ok(())
}

/// Detect MIME type by file extension.
pub fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "tiff" | "tif" => "image/tiff",
        "pdf" => "application/pdf",
        "txt" => "text/plain",
        _ => "application/octet-stream",
    }
}
