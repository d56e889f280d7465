//! Source image handle

use std::io;
use std::path::{Path, PathBuf};
use std::pin::Pin;

use sketchvoice_storage::keys::content_type_for;
use tokio::fs::File;
use tokio::io::AsyncRead;

use crate::error::{PipelineError, PipelineResult};

/// An opened source image. The file stays open until it is uploaded.
#[derive(Debug)]
pub struct SourceDocument {
    path: PathBuf,
    filename: String,
    content_type: &'static str,
    size_bytes: u64,
    file: File,
}

impl SourceDocument {
    /// Open `path` for reading. Nothing remote is touched here, so a missing
    /// file stops the run before any network call.
    pub async fn open(path: &Path, filename: &str) -> PipelineResult<Self> {
        let file = File::open(path).await.map_err(|source| open_error(path, source))?;
        let size_bytes = file
            .metadata()
            .await
            .map_err(|source| open_error(path, source))?
            .len();

        Ok(Self {
            path: path.to_path_buf(),
            filename: filename.to_string(),
            content_type: content_type_for(path),
            size_bytes,
            file,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn content_type(&self) -> &'static str {
        self.content_type
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    pub fn into_reader(self) -> Pin<Box<dyn AsyncRead + Send + Unpin>> {
        Box::pin(self.file)
    }
}

fn open_error(path: &Path, source: io::Error) -> PipelineError {
    match source.kind() {
        io::ErrorKind::NotFound => PipelineError::SourceNotFound {
            path: path.to_path_buf(),
            source,
        },
        _ => PipelineError::SourceUnreadable {
            path: path.to_path_buf(),
            source,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;

    #[tokio::test]
    async fn opens_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.png");
        tokio::fs::write(&path, b"\x89PNG fake").await.unwrap();

        let source = SourceDocument::open(&path, "sample.png").await.unwrap();
        assert_eq!(source.filename(), "sample.png");
        assert_eq!(source.content_type(), "image/png");
        assert_eq!(source.size_bytes(), 9);

        let mut buf = Vec::new();
        source.into_reader().read_to_end(&mut buf).await.unwrap();
        assert_eq!(buf, b"\x89PNG fake");
    }

    #[tokio::test]
    async fn missing_file_is_source_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.png");

        let err = SourceDocument::open(&path, "sample.png").await.unwrap_err();
        assert!(matches!(err, PipelineError::SourceNotFound { .. }));
    }

    #[tokio::test]
    async fn directory_is_not_a_readable_source() {
        let dir = tempfile::tempdir().unwrap();

        // Opening a directory succeeds on some platforms; reading it never does.
        match SourceDocument::open(dir.path(), "dir").await {
            Err(err) => assert!(matches!(err, PipelineError::SourceUnreadable { .. })),
            Ok(source) => {
                let mut buf = Vec::new();
                assert!(source.into_reader().read_to_end(&mut buf).await.is_err());
            }
        }
    }
}
