//! Text recognition (OCR)

#[cfg(feature = "recognition-textract")]
pub mod textract;

use async_trait::async_trait;

use crate::error::{ServiceError, ServiceResult};

/// Detects text in an image that is already stored in a container.
#[async_trait]
pub trait TextRecognizer: Send + Sync {
    fn name(&self) -> &'static str;

    /// Return the recognized text fragments in the order the service reports them.
    async fn detect_text(&self, container: &str, storage_key: &str) -> ServiceResult<Vec<String>>;
}

/// Join fragments into one string, terminating each fragment with `\n`.
pub fn join_fragments<S: AsRef<str>>(fragments: &[S]) -> String {
    let capacity = fragments.iter().map(|f| f.as_ref().len() + 1).sum();
    let mut text = String::with_capacity(capacity);
    for fragment in fragments {
        text.push_str(fragment.as_ref());
        text.push('\n');
    }
    text
}

/// Recognition stage without a backing service.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnwiredRecognizer;

#[async_trait]
impl TextRecognizer for UnwiredRecognizer {
    fn name(&self) -> &'static str {
        "unwired"
    }

    async fn detect_text(
        &self,
        _container: &str,
        _storage_key: &str,
    ) -> ServiceResult<Vec<String>> {
        Err(ServiceError::NotImplemented {
            service: "text recognition",
        })
    }
}
