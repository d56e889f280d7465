//! AWS Textract text recognition

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_textract::error::DisplayErrorContext;
use aws_sdk_textract::types::{Block, BlockType, Document, S3Object};
use aws_sdk_textract::Client as TextractClient;
use std::fmt::{Debug, Formatter, Result as FmtResult};

use super::TextRecognizer;
use crate::error::{ServiceError, ServiceResult};

const SERVICE: &str = "textract";

/// Runs `DetectDocumentText` against an object stored in S3.
#[derive(Clone)]
pub struct TextractRecognizer {
    client: TextractClient,
}

impl Debug for TextractRecognizer {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("TextractRecognizer").finish()
    }
}

impl TextractRecognizer {
    pub fn new(sdk_config: &SdkConfig) -> Self {
        Self {
            client: TextractClient::new(sdk_config),
        }
    }
}

/// Text of every LINE block, in response order.
///
/// PAGE blocks carry no text and WORD blocks repeat the line content, so both
/// are skipped.
fn line_fragments(blocks: &[Block]) -> Vec<String> {
    blocks
        .iter()
        .filter(|block| block.block_type() == Some(&BlockType::Line))
        .filter_map(|block| block.text().map(String::from))
        .collect()
}

#[async_trait]
impl TextRecognizer for TextractRecognizer {
    fn name(&self) -> &'static str {
        SERVICE
    }

    #[tracing::instrument(skip(self), fields(
        aws.service.name = "textract",
        aws.textract.operation = "DetectDocumentText"
    ))]
    async fn detect_text(&self, container: &str, storage_key: &str) -> ServiceResult<Vec<String>> {
        let start = std::time::Instant::now();

        let document = Document::builder()
            .s3_object(S3Object::builder().bucket(container).name(storage_key).build())
            .build();

        let output = self
            .client
            .detect_document_text()
            .document(document)
            .send()
            .await
            .map_err(|e| {
                let service_error = e.into_service_error();
                let message = DisplayErrorContext(&service_error).to_string();
                tracing::error!(
                    error = %message,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Textract detect document text failed"
                );

                let rejected = service_error.is_bad_document_exception()
                    || service_error.is_unsupported_document_exception()
                    || service_error.is_document_too_large_exception()
                    || service_error.is_invalid_s3_object_exception()
                    || service_error.is_invalid_parameter_exception();
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

        let fragments = line_fragments(output.blocks());

        tracing::info!(
            block_count = output.blocks().len(),
            line_count = fragments.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Textract text detection completed"
        );

        Ok(fragments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(block_type: BlockType, text: Option<&str>) -> Block {
        let mut builder = Block::builder().block_type(block_type);
        if let Some(text) = text {
            builder = builder.text(text);
        }
        builder.build()
    }

    #[test]
    fn keeps_only_line_blocks_in_order() {
        let blocks = vec![
            block(BlockType::Page, None),
            block(BlockType::Line, Some("Hello")),
            block(BlockType::Word, Some("Hello")),
            block(BlockType::Line, Some("World")),
            block(BlockType::Word, Some("World")),
        ];

        assert_eq!(line_fragments(&blocks), vec!["Hello", "World"]);
    }

    #[test]
    fn line_without_text_is_skipped() {
        let blocks = vec![block(BlockType::Line, None), block(BlockType::Line, Some("ok"))];
        assert_eq!(line_fragments(&blocks), vec!["ok"]);
    }

    #[test]
    fn empty_response_yields_no_fragments() {
        assert!(line_fragments(&[]).is_empty());
    }
}
