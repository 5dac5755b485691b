//! OCR backend abstraction.

use async_trait::async_trait;
use thiserror::Error;

/// Errors from OCR backends.
#[derive(Debug, Error)]
pub enum OcrError {
    #[error("Unsupported content type: {0}")]
    UnsupportedContent(String),

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("{backend} API error: {message}")]
    Api {
        backend: &'static str,
        message: String,
    },

    #[error("Failed to parse response: {0}")]
    Parse(String),
}

/// Trait for OCR backends.
///
/// Backends receive the raw uploaded bytes (a whole PDF or an image) and
/// return the full-text annotation. An empty string means the backend ran
/// but found no text.
#[async_trait]
pub trait OcrBackend: Send + Sync {
    /// Short backend name for logs.
    fn name(&self) -> &'static str;

    /// Run text detection over the given document bytes.
    async fn detect_text(&self, content: &[u8]) -> Result<String, OcrError>;
}
