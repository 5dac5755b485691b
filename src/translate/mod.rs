//! Dedicated machine translation services.

mod google;

use async_trait::async_trait;
use thiserror::Error;

pub use google::GoogleTranslate;

/// Errors from a translation service.
#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("Translation API error: {0}")]
    Api(String),

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("No translation returned")]
    Empty,
}

/// A service that translates text into a target ISO 639-1 language code.
#[async_trait]
pub trait TranslationService: Send + Sync {
    fn name(&self) -> &'static str;

    async fn translate(&self, text: &str, target_code: &str) -> Result<String, TranslateError>;
}
