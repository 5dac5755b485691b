//! Translation with a dedicated service first and the LLM as fallback.

use std::sync::Arc;

use tracing::{debug, warn};

use super::dispatcher::truncate_chars;
use super::error::AnalysisError;
use super::language::Language;
use super::prompts;
use crate::llm::TextGenerator;
use crate::translate::TranslationService;

/// Characters of text sent through the LLM fallback.
const LLM_TRANSLATE_BUDGET: usize = 8000;

#[derive(Clone)]
pub struct Translator {
    llm: Arc<dyn TextGenerator>,
    service: Option<Arc<dyn TranslationService>>,
}

impl Translator {
    pub fn new(llm: Arc<dyn TextGenerator>, service: Option<Arc<dyn TranslationService>>) -> Self {
        Self { llm, service }
    }

    pub fn has_service(&self) -> bool {
        self.service.is_some()
    }

    /// Translate `text` into `language`.
    ///
    /// English and empty input are returned unchanged without any remote
    /// call. The translation service is tried once; if it is missing or
    /// fails, the LLM is asked instead.
    pub async fn translate(&self, text: &str, language: Language) -> Result<String, AnalysisError> {
        if language.is_english() || text.is_empty() {
            return Ok(text.to_string());
        }

        if let Some(service) = &self.service {
            match service.translate(text, language.iso_code()).await {
                Ok(translated) => return Ok(translated),
                Err(e) => warn!(
                    "{} failed for {}, falling back to LLM: {}",
                    service.name(),
                    language,
                    e
                ),
            }
        }

        debug!("Translating {} chars to {} via LLM", text.chars().count(), language);
        let prompt = prompts::translate(language, truncate_chars(text, LLM_TRANSLATE_BUDGET));
        self.llm
            .generate(&prompt)
            .await
            .map(|response| response.trim().to_string())
            .map_err(|source| AnalysisError::Translation { language, source })
    }
}
