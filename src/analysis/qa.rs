//! Question answering over the extracted text.

use std::sync::Arc;

use super::dispatcher::truncate_chars;
use super::document_type::DocumentType;
use super::error::AnalysisError;
use super::language::Language;
use super::prompts;
use crate::llm::TextGenerator;

/// Characters of document context included with a question.
const CONTEXT_BUDGET: usize = 12000;

/// Answers free-form questions about the loaded documents. Each question
/// is independent; earlier turns are not sent back to the model.
#[derive(Clone)]
pub struct QuestionAnswerer {
    llm: Arc<dyn TextGenerator>,
}

impl QuestionAnswerer {
    pub fn new(llm: Arc<dyn TextGenerator>) -> Self {
        Self { llm }
    }

    pub async fn answer(
        &self,
        question: &str,
        context: &str,
        language: Language,
        doc_type: &DocumentType,
    ) -> Result<String, AnalysisError> {
        if context.is_empty() {
            return Err(AnalysisError::NoContent);
        }

        let prompt = prompts::question(
            doc_type,
            truncate_chars(context, CONTEXT_BUDGET),
            question,
            language,
        );
        self.llm
            .generate(&prompt)
            .await
            .map(|response| response.trim().to_string())
            .map_err(AnalysisError::Question)
    }
}
