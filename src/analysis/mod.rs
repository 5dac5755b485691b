//! LLM-backed document analysis.
//!
//! Every component takes the text generator as an injected
//! `Arc<dyn TextGenerator>`, so tests can substitute scripted models.

mod classifier;
mod dispatcher;
mod document_type;
mod error;
mod language;
mod prompts;
mod qa;
mod translator;

use std::sync::Arc;

pub use classifier::DocumentClassifier;
pub use dispatcher::{compose_prompt, truncate_chars, Operation, PromptDispatcher};
pub use document_type::{DocumentCategory, DocumentType};
pub use error::AnalysisError;
pub use language::Language;
pub use qa::QuestionAnswerer;
pub use translator::Translator;

use crate::llm::TextGenerator;
use crate::translate::TranslationService;

/// All analysis components sharing one generator.
#[derive(Clone)]
pub struct Analyzer {
    pub classifier: DocumentClassifier,
    pub dispatcher: PromptDispatcher,
    pub translator: Translator,
    pub qa: QuestionAnswerer,
}

impl Analyzer {
    pub fn new(
        llm: Arc<dyn TextGenerator>,
        translation: Option<Arc<dyn TranslationService>>,
    ) -> Self {
        Self {
            classifier: DocumentClassifier::new(llm.clone()),
            dispatcher: PromptDispatcher::new(llm.clone()),
            translator: Translator::new(llm.clone(), translation),
            qa: QuestionAnswerer::new(llm),
        }
    }
}
