//! Document type classification.

use std::sync::Arc;

use tracing::{debug, warn};

use super::dispatcher::truncate_chars;
use super::document_type::DocumentType;
use super::error::AnalysisError;
use super::prompts;
use crate::llm::TextGenerator;

/// Characters of document text shown to the classifier.
const CLASSIFY_BUDGET: usize = 1000;

/// Labels documents with one of the known categories.
#[derive(Clone)]
pub struct DocumentClassifier {
    llm: Arc<dyn TextGenerator>,
}

impl DocumentClassifier {
    pub fn new(llm: Arc<dyn TextGenerator>) -> Self {
        Self { llm }
    }

    pub async fn classify(&self, text: &str) -> Result<DocumentType, AnalysisError> {
        let prompt = prompts::classify(truncate_chars(text, CLASSIFY_BUDGET));
        let label = self
            .llm
            .generate(&prompt)
            .await
            .map_err(AnalysisError::Classification)?;

        let doc_type = DocumentType::from_label(label.trim());
        debug!("Classified as {:?}: {}", doc_type.category, doc_type.label);
        Ok(doc_type)
    }

    /// Classify, degrading to an unclassified placeholder on failure.
    pub async fn classify_or_placeholder(&self, text: &str) -> DocumentType {
        match self.classify(text).await {
            Ok(doc_type) => doc_type,
            Err(AnalysisError::Classification(e)) => {
                warn!("Document classification failed: {}", e);
                DocumentType::unclassified(&e)
            }
            Err(e) => {
                warn!("Document classification failed: {}", e);
                DocumentType {
                    label: e.to_string(),
                    ..DocumentType::empty()
                }
            }
        }
    }
}
