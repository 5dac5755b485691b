//! End-to-end document flow shared by the CLI and the HTTP server.

use std::sync::Arc;

use tracing::info;

use crate::analysis::{truncate_chars, Analyzer, DocumentType, Language, Operation};
use crate::config::{Capabilities, Settings};
use crate::llm::{LlmClient, TextGenerator};
use crate::ocr::{OcrBackend, TextExtractor, UploadedDocument, VisionOcr};
use crate::session::AnalysisResult;
use crate::translate::{GoogleTranslate, TranslationService};

/// Characters of extracted text covered by the "Translation" action.
pub const TRANSLATE_EXCERPT_CHARS: usize = 4000;

/// History label for the translate action.
pub const TRANSLATION_LABEL: &str = "Translation";

/// Extracted and classified document batch.
#[derive(Debug, Clone)]
pub struct IngestedBatch {
    pub text: String,
    pub doc_type: DocumentType,
    pub documents: usize,
}

pub struct DocumentPipeline {
    extractor: TextExtractor,
    analyzer: Analyzer,
    capabilities: Capabilities,
}

impl DocumentPipeline {
    pub fn new(extractor: TextExtractor, analyzer: Analyzer) -> Self {
        let capabilities = Capabilities {
            ocr: extractor.has_ocr(),
            translation: analyzer.translator.has_service(),
        };
        Self {
            extractor,
            analyzer,
            capabilities,
        }
    }

    /// Build the production pipeline from validated settings.
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let llm: Arc<dyn TextGenerator> = Arc::new(LlmClient::new(settings.llm.clone())?);
        let services = &settings.services;

        let ocr: Option<Arc<dyn OcrBackend>> = match services.ocr_key() {
            Some(key) => Some(Arc::new(VisionOcr::new(
                key,
                services.vision_endpoint.as_deref(),
                services.timeout(),
            )?)),
            None => None,
        };

        let translation: Option<Arc<dyn TranslationService>> = match services.translation_key() {
            Some(key) => Some(Arc::new(GoogleTranslate::new(
                key,
                services.translate_endpoint.as_deref(),
                services.timeout(),
            )?)),
            None => None,
        };

        info!(
            "Pipeline ready: llm={} ({}), ocr={}, translation={}",
            settings.llm.provider,
            settings.llm.model(),
            ocr.is_some(),
            translation.is_some()
        );

        Ok(Self::new(
            TextExtractor::with_ocr(ocr),
            Analyzer::new(llm, translation),
        ))
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    /// Extract text from a batch and classify it. Classification is skipped
    /// when nothing was extracted.
    pub async fn ingest(&self, batch: &[UploadedDocument]) -> IngestedBatch {
        let text = self.extractor.extract(batch).await;

        let doc_type = if has_content(&text) {
            self.analyzer.classifier.classify_or_placeholder(&text).await
        } else {
            DocumentType::empty()
        };

        info!(
            "Ingested {} document(s), {} chars, type: {}",
            batch.len(),
            text.chars().count(),
            doc_type.label
        );

        IngestedBatch {
            text,
            doc_type,
            documents: batch.len(),
        }
    }

    /// Run one operation, translating a successful result when a
    /// non-English language is requested. Errors are not translated.
    pub async fn analyze(
        &self,
        operation: Operation,
        text: &str,
        doc_type: &DocumentType,
        language: Language,
    ) -> AnalysisResult {
        let result = match self.analyzer.dispatcher.run(operation, text, doc_type).await {
            Ok(output) => self.analyzer.translator.translate(&output, language).await,
            Err(e) => Err(e),
        };
        AnalysisResult::from_result(operation.label(), result)
    }

    /// Translate the opening excerpt of the extracted text.
    pub async fn translate_excerpt(&self, text: &str, language: Language) -> AnalysisResult {
        let excerpt = truncate_chars(text, TRANSLATE_EXCERPT_CHARS);
        let result = self.analyzer.translator.translate(excerpt, language).await;
        AnalysisResult::from_result(TRANSLATION_LABEL, result)
    }

    /// Answer a question about the extracted text.
    pub async fn ask(
        &self,
        question: &str,
        text: &str,
        doc_type: &DocumentType,
        language: Language,
    ) -> AnalysisResult {
        let result = self
            .analyzer
            .qa
            .answer(question, text, language, doc_type)
            .await;
        AnalysisResult::from_result(question, result)
    }
}

/// Whether extracted text holds anything beyond separators and whitespace.
pub fn has_content(text: &str) -> bool {
    text.split(crate::ocr::END_OF_DOCUMENT)
        .any(|part| !part.trim().is_empty())
}
