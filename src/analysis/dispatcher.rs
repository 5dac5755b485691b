//! Per-operation prompt composition and execution.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::document_type::DocumentType;
use super::error::AnalysisError;
use super::prompts;
use crate::llm::TextGenerator;

/// Document analysis operations backed by a single LLM prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    KeyEntities,
    Checklist,
    RiskAssessment,
    ExplainTerms,
    Summary,
    Simplify,
}

impl Operation {
    pub const ALL: [Operation; 6] = [
        Self::KeyEntities,
        Self::Checklist,
        Self::RiskAssessment,
        Self::ExplainTerms,
        Self::Summary,
        Self::Simplify,
    ];

    /// Label recorded in session history.
    pub fn label(&self) -> &'static str {
        match self {
            Self::KeyEntities => "Key Information",
            Self::Checklist => "Action Checklist",
            Self::RiskAssessment => "Risk Assessment",
            Self::ExplainTerms => "Explain Terms",
            Self::Summary => "Summary",
            Self::Simplify => "Simplified Text",
        }
    }

    /// Name used in the failure message.
    pub fn failure_name(&self) -> &'static str {
        match self {
            Self::KeyEntities => "Key entity extraction",
            Self::Checklist => "Checklist generation",
            Self::RiskAssessment => "Risk assessment",
            Self::ExplainTerms => "Term explanation",
            Self::Summary => "Document summary",
            Self::Simplify => "Text simplification",
        }
    }

    /// Number of document characters included in the prompt.
    pub fn budget(&self) -> usize {
        match self {
            Self::Summary => 8000,
            Self::Simplify => 6000,
            _ => 4000,
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// First `max_chars` characters of `text`, never splitting a code point.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Build the full prompt for an operation.
pub fn compose_prompt(operation: Operation, text: &str, doc_type: &DocumentType) -> String {
    let text = truncate_chars(text, operation.budget());
    let category = doc_type.category;

    match operation {
        Operation::KeyEntities => format!(
            "You are an expert legal/medical document analyst.\n\n{}\n\nDocument: {}\n\n{}",
            prompts::entities(category),
            text,
            prompts::ENTITIES_DIRECTIVE
        ),
        Operation::Checklist => format!(
            "{}\n\nDocument: {}\n\n{}",
            prompts::checklist(category),
            text,
            prompts::CHECKLIST_DIRECTIVE
        ),
        Operation::RiskAssessment => format!(
            "{}\n\nDocument: {}\n\n{}",
            prompts::risk(category),
            text,
            prompts::RISK_DIRECTIVE
        ),
        Operation::ExplainTerms => prompts::terms(doc_type.category, text),
        Operation::Summary => prompts::summary(doc_type, text),
        Operation::Simplify => prompts::simplify(doc_type.subject(), text),
    }
}

/// Runs operations against the injected generator.
#[derive(Clone)]
pub struct PromptDispatcher {
    llm: Arc<dyn TextGenerator>,
}

impl PromptDispatcher {
    pub fn new(llm: Arc<dyn TextGenerator>) -> Self {
        Self { llm }
    }

    pub async fn run(
        &self,
        operation: Operation,
        text: &str,
        doc_type: &DocumentType,
    ) -> Result<String, AnalysisError> {
        let prompt = compose_prompt(operation, text, doc_type);
        debug!(
            "Running {} ({:?}, {} prompt chars)",
            operation.label(),
            doc_type.category,
            prompt.chars().count()
        );

        self.llm
            .generate(&prompt)
            .await
            .map(|response| response.trim().to_string())
            .map_err(|source| AnalysisError::Llm { operation, source })
    }
}
