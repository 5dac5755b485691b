//! Typed failures of analysis operations.

use thiserror::Error;

use super::dispatcher::Operation;
use super::language::Language;
use crate::llm::LlmError;

/// Failure of one analysis operation.
///
/// The `Display` output is the user-facing message for that operation.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("{} failed: {source}", .operation.failure_name())]
    Llm {
        operation: Operation,
        #[source]
        source: LlmError,
    },

    #[error("Document Classification (Error: {0})")]
    Classification(#[source] LlmError),

    #[error("Translation to {language} failed: {source}")]
    Translation {
        language: Language,
        #[source]
        source: LlmError,
    },

    #[error("I apologize, but I encountered an error while analyzing your question: {0}")]
    Question(#[source] LlmError),

    #[error("No content extracted from the documents.")]
    NoContent,
}

impl AnalysisError {
    /// Collapse an operation result into the string shown to the user.
    pub fn display_or_error(result: Result<String, AnalysisError>) -> String {
        match result {
            Ok(text) => text,
            Err(e) => e.to_string(),
        }
    }
}
