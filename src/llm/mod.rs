//! LLM integration for document analysis.

mod client;

pub use client::{LlmClient, LlmConfig, LlmError, LlmProvider, TextGenerator};
