//! demystify - document analysis service.
//!
//! Extracts text from uploaded PDFs (with an OCR fallback for scans),
//! classifies the document, and uses an LLM with category-specific
//! prompts to summarize, assess risks, build checklists, explain terms,
//! simplify, translate and answer questions.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod llm;
pub mod ocr;
pub mod pipeline;
pub mod server;
pub mod session;
pub mod translate;
