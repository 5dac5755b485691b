//! OCR and text extraction module.
//!
//! Extracts text from uploaded documents using:
//! - lopdf for the PDF text layer
//! - Google Cloud Vision as an OCR fallback for scanned documents

mod backend;
mod extractor;
mod vision;

pub use backend::{OcrBackend, OcrError};
pub use extractor::{
    ExtractionError, LopdfReader, PdfTextReader, TextExtractor, UploadedDocument, END_OF_DOCUMENT,
};
pub use vision::VisionOcr;
