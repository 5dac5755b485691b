//! Text extraction from uploaded document batches.
//!
//! Each document's PDF text layer is read page by page. Documents without
//! a usable text layer fall back to OCR when a backend is configured.
//! Extraction never fails as a whole: per-document problems degrade to
//! empty text or an inline `[OCR failed: ...]` marker.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

use super::backend::OcrBackend;

/// Separator appended after every document's text.
pub const END_OF_DOCUMENT: &str = "--- End of Document ---";

/// Errors that can occur while reading a document's text layer.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Failed to parse PDF: {0}")]
    Parse(String),
}

/// One uploaded file.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub name: String,
    pub content: Vec<u8>,
}

impl UploadedDocument {
    pub fn new(name: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content,
        }
    }
}

/// Reads the text layer of a PDF.
pub trait PdfTextReader: Send + Sync {
    /// Text for each page in page order. `None` marks a page whose text
    /// could not be extracted.
    fn page_texts(&self, content: &[u8]) -> Result<Vec<Option<String>>, ExtractionError>;
}

/// Text layer reader backed by lopdf.
#[derive(Debug, Default, Clone, Copy)]
pub struct LopdfReader;

impl PdfTextReader for LopdfReader {
    fn page_texts(&self, content: &[u8]) -> Result<Vec<Option<String>>, ExtractionError> {
        let document = lopdf::Document::load_mem(content)
            .map_err(|e| ExtractionError::Parse(e.to_string()))?;

        Ok(document
            .get_pages()
            .keys()
            .map(|&page_num| document.extract_text(&[page_num]).ok())
            .collect())
    }
}

/// Turns a batch of uploads into one concatenated text blob.
pub struct TextExtractor {
    reader: Arc<dyn PdfTextReader>,
    ocr: Option<Arc<dyn OcrBackend>>,
}

impl TextExtractor {
    /// Create an extractor. Pass `None` for `ocr` when no OCR backend is
    /// configured.
    pub fn new(reader: Box<dyn PdfTextReader>, ocr: Option<Arc<dyn OcrBackend>>) -> Self {
        Self {
            reader: Arc::from(reader),
            ocr,
        }
    }

    /// Extractor using lopdf for the text layer.
    pub fn with_ocr(ocr: Option<Arc<dyn OcrBackend>>) -> Self {
        Self::new(Box::new(LopdfReader), ocr)
    }

    /// Whether an OCR fallback is wired in.
    pub fn has_ocr(&self) -> bool {
        self.ocr.is_some()
    }

    /// Extract text from every document in upload order.
    ///
    /// The result holds each document's trimmed text followed by the
    /// end-of-document separator, so it contains exactly one separator per
    /// input document.
    pub async fn extract(&self, batch: &[UploadedDocument]) -> String {
        let mut all_text = String::new();

        for document in batch {
            let text = self.extract_document(document).await;
            all_text.push_str(text.trim());
            all_text.push_str("\n\n");
            all_text.push_str(END_OF_DOCUMENT);
            all_text.push_str("\n\n");
        }

        all_text.trim().to_string()
    }

    async fn extract_document(&self, document: &UploadedDocument) -> String {
        let reader = Arc::clone(&self.reader);
        let content = document.content.clone();
        let pages = tokio::task::spawn_blocking(move || reader.page_texts(&content)).await;

        let text: String = match pages {
            Ok(Ok(pages)) => {
                debug!("{}: read {} page(s) from text layer", document.name, pages.len());
                pages.into_iter().map(Option::unwrap_or_default).collect()
            }
            Ok(Err(e)) => {
                debug!("{}: no text layer ({})", document.name, e);
                String::new()
            }
            Err(e) => {
                warn!("{}: text layer reader aborted: {}", document.name, e);
                String::new()
            }
        };

        if !text.trim().is_empty() {
            return text;
        }

        let Some(ocr) = &self.ocr else {
            return text;
        };

        debug!("{}: falling back to {} OCR", document.name, ocr.name());
        match ocr.detect_text(&document.content).await {
            Ok(ocr_text) => ocr_text,
            Err(e) => {
                warn!("{}: OCR failed: {}", document.name, e);
                format!("[OCR failed: {}]", e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ocr::OcrError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Reader that treats the bytes as UTF-8 pages separated by form feeds.
    struct PlainReader;

    impl PdfTextReader for PlainReader {
        fn page_texts(&self, content: &[u8]) -> Result<Vec<Option<String>>, ExtractionError> {
            let text = std::str::from_utf8(content)
                .map_err(|e| ExtractionError::Parse(e.to_string()))?;
            Ok(text
                .split('\x0c')
                .map(|p| if p == "?" { None } else { Some(p.to_string()) })
                .collect())
        }
    }

    struct FixedOcr {
        result: Result<&'static str, &'static str>,
        calls: AtomicUsize,
    }

    impl FixedOcr {
        fn new(result: Result<&'static str, &'static str>) -> Self {
            Self {
                result,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl OcrBackend for FixedOcr {
        fn name(&self) -> &'static str {
            "fixed"
        }

        async fn detect_text(&self, _content: &[u8]) -> Result<String, OcrError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result
                .map(str::to_string)
                .map_err(|m| OcrError::Http(m.to_string()))
        }
    }

    fn doc(name: &str, content: &[u8]) -> UploadedDocument {
        UploadedDocument::new(name, content.to_vec())
    }

    #[tokio::test]
    async fn test_empty_batch_is_empty_text() {
        let extractor = TextExtractor::new(Box::new(PlainReader), None);
        assert_eq!(extractor.extract(&[]).await, "");
    }

    #[tokio::test]
    async fn test_one_marker_per_document_in_order() {
        let extractor = TextExtractor::new(Box::new(PlainReader), None);
        let batch = vec![
            doc("a.pdf", b"first"),
            doc("b.pdf", b"\xff\xfe not utf8"),
            doc("c.pdf", b""),
            doc("d.pdf", b"second"),
        ];

        let text = extractor.extract(&batch).await;

        assert_eq!(text.matches(END_OF_DOCUMENT).count(), 4);
        let first = text.find("first").unwrap();
        let second = text.find("second").unwrap();
        assert!(first < second);
        assert!(text.ends_with(END_OF_DOCUMENT));
    }

    #[tokio::test]
    async fn test_pages_concatenate_and_missing_pages_are_empty() {
        let extractor = TextExtractor::new(Box::new(PlainReader), None);
        let text = extractor
            .extract(&[doc("a.pdf", b"Page one. \x0c?\x0cPage three.")])
            .await;
        assert!(text.starts_with("Page one. Page three."));
    }

    #[tokio::test]
    async fn test_ocr_used_when_text_layer_blank() {
        let ocr = Arc::new(FixedOcr::new(Ok("Scanned contract text")));
        let extractor = TextExtractor::new(Box::new(PlainReader), Some(ocr.clone()));

        let text = extractor.extract(&[doc("scan.pdf", b"   \n ")]).await;

        assert!(text.starts_with("Scanned contract text"));
        assert_eq!(ocr.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_ocr_skipped_when_text_layer_present() {
        let ocr = Arc::new(FixedOcr::new(Ok("unused")));
        let extractor = TextExtractor::new(Box::new(PlainReader), Some(ocr.clone()));

        extractor.extract(&[doc("a.pdf", b"Real text")]).await;

        assert_eq!(ocr.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_ocr_failure_becomes_marker() {
        let ocr = Arc::new(FixedOcr::new(Err("quota exceeded")));
        let extractor = TextExtractor::new(Box::new(PlainReader), Some(ocr));

        let text = extractor
            .extract(&[doc("scan.pdf", b""), doc("b.pdf", b"ok")])
            .await;

        assert!(text.starts_with("[OCR failed: HTTP request failed: quota exceeded]"));
        assert_eq!(text.matches(END_OF_DOCUMENT).count(), 2);
    }

    struct PanickingReader;

    impl PdfTextReader for PanickingReader {
        fn page_texts(&self, _content: &[u8]) -> Result<Vec<Option<String>>, ExtractionError> {
            panic!("malformed object stream");
        }
    }

    #[tokio::test]
    async fn test_aborted_reader_degrades_to_ocr() {
        let ocr = Arc::new(FixedOcr::new(Ok("Recovered by OCR")));
        let extractor = TextExtractor::new(Box::new(PanickingReader), Some(ocr.clone()));

        let text = extractor
            .extract(&[doc("a.pdf", b"x"), doc("b.pdf", b"y")])
            .await;

        assert!(text.starts_with("Recovered by OCR"));
        assert_eq!(text.matches(END_OF_DOCUMENT).count(), 2);
        assert_eq!(ocr.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_lopdf_reader_rejects_garbage() {
        assert!(LopdfReader.page_texts(b"definitely not a pdf").is_err());
    }

    #[test]
    fn test_lopdf_reader_reads_blank_page() {
        use lopdf::{dictionary, Document, Object};

        let mut pdf = Document::with_version("1.7");
        let pages_id = pdf.new_object_id();
        let page_id = pdf.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        });
        pdf.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![Object::Reference(page_id)],
                "Count" => 1,
            }),
        );
        let catalog_id = pdf.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        pdf.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        pdf.save_to(&mut bytes).unwrap();

        let pages = LopdfReader.page_texts(&bytes).unwrap();
        assert_eq!(pages.len(), 1);
        assert!(pages[0].as_deref().unwrap_or("").trim().is_empty());
    }
}
