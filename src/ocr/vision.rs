//! Google Cloud Vision OCR backend.
//!
//! Images go through `images:annotate` (TEXT_DETECTION). PDFs go through
//! `files:annotate` (DOCUMENT_TEXT_DETECTION), which handles up to five
//! pages per synchronous request.

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::backend::{OcrBackend, OcrError};

const DEFAULT_ENDPOINT: &str = "https://vision.googleapis.com";

/// Synchronous `files:annotate` accepts at most this many pages.
const MAX_PDF_PAGES: u32 = 5;

/// OCR backend using the Cloud Vision REST API.
pub struct VisionOcr {
    api_key: String,
    endpoint: String,
    client: Client,
}

#[derive(Debug, Serialize)]
struct Feature {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Serialize)]
struct ImageRequest {
    requests: Vec<ImageAnnotateRequest>,
}

#[derive(Debug, Serialize)]
struct ImageAnnotateRequest {
    image: ImageContent,
    features: Vec<Feature>,
}

#[derive(Debug, Serialize)]
struct ImageContent {
    content: String,
}

#[derive(Debug, Serialize)]
struct FileRequest {
    requests: Vec<FileAnnotateRequest>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FileAnnotateRequest {
    input_config: InputConfig,
    features: Vec<Feature>,
    pages: Vec<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InputConfig {
    content: String,
    mime_type: &'static str,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnnotateResponse {
    full_text_annotation: Option<TextAnnotation>,
    error: Option<Status>,
}

#[derive(Debug, Deserialize)]
struct TextAnnotation {
    text: String,
}

#[derive(Debug, Deserialize)]
struct Status {
    message: String,
}

#[derive(Debug, Deserialize)]
struct BatchImageResponse {
    #[serde(default)]
    responses: Vec<AnnotateResponse>,
}

#[derive(Debug, Deserialize)]
struct BatchFileResponse {
    #[serde(default)]
    responses: Vec<FileResponse>,
}

#[derive(Debug, Deserialize)]
struct FileResponse {
    #[serde(default)]
    responses: Vec<AnnotateResponse>,
    error: Option<Status>,
}

impl VisionOcr {
    /// Create a Vision backend for the given API key.
    pub fn new(
        api_key: impl Into<String>,
        endpoint: Option<&str>,
        timeout: Duration,
    ) -> Result<Self, OcrError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| OcrError::Http(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            api_key: api_key.into(),
            endpoint: endpoint
                .unwrap_or(DEFAULT_ENDPOINT)
                .trim_end_matches('/')
                .to_string(),
            client,
        })
    }

    async fn post<T: Serialize, R: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<R, OcrError> {
        let url = format!("{}/v1/{}", self.endpoint, path);
        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| OcrError::Http(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(OcrError::Api {
                backend: "vision",
                message: format!("HTTP {}: {}", status, body),
            });
        }

        response
            .json()
            .await
            .map_err(|e| OcrError::Parse(e.to_string()))
    }

    async fn annotate_image(&self, content: String) -> Result<String, OcrError> {
        let request = ImageRequest {
            requests: vec![ImageAnnotateRequest {
                image: ImageContent { content },
                features: vec![Feature {
                    kind: "TEXT_DETECTION",
                }],
            }],
        };
        let batch: BatchImageResponse = self.post("images:annotate", &request).await?;
        let response = batch.responses.into_iter().next().unwrap_or_default();
        annotation_text(response)
    }

    async fn annotate_pdf(&self, content: String) -> Result<String, OcrError> {
        let request = FileRequest {
            requests: vec![FileAnnotateRequest {
                input_config: InputConfig {
                    content,
                    mime_type: "application/pdf",
                },
                features: vec![Feature {
                    kind: "DOCUMENT_TEXT_DETECTION",
                }],
                pages: (1..=MAX_PDF_PAGES).collect(),
            }],
        };
        let batch: BatchFileResponse = self.post("files:annotate", &request).await?;

        let mut pages = Vec::new();
        for file in batch.responses {
            if let Some(status) = file.error {
                return Err(OcrError::Api {
                    backend: "vision",
                    message: status.message,
                });
            }
            for page in file.responses {
                pages.push(annotation_text(page)?);
            }
        }
        Ok(pages.join("\n"))
    }
}

fn annotation_text(response: AnnotateResponse) -> Result<String, OcrError> {
    if let Some(status) = response.error {
        return Err(OcrError::Api {
            backend: "vision",
            message: status.message,
        });
    }
    Ok(response
        .full_text_annotation
        .map(|a| a.text)
        .unwrap_or_default())
}

#[async_trait]
impl OcrBackend for VisionOcr {
    fn name(&self) -> &'static str {
        "vision"
    }

    async fn detect_text(&self, content: &[u8]) -> Result<String, OcrError> {
        let mime = infer::get(content)
            .map(|t| t.mime_type())
            .unwrap_or("application/octet-stream");
        debug!("Vision OCR: {} bytes of {}", content.len(), mime);

        let encoded = base64::engine::general_purpose::STANDARD.encode(content);
        match mime {
            "application/pdf" => self.annotate_pdf(encoded).await,
            m if m.starts_with("image/") => self.annotate_image(encoded).await,
            other => Err(OcrError::UnsupportedContent(other.to_string())),
        }
    }
}
