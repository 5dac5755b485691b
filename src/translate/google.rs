//! Google Cloud Translation (v2 REST) client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{TranslateError, TranslationService};

const DEFAULT_ENDPOINT: &str = "https://translation.googleapis.com";

pub struct GoogleTranslate {
    api_key: String,
    endpoint: String,
    client: Client,
}

#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    q: &'a str,
    target: &'a str,
    format: &'static str,
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    data: Option<TranslateData>,
    error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
struct TranslateData {
    #[serde(default)]
    translations: Vec<Translation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Translation {
    translated_text: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl GoogleTranslate {
    pub fn new(
        api_key: impl Into<String>,
        endpoint: Option<&str>,
        timeout: Duration,
    ) -> Result<Self, TranslateError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TranslateError::Http(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            api_key: api_key.into(),
            endpoint: endpoint
                .unwrap_or(DEFAULT_ENDPOINT)
                .trim_end_matches('/')
                .to_string(),
            client,
        })
    }
}

fn first_translation(response: TranslateResponse) -> Result<String, TranslateError> {
    if let Some(error) = response.error {
        return Err(TranslateError::Api(error.message));
    }
    response
        .data
        .and_then(|d| d.translations.into_iter().next())
        .map(|t| t.translated_text)
        .ok_or(TranslateError::Empty)
}

#[async_trait]
impl TranslationService for GoogleTranslate {
    fn name(&self) -> &'static str {
        "google-translate"
    }

    async fn translate(&self, text: &str, target_code: &str) -> Result<String, TranslateError> {
        debug!("Google Translate: {} chars -> {}", text.chars().count(), target_code);

        let url = format!("{}/language/translate/v2", self.endpoint);
        let request = TranslateRequest {
            q: text,
            target: target_code,
            format: "text",
        };

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| TranslateError::Http(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(TranslateError::Api(format!("HTTP {}: {}", status, body)));
        }

        let parsed: TranslateResponse = response
            .json()
            .await
            .map_err(|e| TranslateError::Parse(e.to_string()))?;

        first_translation(parsed)
    }
}
