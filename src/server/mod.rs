//! HTTP API for document analysis sessions.
//!
//! Upload documents to create a session, then run analysis operations,
//! translations and questions against it. Results are appended to the
//! session's history.

mod error;
mod handlers;
mod routes;

pub use error::ServerError;
pub use routes::create_router;

use std::sync::Arc;

use crate::config::{ServerConfig, Settings};
use crate::pipeline::DocumentPipeline;
use crate::session::SessionStore;

/// Model identification reported by `/api/capabilities`.
#[derive(Debug, Clone)]
pub struct ModelInfo {
    pub provider: String,
    pub model: String,
}

/// Shared state for the web server.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<DocumentPipeline>,
    pub sessions: SessionStore,
    pub llm: Arc<ModelInfo>,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(settings: &Settings) -> anyhow::Result<Self> {
        let pipeline = DocumentPipeline::from_settings(settings)?;
        let llm = ModelInfo {
            provider: settings.llm.provider.to_string(),
            model: settings.llm.model().to_string(),
        };
        Ok(Self::with_pipeline(pipeline, llm, &settings.server))
    }

    pub fn with_pipeline(
        pipeline: DocumentPipeline,
        llm: ModelInfo,
        server: &ServerConfig,
    ) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            sessions: SessionStore::new(server.session_ttl()),
            llm: Arc::new(llm),
            max_upload_bytes: server.max_upload_bytes(),
        }
    }
}

/// Start the web server.
pub async fn serve(settings: &Settings, host: &str, port: u16) -> anyhow::Result<()> {
    let state = AppState::new(settings)?;
    let app = create_router(state);

    let listener = bind(host, port).await?;
    tracing::info!("Starting server at http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Bind a listener, resolving hostnames such as "localhost" as well as
/// IP literals.
async fn bind(host: &str, port: u16) -> std::io::Result<tokio::net::TcpListener> {
    tokio::net::TcpListener::bind((host, port)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tower::ServiceExt;

    use crate::analysis::Analyzer;
    use crate::llm::{LlmError, TextGenerator};
    use crate::ocr::{ExtractionError, PdfTextReader, TextExtractor};

    const BOUNDARY: &str = "demystify-test-boundary";

    /// Treats uploaded bytes as the document's text.
    struct Utf8Reader;

    impl PdfTextReader for Utf8Reader {
        fn page_texts(&self, content: &[u8]) -> Result<Vec<Option<String>>, ExtractionError> {
            Ok(vec![Some(String::from_utf8_lossy(content).into_owned())])
        }
    }

    struct StubGenerator {
        calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl TextGenerator for StubGenerator {
        async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if prompt.starts_with("Analyze this document and classify") {
                Ok("Legal Contract/Agreement: a lease".to_string())
            } else if prompt.contains("Create a practical checklist") {
                Err(LlmError::Connection("timed out".to_string()))
            } else {
                Ok("stub answer".to_string())
            }
        }
    }

    fn test_state() -> (AppState, Arc<StubGenerator>) {
        let llm = Arc::new(StubGenerator {
            calls: AtomicUsize::new(0),
        });
        let pipeline = DocumentPipeline::new(
            TextExtractor::new(Box::new(Utf8Reader), None),
            Analyzer::new(llm.clone(), None),
        );
        let info = ModelInfo {
            provider: "stub".to_string(),
            model: "stub-1".to_string(),
        };
        let state = AppState::with_pipeline(pipeline, info, &ServerConfig::default());
        (state, llm)
    }

    fn setup_test_app() -> (axum::Router, Arc<StubGenerator>) {
        let (state, llm) = test_state();
        (create_router(state), llm)
    }

    fn multipart_body(files: &[(&str, &str)]) -> String {
        let mut body = String::new();
        for (name, content) in files {
            body.push_str(&format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"files\"; filename=\"{name}\"\r\nContent-Type: application/pdf\r\n\r\n{content}\r\n"
            ));
        }
        body.push_str(&format!("--{BOUNDARY}--\r\n"));
        body
    }

    async fn upload(app: &axum::Router, files: &[(&str, &str)]) -> (StatusCode, serde_json::Value) {
        let request = Request::builder()
            .method("POST")
            .uri("/api/sessions")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(multipart_body(files)))
            .unwrap();
        send(app, request).await
    }

    async fn post_json(
        app: &axum::Router,
        uri: &str,
        json: serde_json::Value,
    ) -> (StatusCode, serde_json::Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap();
        send(app, request).await
    }

    async fn get(app: &axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        send(app, request).await
    }

    async fn send(app: &axum::Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _) = setup_test_app();
        let (status, _) = get(&app, "/health").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_capabilities() {
        let (app, _) = setup_test_app();
        let (status, json) = get(&app, "/api/capabilities").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["llm"]["provider"], "stub");
        assert_eq!(json["ocr"], false);
        assert_eq!(json["translation"], false);
    }

    #[tokio::test]
    async fn test_upload_creates_classified_session() {
        let (app, _) = setup_test_app();
        let (status, json) = upload(&app, &[("lease.pdf", "Tenant pays rent monthly.")]).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["document_type"], "Legal Contract/Agreement: a lease");
        assert_eq!(json["category"], "Legal Contract/Agreement");
        assert_eq!(json["documents"], 1);

        let id = json["id"].as_str().unwrap();
        let (status, session) = get(&app, &format!("/api/sessions/{}", id)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(session["id"], id);
    }

    #[tokio::test]
    async fn test_upload_without_files_rejected() {
        let (app, _) = setup_test_app();
        let (status, json) = upload(&app, &[]).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["success"], false);
    }

    #[tokio::test]
    async fn test_unknown_session_is_404() {
        let (app, _) = setup_test_app();
        let uri = format!("/api/sessions/{}/history", uuid::Uuid::new_v4());
        let (status, json) = get(&app, &uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(json["error"].as_str().unwrap().starts_with("Session not found"));
    }

    #[tokio::test]
    async fn test_blank_document_short_circuits_actions() {
        let (app, llm) = setup_test_app();
        let (_, json) = upload(&app, &[("blank.pdf", "   ")]).await;
        let id = json["id"].as_str().unwrap();

        let (status, json) = post_json(
            &app,
            &format!("/api/sessions/{}/analyze", id),
            serde_json::json!({ "operation": "summary" }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Upload a document first.");
        assert_eq!(llm.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_analyze_and_history() {
        let (app, _) = setup_test_app();
        let (_, json) = upload(&app, &[("lease.pdf", "Rent is due on the 1st.")]).await;
        let id = json["id"].as_str().unwrap();

        let (status, summary) = post_json(
            &app,
            &format!("/api/sessions/{}/analyze", id),
            serde_json::json!({ "operation": "summary" }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(summary["label"], "Summary");
        assert_eq!(summary["failed"], false);

        let (status, failed) = post_json(
            &app,
            &format!("/api/sessions/{}/analyze", id),
            serde_json::json!({ "operation": "checklist" }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(failed["failed"], true);
        assert_eq!(
            failed["text"],
            "Checklist generation failed: Connection error: timed out"
        );

        let (_, history) = get(&app, &format!("/api/sessions/{}/history", id)).await;
        let labels: Vec<&str> = history
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["label"].as_str().unwrap())
            .collect();
        assert_eq!(labels, vec!["Action Checklist", "Summary"]);
    }

    #[tokio::test]
    async fn test_ask_and_translate() {
        let (app, _) = setup_test_app();
        let (_, json) = upload(&app, &[("lease.pdf", "Deposit: two months.")]).await;
        let id = json["id"].as_str().unwrap();

        let (status, answer) = post_json(
            &app,
            &format!("/api/sessions/{}/ask", id),
            serde_json::json!({ "question": "How large is the deposit?" }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(answer["label"], "How large is the deposit?");
        assert_eq!(answer["text"], "stub answer");

        let (status, translated) = post_json(
            &app,
            &format!("/api/sessions/{}/translate", id),
            serde_json::json!({ "language": "hi" }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(translated["label"], "Translation");
        assert_eq!(translated["text"], "stub answer");
    }

    #[tokio::test]
    async fn test_delete_clears_session() {
        let (app, _) = setup_test_app();
        let (_, json) = upload(&app, &[("a.pdf", "text")]).await;
        let uri = format!("/api/sessions/{}", json["id"].as_str().unwrap());

        let request = Request::builder()
            .method("DELETE")
            .uri(&uri)
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(&app, request).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = get(&app, &uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_translate_rejects_unknown_language() {
        let (app, llm) = setup_test_app();
        let (_, json) = upload(&app, &[("lease.pdf", "Deposit: two months.")]).await;
        let id = json["id"].as_str().unwrap();
        let calls = llm.calls.load(Ordering::SeqCst);

        let (status, json) = post_json(
            &app,
            &format!("/api/sessions/{}/translate", id),
            serde_json::json!({ "language": "klingon" }),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["success"], false);
        assert_eq!(json["code"], "INVALID_REQUEST");
        assert_eq!(llm.calls.load(Ordering::SeqCst), calls);

        let (_, history) = get(&app, &format!("/api/sessions/{}/history", id)).await;
        assert_eq!(history.as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_translate_without_body_uses_session_language() {
        let (app, _) = setup_test_app();
        let (_, json) = upload(&app, &[("lease.pdf", "Deposit: two months.")]).await;
        let id = json["id"].as_str().unwrap();

        let request = Request::builder()
            .method("POST")
            .uri(format!("/api/sessions/{}/translate", id))
            .body(Body::empty())
            .unwrap();
        let (status, translated) = send(&app, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(translated["label"], "Translation");
        assert_eq!(translated["failed"], false);
    }

    #[tokio::test]
    async fn test_extractor_rejections_are_json() {
        let (app, _) = setup_test_app();
        let (_, json) = upload(&app, &[("lease.pdf", "Rent is due.")]).await;
        let id = json["id"].as_str().unwrap();

        let (status, json) = post_json(
            &app,
            &format!("/api/sessions/{}/analyze", id),
            serde_json::json!({ "operation": "summary", "language": "klingon" }),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["success"], false);

        let (status, json) = get(&app, "/api/sessions/not-a-uuid").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], "INVALID_REQUEST");
    }

    #[tokio::test]
    async fn test_expired_session_is_404() {
        let (state, _) = test_state();
        let state = AppState {
            sessions: SessionStore::new(Some(std::time::Duration::from_millis(200))),
            ..state
        };
        let app = create_router(state);

        let (_, json) = upload(&app, &[("lease.pdf", "Rent is due.")]).await;
        let uri = format!("/api/sessions/{}", json["id"].as_str().unwrap());
        tokio::time::sleep(std::time::Duration::from_millis(400)).await;

        let (status, json) = get(&app, &uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["code"], "SESSION_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_bind_resolves_hostname() {
        let listener = bind("localhost", 0).await.unwrap();
        assert!(listener.local_addr().unwrap().ip().is_loopback());
    }
}
