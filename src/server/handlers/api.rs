//! Service-level endpoints.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use super::super::AppState;

/// Health check endpoint for container orchestration.
pub async fn health() -> impl IntoResponse {
    StatusCode::OK
}

/// Which model is in use and which optional paths are enabled.
pub async fn capabilities(State(state): State<AppState>) -> impl IntoResponse {
    let caps = state.pipeline.capabilities();
    Json(serde_json::json!({
        "llm": {
            "provider": state.llm.provider,
            "model": state.llm.model,
        },
        "ocr": caps.ocr,
        "translation": caps.translation,
        "sessions": state.sessions.len().await,
    }))
}
