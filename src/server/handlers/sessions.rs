//! Session endpoints: upload, inspect, clear and run actions.
//!
//! Action handlers copy what they need out of the session, run the
//! operation without holding the lock, then append the result.

use axum::{
    extract::{
        multipart::MultipartRejection,
        rejection::JsonRejection,
        Multipart, State,
    },
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use tracing::{debug, info};
use uuid::Uuid;

use super::extract::{JsonBody, SessionId};
use super::super::error::ServerError;
use super::super::AppState;
use crate::analysis::{Language, Operation};
use crate::ocr::UploadedDocument;
use crate::pipeline::has_content;
use crate::session::{AnalysisResult, Session, SessionSnapshot};

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub operation: Operation,
    #[serde(default)]
    pub language: Option<Language>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TranslateRequest {
    #[serde(default)]
    pub language: Option<Language>,
}

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub question: String,
    #[serde(default)]
    pub language: Option<Language>,
}

/// Upload one or more documents and start a session.
pub async fn create_session(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, ServerError> {
    let mut multipart = multipart?;
    let mut batch = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::InvalidRequest(e.to_string()))?
    {
        let name = field
            .file_name()
            .or_else(|| field.name())
            .unwrap_or("document")
            .to_string();
        let content = field
            .bytes()
            .await
            .map_err(|e| ServerError::InvalidRequest(e.to_string()))?;
        debug!("Received {} ({} bytes)", name, content.len());
        batch.push(UploadedDocument::new(name, content.to_vec()));
    }

    if batch.is_empty() {
        return Err(ServerError::InvalidRequest("No files uploaded".to_string()));
    }

    let ingested = state.pipeline.ingest(&batch).await;
    let summary = state.sessions.insert(Session::new(ingested)).await;
    info!("Created session {}", summary.id);

    Ok((StatusCode::CREATED, Json(summary)))
}

pub async fn get_session(
    State(state): State<AppState>,
    SessionId(id): SessionId,
) -> Result<impl IntoResponse, ServerError> {
    state
        .sessions
        .summary(id)
        .await
        .map(Json)
        .ok_or(ServerError::SessionNotFound(id))
}

/// Clear a session, history included.
pub async fn delete_session(
    State(state): State<AppState>,
    SessionId(id): SessionId,
) -> Result<impl IntoResponse, ServerError> {
    if state.sessions.remove(id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ServerError::SessionNotFound(id))
    }
}

pub async fn session_history(
    State(state): State<AppState>,
    SessionId(id): SessionId,
) -> Result<impl IntoResponse, ServerError> {
    state
        .sessions
        .history(id)
        .await
        .map(Json)
        .ok_or(ServerError::SessionNotFound(id))
}

pub async fn analyze(
    State(state): State<AppState>,
    SessionId(id): SessionId,
    JsonBody(request): JsonBody<AnalyzeRequest>,
) -> Result<impl IntoResponse, ServerError> {
    let snapshot = loaded_snapshot(&state, id).await?;
    let language = request.language.unwrap_or(snapshot.language);

    let result = state
        .pipeline
        .analyze(
            request.operation,
            &snapshot.text,
            &snapshot.doc_type,
            language,
        )
        .await;

    record(&state, id, language, result).await
}

pub async fn translate(
    State(state): State<AppState>,
    SessionId(id): SessionId,
    body: Result<Json<TranslateRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ServerError> {
    // The body is optional, but one that is sent must parse.
    let request = match body {
        Ok(Json(request)) => request,
        Err(JsonRejection::MissingJsonContentType(_)) => TranslateRequest::default(),
        Err(rejection) => return Err(rejection.into()),
    };
    let snapshot = loaded_snapshot(&state, id).await?;
    let language = request.language.unwrap_or(snapshot.language);

    let result = state
        .pipeline
        .translate_excerpt(&snapshot.text, language)
        .await;

    record(&state, id, language, result).await
}

pub async fn ask(
    State(state): State<AppState>,
    SessionId(id): SessionId,
    JsonBody(request): JsonBody<AskRequest>,
) -> Result<impl IntoResponse, ServerError> {
    let question = request.question.trim();
    if question.is_empty() {
        return Err(ServerError::InvalidRequest("Question is empty".to_string()));
    }

    let snapshot = loaded_snapshot(&state, id).await?;
    let language = request.language.unwrap_or(snapshot.language);

    let result = state
        .pipeline
        .ask(question, &snapshot.text, &snapshot.doc_type, language)
        .await;

    record(&state, id, language, result).await
}

/// Snapshot of a session that has extracted text.
async fn loaded_snapshot(state: &AppState, id: Uuid) -> Result<SessionSnapshot, ServerError> {
    let snapshot = state
        .sessions
        .snapshot(id)
        .await
        .ok_or(ServerError::SessionNotFound(id))?;

    if !has_content(&snapshot.text) {
        return Err(ServerError::NoDocument);
    }
    Ok(snapshot)
}

async fn record(
    state: &AppState,
    id: Uuid,
    language: Language,
    result: AnalysisResult,
) -> Result<Json<AnalysisResult>, ServerError> {
    if state.sessions.record(id, language, result.clone()).await {
        Ok(Json(result))
    } else {
        Err(ServerError::SessionNotFound(id))
    }
}
