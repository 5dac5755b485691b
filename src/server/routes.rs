//! Router configuration for the HTTP API.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use super::handlers;
use super::AppState;

/// Create the main router with all routes.
pub fn create_router(state: AppState) -> Router {
    let body_limit = state.max_upload_bytes;

    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/capabilities", get(handlers::capabilities))
        // Sessions
        .route("/api/sessions", post(handlers::create_session))
        .route(
            "/api/sessions/:id",
            get(handlers::get_session).delete(handlers::delete_session),
        )
        .route("/api/sessions/:id/history", get(handlers::session_history))
        // Actions
        .route("/api/sessions/:id/analyze", post(handlers::analyze))
        .route("/api/sessions/:id/translate", post(handlers::translate))
        .route("/api/sessions/:id/ask", post(handlers::ask))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
