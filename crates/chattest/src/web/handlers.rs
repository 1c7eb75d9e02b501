//! HTTP request handlers
use super::AppState;
use super::page::render_index;
use super::types::{ChatRequest, StatusResponse};
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use chattest_core::session::{Session, TurnOutcome};
use thiserror::Error;

/// Create the page and API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/chat", post(chat))
        .route("/api/clear", post(clear))
        .route("/api/status", get(status))
        .with_state(state)
}

async fn index(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    Ok(Html(render_index(&state)?))
}

async fn chat(State(state): State<AppState>, Json(req): Json<ChatRequest>) -> Json<TurnOutcome> {
    Json(state.session.exchange(&req.message, req.history).await)
}

async fn clear() -> Json<TurnOutcome> {
    Json(Session::clear())
}

async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        model: state.model_name().to_string(),
        key_notice: state.key_notice.as_ref().clone(),
    })
}

#[derive(Debug, Error)]
enum AppError {
    #[error("Failed to render page: {0}")]
    Template(#[from] minijinja::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "Request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}
