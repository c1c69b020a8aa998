use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::constants::storage::RECENT_LIMIT;
use crate::dispatch::Dispatcher;
use crate::error::{DispatchError, LogError};
use crate::store::{summarize, Rating};

pub struct AppState {
    pub dispatcher: Dispatcher,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/chat", post(chat))
        .route("/dashboard", get(dashboard))
        .route("/dashboard/summary", get(dashboard_summary))
        .route("/feedback", post(feedback))
        .with_state(state)
}

pub async fn run_server(state: Arc<AppState>, bind_addr: &str) -> std::io::Result<()> {
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    info!("API Server listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await
}

#[derive(Deserialize)]
struct ChatRequest {
    #[serde(default)]
    query: String,
}

#[derive(Deserialize)]
struct FeedbackRequest {
    id: Uuid,
    rating: Rating,
}

fn error_body(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

/// Internal detail goes to the log, never to the caller.
fn dispatch_error_response(err: &DispatchError) -> Response {
    match err {
        DispatchError::InvalidInput => error_body(StatusCode::BAD_REQUEST, "Query is required"),
        DispatchError::Log(LogError::NotFound { .. }) => {
            error_body(StatusCode::NOT_FOUND, "Interaction not found")
        }
        other => {
            error!("[Server Error] {}", other);
            error_body(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
        }
    }
}

async fn index() -> impl IntoResponse {
    Json(json!({ "message": "Citizen AI API is running" }))
}

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "backend": state.dispatcher.backend_kind().as_str(),
    }))
}

async fn chat(
    State(state): State<Arc<AppState>>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match body {
        Ok(body) => body,
        Err(rejection) => {
            warn!("[CHAT] Rejected request body: {}", rejection.body_text());
            return error_body(StatusCode::BAD_REQUEST, "Query is required");
        }
    };
    match state.dispatcher.dispatch(&req.query).await {
        Ok(reply) => Json(json!({
            "id": reply.id,
            "reply": reply.reply,
            "sentiment": reply.sentiment,
        }))
        .into_response(),
        Err(e) => dispatch_error_response(&e),
    }
}

async fn dashboard(State(state): State<Arc<AppState>>) -> Response {
    match state.dispatcher.log().snapshot().await {
        Ok(records) => Json(records).into_response(),
        Err(e) => {
            error!("[Server Error] Reading interaction log: {}", e);
            error_body(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
        }
    }
}

async fn dashboard_summary(State(state): State<Arc<AppState>>) -> Response {
    match state.dispatcher.log().snapshot().await {
        Ok(records) => Json(summarize(&records, RECENT_LIMIT)).into_response(),
        Err(e) => {
            error!("[Server Error] Reading interaction log: {}", e);
            error_body(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
        }
    }
}

async fn feedback(
    State(state): State<Arc<AppState>>,
    body: Result<Json<FeedbackRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match body {
        Ok(body) => body,
        Err(rejection) => {
            warn!("[FEEDBACK] Rejected request body: {}", rejection.body_text());
            return error_body(StatusCode::BAD_REQUEST, "Invalid feedback request");
        }
    };
    match state.dispatcher.rate(req.id, req.rating).await {
        Ok(record) => Json(record).into_response(),
        Err(e) => dispatch_error_response(&e),
    }
}
