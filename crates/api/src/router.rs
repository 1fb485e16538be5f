//! HTTP surface for the answering service.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

use edu_core::model::{AskRequest, AskResponse};
use services::AnsweringService;

type SharedAnswering = Arc<dyn AnsweringService>;

/// Routes:
/// - `POST /api/ask`: answer a question (any other method is 405)
/// - `GET /api/health`: liveness
pub fn create_router(answering: SharedAnswering) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/ask", post(ask_handler).fallback(method_not_allowed))
        .route("/api/health", get(health_handler))
        .layer(cors)
        .with_state(answering)
}

/// Serve the router on an already-bound listener until the task is dropped.
///
/// # Errors
///
/// Returns the I/O error that stopped the server.
pub async fn serve(listener: TcpListener, answering: SharedAnswering) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, "answering endpoint listening");
    }
    axum::serve(listener, create_router(answering)).await
}

async fn ask_handler(
    State(answering): State<SharedAnswering>,
    Json(request): Json<AskRequest>,
) -> Result<Json<AskResponse>, (StatusCode, Json<Value>)> {
    tracing::debug!(subject = %request.subject, level = %request.level, "ask");
    answering.ask(&request).await.map(Json).map_err(|err| {
        tracing::warn!(error = %err, "answering service failed");
        (
            StatusCode::BAD_GATEWAY,
            Json(json!({ "error": "Answering service unavailable" })),
        )
    })
}

async fn method_not_allowed() -> (StatusCode, Json<Value>) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({ "error": "Method not allowed" })),
    )
}

async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
