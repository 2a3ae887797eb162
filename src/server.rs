//! HTTP surface: `GET /health` and `POST /api/analyze`.

use crate::analysis::{AnalyzeRequest, AnalyzeResult};
use crate::client::CompletionClient;
use crate::pipeline::{AnalyzeError, Analyzer};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Shared handler state.
pub type SharedAnalyzer = Arc<Analyzer<dyn CompletionClient>>;

/// Error body, `{"detail": "..."}`
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub detail: String,
}

impl IntoResponse for AnalyzeError {
    fn into_response(self) -> Response {
        let (status, detail) = match &self {
            AnalyzeError::Input(e) => (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()),
            _ => {
                tracing::error!(kind = self.kind(), error = ?self, "AI analysis failed");
                (StatusCode::BAD_GATEWAY, format!("AI service error: {}", self))
            }
        };

        (status, Json(ErrorResponse { detail })).into_response()
    }
}

/// Build the service router around a shared analyzer
pub fn router(analyzer: SharedAnalyzer) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/analyze", post(analyze))
        .layer(TraceLayer::new_for_http())
        .with_state(analyzer)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({"status": "ok"}))
}

async fn analyze(
    State(analyzer): State<SharedAnalyzer>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResult>, AnalyzeError> {
    request.validate()?;
    let result = analyzer.analyze(&request).await?;
    Ok(Json(result))
}

/// Bind `addr` and serve until Ctrl-C
pub async fn serve(addr: &str, analyzer: SharedAnalyzer) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, router(analyzer))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
