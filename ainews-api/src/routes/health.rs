//! Health check endpoints

use ainews_services::RunStatus;
use axum::{extract::State, http::StatusCode, response::Json, routing::get, Router};
use serde::Serialize;

use crate::AppState;

/// Health check response
#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    /// Stored articles, absent when the store is unreachable
    articles: Option<usize>,
    sources: Vec<String>,
    ingestion: RunStatus,
}

/// Health check handler
async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let articles = match state.store.ping().await {
        Ok(()) => state.store.count().await.ok(),
        Err(_) => None,
    };

    let (code, status) = match articles {
        Some(_) => (StatusCode::OK, "healthy"),
        None => (StatusCode::SERVICE_UNAVAILABLE, "degraded"),
    };

    let response = HealthResponse {
        status: status.to_string(),
        articles,
        sources: state.orchestrator.source_names(),
        ingestion: state.orchestrator.status(),
    };

    (code, Json(response))
}

/// Simple liveness check (always returns OK if server is running)
async fn liveness() -> &'static str {
    "OK"
}

/// Create health routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/health/live", get(liveness))
}
