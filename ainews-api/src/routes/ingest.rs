//! Manual ingestion trigger and run status

use ainews_services::IngestionError;
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use tracing::info;

use crate::AppState;

/// Create ingestion routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/ingest", post(trigger_ingestion))
        .route("/ingest/status", get(ingestion_status))
}

/// POST /api/ingest - Run ingestion now and return its summary
async fn trigger_ingestion(State(state): State<AppState>) -> impl IntoResponse {
    info!("Manual ingestion requested");

    match state.orchestrator.run().await {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(e) => {
            let (status, code) = match &e {
                IngestionError::RunInProgress => (StatusCode::CONFLICT, "RUN_IN_PROGRESS"),
                IngestionError::StoreUnavailable(_) => {
                    (StatusCode::SERVICE_UNAVAILABLE, "DB_ERROR")
                }
                IngestionError::AllSourcesFailed(_) => (StatusCode::BAD_GATEWAY, "SOURCES_FAILED"),
            };
            (
                status,
                Json(serde_json::json!({
                    "message": e.to_string(),
                    "code": code
                })),
            )
                .into_response()
        }
    }
}

/// GET /api/ingest/status - Phase and outcome of the latest run
async fn ingestion_status(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.orchestrator.status())
}
