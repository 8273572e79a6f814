//! Source catalog and trending keyword endpoints

use ainews_core::{configured_sources, KeywordCount};
use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use tracing::{error, warn};

use crate::AppState;

/// Number of keywords in the trending list
const TRENDING_LIMIT: usize = 10;

/// Create source routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/sources", get(list_sources))
        .route("/sources/trending", get(trending))
}

/// GET /api/sources - Outlets offered as filters
async fn list_sources() -> impl IntoResponse {
    Json(configured_sources())
}

/// GET /api/sources/trending - Most frequent keywords in stored articles
///
/// Falls back to a fixed sample when the store is unreachable so the front
/// end always has something to show.
async fn trending(State(state): State<AppState>) -> impl IntoResponse {
    match state.store.keyword_counts(TRENDING_LIMIT).await {
        Ok(counts) => (StatusCode::OK, Json(counts)).into_response(),
        Err(e) if e.is_unavailable() => {
            warn!("Store unavailable, serving sample trending topics: {}", e);
            (StatusCode::OK, Json(sample_trending())).into_response()
        }
        Err(e) => {
            error!("Failed to compute trending topics: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "message": "Server error" })),
            )
                .into_response()
        }
    }
}

fn sample_trending() -> Vec<KeywordCount> {
    [
        ("Artificial Intelligence", 25),
        ("Machine Learning", 18),
        ("Neural Networks", 15),
        ("Deep Learning", 12),
        ("GPT", 10),
        ("LLM", 8),
        ("Computer Vision", 7),
        ("NLP", 6),
        ("AI Ethics", 5),
        ("Robotics", 4),
    ]
    .into_iter()
    .map(|(keyword, count)| KeywordCount::new(keyword, count))
    .collect()
}
