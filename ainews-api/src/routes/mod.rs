//! API route definitions

mod health;
mod ingest;
mod news;
mod sources;

use axum::{
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
    Json, Router,
};
use ainews_services::StoreError;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::AppState;

/// Create all API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(news::routes())
        .merge(sources::routes())
        .merge(ingest::routes())
        .merge(health::routes())
}

/// Full application router with CORS and request tracing
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        .nest("/api", api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Map a store failure onto a response the front end can degrade on
pub(crate) fn store_error_response(e: &StoreError) -> Response {
    if e.is_unavailable() {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({
                "message": "Database not available. Cannot retrieve articles.",
                "code": "DB_ERROR"
            })),
        )
            .into_response()
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "message": "Server error" })),
        )
            .into_response()
    }
}
