//! News article endpoints

use ainews_core::{ArticleFilter, ArticleSort, Pagination};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::error;

use super::store_error_response;
use crate::AppState;

/// Query parameters for listing news.
///
/// Numbers are taken as strings so malformed values fall back to defaults
/// instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct NewsQuery {
    /// 1-based page number
    pub page: Option<String>,
    /// Page size
    pub limit: Option<String>,
    /// Exact `source.id`
    pub source: Option<String>,
    /// Keyword the article must carry
    pub keyword: Option<String>,
    /// "-publishedAt" (default), "publishedAt", "-relevanceScore" or "title"
    pub sort: Option<String>,
}

impl NewsQuery {
    fn filter(&self) -> ArticleFilter {
        ArticleFilter {
            source_id: non_empty(&self.source),
            keyword: non_empty(&self.keyword),
        }
    }

    fn pagination(&self) -> Pagination {
        Pagination::new(parse_number(&self.page), parse_number(&self.limit))
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn parse_number(value: &Option<String>) -> Option<usize> {
    value.as_deref().and_then(|v| v.trim().parse().ok())
}

/// Create news routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/news", get(list_articles))
        .route("/news/{id}", get(get_article))
}

/// GET /api/news - Paginated article listing
async fn list_articles(
    State(state): State<AppState>,
    Query(params): Query<NewsQuery>,
) -> impl IntoResponse {
    let sort = ArticleSort::from_param(params.sort.as_deref());

    match state
        .store
        .query(&params.filter(), sort, params.pagination())
        .await
    {
        Ok(page) => (StatusCode::OK, Json(page)).into_response(),
        Err(e) => {
            error!("Failed to query articles: {}", e);
            store_error_response(&e)
        }
    }
}

/// GET /api/news/{id} - Single article
async fn get_article(State(state): State<AppState>, Path(id): Path<String>) -> impl IntoResponse {
    match state.store.get(&id).await {
        Ok(Some(article)) => (StatusCode::OK, Json(article)).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "message": "Article not found" })),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to load article {}: {}", id, e);
            store_error_response(&e)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::StatusCode;

    use crate::routes::test_support::{raw, seeded_app, send, state, DownStore};

    async fn fixture() -> (axum::Router, Vec<ainews_core::PersistedArticle>) {
        seeded_app(vec![
            raw("AI chips get faster", "https://wired.com/1", "Wired", "2024-05-01T12:00:00Z"),
            raw(
                "GPT and machine learning in AI labs",
                "https://techcrunch.com/2",
                "TechCrunch",
                "2024-05-03T12:00:00Z",
            ),
            raw("Deep learning for robots", "https://wired.com/3", "Wired", "2024-05-02T12:00:00Z"),
        ])
        .await
    }

    #[tokio::test]
    async fn test_list_defaults_to_newest_first() {
        let (app, _) = fixture().await;
        let (status, json) = send(app, "GET", "/api/news").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["currentPage"], 1);
        assert_eq!(json["totalPages"], 1);
        assert_eq!(json["totalArticles"], 3);
        assert_eq!(json["articles"][0]["url"], "https://techcrunch.com/2");
        assert_eq!(json["articles"][2]["url"], "https://wired.com/1");
    }

    #[tokio::test]
    async fn test_list_filters_and_pages() {
        let (app, _) = fixture().await;

        let (_, json) = send(app.clone(), "GET", "/api/news?source=wired&limit=1&page=2").await;
        assert_eq!(json["totalArticles"], 2);
        assert_eq!(json["totalPages"], 2);
        assert_eq!(json["articles"][0]["url"], "https://wired.com/1");

        let (_, json) = send(app.clone(), "GET", "/api/news?keyword=GPT").await;
        assert_eq!(json["totalArticles"], 1);
        assert_eq!(json["articles"][0]["source"]["id"], "techcrunch");

        let (_, json) = send(app, "GET", "/api/news?sort=title&page=abc&source=").await;
        assert_eq!(json["currentPage"], 1);
        assert_eq!(json["articles"][0]["title"], "AI chips get faster");
    }

    #[tokio::test]
    async fn test_huge_page_returns_empty_page() {
        let (app, _) = fixture().await;
        let (status, json) = send(app, "GET", "/api/news?page=18446744073709551615").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["currentPage"], ainews_core::MAX_PAGE);
        assert_eq!(json["totalArticles"], 3);
        assert!(json["articles"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let (app, persisted) = fixture().await;

        let uri = format!("/api/news/{}", persisted[1].id);
        let (status, json) = send(app.clone(), "GET", &uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["id"], persisted[1].id.as_str());
        assert_eq!(json["relevanceScore"], persisted[1].article.relevance_score);

        let (status, json) = send(app, "GET", "/api/news/does-not-exist").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["message"], "Article not found");
    }

    #[tokio::test]
    async fn test_store_down_reports_db_error() {
        let app = crate::routes::app(state(Arc::new(DownStore), Vec::new()));

        let (status, json) = send(app.clone(), "GET", "/api/news").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(json["code"], "DB_ERROR");

        let (status, json) = send(app, "GET", "/api/news/abc").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(json["code"], "DB_ERROR");
    }
}
