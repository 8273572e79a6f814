//! API-specific response types for NewsAPI.org and GNews

use serde::Deserialize;

// ============================================================================
// NewsAPI.org Types
// ============================================================================

/// NewsAPI `/v2/everything` response
#[derive(Debug, Deserialize)]
pub struct NewsApiResponse {
    /// "ok" or "error"
    pub status: String,
    /// Total matches available upstream
    #[serde(rename = "totalResults")]
    pub total_results: Option<u64>,
    /// Articles on this page
    #[serde(default)]
    pub articles: Vec<NewsApiArticle>,
    /// Error code when status is "error"
    pub code: Option<String>,
    /// Error message when status is "error"
    pub message: Option<String>,
}

/// A single NewsAPI article
#[derive(Debug, Deserialize)]
pub struct NewsApiArticle {
    /// Publisher; `id` is frequently null
    pub source: Option<NewsApiSource>,
    pub author: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    /// Lead image
    #[serde(rename = "urlToImage")]
    pub url_to_image: Option<String>,
    /// ISO 8601 timestamp
    #[serde(rename = "publishedAt")]
    pub published_at: Option<String>,
    /// Truncated body text
    pub content: Option<String>,
}

/// NewsAPI publisher reference
#[derive(Debug, Deserialize)]
pub struct NewsApiSource {
    pub id: Option<String>,
    pub name: Option<String>,
}

// ============================================================================
// GNews Types
// ============================================================================

/// GNews `/api/v4/search` response
#[derive(Debug, Deserialize)]
pub struct GNewsResponse {
    /// Total matches available upstream
    #[serde(rename = "totalArticles")]
    pub total_articles: Option<u64>,
    /// Articles on this page
    #[serde(default)]
    pub articles: Vec<GNewsArticle>,
    /// Error messages, present instead of articles on failure
    #[serde(default)]
    pub errors: Option<serde_json::Value>,
}

/// A single GNews article
#[derive(Debug, Deserialize)]
pub struct GNewsArticle {
    pub title: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub url: Option<String>,
    /// Lead image (NewsAPI calls this `urlToImage`)
    pub image: Option<String>,
    /// ISO 8601 timestamp
    #[serde(rename = "publishedAt")]
    pub published_at: Option<String>,
    pub source: Option<GNewsSource>,
}

/// GNews publisher reference; carries no id
#[derive(Debug, Deserialize)]
pub struct GNewsSource {
    pub name: Option<String>,
    pub url: Option<String>,
}
