//! NewsAPI.org client
//!
//! https://newsapi.org/docs/endpoints/everything

use ainews_core::RawArticle;
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info, instrument};

use crate::adapter::{error_for_status, SourceAdapter, SourceConfig};
use crate::error::FetchError;
use crate::types::{NewsApiArticle, NewsApiResponse};

pub const NEWSAPI_BASE_URL: &str = "https://newsapi.org";

/// Query covering the AI topics the aggregator tracks
pub const NEWSAPI_DEFAULT_QUERY: &str = "artificial intelligence OR machine learning OR AI OR \"neural networks\" OR \"deep learning\" OR NLP OR \"computer vision\" OR GPT OR LLM OR \"generative AI\"";

/// NewsAPI.org client
pub struct NewsApiClient {
    client: Client,
    config: SourceConfig,
}

impl NewsApiClient {
    /// Create a client with the default AI query
    pub fn new(api_key: String) -> Self {
        Self::with_config(Self::default_config(api_key))
    }

    /// Production endpoint and query for `api_key`, before any overrides
    pub fn default_config(api_key: String) -> SourceConfig {
        SourceConfig::new(api_key, NEWSAPI_BASE_URL, NEWSAPI_DEFAULT_QUERY, 100)
    }

    pub fn with_config(config: SourceConfig) -> Self {
        Self {
            client: config.build_client(),
            config,
        }
    }

    pub fn config(&self) -> &SourceConfig {
        &self.config
    }
}

#[async_trait]
impl SourceAdapter for NewsApiClient {
    fn name(&self) -> &str {
        "NewsAPI"
    }

    #[instrument(skip(self), fields(source = "NewsAPI"))]
    async fn fetch(&self) -> Result<Vec<RawArticle>, FetchError> {
        self.config.validate()?;

        info!("Fetching from NewsAPI");

        let page_size = self.config.page_size.to_string();
        let response = self
            .client
            .get(format!("{}/v2/everything", self.config.base_url))
            .header("X-Api-Key", &self.config.api_key)
            .query(&[
                ("q", self.config.query.as_str()),
                ("language", self.config.language.as_str()),
                ("sortBy", "publishedAt"),
                ("pageSize", page_size.as_str()),
            ])
            .send()
            .await?;

        let response = error_for_status(response).await?;

        let body: NewsApiResponse = response
            .json()
            .await
            .map_err(|e| FetchError::ParseError(e.to_string()))?;

        if body.status != "ok" {
            let code = body.code.unwrap_or_else(|| "unknown".to_string());
            let message = body.message.unwrap_or_else(|| "Unknown error".to_string());
            return Err(match code.as_str() {
                "apiKeyInvalid" | "apiKeyMissing" | "apiKeyDisabled" => {
                    FetchError::Unauthorized(message)
                }
                "rateLimited" => FetchError::RateLimited,
                _ => FetchError::ApiError {
                    status: 200,
                    message: format!("{}: {}", code, message),
                },
            });
        }

        debug!("NewsAPI reports {:?} total results", body.total_results);
        info!("Found {} articles from NewsAPI", body.articles.len());

        Ok(body.articles.into_iter().map(RawArticle::from).collect())
    }
}

impl From<NewsApiArticle> for RawArticle {
    fn from(article: NewsApiArticle) -> Self {
        let (source_id, source_name) = article
            .source
            .map(|s| (s.id, s.name))
            .unwrap_or_default();

        RawArticle {
            title: article.title,
            description: article.description,
            content: article.content,
            url: article.url,
            image_url: article.url_to_image,
            published_at: article.published_at,
            source_id,
            source_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        http::{HeaderMap, StatusCode},
        response::IntoResponse,
        routing::get,
        Json, Router,
    };

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn client(base_url: &str) -> NewsApiClient {
        NewsApiClient::with_config(
            SourceConfig::new("test-key", NEWSAPI_BASE_URL, NEWSAPI_DEFAULT_QUERY, 100)
                .with_base_url(base_url),
        )
    }

    #[test]
    fn test_default_config() {
        let config = NewsApiClient::default_config("key".to_string());
        assert_eq!(config.base_url, NEWSAPI_BASE_URL);
        assert_eq!(config.query, NEWSAPI_DEFAULT_QUERY);
        assert_eq!(config.page_size, 100);
        assert_eq!(config.timeout, crate::adapter::DEFAULT_TIMEOUT);
    }

    async fn everything(headers: HeaderMap) -> impl IntoResponse {
        if headers.get("x-api-key").and_then(|v| v.to_str().ok()) != Some("test-key") {
            return (StatusCode::UNAUTHORIZED, "missing key").into_response();
        }
        Json(serde_json::json!({
            "status": "ok",
            "totalResults": 2,
            "articles": [
                {
                    "source": { "id": "wired", "name": "Wired" },
                    "author": "A. Writer",
                    "title": "OpenAI releases a new model",
                    "description": "The AI lab shipped again",
                    "url": "https://wired.com/openai",
                    "urlToImage": "https://wired.com/openai.jpg",
                    "publishedAt": "2024-05-01T12:00:00Z",
                    "content": "Body text"
                },
                {
                    "source": { "id": null, "name": "Ars Technica" },
                    "author": null,
                    "title": "LLM benchmarks",
                    "description": null,
                    "url": "https://arstechnica.com/llm",
                    "urlToImage": null,
                    "publishedAt": "2024-05-02T08:30:00Z",
                    "content": null
                }
            ]
        }))
        .into_response()
    }

    #[test]
    fn test_maps_fields() {
        let article: NewsApiArticle = serde_json::from_value(serde_json::json!({
            "source": { "id": "techcrunch", "name": "TechCrunch" },
            "title": "GPT news",
            "url": "https://techcrunch.com/gpt",
            "urlToImage": "https://techcrunch.com/gpt.png",
            "publishedAt": "2024-05-01T12:00:00Z"
        }))
        .unwrap();

        let raw = RawArticle::from(article);
        assert_eq!(raw.title.as_deref(), Some("GPT news"));
        assert_eq!(raw.image_url.as_deref(), Some("https://techcrunch.com/gpt.png"));
        assert_eq!(raw.source_id.as_deref(), Some("techcrunch"));
        assert_eq!(raw.source_name.as_deref(), Some("TechCrunch"));
        assert_eq!(raw.description, None);
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let base = serve(Router::new().route("/v2/everything", get(everything))).await;

        let articles = client(&base).fetch().await.unwrap();
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].url.as_deref(), Some("https://wired.com/openai"));

        // Null source ids are derived from the name during normalization
        let normalized = articles[1].clone().normalize().unwrap();
        assert_eq!(normalized.source.id, "ars-technica");
    }

    #[tokio::test]
    async fn test_fetch_status_errors() {
        let base = serve(
            Router::new()
                .route("/v2/everything", get(|| async { StatusCode::TOO_MANY_REQUESTS })),
        )
        .await;
        assert!(matches!(client(&base).fetch().await, Err(FetchError::RateLimited)));

        let base = serve(Router::new().route("/v2/everything", get(everything))).await;
        let wrong_key = NewsApiClient::with_config(
            SourceConfig::new("other", &base, NEWSAPI_DEFAULT_QUERY, 100),
        );
        assert!(matches!(wrong_key.fetch().await, Err(FetchError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_fetch_error_body() {
        let base = serve(Router::new().route(
            "/v2/everything",
            get(|| async {
                Json(serde_json::json!({
                    "status": "error",
                    "code": "parameterInvalid",
                    "message": "bad query"
                }))
            }),
        ))
        .await;

        match client(&base).fetch().await {
            Err(FetchError::ApiError { message, .. }) => assert!(message.contains("bad query")),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_key_rejected() {
        let client = NewsApiClient::new(String::new());
        assert!(matches!(client.fetch().await, Err(FetchError::InvalidConfig(_))));
    }
}
