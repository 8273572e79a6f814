//! GNews API client
//!
//! https://gnews.io/docs/v4#search-endpoint

use ainews_core::RawArticle;
use async_trait::async_trait;
use reqwest::Client;
use tracing::{info, instrument};

use crate::adapter::{error_for_status, SourceAdapter, SourceConfig};
use crate::error::FetchError;
use crate::types::{GNewsArticle, GNewsResponse};

pub const GNEWS_BASE_URL: &str = "https://gnews.io";

pub const GNEWS_DEFAULT_QUERY: &str = "artificial intelligence";

/// GNews client
pub struct GNewsClient {
    client: Client,
    config: SourceConfig,
}

impl GNewsClient {
    /// Create a client with the default query (max 50 articles)
    pub fn new(api_key: String) -> Self {
        Self::with_config(Self::default_config(api_key))
    }

    /// Production endpoint and query for `api_key`, before any overrides
    pub fn default_config(api_key: String) -> SourceConfig {
        SourceConfig::new(api_key, GNEWS_BASE_URL, GNEWS_DEFAULT_QUERY, 50)
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
impl SourceAdapter for GNewsClient {
    fn name(&self) -> &str {
        "GNews"
    }

    #[instrument(skip(self), fields(source = "GNews"))]
    async fn fetch(&self) -> Result<Vec<RawArticle>, FetchError> {
        self.config.validate()?;

        info!("Fetching from GNews");

        let max = self.config.page_size.to_string();
        let response = self
            .client
            .get(format!("{}/api/v4/search", self.config.base_url))
            .query(&[
                ("q", self.config.query.as_str()),
                ("lang", self.config.language.as_str()),
                ("max", max.as_str()),
                ("apikey", self.config.api_key.as_str()),
            ])
            .send()
            .await?;

        let response = error_for_status(response).await?;

        let body: GNewsResponse = response
            .json()
            .await
            .map_err(|e| FetchError::ParseError(e.to_string()))?;

        if let Some(errors) = body.errors {
            return Err(FetchError::ApiError {
                status: 200,
                message: errors.to_string(),
            });
        }

        info!("Found {} articles from GNews", body.articles.len());

        Ok(body.articles.into_iter().map(RawArticle::from).collect())
    }
}

/// GNews only names its publishers; the id is derived from the name later.
impl From<GNewsArticle> for RawArticle {
    fn from(article: GNewsArticle) -> Self {
        RawArticle {
            title: article.title,
            description: article.description,
            content: article.content,
            url: article.url,
            image_url: article.image,
            published_at: article.published_at,
            source_id: None,
            source_name: article.source.and_then(|s| s.name),
        }
    }
}
