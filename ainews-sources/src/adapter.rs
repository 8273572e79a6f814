//! Common adapter contract and configuration

use std::time::Duration;

use ainews_core::RawArticle;
use async_trait::async_trait;
use reqwest::{Client, Response};

use crate::error::FetchError;

/// Default per-request timeout for news APIs
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// A news API that can be polled for AI articles
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    /// Name used in logs and run summaries
    fn name(&self) -> &str;

    /// Fetch the current batch of articles, mapped onto the raw shape
    async fn fetch(&self) -> Result<Vec<RawArticle>, FetchError>;
}

/// Request settings for one source
#[derive(Debug, Clone)]
pub struct SourceConfig {
    pub api_key: String,
    /// Search query sent to the API
    pub query: String,
    /// Two-letter language code
    pub language: String,
    /// Maximum articles requested per fetch
    pub page_size: usize,
    /// API origin, overridable for testing
    pub base_url: String,
    pub timeout: Duration,
}

impl SourceConfig {
    pub fn new(api_key: impl Into<String>, base_url: &str, query: &str, page_size: usize) -> Self {
        Self {
            api_key: api_key.into(),
            query: query.to_string(),
            language: "en".to_string(),
            page_size,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_query(mut self, query: &str) -> Self {
        self.query = query.to_string();
        self
    }

    pub(crate) fn validate(&self) -> Result<(), FetchError> {
        if self.api_key.trim().is_empty() {
            return Err(FetchError::InvalidConfig("API key is empty".to_string()));
        }
        if self.page_size == 0 {
            return Err(FetchError::InvalidConfig("page size must be positive".to_string()));
        }
        Ok(())
    }

    pub(crate) fn build_client(&self) -> Client {
        Client::builder()
            .timeout(self.timeout)
            .user_agent("AINewsAggregator/1.0")
            .build()
            .unwrap_or_else(|_| Client::new())
    }
}

/// Turn a non-success response into the matching error
pub(crate) async fn error_for_status(response: Response) -> Result<Response, FetchError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(match status.as_u16() {
        401 | 403 => FetchError::Unauthorized(body),
        429 => FetchError::RateLimited,
        code => FetchError::ApiError {
            status: code,
            message: body,
        },
    })
}
