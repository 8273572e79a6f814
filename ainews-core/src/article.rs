//! Article data structures for the ingestion pipeline
//!
//! An article moves through four shapes: [`RawArticle`] as mapped by a source
//! adapter, [`NormalizedArticle`] once required fields are validated,
//! [`ScoredArticle`] after keyword extraction and scoring, and finally
//! [`PersistedArticle`] once the store has accepted it.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::ValidationError;

/// Publisher of an article
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArticleSource {
    /// Stable slug used for filtering (e.g., "techcrunch")
    pub id: String,
    /// Display name (e.g., "TechCrunch")
    pub name: String,
}

impl ArticleSource {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// Build a source from its display name, deriving the slug
    pub fn from_name(name: &str) -> Self {
        Self {
            id: slugify(name),
            name: name.to_string(),
        }
    }
}

/// Article as mapped by a source adapter, before validation.
///
/// Every field is optional because upstream APIs routinely omit or null
/// them. Nothing downstream consumes this shape directly; it must go
/// through [`RawArticle::normalize`] first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawArticle {
    pub title: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub url: Option<String>,
    pub image_url: Option<String>,
    /// Publication timestamp exactly as the API reported it
    pub published_at: Option<String>,
    pub source_id: Option<String>,
    pub source_name: Option<String>,
}

impl RawArticle {
    /// Validate required fields and convert into the canonical shape.
    ///
    /// Blank strings count as missing. Title and description are trimmed;
    /// the URL is kept verbatim since it is the identity key.
    pub fn normalize(self) -> Result<NormalizedArticle, ValidationError> {
        let title = present(self.title)
            .map(|t| t.trim().to_string())
            .ok_or(ValidationError::MissingTitle)?;
        let url = present(self.url).ok_or(ValidationError::MissingUrl)?;
        let published_at = parse_published_at(self.published_at.as_deref())?;
        let source = resolve_source(present(self.source_id), present(self.source_name), &url);

        Ok(NormalizedArticle {
            title,
            url,
            description: present(self.description).map(|d| d.trim().to_string()),
            content: present(self.content),
            image_url: present(self.image_url),
            published_at,
            source,
        })
    }
}

/// Canonical article shape shared by every source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedArticle {
    pub title: String,
    /// Natural identity key: equal URLs denote the same article
    pub url: String,
    pub description: Option<String>,
    pub content: Option<String>,
    #[serde(rename = "urlToImage")]
    pub image_url: Option<String>,
    pub published_at: DateTime<Utc>,
    pub source: ArticleSource,
}

impl NormalizedArticle {
    /// Title, description and content joined by single spaces, with missing
    /// fields treated as empty strings
    pub fn combined_text(&self) -> String {
        format!(
            "{} {} {}",
            self.title,
            self.description.as_deref().unwrap_or_default(),
            self.content.as_deref().unwrap_or_default()
        )
    }
}

/// Normalized article with its relevance annotations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredArticle {
    #[serde(flatten)]
    pub article: NormalizedArticle,
    /// Matched vocabulary terms
    pub keywords: BTreeSet<String>,
    pub relevance_score: u32,
}

/// Article as held by the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedArticle {
    /// Identity derived from the URL (see [`article_id`])
    pub id: String,
    #[serde(flatten)]
    pub article: ScoredArticle,
    /// When the article was ingested
    pub created_at: DateTime<Utc>,
}

impl PersistedArticle {
    pub fn new(article: ScoredArticle, created_at: DateTime<Utc>) -> Self {
        Self {
            id: article_id(&article.article.url),
            article,
            created_at,
        }
    }

    pub fn url(&self) -> &str {
        &self.article.article.url
    }

    pub fn title(&self) -> &str {
        &self.article.article.title
    }
}

/// Generate the persistent identity for an article URL
pub fn article_id(url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    hex::encode(&hasher.finalize()[..8])
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_published_at(value: Option<&str>) -> Result<DateTime<Utc>, ValidationError> {
    let value = value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ValidationError::malformed_date("missing"))?;

    DateTime::parse_from_rfc3339(value)
        .or_else(|_| DateTime::parse_from_rfc2822(value))
        .map(|d| d.with_timezone(&Utc))
        .map_err(|_| ValidationError::malformed_date(value))
}

fn resolve_source(id: Option<String>, name: Option<String>, url: &str) -> ArticleSource {
    match (id, name) {
        (Some(id), Some(name)) => ArticleSource::new(id, name),
        (Some(id), None) => ArticleSource::new(id.clone(), id),
        (None, Some(name)) => ArticleSource::from_name(&name),
        (None, None) => source_from_url(url),
    }
}

/// Fall back to the article's host when the API names no publisher
fn source_from_url(url: &str) -> ArticleSource {
    let host = url::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.strip_prefix("www.").unwrap_or(h).to_string()));

    match host {
        Some(host) => ArticleSource::new(host.clone(), host),
        None => ArticleSource::new("unknown", "Unknown"),
    }
}

/// Lowercase and collapse whitespace runs into single dashes
fn slugify(name: &str) -> String {
    name.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}
