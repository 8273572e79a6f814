//! Query types for reading stored articles

use serde::{Deserialize, Serialize};

use crate::article::PersistedArticle;

/// Page size used when the caller does not ask for one
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Largest page size a caller can request
pub const MAX_PAGE_SIZE: usize = 100;

/// Filters applied to an article listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleFilter {
    /// Exact match on `source.id`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
    /// Membership in the article's keyword set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
}

/// Sort orders supported by the listing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ArticleSort {
    /// Newest first
    #[default]
    PublishedDesc,
    /// Oldest first
    PublishedAsc,
    /// Highest relevance first
    RelevanceDesc,
    /// Alphabetical by title
    TitleAsc,
}

impl ArticleSort {
    /// Parse the wire value used by the front end.
    ///
    /// Unknown or missing values fall back to newest first.
    pub fn from_param(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("publishedAt") => ArticleSort::PublishedAsc,
            Some("-relevanceScore") => ArticleSort::RelevanceDesc,
            Some("title") => ArticleSort::TitleAsc,
            _ => ArticleSort::PublishedDesc,
        }
    }

    pub fn as_param(&self) -> &'static str {
        match self {
            ArticleSort::PublishedDesc => "-publishedAt",
            ArticleSort::PublishedAsc => "publishedAt",
            ArticleSort::RelevanceDesc => "-relevanceScore",
            ArticleSort::TitleAsc => "title",
        }
    }
}

/// Highest page number accepted; keeps the row offset inside an SQLite integer
pub const MAX_PAGE: usize = (i64::MAX as usize) / MAX_PAGE_SIZE;

/// Offset-based pagination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// 1-based page number
    page: usize,
    limit: usize,
}

impl Pagination {
    /// Build pagination from optional request values.
    ///
    /// Pages below 1 become 1 and pages past `MAX_PAGE` are capped. A zero
    /// or missing limit uses the default; larger limits are capped.
    pub fn new(page: Option<usize>, limit: Option<usize>) -> Self {
        let page = page.filter(|p| *p >= 1).unwrap_or(1).min(MAX_PAGE);
        let limit = limit
            .filter(|l| *l > 0)
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .min(MAX_PAGE_SIZE);
        Self { page, limit }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Number of rows to skip
    pub fn offset(&self) -> usize {
        (self.page - 1) * self.limit
    }

    /// Pages needed to show `total` rows
    pub fn total_pages(&self, total: usize) -> usize {
        total.div_ceil(self.limit)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// One page of articles
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticlePage {
    pub articles: Vec<PersistedArticle>,
    pub current_page: usize,
    pub total_pages: usize,
    pub total_articles: usize,
}

impl ArticlePage {
    pub fn new(articles: Vec<PersistedArticle>, pagination: Pagination, total: usize) -> Self {
        Self {
            articles,
            current_page: pagination.page(),
            total_pages: pagination.total_pages(total),
            total_articles: total,
        }
    }
}

/// How many stored articles carry a keyword
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordCount {
    pub keyword: String,
    pub count: usize,
}

impl KeywordCount {
    pub fn new(keyword: impl Into<String>, count: usize) -> Self {
        Self {
            keyword: keyword.into(),
            count,
        }
    }
}
