//! Core types for the AI News Aggregator
//!
//! This crate defines the shared article model used across the workspace
//! together with the pure stages of the ingestion pipeline: keyword
//! extraction, relevance scoring and same-batch deduplication.

pub mod article;
pub mod dedupe;
pub mod error;
pub mod keywords;
pub mod query;
pub mod scoring;
pub mod source;

pub use article::{
    article_id, ArticleSource, NormalizedArticle, PersistedArticle, RawArticle, ScoredArticle,
};
pub use dedupe::{dedupe, DedupeOutcome};
pub use error::ValidationError;
pub use keywords::{extract_from_article, extract_keywords, AI_VOCABULARY};
pub use query::{ArticleFilter, ArticlePage, ArticleSort, KeywordCount, Pagination, MAX_PAGE};
pub use scoring::{relevance_score, score_article, RELEVANCE_THRESHOLD, WEIGHTED_TERMS};
pub use source::{configured_sources, SourceInfo};
