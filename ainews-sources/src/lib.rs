//! Source adapters for AI news aggregation
//!
//! This crate provides clients for fetching articles from:
//! - NewsAPI.org: `/v2/everything` search over thousands of outlets
//! - GNews: `/api/v4/search` keyword search
//!
//! Every client implements [`SourceAdapter`] and maps its API's article shape
//! onto [`ainews_core::RawArticle`].

pub mod adapter;
pub mod error;
pub mod gnews;
pub mod newsapi;
pub mod types;

pub use adapter::{SourceAdapter, SourceConfig};
pub use error::FetchError;
pub use gnews::GNewsClient;
pub use newsapi::NewsApiClient;
