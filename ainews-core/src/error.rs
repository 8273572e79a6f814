//! Error types for article validation

use thiserror::Error;

/// Reasons a raw article cannot enter the pipeline
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("article has no title")]
    MissingTitle,

    #[error("article has no url")]
    MissingUrl,

    #[error("invalid publication date: {0}")]
    MalformedDate(String),
}

impl ValidationError {
    pub fn malformed_date(value: impl Into<String>) -> Self {
        ValidationError::MalformedDate(value.into())
    }
}
