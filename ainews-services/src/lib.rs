//! Ingestion services for the AI News Aggregator
//!
//! This crate ties the source adapters and the pure pipeline stages in
//! `ainews-core` to persistent storage: the article store, the ingestion
//! orchestrator and the recurring scheduler.

pub mod article_store;
pub mod ingestion;
pub mod scheduler;

pub use article_store::{ArticleStore, SqliteArticleStore, StoreError};
pub use ingestion::{
    IngestionConfig, IngestionError, IngestionOrchestrator, RunPhase, RunStatus, RunSummary,
};
pub use scheduler::{IngestionScheduler, DEFAULT_INGEST_INTERVAL};
