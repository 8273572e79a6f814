//! Ingestion Orchestrator
//!
//! One run fetches every configured source concurrently, normalizes and
//! merges the results, drops same-batch duplicates, scores what remains and
//! persists articles that clear the relevance threshold and are not already
//! stored. Only one run may be active at a time.

use std::sync::Arc;
use std::time::Duration;

use ainews_core::{dedupe, score_article, RawArticle, ScoredArticle, RELEVANCE_THRESHOLD};
use ainews_sources::{FetchError, SourceAdapter};
use chrono::{DateTime, Utc};
use futures::future::join_all;
use parking_lot::RwLock;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::time::timeout;
use tracing::{debug, error, info, instrument, warn};

use crate::article_store::{ArticleStore, StoreError};

/// Configuration for IngestionOrchestrator
#[derive(Debug, Clone)]
pub struct IngestionConfig {
    /// Articles scoring below this are skipped
    pub relevance_threshold: u32,
    /// Upper bound on a single adapter fetch
    pub fetch_timeout: Duration,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            relevance_threshold: RELEVANCE_THRESHOLD,
            fetch_timeout: Duration::from_secs(10),
        }
    }
}

/// Stage of the current (or last) run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunPhase {
    #[default]
    Idle,
    Fetching,
    Merging,
    ScoringAndFiltering,
    Persisting,
    Done,
    Failed,
}

/// Outcome of a completed run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    /// Articles newly written to the store
    pub saved: usize,
    /// Invalid, below-threshold or already-stored articles
    pub skipped: usize,
    /// Raw articles returned by all sources together
    pub fetched: usize,
    /// Later occurrences of a URL already seen in this batch
    pub duplicates: usize,
    /// Sources whose fetch failed or timed out
    pub failed_sources: Vec<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Snapshot of orchestrator activity
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunStatus {
    pub phase: RunPhase,
    pub last_summary: Option<RunSummary>,
    pub last_error: Option<String>,
    pub last_started_at: Option<DateTime<Utc>>,
    pub last_finished_at: Option<DateTime<Utc>>,
}

/// Errors that end a run
#[derive(Debug, Error)]
pub enum IngestionError {
    #[error("An ingestion run is already in progress")]
    RunInProgress,

    #[error("Article store unavailable: {0}")]
    StoreUnavailable(#[source] StoreError),

    #[error("All sources failed: {}", .0.join(", "))]
    AllSourcesFailed(Vec<String>),
}

/// Drives ingestion runs against a set of sources and a store
pub struct IngestionOrchestrator {
    adapters: Vec<Arc<dyn SourceAdapter>>,
    store: Arc<dyn ArticleStore>,
    config: IngestionConfig,
    /// Held for the whole duration of a run
    run_lock: Mutex<()>,
    status: RwLock<RunStatus>,
}

impl IngestionOrchestrator {
    pub fn new(
        adapters: Vec<Arc<dyn SourceAdapter>>,
        store: Arc<dyn ArticleStore>,
        config: IngestionConfig,
    ) -> Self {
        info!(
            "Initializing IngestionOrchestrator with {} sources: [{}]",
            adapters.len(),
            adapters
                .iter()
                .map(|a| a.name())
                .collect::<Vec<_>>()
                .join(", ")
        );
        Self {
            adapters,
            store,
            config,
            run_lock: Mutex::new(()),
            status: RwLock::new(RunStatus::default()),
        }
    }

    /// Names of the configured sources
    pub fn source_names(&self) -> Vec<String> {
        self.adapters.iter().map(|a| a.name().to_string()).collect()
    }

    /// Current run status
    pub fn status(&self) -> RunStatus {
        self.status.read().clone()
    }

    /// Execute one ingestion run.
    ///
    /// Returns [`IngestionError::RunInProgress`] immediately if another run
    /// holds the lock. Articles saved before a fatal error stay saved.
    #[instrument(skip(self))]
    pub async fn run(&self) -> Result<RunSummary, IngestionError> {
        let _guard = self.run_lock.try_lock().map_err(|_| {
            warn!("Ingestion run requested while another run is active");
            IngestionError::RunInProgress
        })?;

        let started_at = Utc::now();
        {
            let mut status = self.status.write();
            status.last_started_at = Some(started_at);
            status.last_error = None;
        }
        info!("Starting ingestion run");

        let result = self.execute(started_at).await;

        let mut status = self.status.write();
        status.last_finished_at = Some(Utc::now());
        match &result {
            Ok(summary) => {
                info!(
                    "Ingestion run complete: {} saved, {} skipped, {} duplicates, {} fetched",
                    summary.saved, summary.skipped, summary.duplicates, summary.fetched
                );
                status.phase = RunPhase::Done;
                status.last_summary = Some(summary.clone());
            }
            Err(e) => {
                error!("Ingestion run failed: {}", e);
                status.phase = RunPhase::Failed;
                status.last_error = Some(e.to_string());
            }
        }

        result
    }

    async fn execute(&self, started_at: DateTime<Utc>) -> Result<RunSummary, IngestionError> {
        self.store
            .ping()
            .await
            .map_err(IngestionError::StoreUnavailable)?;

        self.set_phase(RunPhase::Fetching);
        let (raw_articles, failed_sources) = self.fetch_all().await;

        if !self.adapters.is_empty() && failed_sources.len() == self.adapters.len() {
            return Err(IngestionError::AllSourcesFailed(failed_sources));
        }

        let fetched = raw_articles.len();
        let mut skipped = 0;

        self.set_phase(RunPhase::Merging);
        let mut normalized = Vec::with_capacity(fetched);
        for raw in raw_articles {
            match raw.normalize() {
                Ok(article) => normalized.push(article),
                Err(e) => {
                    debug!("Skipping invalid article: {}", e);
                    skipped += 1;
                }
            }
        }
        let batch = dedupe(normalized);
        if batch.duplicates > 0 {
            debug!("Dropped {} duplicate articles from batch", batch.duplicates);
        }

        self.set_phase(RunPhase::ScoringAndFiltering);
        let mut candidates: Vec<ScoredArticle> = Vec::with_capacity(batch.articles.len());
        for article in batch.articles {
            let scored = score_article(article);
            if scored.relevance_score < self.config.relevance_threshold {
                debug!(
                    "Skipping low relevance article (score {}): {}",
                    scored.relevance_score, scored.article.title
                );
                skipped += 1;
            } else {
                candidates.push(scored);
            }
        }

        self.set_phase(RunPhase::Persisting);
        let mut saved = 0;
        for article in candidates {
            if self.store_article(article).await? {
                saved += 1;
            } else {
                skipped += 1;
            }
        }

        Ok(RunSummary {
            saved,
            skipped,
            fetched,
            duplicates: batch.duplicates,
            failed_sources,
            started_at,
            finished_at: Utc::now(),
        })
    }

    /// Fetch from every adapter concurrently, in configuration order.
    ///
    /// Failures are logged and reported by name; they never discard other
    /// sources' results.
    async fn fetch_all(&self) -> (Vec<RawArticle>, Vec<String>) {
        let limit = self.config.fetch_timeout;

        let fetches = self.adapters.iter().map(|adapter| async move {
            let result = match timeout(limit, adapter.fetch()).await {
                Ok(result) => result,
                Err(_) => Err(FetchError::Timeout(format!(
                    "no response within {}ms",
                    limit.as_millis()
                ))),
            };
            (adapter.name().to_string(), result)
        });

        let mut articles = Vec::new();
        let mut failed = Vec::new();

        for (name, result) in join_all(fetches).await {
            match result {
                Ok(batch) => {
                    info!("Fetched {} articles from {}", batch.len(), name);
                    articles.extend(batch);
                }
                Err(e) => {
                    warn!("Failed to fetch from {}: {}", name, e);
                    failed.push(name);
                }
            }
        }

        (articles, failed)
    }

    /// Persist one article. Returns whether it was newly saved.
    async fn store_article(&self, article: ScoredArticle) -> Result<bool, IngestionError> {
        let url = article.article.url.clone();

        match self.store.exists(&url).await {
            Ok(true) => {
                debug!("Skipping already stored article: {}", url);
                return Ok(false);
            }
            Ok(false) => {}
            Err(e) if e.is_unavailable() => return Err(IngestionError::StoreUnavailable(e)),
            Err(e) => {
                warn!("Skipping {} after lookup error: {}", url, e);
                return Ok(false);
            }
        }

        match self.store.insert(article).await {
            Ok(persisted) => {
                debug!("Saved article {}: {}", persisted.id, persisted.title());
                Ok(true)
            }
            Err(StoreError::Conflict(url)) => {
                warn!("Article stored concurrently, skipping: {}", url);
                Ok(false)
            }
            Err(e) if e.is_unavailable() => Err(IngestionError::StoreUnavailable(e)),
            Err(e) => {
                warn!("Skipping {} after insert error: {}", url, e);
                Ok(false)
            }
        }
    }

    fn set_phase(&self, phase: RunPhase) {
        self.status.write().phase = phase;
    }
}
