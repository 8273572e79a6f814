//! AI News Aggregator API Server
//!
//! Serves stored AI news articles over HTTP and runs the ingestion pipeline
//! in the background.

mod config;
mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use ainews_services::{
    ArticleStore, IngestionConfig, IngestionOrchestrator, IngestionScheduler, SqliteArticleStore,
};
use ainews_sources::{GNewsClient, NewsApiClient, SourceAdapter};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::AppConfig;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ArticleStore>,
    pub orchestrator: Arc<IngestionOrchestrator>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables; missing files are fine
    for file in [".env.local", ".env"] {
        if let Err(e) = dotenvy::from_filename(file) {
            if !matches!(e, dotenvy::Error::Io(_)) {
                eprintln!("Warning: Failed to load {}: {}", file, e);
            }
        }
    }

    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,ainews_api=debug")),
        )
        .init();

    info!("Starting AI News Aggregator API");

    let config = AppConfig::from_env()?;

    // Initialize article store (SQLite database)
    info!("Initializing article store at: {}", config.db_path);
    let store: Arc<dyn ArticleStore> = Arc::new(SqliteArticleStore::new(&config.db_path)?);

    let adapters = build_adapters(&config);
    if adapters.is_empty() {
        warn!("No news API keys configured (NEWS_API_KEY, GNEWS_API_KEY) - ingestion will fetch nothing");
    }

    let orchestrator = Arc::new(IngestionOrchestrator::new(
        adapters,
        store.clone(),
        IngestionConfig {
            fetch_timeout: config.fetch_timeout,
            ..IngestionConfig::default()
        },
    ));

    // Start scheduled ingestion; the first run fires immediately
    let scheduler = Arc::new(IngestionScheduler::new(
        orchestrator.clone(),
        config.ingest_interval,
    ));
    tokio::spawn(async move {
        scheduler.start().await;
    });

    let state = AppState {
        store,
        orchestrator,
    };

    let app = routes::app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Enable each source whose API key is present
fn build_adapters(config: &AppConfig) -> Vec<Arc<dyn SourceAdapter>> {
    let mut adapters: Vec<Arc<dyn SourceAdapter>> = Vec::new();

    match &config.news_api_key {
        Some(key) => {
            let source_config =
                NewsApiClient::default_config(key.clone()).with_timeout(config.fetch_timeout);
            adapters.push(Arc::new(NewsApiClient::with_config(source_config)));
            info!("NewsAPI source enabled");
        }
        None => info!("NewsAPI source not configured (NEWS_API_KEY not set)"),
    }

    match &config.gnews_api_key {
        Some(key) => {
            let source_config =
                GNewsClient::default_config(key.clone()).with_timeout(config.fetch_timeout);
            adapters.push(Arc::new(GNewsClient::with_config(source_config)));
            info!("GNews source enabled");
        }
        None => info!("GNews source not configured (GNEWS_API_KEY not set)"),
    }

    adapters
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_adapters_follows_keys() {
        assert!(build_adapters(&AppConfig::default()).is_empty());

        let config = AppConfig {
            news_api_key: Some("news-key".to_string()),
            gnews_api_key: Some("gnews-key".to_string()),
            ..AppConfig::default()
        };
        let names: Vec<String> = build_adapters(&config)
            .iter()
            .map(|a| a.name().to_string())
            .collect();
        assert_eq!(names, vec!["NewsAPI", "GNews"]);
    }
}
