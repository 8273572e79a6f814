//! Server configuration loaded from environment variables

use std::env;
use std::time::Duration;

use ainews_services::DEFAULT_INGEST_INTERVAL;

const DEFAULT_PORT: u16 = 5001;
const DEFAULT_DB_PATH: &str = "data/articles.db";
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;

/// Settings for the API server and its ingestion pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub port: u16,
    /// SQLite database file
    pub db_path: String,
    /// NewsAPI.org key; the NewsAPI source is disabled without one
    pub news_api_key: Option<String>,
    /// GNews key; the GNews source is disabled without one
    pub gnews_api_key: Option<String>,
    pub ingest_interval: Duration,
    pub fetch_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            db_path: DEFAULT_DB_PATH.to_string(),
            news_api_key: None,
            gnews_api_key: None,
            ingest_interval: DEFAULT_INGEST_INTERVAL,
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
        }
    }
}

impl AppConfig {
    /// Load configuration from the process environment
    ///
    /// Reads:
    /// - SERVER_PORT (default 5001)
    /// - ARTICLES_DB_PATH (default data/articles.db)
    /// - NEWS_API_KEY, GNEWS_API_KEY (optional)
    /// - INGEST_INTERVAL_SECS (default 21600)
    /// - FETCH_TIMEOUT_SECS (default 10)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match var("SERVER_PORT") {
            Some(value) => parse_number("SERVER_PORT", &value)?,
            None => defaults.port,
        };

        let ingest_interval = match var("INGEST_INTERVAL_SECS") {
            Some(value) => Duration::from_secs(parse_positive("INGEST_INTERVAL_SECS", &value)?),
            None => defaults.ingest_interval,
        };

        let fetch_timeout = match var("FETCH_TIMEOUT_SECS") {
            Some(value) => Duration::from_secs(parse_positive("FETCH_TIMEOUT_SECS", &value)?),
            None => defaults.fetch_timeout,
        };

        Ok(Self {
            port,
            db_path: var("ARTICLES_DB_PATH").unwrap_or(defaults.db_path),
            news_api_key: var("NEWS_API_KEY"),
            gnews_api_key: var("GNEWS_API_KEY"),
            ingest_interval,
            fetch_timeout,
        })
    }
}

fn parse_number<T: std::str::FromStr>(field: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
    })
}

fn parse_positive(field: &str, value: &str) -> Result<u64, ConfigError> {
    match parse_number::<u64>(field, value)? {
        0 => Err(ConfigError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
        }),
        n => Ok(n),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {field}: {value:?}")]
    InvalidValue { field: String, value: String },
}
