//! Article Store
//!
//! SQLite-backed persistence for ingested articles. The `url` column carries
//! a `UNIQUE` constraint so insert-if-absent holds even when two runs race
//! between `exists` and `insert`.

use std::path::Path;
use std::sync::Mutex;

use ainews_core::{
    ArticleFilter, ArticlePage, ArticleSort, ArticleSource, KeywordCount, NormalizedArticle,
    Pagination, PersistedArticle, ScoredArticle,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, params_from_iter, types::Value, Connection, OptionalExtension, Row};
use thiserror::Error;
use tracing::debug;

/// Persistence contract used by the ingestion pipeline and the read API
#[async_trait]
pub trait ArticleStore: Send + Sync {
    /// Check that the store is reachable
    async fn ping(&self) -> Result<(), StoreError>;

    /// Whether an article with this URL is already stored
    async fn exists(&self, url: &str) -> Result<bool, StoreError>;

    /// Insert a scored article.
    ///
    /// Fails with [`StoreError::Conflict`] when the URL is already present.
    async fn insert(&self, article: ScoredArticle) -> Result<PersistedArticle, StoreError>;

    /// Fetch one article by identity
    async fn get(&self, id: &str) -> Result<Option<PersistedArticle>, StoreError>;

    /// Filtered, sorted, paginated listing
    async fn query(
        &self,
        filter: &ArticleFilter,
        sort: ArticleSort,
        pagination: Pagination,
    ) -> Result<ArticlePage, StoreError>;

    /// Most frequent keywords across stored articles
    async fn keyword_counts(&self, limit: usize) -> Result<Vec<KeywordCount>, StoreError>;

    /// Total number of stored articles
    async fn count(&self) -> Result<usize, StoreError>;
}

const ARTICLE_COLUMNS: &str = "id, url, title, description, content, image_url, published_at, \
     source_id, source_name, keywords, relevance_score, created_at";

/// Article store using SQLite
pub struct SqliteArticleStore {
    conn: Mutex<Connection>,
}

impl SqliteArticleStore {
    /// Open (or create) the database file and its tables
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self, StoreError> {
        if let Some(parent) = db_path.as_ref().parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                StoreError::Io(format!("Failed to create database directory: {}", e))
            })?;
        }

        let conn = Connection::open(db_path)?;
        Self::with_connection(conn)
    }

    /// Create an in-memory store (useful for testing)
    pub fn new_in_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<(), StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::LockError)?;

        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS articles (
                id TEXT PRIMARY KEY,
                url TEXT NOT NULL UNIQUE,
                title TEXT NOT NULL,
                description TEXT,
                content TEXT,
                image_url TEXT,
                published_at INTEGER NOT NULL,
                source_id TEXT NOT NULL,
                source_name TEXT NOT NULL,
                keywords TEXT NOT NULL,
                relevance_score INTEGER NOT NULL,
                created_at INTEGER NOT NULL
            );

            CREATE TABLE IF NOT EXISTS article_keywords (
                article_id TEXT NOT NULL REFERENCES articles(id),
                keyword TEXT NOT NULL,
                PRIMARY KEY (article_id, keyword)
            );

            CREATE INDEX IF NOT EXISTS idx_articles_published
            ON articles(published_at);

            CREATE INDEX IF NOT EXISTS idx_articles_source
            ON articles(source_id);

            CREATE INDEX IF NOT EXISTS idx_article_keywords_keyword
            ON article_keywords(keyword COLLATE NOCASE);
            "#,
        )?;

        Ok(())
    }
}

#[async_trait]
impl ArticleStore for SqliteArticleStore {
    async fn ping(&self) -> Result<(), StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::LockError)?;
        conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
        Ok(())
    }

    async fn exists(&self, url: &str) -> Result<bool, StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::LockError)?;
        let found = conn
            .query_row("SELECT 1 FROM articles WHERE url = ?1", params![url], |row| {
                row.get::<_, i64>(0)
            })
            .optional()?;
        Ok(found.is_some())
    }

    async fn insert(&self, article: ScoredArticle) -> Result<PersistedArticle, StoreError> {
        let persisted = PersistedArticle::new(article, Utc::now());
        let keywords = serde_json::to_string(&persisted.article.keywords)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        let inner = &persisted.article.article;

        let mut conn = self.conn.lock().map_err(|_| StoreError::LockError)?;
        let tx = conn.transaction()?;

        let written = tx.execute(
            r#"
            INSERT INTO articles (id, url, title, description, content, image_url, published_at,
                                  source_id, source_name, keywords, relevance_score, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            ON CONFLICT DO NOTHING
            "#,
            params![
                persisted.id,
                inner.url,
                inner.title,
                inner.description,
                inner.content,
                inner.image_url,
                inner.published_at.timestamp_millis(),
                inner.source.id,
                inner.source.name,
                keywords,
                persisted.article.relevance_score as i64,
                persisted.created_at.timestamp_millis(),
            ],
        )?;

        if written == 0 {
            return Err(StoreError::Conflict(inner.url.clone()));
        }

        for keyword in &persisted.article.keywords {
            tx.execute(
                "INSERT OR IGNORE INTO article_keywords (article_id, keyword) VALUES (?1, ?2)",
                params![persisted.id, keyword],
            )?;
        }

        tx.commit()?;
        debug!("Stored article {} ({})", persisted.id, inner.url);

        Ok(persisted)
    }

    async fn get(&self, id: &str) -> Result<Option<PersistedArticle>, StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::LockError)?;
        let row = conn
            .query_row(
                &format!("SELECT {} FROM articles WHERE id = ?1", ARTICLE_COLUMNS),
                params![id],
                ArticleRow::from_row,
            )
            .optional()?;

        row.map(ArticleRow::into_persisted).transpose()
    }

    async fn query(
        &self,
        filter: &ArticleFilter,
        sort: ArticleSort,
        pagination: Pagination,
    ) -> Result<ArticlePage, StoreError> {
        let mut clauses = Vec::new();
        let mut values: Vec<Value> = Vec::new();

        if let Some(source_id) = &filter.source_id {
            values.push(Value::Text(source_id.clone()));
            clauses.push(format!("source_id = ?{}", values.len()));
        }
        if let Some(keyword) = &filter.keyword {
            values.push(Value::Text(keyword.clone()));
            clauses.push(format!(
                "id IN (SELECT article_id FROM article_keywords WHERE keyword = ?{} COLLATE NOCASE)",
                values.len()
            ));
        }

        let where_clause = if clauses.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", clauses.join(" AND "))
        };

        let conn = self.conn.lock().map_err(|_| StoreError::LockError)?;

        let total: i64 = conn.query_row(
            &format!("SELECT COUNT(*) FROM articles {}", where_clause),
            params_from_iter(values.iter()),
            |row| row.get(0),
        )?;

        let limit_idx = values.len() + 1;
        let offset_idx = values.len() + 2;
        values.push(Value::Integer(pagination.limit() as i64));
        values.push(Value::Integer(pagination.offset() as i64));

        let sql = format!(
            "SELECT {} FROM articles {} ORDER BY {} LIMIT ?{} OFFSET ?{}",
            ARTICLE_COLUMNS,
            where_clause,
            order_by(sort),
            limit_idx,
            offset_idx
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(values.iter()), ArticleRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        let articles = rows
            .into_iter()
            .map(ArticleRow::into_persisted)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ArticlePage::new(articles, pagination, total as usize))
    }

    async fn keyword_counts(&self, limit: usize) -> Result<Vec<KeywordCount>, StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::LockError)?;

        let mut stmt = conn.prepare(
            r#"
            SELECT keyword, COUNT(*) AS hits
            FROM article_keywords
            GROUP BY keyword
            ORDER BY hits DESC, keyword ASC
            LIMIT ?1
            "#,
        )?;

        let counts = stmt
            .query_map(params![limit as i64], |row| {
                let keyword: String = row.get(0)?;
                let hits: i64 = row.get(1)?;
                Ok(KeywordCount::new(keyword, hits as usize))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(counts)
    }

    async fn count(&self) -> Result<usize, StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::LockError)?;
        let total: i64 = conn.query_row("SELECT COUNT(*) FROM articles", [], |row| row.get(0))?;
        Ok(total as usize)
    }
}

fn order_by(sort: ArticleSort) -> &'static str {
    match sort {
        ArticleSort::PublishedDesc => "published_at DESC, id ASC",
        ArticleSort::PublishedAsc => "published_at ASC, id ASC",
        ArticleSort::RelevanceDesc => "relevance_score DESC, published_at DESC, id ASC",
        ArticleSort::TitleAsc => "title ASC, id ASC",
    }
}

/// Column values of one `articles` row
struct ArticleRow {
    id: String,
    url: String,
    title: String,
    description: Option<String>,
    content: Option<String>,
    image_url: Option<String>,
    published_at: i64,
    source_id: String,
    source_name: String,
    keywords: String,
    relevance_score: i64,
    created_at: i64,
}

impl ArticleRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            url: row.get(1)?,
            title: row.get(2)?,
            description: row.get(3)?,
            content: row.get(4)?,
            image_url: row.get(5)?,
            published_at: row.get(6)?,
            source_id: row.get(7)?,
            source_name: row.get(8)?,
            keywords: row.get(9)?,
            relevance_score: row.get(10)?,
            created_at: row.get(11)?,
        })
    }

    fn into_persisted(self) -> Result<PersistedArticle, StoreError> {
        let keywords = serde_json::from_str(&self.keywords)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        Ok(PersistedArticle {
            id: self.id,
            article: ScoredArticle {
                article: NormalizedArticle {
                    title: self.title,
                    url: self.url,
                    description: self.description,
                    content: self.content,
                    image_url: self.image_url,
                    published_at: from_millis(self.published_at)?,
                    source: ArticleSource::new(self.source_id, self.source_name),
                },
                keywords,
                relevance_score: self.relevance_score.max(0) as u32,
            },
            created_at: from_millis(self.created_at)?,
        })
    }
}

fn from_millis(millis: i64) -> Result<DateTime<Utc>, StoreError> {
    DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| StoreError::Serialization(format!("invalid timestamp {}", millis)))
}

/// Article store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Article already stored: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Failed to acquire lock")]
    LockError,
}

impl StoreError {
    /// Whether the store itself is unusable, as opposed to a per-article problem
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            StoreError::Database(_) | StoreError::Io(_) | StoreError::LockError
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ainews_core::{score_article, RawArticle};
    use chrono::TimeZone;

    fn scored(title: &str, url: &str, source: &str, day: u32) -> ScoredArticle {
        let raw = RawArticle {
            title: Some(title.to_string()),
            url: Some(url.to_string()),
            published_at: Some(
                Utc.with_ymd_and_hms(2024, 5, day, 12, 0, 0)
                    .unwrap()
                    .to_rfc3339(),
            ),
            source_name: Some(source.to_string()),
            ..RawArticle::default()
        };
        score_article(raw.normalize().unwrap())
    }

    async fn seeded() -> SqliteArticleStore {
        let store = SqliteArticleStore::new_in_memory().unwrap();
        store
            .insert(scored("AI chips get faster", "https://wired.com/1", "Wired", 1))
            .await
            .unwrap();
        store
            .insert(scored(
                "Machine learning and GPT models in AI research",
                "https://techcrunch.com/2",
                "TechCrunch",
                3,
            ))
            .await
            .unwrap();
        store
            .insert(scored("Deep learning for robots", "https://wired.com/3", "Wired", 2))
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let store = SqliteArticleStore::new_in_memory().unwrap();
        store.ping().await.unwrap();

        let article = scored("AI chips get faster", "https://wired.com/1", "Wired", 1);
        let persisted = store.insert(article.clone()).await.unwrap();

        assert!(store.exists("https://wired.com/1").await.unwrap());
        assert!(!store.exists("https://wired.com/2").await.unwrap());

        let loaded = store.get(&persisted.id).await.unwrap().unwrap();
        assert_eq!(loaded.article, article);
        assert_eq!(
            loaded.created_at.timestamp_millis(),
            persisted.created_at.timestamp_millis()
        );
        assert!(store.get("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_url_conflicts() {
        let store = SqliteArticleStore::new_in_memory().unwrap();
        store
            .insert(scored("AI one", "https://x.com/1", "X", 1))
            .await
            .unwrap();

        let err = store
            .insert(scored("AI one again", "https://x.com/1", "X", 2))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(ref url) if url == "https://x.com/1"));
        assert!(!err.is_unavailable());
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_query_sorts() {
        let store = seeded().await;
        let all = ArticleFilter::default();
        let page = Pagination::default();

        let newest = store.query(&all, ArticleSort::PublishedDesc, page).await.unwrap();
        let urls: Vec<_> = newest.articles.iter().map(|a| a.url()).collect();
        assert_eq!(
            urls,
            ["https://techcrunch.com/2", "https://wired.com/3", "https://wired.com/1"]
        );

        let oldest = store.query(&all, ArticleSort::PublishedAsc, page).await.unwrap();
        assert_eq!(oldest.articles[0].url(), "https://wired.com/1");

        let relevant = store.query(&all, ArticleSort::RelevanceDesc, page).await.unwrap();
        assert_eq!(relevant.articles[0].url(), "https://techcrunch.com/2");

        let titled = store.query(&all, ArticleSort::TitleAsc, page).await.unwrap();
        let titles: Vec<_> = titled.articles.iter().map(|a| a.title()).collect();
        assert_eq!(
            titles,
            [
                "AI chips get faster",
                "Deep learning for robots",
                "Machine learning and GPT models in AI research"
            ]
        );
    }

    #[tokio::test]
    async fn test_query_filters() {
        let store = seeded().await;
        let page = Pagination::default();

        let wired = ArticleFilter {
            source_id: Some("wired".to_string()),
            keyword: None,
        };
        let result = store.query(&wired, ArticleSort::default(), page).await.unwrap();
        assert_eq!(result.total_articles, 2);
        assert!(result.articles.iter().all(|a| a.article.article.source.id == "wired"));

        let gpt = ArticleFilter {
            source_id: None,
            keyword: Some("gpt".to_string()),
        };
        let result = store.query(&gpt, ArticleSort::default(), page).await.unwrap();
        assert_eq!(result.total_articles, 1);
        assert_eq!(result.articles[0].url(), "https://techcrunch.com/2");

        let none = ArticleFilter {
            source_id: Some("wired".to_string()),
            keyword: Some("GPT".to_string()),
        };
        let result = store.query(&none, ArticleSort::default(), page).await.unwrap();
        assert_eq!(result.total_articles, 0);
        assert_eq!(result.total_pages, 0);
    }

    #[tokio::test]
    async fn test_query_paginates() {
        let store = seeded().await;
        let all = ArticleFilter::default();

        let first = store
            .query(&all, ArticleSort::PublishedDesc, Pagination::new(Some(1), Some(2)))
            .await
            .unwrap();
        assert_eq!(first.articles.len(), 2);
        assert_eq!(first.total_pages, 2);
        assert_eq!(first.total_articles, 3);

        let second = store
            .query(&all, ArticleSort::PublishedDesc, Pagination::new(Some(2), Some(2)))
            .await
            .unwrap();
        assert_eq!(second.current_page, 2);
        assert_eq!(second.articles.len(), 1);
        assert_eq!(second.articles[0].url(), "https://wired.com/1");

        let past_end = store
            .query(&all, ArticleSort::PublishedDesc, Pagination::new(Some(9), Some(2)))
            .await
            .unwrap();
        assert!(past_end.articles.is_empty());
        assert_eq!(past_end.total_articles, 3);
    }

    #[tokio::test]
    async fn test_keyword_counts() {
        let store = seeded().await;
        let counts = store.keyword_counts(10).await.unwrap();

        // "Deep learning for robots" is the only title without an "ai" substring
        assert_eq!(counts[0], KeywordCount::new("AI", 2));
        assert!(counts.contains(&KeywordCount::new("GPT", 1)));
        assert!(counts.contains(&KeywordCount::new("deep learning", 1)));

        assert_eq!(store.keyword_counts(1).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_file_backed_store_persists() {
        let dir = std::env::temp_dir().join(format!("ainews-store-{}", std::process::id()));
        let path = dir.join("nested").join("articles.db");

        {
            let store = SqliteArticleStore::new(&path).unwrap();
            store
                .insert(scored("AI one", "https://x.com/1", "X", 1))
                .await
                .unwrap();
        }

        let reopened = SqliteArticleStore::new(&path).unwrap();
        assert!(reopened.exists("https://x.com/1").await.unwrap());

        let _ = std::fs::remove_dir_all(dir);
    }
}
