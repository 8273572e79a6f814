//! Same-batch deduplication by URL

use std::collections::HashSet;

use crate::article::NormalizedArticle;

/// Result of a deduplication pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DedupeOutcome {
    /// Surviving articles, in first-seen order
    pub articles: Vec<NormalizedArticle>,
    /// Number of later occurrences that were dropped
    pub duplicates: usize,
}

/// Keep the first article for each URL, preserving order.
///
/// URLs are compared as exact strings; trailing slashes and query strings
/// are not normalized.
pub fn dedupe(articles: Vec<NormalizedArticle>) -> DedupeOutcome {
    let total = articles.len();
    let mut seen_urls = HashSet::with_capacity(total);

    let articles: Vec<NormalizedArticle> = articles
        .into_iter()
        .filter(|article| seen_urls.insert(article.url.clone()))
        .collect();

    DedupeOutcome {
        duplicates: total - articles.len(),
        articles,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::article::ArticleSource;
    use chrono::Utc;

    fn article(url: &str, source: &str) -> NormalizedArticle {
        NormalizedArticle {
            title: format!("From {source}"),
            url: url.to_string(),
            description: None,
            content: None,
            image_url: None,
            published_at: Utc::now(),
            source: ArticleSource::from_name(source),
        }
    }

    #[test]
    fn test_first_occurrence_wins() {
        let outcome = dedupe(vec![
            article("http://x.com/1", "NewsAPI"),
            article("http://x.com/2", "NewsAPI"),
            article("http://x.com/1", "GNews"),
        ]);

        assert_eq!(outcome.duplicates, 1);
        assert_eq!(outcome.articles.len(), 2);
        assert_eq!(outcome.articles[0].url, "http://x.com/1");
        assert_eq!(outcome.articles[0].source.name, "NewsAPI");
        assert_eq!(outcome.articles[1].url, "http://x.com/2");
    }

    #[test]
    fn test_urls_compared_exactly() {
        let outcome = dedupe(vec![
            article("http://x.com/1", "A"),
            article("http://x.com/1/", "A"),
            article("http://x.com/1?ref=feed", "A"),
        ]);
        assert_eq!(outcome.duplicates, 0);
        assert_eq!(outcome.articles.len(), 3);
    }

    #[test]
    fn test_preserves_relative_order() {
        let urls = ["c", "a", "c", "b", "a", "d"];
        let outcome = dedupe(urls.iter().map(|u| article(u, "S")).collect());
        let kept: Vec<&str> = outcome.articles.iter().map(|a| a.url.as_str()).collect();
        assert_eq!(kept, vec!["c", "a", "b", "d"]);
        assert_eq!(outcome.duplicates, 2);
    }

    #[test]
    fn test_empty_batch() {
        let outcome = dedupe(Vec::new());
        assert!(outcome.articles.is_empty());
        assert_eq!(outcome.duplicates, 0);
    }
}
