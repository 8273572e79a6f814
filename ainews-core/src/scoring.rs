//! Relevance scoring for AI news
//!
//! The score is an engagement heuristic, not a probability: weighted raw
//! substring counts over the lowercased article text plus a bonus when the
//! title itself is about AI. Substring counting both over- and under-counts
//! (the "ai " term hits "thai " and misses "AI." at the end of a sentence);
//! the tests pin that behaviour rather than improve on it.

use std::sync::LazyLock;

use regex::Regex;

use crate::article::{NormalizedArticle, ScoredArticle};
use crate::keywords::extract_from_article;

/// Articles scoring below this are never persisted
pub const RELEVANCE_THRESHOLD: u32 = 5;

/// Bonus applied when the title mentions AI directly
pub const TITLE_BONUS: u32 = 10;

/// Hand-tuned term weights. Terms are matched against lowercased text.
pub const WEIGHTED_TERMS: &[(&str, u32)] = &[
    ("artificial intelligence", 5),
    ("ai ", 4),
    ("machine learning", 4),
    ("neural network", 3),
    ("deep learning", 3),
    ("nlp", 2),
    ("computer vision", 2),
    ("gpt", 3),
    ("llm", 3),
];

static AI_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bai\b").expect("static regex is valid"));

/// Compute the relevance score of a normalized article
pub fn relevance_score(article: &NormalizedArticle) -> u32 {
    let text = article.combined_text().to_lowercase();

    let weighted: u32 = WEIGHTED_TERMS
        .iter()
        .map(|(term, weight)| text.matches(term).count() as u32 * weight)
        .sum();

    let title = article.title.to_lowercase();
    if title.contains("artificial intelligence") || AI_TOKEN.is_match(&title) {
        weighted + TITLE_BONUS
    } else {
        weighted
    }
}

/// Run keyword extraction and scoring over an article
pub fn score_article(article: NormalizedArticle) -> ScoredArticle {
    let keywords = extract_from_article(&article);
    let relevance_score = relevance_score(&article);

    ScoredArticle {
        article,
        keywords,
        relevance_score,
    }
}
