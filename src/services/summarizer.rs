//! Local extractive summarizer.
//!
//! Sentences are scored by how many frequent content words they carry,
//! normalized by their length. The best `n` are returned in the order they
//! appeared in the articles. The most frequent content words double as topic
//! tags.

use crate::models::{Article, SummarizedScript};
use crate::services::Summarizer;
use async_trait::async_trait;
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use tracing::{debug, instrument};

/// Tags returned per summary; the hashtag line only uses the first fifteen.
const MAX_TAGS: usize = 20;
const MIN_SENTENCE_WORDS: usize = 6;
const MAX_SENTENCE_WORDS: usize = 60;

static SENTENCE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^.!?\n]+[.!?]").expect("sentence regex is valid"));

static WORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\p{L}[\p{L}'’-]*").expect("word regex is valid"));

static STOPWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "the", "and", "are", "was", "were", "for", "with", "that", "this", "these", "those",
        "from", "have", "has", "had", "not", "but", "you", "your", "they", "them", "their",
        "there", "then", "than", "his", "her", "she", "him", "its", "our", "out", "over",
        "into", "onto", "about", "after", "before", "also", "just", "now", "will", "would",
        "could", "should", "can", "may", "might", "been", "being", "who", "whom", "what",
        "when", "where", "which", "while", "why", "how", "all", "any", "some", "more", "most",
        "said", "says", "say", "one", "two", "new", "like", "very", "much", "many", "such",
        "only", "other", "own", "same", "each", "both", "few", "did", "does", "doing", "here",
        "because", "until", "again", "further", "once", "off", "under", "above", "below",
        "between", "through", "during", "against", "per", "via", "yet", "too", "let", "get",
        "got", "make", "made", "year", "years", "time", "week", "day", "days",
    ]
    .into_iter()
    .collect()
});

/// Lowercased content words of `text`, in order of appearance.
fn content_words(text: &str) -> Vec<String> {
    WORD_RE
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .filter(|w| w.chars().count() >= 3 && !STOPWORDS.contains(w.as_str()))
        .collect()
}

/// The `limit` most frequent content words of `text`.
///
/// Ties are broken by first appearance, so the result is deterministic.
pub fn keywords(text: &str, limit: usize) -> Vec<String> {
    let mut counts: HashMap<String, (usize, usize)> = HashMap::new();
    for (position, word) in content_words(text).into_iter().enumerate() {
        counts.entry(word).or_insert((0, position)).0 += 1;
    }
    counts
        .into_iter()
        .sorted_by(|(_, (ca, fa)), (_, (cb, fb))| cb.cmp(ca).then(fa.cmp(fb)))
        .take(limit)
        .map(|(word, _)| word)
        .collect()
}

/// Pick the `n` highest-scoring sentences of `text`, kept in original order.
pub fn summarize_text(text: &str, n: usize) -> String {
    let sentences: Vec<&str> = SENTENCE_RE
        .find_iter(text)
        .map(|m| m.as_str().trim())
        .filter(|s| {
            let words = s.split_whitespace().count();
            (MIN_SENTENCE_WORDS..=MAX_SENTENCE_WORDS).contains(&words)
        })
        .unique()
        .collect();

    let mut frequency: HashMap<String, usize> = HashMap::new();
    for word in content_words(text) {
        *frequency.entry(word).or_default() += 1;
    }

    let score = |sentence: &str| -> f64 {
        let total = sentence.split_whitespace().count().max(1);
        let weight: usize = content_words(sentence)
            .iter()
            .map(|w| frequency.get(w).copied().unwrap_or(0))
            .sum();
        weight as f64 / total as f64
    };

    sentences
        .iter()
        .enumerate()
        .map(|(index, sentence)| (index, score(sentence)))
        .sorted_by(|(ia, sa), (ib, sb)| sb.total_cmp(sa).then(ia.cmp(ib)))
        .take(n)
        .map(|(index, _)| index)
        .sorted()
        .map(|index| sentences[index])
        .join(" ")
}

/// [`Summarizer`] that runs entirely in-process.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractiveSummarizer;

#[async_trait]
impl Summarizer for ExtractiveSummarizer {
    #[instrument(level = "info", skip(self, articles), fields(articles = articles.len()))]
    async fn summarize(&self, articles: &[Article], sentences: usize) -> anyhow::Result<SummarizedScript> {
        let corpus = articles.iter().map(|a| a.content.as_str()).join("\n");
        let text = summarize_text(&corpus, sentences);
        let tags = if text.is_empty() {
            Vec::new()
        } else {
            keywords(&corpus, MAX_TAGS)
        };
        debug!(chars = text.len(), tags = tags.len(), "Summarized articles");
        Ok(SummarizedScript { text, tags })
    }
}
