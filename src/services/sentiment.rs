//! Keyword-lexicon emotion classifier.
//!
//! Counts how many words of each emotion's lexicon appear in the text and
//! returns the emotion with the most hits. Text without any lexicon hit is
//! [`Emotion::Neutral`]; text without any word at all has no label.

use crate::models::Emotion;
use crate::services::SentimentClassifier;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use tracing::{debug, instrument};

static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\p{L}+").expect("word regex is valid"));

/// Stems per emotion, matched as word prefixes.
const LEXICON: &[(Emotion, &[&str])] = &[
    (
        Emotion::Joy,
        &[
            "happ", "joy", "celebrat", "winn", "wins", "victor", "love", "delight", "excit", "cheer",
            "triumph", "success", "amazing", "wonderful", "glad", "smil",
        ],
    ),
    (
        Emotion::Sadness,
        &[
            "sad", "mourn", "grief", "griev", "tragic", "tragedy", "loss", "lost", "die",
            "died", "death", "dead", "funeral", "tear", "heartbreak", "lonely",
        ],
    ),
    (
        Emotion::Anger,
        &[
            "anger", "angry", "furious", "outrage", "rage", "protest", "slam", "blame",
            "attack", "fight", "hostil", "condemn", "resent",
        ],
    ),
    (
        Emotion::Fear,
        &[
            "fear", "afraid", "scare", "terror", "threat", "danger", "panic", "alarm",
            "warn", "risk", "anxi", "worr", "evacuat",
        ],
    ),
    (
        Emotion::Surprise,
        &[
            "surpris", "unexpect", "shock", "stun", "astonish", "sudden", "reveal",
            "twist", "unbeliev",
        ],
    ),
    (
        Emotion::Disgust,
        &[
            "disgust", "gross", "vile", "scandal", "corrupt", "abuse", "sicken", "revolt",
            "filth",
        ],
    ),
];

/// Count lexicon hits per emotion.
fn score(text: &str) -> (usize, HashMap<Emotion, usize>) {
    let mut words = 0;
    let mut hits: HashMap<Emotion, usize> = HashMap::new();
    for word in WORD_RE.find_iter(text).map(|m| m.as_str().to_lowercase()) {
        words += 1;
        for (emotion, stems) in LEXICON.iter() {
            if stems.iter().any(|stem| word.starts_with(stem)) {
                *hits.entry(*emotion).or_default() += 1;
            }
        }
    }
    (words, hits)
}

/// Classify text by lexicon hits.
///
/// Ties go to the emotion listed first in the lexicon.
pub fn classify_text(text: &str) -> Option<Emotion> {
    let (words, hits) = score(text);
    if words == 0 {
        return None;
    }

    let mut best = Emotion::Neutral;
    let mut best_hits = 0;
    for (emotion, _) in LEXICON.iter() {
        let count = hits.get(emotion).copied().unwrap_or(0);
        if count > best_hits {
            best = *emotion;
            best_hits = count;
        }
    }
    Some(best)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LexiconClassifier;

#[async_trait]
impl SentimentClassifier for LexiconClassifier {
    #[instrument(level = "info", skip_all)]
    async fn classify(&self, text: &str) -> anyhow::Result<Option<Emotion>> {
        let emotion = classify_text(text);
        debug!(?emotion, "Classified text");
        Ok(emotion)
    }
}
