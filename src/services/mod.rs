//! Collaborator contracts consumed by the resource pipeline, plus default adapters.
//!
//! The pipeline only ever talks to these traits. Each one is a narrow
//! input/output contract; how a collaborator scrapes, summarizes, classifies,
//! synthesizes or downloads is its own business.
//!
//! # Failure Signals
//!
//! A collaborator signals failure either by returning `Err` or by returning an
//! empty value (empty list, empty text, `None`). The pipeline treats both the
//! same way for the stage that called it.
//!
//! # Default Adapters
//!
//! | Contract | Adapter | Backend |
//! |----------|---------|---------|
//! | [`TrendSource`], [`ContentScraper`] | [`google_trends::GoogleTrends`] | Google Trends RSS + article HTML |
//! | [`Summarizer`] | [`summarizer::ExtractiveSummarizer`] | Local frequency scoring |
//! | [`SentimentClassifier`] | [`sentiment::LexiconClassifier`] | Local keyword lexicon |
//! | [`MediaFinder`] | [`media::PexelsMediaFinder`] | Pexels API + music catalog |
//! | [`SpeechSynthesizer`] | [`speech::CommandSpeechSynthesizer`] | External TTS command |
//! | [`SubtitleGenerator`] | [`subtitles::CommandSubtitleGenerator`] | External transcription command |
//! | [`VideoAssembler`] | [`crate::outputs::manifest::ManifestAssembler`] | JSON manifest + render command |

use crate::models::{Article, Emotion, MediaBundle, MusicSelection, ResourceOutput, SummarizedScript};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

pub mod google_trends;
pub mod media;
pub mod sentiment;
pub mod speech;
pub mod subtitles;
pub mod summarizer;

/// Source of the current trend list.
#[async_trait]
pub trait TrendSource: Send + Sync {
    /// Ordered names of the currently trending topics.
    async fn list_trends(&self) -> anyhow::Result<Vec<String>>;
}

/// Fetches article bodies written about a trend.
#[async_trait]
pub trait ContentScraper: Send + Sync {
    /// Fetch up to `count` articles for the trend at position `trend_index`.
    ///
    /// An index the source does not know is an error.
    async fn fetch_articles(&self, trend_index: usize, count: usize) -> anyhow::Result<Vec<Article>>;
}

#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Reduce `articles` to roughly `sentences` sentences plus topic tags.
    async fn summarize(&self, articles: &[Article], sentences: usize) -> anyhow::Result<SummarizedScript>;
}

#[async_trait]
pub trait SentimentClassifier: Send + Sync {
    async fn classify(&self, text: &str) -> anyhow::Result<Option<Emotion>>;
}

/// Finds imagery for a trend and background music for a mood.
#[async_trait]
pub trait MediaFinder: Send + Sync {
    /// Search and download media for a trend.
    ///
    /// A successful download creates the run's content directory.
    async fn search_and_download(&self, trend: &str, script: &str) -> anyhow::Result<MediaBundle>;

    /// Pick a track matching `emotion` from the catalog in `music_dir`.
    async fn select_music(&self, emotion: Emotion, music_dir: &Path) -> anyhow::Result<Option<MusicSelection>>;
}

#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Render `text` to an audio file inside `output_dir`, returning its path.
    async fn synthesize(&self, text: &str, output_dir: &Path, language: &str) -> anyhow::Result<Option<PathBuf>>;
}

#[async_trait]
pub trait SubtitleGenerator: Send + Sync {
    /// Produce a subtitle file for `audio` inside `output_dir`, returning its path.
    async fn generate(&self, audio: &Path, output_dir: &Path) -> anyhow::Result<Option<PathBuf>>;
}

/// Turns a finished resource package into a video.
///
/// Fire-and-forget from the pipeline's point of view: errors are logged, never acted on.
#[async_trait]
pub trait VideoAssembler: Send + Sync {
    async fn assemble(&self, output: &ResourceOutput) -> anyhow::Result<()>;
}
