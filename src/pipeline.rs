//! The resource pipeline controller.
//!
//! [`ResourcePipeline`] turns one trend index into a [`ResourceOutput`] by
//! running its stages strictly in order, each stage's output feeding the next:
//!
//! 1. **Fetch**: Trend list plus two article sets (narration, description)
//! 2. **Summarize**: Narration script with tags, and a shorter description
//! 3. **Dedupe**: Drop repeated narration sentences
//! 4. **Media**: Search and download imagery (creates the content directory)
//! 5. **Locate**: Resolve the content and music directories
//! 6. **Sentiment**: Classify the script's mood
//! 7. **Music**: Pick a track for that mood
//! 8. **Speech**: Synthesize the narration audio
//! 9. **Subtitles**: Generate subtitles from the audio
//! 10. **Tags**: Format the hashtag line
//! 11. **Output**: Assemble the [`ResourceOutput`]
//!
//! # Cleanup
//!
//! Failures at music selection, speech synthesis or subtitle generation delete
//! the content directory before returning. Failures before media download
//! have nothing to delete. A sentiment failure leaves the directory in place
//! under [`CleanupPolicy::Compatible`] and removes it under
//! [`CleanupPolicy::AnyFailureAfterMedia`].

use crate::error::{PipelineError, Stage};
use crate::location::derive_content_location;
use crate::models::{ContentLocation, ResourceOutput};
use crate::services::{
    ContentScraper, MediaFinder, SentimentClassifier, SpeechSynthesizer, SubtitleGenerator,
    Summarizer, TrendSource, VideoAssembler,
};
use crate::utils::{dedupe_sentences, format_tags, truncate_for_log};
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tokio::fs;
use tracing::{debug, error, info, instrument, warn};

/// What to do with the content directory when sentiment classification fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CleanupPolicy {
    /// Leave the directory behind on sentiment failure; clean up only after
    /// music, speech or subtitle failures.
    #[default]
    Compatible,
    /// Remove the directory on every failure after it was created.
    AnyFailureAfterMedia,
}

/// Construction parameters for one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Position of the trend in the trend list.
    pub trend_number: usize,
    /// Articles fetched for the narration script.
    pub number_of_articles_to_read: usize,
    /// Carried for parity with the CLI surface; narration uses
    /// `number_of_articles_to_read`.
    pub text_articles: usize,
    /// Target sentence count of the narration script.
    pub text_length: usize,
    /// Articles fetched for the description.
    pub desc_articles: usize,
    /// Target sentence count of the description.
    pub desc_length: usize,
    /// Language handed to speech synthesis.
    pub language: String,
    /// Whether a sentiment failure also removes the content directory.
    pub cleanup_policy: CleanupPolicy,
}

impl PipelineConfig {
    pub fn new(trend_number: usize) -> Self {
        Self {
            trend_number,
            number_of_articles_to_read: 10,
            text_articles: 8,
            text_length: 7,
            desc_articles: 5,
            desc_length: 3,
            language: "English".to_string(),
            cleanup_policy: CleanupPolicy::default(),
        }
    }
}

/// The collaborators a pipeline run calls out to.
#[derive(Clone)]
pub struct Services {
    pub trends: Arc<dyn TrendSource>,
    pub scraper: Arc<dyn ContentScraper>,
    pub summarizer: Arc<dyn Summarizer>,
    pub sentiment: Arc<dyn SentimentClassifier>,
    pub media: Arc<dyn MediaFinder>,
    pub speech: Arc<dyn SpeechSynthesizer>,
    pub subtitles: Arc<dyn SubtitleGenerator>,
    pub assembler: Arc<dyn VideoAssembler>,
}

impl fmt::Debug for Services {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Services").finish_non_exhaustive()
    }
}

/// Runs the resource stages for one trend.
///
/// Holds nothing between runs except its configuration and collaborators.
#[derive(Debug)]
pub struct ResourcePipeline {
    config: PipelineConfig,
    services: Services,
}

impl ResourcePipeline {
    pub fn new(config: PipelineConfig, services: Services) -> Self {
        Self { config, services }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run every stage and return the finished resource package.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::EmptyResult`] naming the first stage whose
    /// collaborator failed or produced nothing. By then the content directory
    /// has been removed or left in place according to the cleanup rules in
    /// the module docs.
    #[instrument(level = "info", skip_all, fields(trend_number = self.config.trend_number))]
    pub async fn generate_resources(&self) -> Result<ResourceOutput, PipelineError> {
        let cfg = &self.config;
        let svc = &self.services;

        // ---- Fetch ----
        let trends = settle(Stage::FetchArticles, svc.trends.list_trends().await).unwrap_or_default();
        let contents = settle(
            Stage::FetchArticles,
            svc.scraper
                .fetch_articles(cfg.trend_number, cfg.number_of_articles_to_read)
                .await,
        )
        .unwrap_or_default();
        let desc_contents = settle(
            Stage::FetchArticles,
            svc.scraper.fetch_articles(cfg.trend_number, cfg.desc_articles).await,
        )
        .unwrap_or_default();

        let Some(trend_name) = trends.get(cfg.trend_number).cloned() else {
            error!(
                trend_number = cfg.trend_number,
                known = trends.len(),
                "Trend index is not in the trend list"
            );
            return Err(PipelineError::empty(Stage::FetchArticles));
        };
        if contents.is_empty() {
            error!(trend = %trend_name, "Unable to retrieve contents for trend");
            return Err(PipelineError::empty(Stage::FetchArticles));
        }
        info!(
            trend = %trend_name,
            narration_articles = contents.len(),
            description_articles = desc_contents.len(),
            "Fetched trend articles"
        );

        // ---- Summarize ----
        let script = settle(
            Stage::Summarize,
            svc.summarizer.summarize(&contents, cfg.text_length).await,
        )
        .unwrap_or_default();
        let description = settle(
            Stage::Summarize,
            svc.summarizer.summarize(&desc_contents, cfg.desc_length).await,
        )
        .map(|summary| summary.text)
        .unwrap_or_default();
        let tags = script.tags;

        // ---- Dedupe ----
        let text_script = dedupe_sentences(&script.text);
        if text_script.is_empty() || description.is_empty() {
            error!(
                script_len = text_script.len(),
                description_len = description.len(),
                "Summarization failed"
            );
            return Err(PipelineError::empty(Stage::Summarize));
        }
        debug!(script = %truncate_for_log(&text_script, 300), "Deduplicated narration script");

        // ---- Media ----
        let media = settle(
            Stage::SearchMedia,
            svc.media.search_and_download(&trend_name, &text_script).await,
        )
        .unwrap_or_default();
        let Some(first) = media.files.first() else {
            error!(trend = %trend_name, "Image search/download failed");
            return Err(PipelineError::empty(Stage::SearchMedia));
        };
        info!(count = media.files.len(), "Downloaded media");

        // ---- Locate ----
        let location = match media.location.clone() {
            Some(location) => location,
            None => match derive_content_location(&first.to_string_lossy()) {
                Some(location) => location,
                None => {
                    error!(path = %first.display(), "Media path has no content directory");
                    return Err(PipelineError::empty(Stage::SearchMedia));
                }
            },
        };
        info!(
            content_dir = %location.content_dir.display(),
            music_dir = %location.music_dir.display(),
            "Resolved content location"
        );

        // ---- Sentiment ----
        let emotion = settle(
            Stage::ClassifySentiment,
            svc.sentiment.classify(&text_script).await,
        )
        .flatten();
        let Some(emotion) = emotion else {
            error!("Sentiment analysis failed");
            return Err(match cfg.cleanup_policy {
                CleanupPolicy::Compatible => PipelineError::empty(Stage::ClassifySentiment),
                CleanupPolicy::AnyFailureAfterMedia => {
                    abort_with_cleanup(Stage::ClassifySentiment, &location).await
                }
            });
        };
        info!(%emotion, "Classified script sentiment");

        // ---- Music ----
        let music = settle(
            Stage::SelectMusic,
            svc.media.select_music(emotion, &location.music_dir).await,
        )
        .flatten();
        let Some(music) = music else {
            error!(%emotion, "Music selection failed");
            return Err(abort_with_cleanup(Stage::SelectMusic, &location).await);
        };
        info!(path = %music.path.display(), "Selected music");

        // ---- Speech ----
        let audio = settle(
            Stage::SynthesizeSpeech,
            svc.speech
                .synthesize(&text_script, &location.content_dir, &cfg.language)
                .await,
        )
        .flatten();
        let Some(audio) = audio else {
            error!(language = %cfg.language, "Text-to-Speech conversion failed");
            return Err(abort_with_cleanup(Stage::SynthesizeSpeech, &location).await);
        };
        info!(path = %audio.display(), "Synthesized narration");

        // ---- Subtitles ----
        let subtitles = settle(
            Stage::GenerateSubtitles,
            svc.subtitles.generate(&audio, &location.content_dir).await,
        )
        .flatten();
        let Some(subtitles) = subtitles else {
            error!(audio = %audio.display(), "Subtitle generation failed");
            return Err(abort_with_cleanup(Stage::GenerateSubtitles, &location).await);
        };
        info!(path = %subtitles.display(), "Generated subtitles");

        // ---- Output ----
        Ok(ResourceOutput {
            trends,
            trend_name,
            script: text_script,
            audio,
            subtitles,
            description,
            tags: format_tags(&tags),
            media,
            music,
            content_dir: location.content_dir,
        })
    }

    /// Generate resources, hand them to the video assembler and return the
    /// text to publish alongside the video.
    ///
    /// A failing assembler is logged and otherwise ignored.
    #[instrument(level = "info", skip_all, fields(trend_number = self.config.trend_number))]
    pub async fn run(&self) -> Result<String, PipelineError> {
        let output = self.generate_resources().await?;

        if let Err(e) = self.services.assembler.assemble(&output).await {
            warn!(error = %format!("{e:#}"), "Video assembly failed");
        }

        Ok(publish_description(&output))
    }
}

/// The description published alongside the video.
pub fn publish_description(output: &ResourceOutput) -> String {
    format!(
        "{}\n\n🎵 Music: {}\n\n\n{}",
        output.description, output.music.cc, output.tags
    )
}

/// Collapse a collaborator error into "no result", logging it against the stage.
fn settle<T>(stage: Stage, result: anyhow::Result<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(%stage, error = %format!("{e:#}"), "Collaborator call failed");
            None
        }
    }
}

async fn abort_with_cleanup(stage: Stage, location: &ContentLocation) -> PipelineError {
    remove_content_dir(&location.content_dir).await;
    PipelineError::empty(stage)
}

async fn remove_content_dir(dir: &Path) {
    match fs::remove_dir_all(dir).await {
        Ok(()) => info!(path = %dir.display(), "Removed content directory"),
        Err(e) => warn!(path = %dir.display(), error = %e, "Failed to remove content directory"),
    }
}
