//! Command-line interface definitions for trend_reel.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Pipeline parameters are flags; secrets and region settings can also come
//! from environment variables.

use crate::pipeline::{CleanupPolicy, PipelineConfig};
use clap::Parser;

/// Command-line arguments for the trend_reel application.
///
/// # Examples
///
/// ```sh
/// # Build a package for the third trend of the day
/// trend_reel -t 2 -o ./resources
///
/// # Spanish narration, shorter script, stricter cleanup
/// trend_reel -t 0 --language Spanish --text-length 5 --strict-cleanup
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Position of the trend in today's trend list
    #[arg(short, long)]
    pub trend_number: usize,

    /// Articles read for the narration script
    #[arg(long, default_value_t = 10)]
    pub articles: usize,

    /// Articles considered for text summarization
    #[arg(long, default_value_t = 8)]
    pub text_articles: usize,

    /// Sentences in the narration script
    #[arg(long, default_value_t = 7)]
    pub text_length: usize,

    /// Articles read for the video description
    #[arg(long, default_value_t = 5)]
    pub desc_articles: usize,

    /// Sentences in the video description
    #[arg(long, default_value_t = 3)]
    pub desc_length: usize,

    /// Narration language
    #[arg(short, long, default_value = "English")]
    pub language: String,

    /// Remove the content directory on every failure after media download,
    /// including sentiment classification
    #[arg(long)]
    pub strict_cleanup: bool,

    /// Root directory for content directories and the music catalog
    #[arg(short, long, default_value = "./resources")]
    pub output_root: String,

    /// Region whose trends are used
    #[arg(long, env = "TRENDS_GEO", default_value = "US")]
    pub geo: String,

    /// Pexels API key for image search
    #[arg(long, env = "PEXELS_API_KEY")]
    pub pexels_api_key: Option<String>,

    /// Maximum images downloaded per run
    #[arg(long, default_value_t = 8)]
    pub max_images: usize,

    /// Text-to-speech program (espeak-ng compatible arguments)
    #[arg(long, default_value = "espeak-ng")]
    pub tts_command: String,

    /// Transcription program (whisper compatible arguments)
    #[arg(long, default_value = "whisper")]
    pub subtitle_command: String,

    /// Transcription model name
    #[arg(long, default_value = "base")]
    pub subtitle_model: String,

    /// Program run with the manifest path once resources are ready
    #[arg(long)]
    pub render_command: Option<String>,
}

impl Cli {
    /// Pipeline parameters carried by the flags.
    pub fn pipeline_config(&self) -> PipelineConfig {
        let mut config = PipelineConfig::new(self.trend_number);
        config.number_of_articles_to_read = self.articles;
        config.text_articles = self.text_articles;
        config.text_length = self.text_length;
        config.desc_articles = self.desc_articles;
        config.desc_length = self.desc_length;
        config.language = self.language.clone();
        if self.strict_cleanup {
            config.cleanup_policy = CleanupPolicy::AnyFailureAfterMedia;
        }
        config
    }
}
