//! # trend_reel
//!
//! Builds short-video resource packages from trending topics: a narration
//! script, its audio and subtitles, imagery, background music and the text to
//! publish alongside the video.
//!
//! ## Usage
//!
//! ```sh
//! PEXELS_API_KEY=... trend_reel -t 2 -o ./resources
//! ```
//!
//! ## Architecture
//!
//! A single [`pipeline::ResourcePipeline`] runs the stages in order and stops
//! at the first one that comes back empty:
//! 1. **Fetch**: Trend list and articles from Google Trends
//! 2. **Summarize**: Narration script, tags and description
//! 3. **Media**: Images from Pexels into a per-run content directory
//! 4. **Mood**: Sentiment of the script picks the background music
//! 5. **Voice**: Narration audio and subtitles via external commands
//! 6. **Output**: `resources.json` manifest and an optional render command

use clap::Parser;
use std::error::Error;
use std::sync::Arc;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod error;
mod location;
mod models;
mod outputs;
mod pipeline;
mod services;
mod utils;

use cli::Cli;
use outputs::manifest::ManifestAssembler;
use pipeline::{ResourcePipeline, Services};
use services::google_trends::GoogleTrends;
use services::media::PexelsMediaFinder;
use services::sentiment::LexiconClassifier;
use services::speech::CommandSpeechSynthesizer;
use services::subtitles::CommandSubtitleGenerator;
use services::summarizer::ExtractiveSummarizer;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("trend_reel starting up");

    let args = Cli::parse();
    debug!(
        trend_number = args.trend_number,
        output_root = %args.output_root,
        geo = %args.geo,
        "Parsed CLI arguments"
    );

    let Some(api_key) = args.pexels_api_key.clone() else {
        error!("No Pexels API key (set --pexels-api-key or PEXELS_API_KEY)");
        return Err("missing Pexels API key".into());
    };

    let trends = Arc::new(GoogleTrends::new(args.geo.clone()));
    let services = Services {
        trends: trends.clone(),
        scraper: trends,
        summarizer: Arc::new(ExtractiveSummarizer),
        sentiment: Arc::new(LexiconClassifier),
        media: Arc::new(PexelsMediaFinder::new(
            api_key,
            args.output_root.clone(),
            args.max_images,
        )),
        speech: Arc::new(CommandSpeechSynthesizer::new(args.tts_command.clone())),
        subtitles: Arc::new(CommandSubtitleGenerator::new(
            args.subtitle_command.clone(),
            args.subtitle_model.clone(),
        )),
        assembler: Arc::new(ManifestAssembler::new(args.render_command.clone())),
    };

    let pipeline = ResourcePipeline::new(args.pipeline_config(), services);
    info!(
        trend_number = pipeline.config().trend_number,
        language = %pipeline.config().language,
        "Running resource pipeline"
    );
    let result = pipeline.run().await;

    let elapsed = start_time.elapsed();
    match result {
        Ok(description) => {
            info!(?elapsed, secs = elapsed.as_secs(), "Resources generated");
            println!("{}", description);
            Ok(())
        }
        Err(e) => {
            error!(?elapsed, stage = %e.stage(), error = %e, "Resource generation failed");
            Err(e.into())
        }
    }
}
