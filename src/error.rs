//! Failure reporting for the resource pipeline.
//!
//! Every stage failure collapses into [`PipelineError::EmptyResult`] tagged
//! with the [`Stage`] that produced nothing usable. The cause itself (network,
//! parsing, a missing binary) is only visible in the logs.

use std::fmt;
use thiserror::Error;

/// The pipeline stage a failure was observed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    FetchArticles,
    Summarize,
    SearchMedia,
    ClassifySentiment,
    SelectMusic,
    SynthesizeSpeech,
    GenerateSubtitles,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::FetchArticles => "fetch_articles",
            Stage::Summarize => "summarize",
            Stage::SearchMedia => "search_media",
            Stage::ClassifySentiment => "classify_sentiment",
            Stage::SelectMusic => "select_music",
            Stage::SynthesizeSpeech => "synthesize_speech",
            Stage::GenerateSubtitles => "generate_subtitles",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    #[error("stage {stage} returned no usable data")]
    EmptyResult { stage: Stage },
}

impl PipelineError {
    pub fn empty(stage: Stage) -> Self {
        PipelineError::EmptyResult { stage }
    }

    /// The stage that failed.
    pub fn stage(&self) -> Stage {
        match self {
            PipelineError::EmptyResult { stage } => *stage,
        }
    }
}
