//! Data models flowing through the resource pipeline.
//!
//! This module defines the values each stage hands to the next:
//! - [`Article`]: Raw scraped article body for a trend
//! - [`SummarizedScript`]: Generated text plus topic tags
//! - [`MediaBundle`] and [`ContentLocation`]: Downloaded imagery and where it lives
//! - [`Emotion`] and [`MusicSelection`]: Sentiment label and the track it picks
//! - [`ResourceOutput`]: The terminal aggregate of a successful run
//!
//! Every value is created fresh per run and never mutated afterwards.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// A raw article scraped for a trend.
///
/// # Fields
///
/// * `source` - The URL the article was scraped from
/// * `content` - The extracted body text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    /// The source URL of the article.
    pub source: String,
    /// The plain text content scraped from the article.
    pub content: String,
}

/// Summarizer output: the generated text and its ordered topic tags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummarizedScript {
    pub text: String,
    pub tags: Vec<String>,
}

/// Where a run's generated artifacts live on disk.
///
/// The content directory holds everything produced for one run; the music
/// directory is a sibling of it under the same root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentLocation {
    /// Directory both the content directory and the music directory live in.
    pub root: PathBuf,
    /// Per-run directory holding media, narration audio and subtitles.
    pub content_dir: PathBuf,
    /// Directory the background music catalog is read from.
    pub music_dir: PathBuf,
}

/// Images downloaded for a trend.
///
/// `location` is filled in by media finders that know where they created the
/// content directory. When it is absent the pipeline derives it from the
/// first file path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaBundle {
    pub files: Vec<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<ContentLocation>,
}

impl MediaBundle {
    /// Bundle with an explicitly known content location.
    pub fn located(files: Vec<PathBuf>, location: ContentLocation) -> Self {
        Self {
            files,
            location: Some(location),
        }
    }
}

/// Coarse emotion label computed over the narration script.
///
/// Only used as a lookup key into the music catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Joy,
    Sadness,
    Anger,
    Fear,
    Surprise,
    Disgust,
    Neutral,
}

impl Emotion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Joy => "joy",
            Emotion::Sadness => "sadness",
            Emotion::Anger => "anger",
            Emotion::Fear => "fear",
            Emotion::Surprise => "surprise",
            Emotion::Disgust => "disgust",
            Emotion::Neutral => "neutral",
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A background track chosen for the video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MusicSelection {
    /// Full path of the chosen track.
    pub path: PathBuf,
    /// Attribution line required by the track's license.
    pub cc: String,
}

/// Everything a successful run produced, ready for video assembly.
///
/// Only ever constructed at the very end of
/// [`ResourcePipeline::generate_resources`](crate::pipeline::ResourcePipeline::generate_resources).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceOutput {
    /// The full trend list as fetched at the start of the run.
    pub trends: Vec<String>,
    /// The trend this package was built for.
    pub trend_name: String,
    /// Deduplicated narration script.
    pub script: String,
    /// Narration audio file.
    pub audio: PathBuf,
    /// Subtitle file generated from the narration audio.
    pub subtitles: PathBuf,
    /// Short description for the published video.
    pub description: String,
    /// Formatted hashtag line, always ending with `#IA`.
    pub tags: String,
    pub media: MediaBundle,
    pub music: MusicSelection,
    /// Per-run content directory.
    pub content_dir: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emotion_serializes_lowercase() {
        let json = serde_json::to_string(&Emotion::Sadness).unwrap();
        assert_eq!(json, "\"sadness\"");

        let parsed: Emotion = serde_json::from_str("\"joy\"").unwrap();
        assert_eq!(parsed, Emotion::Joy);
    }

    #[test]
    fn test_emotion_display_matches_serde_name() {
        for emotion in [
            Emotion::Joy,
            Emotion::Sadness,
            Emotion::Anger,
            Emotion::Fear,
            Emotion::Surprise,
            Emotion::Disgust,
            Emotion::Neutral,
        ] {
            let json = serde_json::to_string(&emotion).unwrap();
            assert_eq!(json, format!("\"{}\"", emotion));
        }
    }

    #[test]
    fn test_media_bundle_without_location_omits_field() {
        let bundle = MediaBundle {
            files: vec![PathBuf::from("out/cats/image_00.jpg")],
            location: None,
        };
        let json = serde_json::to_string(&bundle).unwrap();
        assert!(!json.contains("location"));
    }

    #[test]
    fn test_resource_output_serialization() {
        let output = ResourceOutput {
            trends: vec!["cats".to_string(), "dogs".to_string()],
            trend_name: "cats".to_string(),
            script: "Cats are popular.".to_string(),
            audio: PathBuf::from("out/cats/narration.wav"),
            subtitles: PathBuf::from("out/cats/narration.srt"),
            description: "All about cats.".to_string(),
            tags: "#cats #IA".to_string(),
            media: MediaBundle::default(),
            music: MusicSelection {
                path: PathBuf::from("out/music/happy.mp3"),
                cc: "Happy Tune by Someone (CC BY 4.0)".to_string(),
            },
            content_dir: PathBuf::from("out/cats"),
        };

        let json = serde_json::to_string(&output).unwrap();
        assert!(json.contains("\"trend_name\":\"cats\""));
        assert!(json.contains("#cats #IA"));

        let back: ResourceOutput = serde_json::from_str(&json).unwrap();
        assert_eq!(back, output);
    }
}
