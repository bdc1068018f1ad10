//! Subtitle generation through an external transcription command.
//!
//! The default program is the `whisper` CLI, invoked as:
//!
//! ```text
//! whisper <audio> --model base --output_format srt --output_dir <output_dir>
//! ```
//!
//! which writes `<output_dir>/<audio-stem>.srt`.

use crate::services::SubtitleGenerator;
use anyhow::{Context, anyhow};
use async_trait::async_trait;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::process::Command;
use tracing::{info, instrument, warn};

/// Where the transcription command leaves the subtitles for `audio`.
pub fn subtitle_path(audio: &Path, output_dir: &Path) -> anyhow::Result<PathBuf> {
    let stem = audio
        .file_stem()
        .ok_or_else(|| anyhow!("audio path {} has no file name", audio.display()))?;
    let mut name = stem.to_os_string();
    name.push(".srt");
    Ok(output_dir.join(name))
}

#[derive(Debug, Clone)]
pub struct CommandSubtitleGenerator {
    program: String,
    model: String,
}

impl CommandSubtitleGenerator {
    pub fn new(program: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            model: model.into(),
        }
    }

    fn args(&self, audio: &Path, output_dir: &Path) -> Vec<OsString> {
        vec![
            audio.as_os_str().to_owned(),
            "--model".into(),
            self.model.clone().into(),
            "--output_format".into(),
            "srt".into(),
            "--output_dir".into(),
            output_dir.as_os_str().to_owned(),
        ]
    }
}

impl Default for CommandSubtitleGenerator {
    fn default() -> Self {
        Self::new("whisper", "base")
    }
}

#[async_trait]
impl SubtitleGenerator for CommandSubtitleGenerator {
    #[instrument(level = "info", skip(self), fields(program = %self.program))]
    async fn generate(&self, audio: &Path, output_dir: &Path) -> anyhow::Result<Option<PathBuf>> {
        let srt = subtitle_path(audio, output_dir)?;
        let _ = fs::remove_file(&srt).await;

        let status = Command::new(&self.program)
            .args(self.args(audio, output_dir))
            .status()
            .await
            .with_context(|| format!("running {}", self.program))?;

        if !status.success() {
            warn!(%status, "Subtitle command failed");
            return Ok(None);
        }
        if !fs::try_exists(&srt).await.unwrap_or(false) {
            warn!(path = %srt.display(), "Subtitle command produced no file");
            return Ok(None);
        }

        info!(path = %srt.display(), "Wrote subtitles");
        Ok(Some(srt))
    }
}
