//! Text-to-speech through an external command.
//!
//! The default program is `espeak-ng`, invoked as:
//!
//! ```text
//! espeak-ng -v <language-code> -w <output_dir>/narration.wav "<script>"
//! ```
//!
//! Any program accepting the same arguments can be swapped in.

use crate::services::SpeechSynthesizer;
use anyhow::Context;
use async_trait::async_trait;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::process::Command;
use tracing::{info, instrument, warn};

/// File name of the narration audio inside the content directory.
pub const NARRATION_FILE: &str = "narration.wav";

/// Voice code for a language name. Unknown names are passed through as-is,
/// so callers can also hand in a raw voice code.
pub fn language_code(language: &str) -> &str {
    match language.to_lowercase().as_str() {
        "english" => "en",
        "spanish" | "español" => "es",
        "french" | "français" => "fr",
        "german" | "deutsch" => "de",
        "italian" => "it",
        "portuguese" => "pt",
        "dutch" => "nl",
        "japanese" => "ja",
        _ => language,
    }
}

#[derive(Debug, Clone)]
pub struct CommandSpeechSynthesizer {
    program: String,
}

impl CommandSpeechSynthesizer {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn args(text: &str, output: &Path, language: &str) -> Vec<OsString> {
        vec![
            "-v".into(),
            language_code(language).into(),
            "-w".into(),
            output.as_os_str().to_owned(),
            text.into(),
        ]
    }
}

impl Default for CommandSpeechSynthesizer {
    fn default() -> Self {
        Self::new("espeak-ng")
    }
}

#[async_trait]
impl SpeechSynthesizer for CommandSpeechSynthesizer {
    #[instrument(level = "info", skip(self, text), fields(program = %self.program, output_dir = %output_dir.display()))]
    async fn synthesize(&self, text: &str, output_dir: &Path, language: &str) -> anyhow::Result<Option<PathBuf>> {
        let output = output_dir.join(NARRATION_FILE);
        // a stale file from an earlier attempt must not count as success
        let _ = fs::remove_file(&output).await;

        let status = Command::new(&self.program)
            .args(Self::args(text, &output, language))
            .status()
            .await
            .with_context(|| format!("running {}", self.program))?;

        if !status.success() {
            warn!(%status, "Speech synthesis command failed");
            return Ok(None);
        }
        if !fs::try_exists(&output).await.unwrap_or(false) {
            warn!(path = %output.display(), "Speech synthesis produced no file");
            return Ok(None);
        }

        info!(path = %output.display(), "Wrote narration audio");
        Ok(Some(output))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_language_code() {
        assert_eq!(language_code("English"), "en");
        assert_eq!(language_code("spanish"), "es");
        assert_eq!(language_code("Deutsch"), "de");
        assert_eq!(language_code("en-us"), "en-us");
    }

    #[test]
    fn test_args_layout() {
        let args = CommandSpeechSynthesizer::args("Hello there.", Path::new("/out/narration.wav"), "French");
        let args: Vec<String> = args.into_iter().map(|a| a.to_string_lossy().to_string()).collect();
        assert_eq!(args, vec!["-v", "fr", "-w", "/out/narration.wav", "Hello there."]);
    }

    #[tokio::test]
    async fn test_missing_program_is_error() {
        let tmp = TempDir::new().unwrap();
        let tts = CommandSpeechSynthesizer::new("definitely-not-a-tts-binary-7f3a");
        assert!(tts.synthesize("Hi.", tmp.path(), "English").await.is_err());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failing_program_yields_nothing() {
        let tmp = TempDir::new().unwrap();
        let tts = CommandSpeechSynthesizer::new("false");
        assert_eq!(tts.synthesize("Hi.", tmp.path(), "English").await.unwrap(), None);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_stale_file_is_not_reported() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join(NARRATION_FILE), b"old").unwrap();
        let tts = CommandSpeechSynthesizer::new("true");

        assert_eq!(tts.synthesize("Hi.", tmp.path(), "English").await.unwrap(), None);
        assert!(!tmp.path().join(NARRATION_FILE).exists());
    }
}
