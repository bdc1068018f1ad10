//! JSON manifest output and optional render hand-off.
//!
//! The finished [`ResourceOutput`] is written to `resources.json` inside the
//! content directory, stamped with the local generation time. When a render
//! command is configured it is run with the manifest path as its only
//! argument.

use crate::models::ResourceOutput;
use crate::services::VideoAssembler;
use anyhow::{Context, bail};
use async_trait::async_trait;
use chrono::Local;
use serde::Serialize;
use std::path::PathBuf;
use tokio::fs;
use tokio::process::Command;
use tracing::{info, instrument};

/// File name of the manifest inside the content directory.
pub const MANIFEST_FILE: &str = "resources.json";

#[derive(Debug, Serialize)]
struct Manifest<'a> {
    generated_at: String,
    #[serde(flatten)]
    resources: &'a ResourceOutput,
}

/// Write `output` as pretty JSON to `{content_dir}/resources.json`.
///
/// # Returns
///
/// The manifest path, or an error if serialization or the write fails.
#[instrument(level = "info", skip_all, fields(content_dir = %output.content_dir.display()))]
pub async fn write_manifest(output: &ResourceOutput) -> anyhow::Result<PathBuf> {
    let manifest = Manifest {
        generated_at: Local::now().to_rfc3339(),
        resources: output,
    };
    let json = serde_json::to_string_pretty(&manifest)?;

    let path = output.content_dir.join(MANIFEST_FILE);
    fs::write(&path, json)
        .await
        .with_context(|| format!("writing {}", path.display()))?;
    info!(path = %path.display(), "Wrote resource manifest");
    Ok(path)
}

/// [`VideoAssembler`] that writes the manifest and optionally runs a renderer on it.
#[derive(Debug, Clone, Default)]
pub struct ManifestAssembler {
    render_command: Option<String>,
}

impl ManifestAssembler {
    pub fn new(render_command: Option<String>) -> Self {
        Self { render_command }
    }
}

#[async_trait]
impl VideoAssembler for ManifestAssembler {
    async fn assemble(&self, output: &ResourceOutput) -> anyhow::Result<()> {
        let manifest = write_manifest(output).await?;

        let Some(program) = &self.render_command else {
            return Ok(());
        };
        info!(%program, manifest = %manifest.display(), "Starting render");
        let status = Command::new(program)
            .arg(&manifest)
            .status()
            .await
            .with_context(|| format!("running {}", program))?;
        if !status.success() {
            bail!("render command {} exited with {}", program, status);
        }
        info!("Render finished");
        Ok(())
    }
}
