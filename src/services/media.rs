//! Pexels-backed media finder and the local music catalog.
//!
//! Images are searched on Pexels for the trend name and a couple of keywords
//! from the script, then downloaded into a fresh content directory:
//!
//! ```text
//! output_root/
//! ├── 20250506_143000_cats-and-dogs/
//! │   ├── image_00.jpg
//! │   └── image_01.jpg
//! └── music/
//!     ├── catalog.json
//!     └── upbeat.mp3
//! ```
//!
//! The music catalog is a JSON array of `{ "file", "emotion", "cc" }` entries;
//! a track is picked at random among those tagged with the requested emotion.

use crate::location::MUSIC_DIR_NAME;
use crate::models::{ContentLocation, Emotion, MediaBundle, MusicSelection};
use crate::services::MediaFinder;
use crate::services::summarizer::keywords;
use crate::utils::slugify;
use anyhow::{Context, bail};
use async_trait::async_trait;
use chrono::Local;
use itertools::Itertools;
use rand::rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, error, info, instrument, warn};

const PEXELS_SEARCH_URL: &str = "https://api.pexels.com/v1/search";

/// File name of the music catalog inside the music directory.
pub const MUSIC_CATALOG_FILE: &str = "catalog.json";

/// Extra search queries taken from the script's keywords.
const SCRIPT_QUERIES: usize = 2;

/// Suffixed names tried before giving up on a fresh content directory.
const MAX_DIR_ATTEMPTS: usize = 100;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    photos: Vec<Photo>,
}

#[derive(Debug, Deserialize)]
struct Photo {
    src: PhotoSources,
}

#[derive(Debug, Deserialize)]
struct PhotoSources {
    #[serde(default)]
    portrait: Option<String>,
    #[serde(default)]
    large2x: Option<String>,
    #[serde(default)]
    original: Option<String>,
}

impl PhotoSources {
    fn best(self) -> Option<String> {
        self.portrait.or(self.large2x).or(self.original)
    }
}

/// One entry of the music catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogTrack {
    /// File name relative to the music directory.
    pub file: String,
    pub emotion: Emotion,
    /// Attribution line shown in the video description.
    pub cc: String,
}

/// Read the catalog in `music_dir`.
pub async fn load_catalog(music_dir: &Path) -> anyhow::Result<Vec<CatalogTrack>> {
    let path = music_dir.join(MUSIC_CATALOG_FILE);
    let raw = fs::read_to_string(&path)
        .await
        .with_context(|| format!("reading music catalog {}", path.display()))?;
    let catalog = serde_json::from_str(&raw)
        .with_context(|| format!("parsing music catalog {}", path.display()))?;
    Ok(catalog)
}

/// Pick a random track tagged with `emotion`.
pub fn pick_track(catalog: &[CatalogTrack], emotion: Emotion) -> Option<&CatalogTrack> {
    let candidates: Vec<&CatalogTrack> = catalog.iter().filter(|t| t.emotion == emotion).collect();
    candidates.choose(&mut rng()).copied()
}

/// Remove a content directory this finder created, logging instead of failing.
async fn discard_dir(dir: &Path) {
    match fs::remove_dir_all(dir).await {
        Ok(()) => debug!(path = %dir.display(), "Removed empty content directory"),
        Err(e) => warn!(path = %dir.display(), error = %e, "Failed to remove empty content directory"),
    }
}

/// [`MediaFinder`] downloading stock photos from Pexels.
#[derive(Debug, Clone)]
pub struct PexelsMediaFinder {
    client: reqwest::Client,
    api_key: String,
    output_root: PathBuf,
    max_images: usize,
}

impl PexelsMediaFinder {
    pub fn new(api_key: impl Into<String>, output_root: impl Into<PathBuf>, max_images: usize) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            output_root: output_root.into(),
            max_images,
        }
    }

    /// Where a run for `trend` started now puts its files.
    ///
    /// `attempt` above zero adds a `_N` suffix for runs that would otherwise
    /// land in the same directory.
    pub fn location_for(&self, trend: &str, attempt: usize) -> ContentLocation {
        let mut album = format!("{}_{}", Local::now().format("%Y%m%d_%H%M%S"), slugify(trend));
        if attempt > 0 {
            album.push_str(&format!("_{}", attempt));
        }
        ContentLocation {
            root: self.output_root.clone(),
            content_dir: self.output_root.join(album),
            music_dir: self.output_root.join(MUSIC_DIR_NAME),
        }
    }

    /// Create a content directory that no earlier run owns.
    ///
    /// Existing directories are never reused, so cleanup after a failed run
    /// cannot touch another run's files.
    async fn claim_location(&self, trend: &str) -> anyhow::Result<ContentLocation> {
        fs::create_dir_all(&self.output_root)
            .await
            .with_context(|| format!("creating {}", self.output_root.display()))?;

        for attempt in 0..MAX_DIR_ATTEMPTS {
            let location = self.location_for(trend, attempt);
            match fs::create_dir(&location.content_dir).await {
                Ok(()) => return Ok(location),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    debug!(dir = %location.content_dir.display(), "Content directory taken");
                }
                Err(e) => {
                    return Err(e)
                        .with_context(|| format!("creating {}", location.content_dir.display()));
                }
            }
        }
        bail!(
            "no free content directory for {} under {}",
            trend,
            self.output_root.display()
        )
    }

    #[instrument(level = "info", skip(self))]
    async fn search(&self, query: &str, per_page: usize) -> anyhow::Result<Vec<String>> {
        let per_page = per_page.to_string();
        let response: SearchResponse = self
            .client
            .get(PEXELS_SEARCH_URL)
            .header("Authorization", &self.api_key)
            .query(&[
                ("query", query),
                ("per_page", per_page.as_str()),
                ("orientation", "portrait"),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let urls: Vec<String> = response
            .photos
            .into_iter()
            .filter_map(|photo| photo.src.best())
            .collect();
        debug!(count = urls.len(), "Pexels results");
        Ok(urls)
    }

    #[instrument(level = "debug", skip(self), fields(path = %path.display()))]
    async fn download(&self, url: &str, path: &Path) -> anyhow::Result<()> {
        let bytes = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        fs::write(path, &bytes).await?;
        Ok(())
    }
}

#[async_trait]
impl MediaFinder for PexelsMediaFinder {
    #[instrument(level = "info", skip(self, script))]
    async fn search_and_download(&self, trend: &str, script: &str) -> anyhow::Result<MediaBundle> {
        let queries = std::iter::once(trend.to_string())
            .chain(keywords(script, SCRIPT_QUERIES).into_iter().map(|k| format!("{} {}", trend, k)));

        let mut urls = Vec::new();
        for query in queries {
            if urls.len() >= self.max_images {
                break;
            }
            match self.search(&query, self.max_images).await {
                Ok(found) => urls.extend(found),
                Err(e) => warn!(%query, error = %format!("{e:#}"), "Pexels search failed"),
            }
        }
        let urls: Vec<String> = urls.into_iter().unique().take(self.max_images).collect();
        if urls.is_empty() {
            warn!("No images found");
            return Ok(MediaBundle::default());
        }

        let location = self.claim_location(trend).await?;

        let mut files = Vec::new();
        for (i, url) in urls.iter().enumerate() {
            let path = location.content_dir.join(format!("image_{:02}.jpg", i));
            match self.download(url, &path).await {
                Ok(()) => files.push(path),
                Err(e) => error!(%url, error = %format!("{e:#}"), "Image download failed"),
            }
        }

        if files.is_empty() {
            // nothing usable; do not leave an empty content directory behind
            discard_dir(&location.content_dir).await;
            return Ok(MediaBundle::default());
        }

        info!(
            count = files.len(),
            dir = %location.content_dir.display(),
            "Downloaded images"
        );
        Ok(MediaBundle::located(files, location))
    }

    #[instrument(level = "info", skip(self), fields(music_dir = %music_dir.display()))]
    async fn select_music(&self, emotion: Emotion, music_dir: &Path) -> anyhow::Result<Option<MusicSelection>> {
        let catalog = load_catalog(music_dir).await?;
        let Some(track) = pick_track(&catalog, emotion) else {
            warn!(%emotion, tracks = catalog.len(), "No track for emotion");
            return Ok(None);
        };
        Ok(Some(MusicSelection {
            path: music_dir.join(&track.file),
            cc: track.cc.clone(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn track(file: &str, emotion: Emotion) -> CatalogTrack {
        CatalogTrack {
            file: file.to_string(),
            emotion,
            cc: format!("{} by Tester (CC BY 4.0)", file),
        }
    }

    fn write_catalog(dir: &Path, tracks: &[CatalogTrack]) {
        std::fs::create_dir_all(dir).unwrap();
        std::fs::write(
            dir.join(MUSIC_CATALOG_FILE),
            serde_json::to_string(tracks).unwrap(),
        )
        .unwrap();
    }

    #[test]
    fn test_pick_track_filters_by_emotion() {
        let catalog = vec![
            track("upbeat.mp3", Emotion::Joy),
            track("somber.mp3", Emotion::Sadness),
            track("bright.mp3", Emotion::Joy),
        ];
        for _ in 0..20 {
            let picked = pick_track(&catalog, Emotion::Joy).unwrap();
            assert_eq!(picked.emotion, Emotion::Joy);
        }
        assert_eq!(
            pick_track(&catalog, Emotion::Sadness).unwrap().file,
            "somber.mp3"
        );
        assert!(pick_track(&catalog, Emotion::Fear).is_none());
    }

    #[test]
    fn test_catalog_json_shape() {
        let json = r#"[{"file": "calm.mp3", "emotion": "neutral", "cc": "Calm by X"}]"#;
        let catalog: Vec<CatalogTrack> = serde_json::from_str(json).unwrap();
        assert_eq!(catalog, vec![CatalogTrack {
            file: "calm.mp3".to_string(),
            emotion: Emotion::Neutral,
            cc: "Calm by X".to_string(),
        }]);
    }

    #[test]
    fn test_location_for_uses_slug_and_shared_music_dir() {
        let finder = PexelsMediaFinder::new("key", "/tmp/resources", 4);
        let loc = finder.location_for("Cats & Dogs!", 0);

        assert_eq!(loc.root, PathBuf::from("/tmp/resources"));
        assert_eq!(loc.music_dir, PathBuf::from("/tmp/resources/music"));
        let album = loc.content_dir.file_name().unwrap().to_string_lossy().to_string();
        assert!(album.ends_with("_cats-dogs"), "album: {}", album);
        assert_eq!(loc.content_dir.parent(), Some(Path::new("/tmp/resources")));
    }

    #[test]
    fn test_location_for_suffixes_retries() {
        let finder = PexelsMediaFinder::new("key", "/tmp/resources", 4);
        let album = finder
            .location_for("Cats", 3)
            .content_dir
            .file_name()
            .unwrap()
            .to_string_lossy()
            .to_string();
        assert!(album.ends_with("_cats_3"), "album: {}", album);
    }

    #[tokio::test]
    async fn test_claim_location_never_reuses_a_directory() {
        let tmp = TempDir::new().unwrap();
        let finder = PexelsMediaFinder::new("key", tmp.path().join("resources"), 4);

        let first = finder.claim_location("Cats").await.unwrap();
        std::fs::write(first.content_dir.join("narration.wav"), b"wav").unwrap();
        let second = finder.claim_location("Cats").await.unwrap();

        assert_ne!(first.content_dir, second.content_dir);
        assert!(first.content_dir.is_dir());
        assert!(second.content_dir.is_dir());
        assert_eq!(second.music_dir, first.music_dir);

        // wiping the second run leaves the first run's files alone
        std::fs::remove_dir_all(&second.content_dir).unwrap();
        assert!(first.content_dir.join("narration.wav").is_file());
    }

    #[tokio::test]
    async fn test_discard_dir_tolerates_missing_directory() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("20260101_000000_cats");
        std::fs::create_dir_all(&dir).unwrap();

        discard_dir(&dir).await;
        assert!(!dir.exists());

        // already gone: logged, no panic
        discard_dir(&dir).await;
        assert!(tmp.path().is_dir());
    }

    #[test]
    fn test_photo_sources_prefer_portrait() {
        let json = r#"{"photos": [
            {"id": 1, "src": {"original": "o1", "large2x": "l1", "portrait": "p1"}},
            {"id": 2, "src": {"original": "o2"}}
        ]}"#;
        let response: SearchResponse = serde_json::from_str(json).unwrap();
        let urls: Vec<_> = response.photos.into_iter().filter_map(|p| p.src.best()).collect();
        assert_eq!(urls, vec!["p1", "o2"]);
    }

    #[tokio::test]
    async fn test_select_music_from_catalog() {
        let tmp = TempDir::new().unwrap();
        let music_dir = tmp.path().join("music");
        write_catalog(&music_dir, &[track("somber.mp3", Emotion::Sadness)]);
        let finder = PexelsMediaFinder::new("key", tmp.path(), 4);

        let selection = finder
            .select_music(Emotion::Sadness, &music_dir)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(selection.path, music_dir.join("somber.mp3"));
        assert_eq!(selection.cc, "somber.mp3 by Tester (CC BY 4.0)");
    }

    #[tokio::test]
    async fn test_select_music_without_match() {
        let tmp = TempDir::new().unwrap();
        let music_dir = tmp.path().join("music");
        write_catalog(&music_dir, &[track("somber.mp3", Emotion::Sadness)]);
        let finder = PexelsMediaFinder::new("key", tmp.path(), 4);

        let selection = finder.select_music(Emotion::Anger, &music_dir).await.unwrap();
        assert!(selection.is_none());
    }

    #[tokio::test]
    async fn test_select_music_missing_catalog_is_error() {
        let tmp = TempDir::new().unwrap();
        let finder = PexelsMediaFinder::new("key", tmp.path(), 4);

        let err = finder
            .select_music(Emotion::Joy, &tmp.path().join("music"))
            .await
            .unwrap_err();
        assert!(format!("{err:#}").contains(MUSIC_CATALOG_FILE));
    }
}
