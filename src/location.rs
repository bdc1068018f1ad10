//! Structural derivation of a run's [`ContentLocation`] from a media path.
//!
//! Media finders lay files out as `root / album / file`. When a finder does
//! not report the location it created, the pipeline recovers it from the first
//! downloaded file. Both `/` and `\` are accepted as separators no matter what
//! the host uses, since some finders hand back Windows-style paths.

use crate::models::ContentLocation;
use std::path::PathBuf;

/// Name of the directory holding the music catalog, a sibling of every album.
pub const MUSIC_DIR_NAME: &str = "music";

/// Derive the content and music directories from one media file path.
///
/// The content directory is the file's parent (`root/album`); the music
/// directory is `root/music`. Anything above the album is kept as the root,
/// however deep it is.
///
/// Returns `None` when the path has no album component (a bare file name).
///
/// # Examples
///
/// ```ignore
/// let loc = derive_content_location("out\\cats\\image_00.jpg").unwrap();
/// assert_eq!(loc.content_dir, PathBuf::from("out").join("cats"));
/// assert_eq!(loc.music_dir, PathBuf::from("out").join("music"));
/// ```
pub fn derive_content_location(media_path: &str) -> Option<ContentLocation> {
    let absolute = media_path.starts_with('/');
    let parts: Vec<&str> = media_path
        .split(['/', '\\'])
        .filter(|part| !part.is_empty())
        .collect();

    // need at least album + file
    if parts.len() < 2 {
        return None;
    }

    let album = parts[parts.len() - 2];
    let root_parts = &parts[..parts.len() - 2];

    let mut root = if absolute {
        PathBuf::from("/")
    } else {
        PathBuf::new()
    };
    for part in root_parts {
        root.push(part);
    }

    Some(ContentLocation {
        content_dir: root.join(album),
        music_dir: root.join(MUSIC_DIR_NAME),
        root,
    })
}
