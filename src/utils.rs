//! Text helpers shared by the pipeline and the adapters.
//!
//! This module provides:
//! - Sentence deduplication for generated narration
//! - Hashtag formatting for the video description
//! - String truncation and slugification for logging and directory names

use itertools::Itertools;

/// Maximum number of topic tags carried into the hashtag line.
pub const MAX_TAGS: usize = 15;

/// Marker appended to every hashtag line.
pub const AI_MARKER: &str = "#IA";

/// Remove repeated sentences from a script, keeping first occurrences.
///
/// The script is split on `.`, fragments are trimmed and empty ones dropped.
/// Equality is exact and case-sensitive. Survivors are joined with `". "` and
/// a trailing period is appended. A script with no sentences yields an empty
/// string.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(dedupe_sentences("A. B. A."), "A. B.");
/// assert_eq!(dedupe_sentences("  .  "), "");
/// ```
pub fn dedupe_sentences(script: &str) -> String {
    let unique: Vec<&str> = script
        .split('.')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unique()
        .collect();

    if unique.is_empty() {
        return String::new();
    }
    format!("{}.", unique.join(". "))
}

/// Format topic tags as a hashtag line.
///
/// Takes at most [`MAX_TAGS`] tags, prefixes each with `#`, joins them with
/// spaces and appends [`AI_MARKER`].
///
/// # Examples
///
/// ```ignore
/// assert_eq!(format_tags(&["cats".into(), "pets".into()]), "#cats #pets #IA");
/// assert_eq!(format_tags(&[]), "#IA");
/// ```
pub fn format_tags(tags: &[String]) -> String {
    let line = tags
        .iter()
        .take(MAX_TAGS)
        .map(|tag| format!("#{}", tag))
        .join(" ");

    if line.is_empty() {
        AI_MARKER.to_string()
    } else {
        format!("{} {}", line, AI_MARKER)
    }
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut to at most `max` bytes (on a char boundary) with an
/// ellipsis and byte count appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

/// Convert a trend name to a directory-safe slug.
///
/// Lowercases, drops anything that is not alphanumeric, a space or a hyphen,
/// and collapses whitespace runs into single hyphens.
pub fn slugify(title: &str) -> String {
    title
        .to_lowercase()
        .replace(|c: char| !c.is_alphanumeric() && !c.is_whitespace() && c != '-', "")
        .split_whitespace()
        .join("-")
}
