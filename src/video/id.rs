//! Video identifier extraction.
//!
//! Patterns are tried in priority order and searched anywhere in the input; the first
//! capture wins. The watch-page `v=` form is checked before the `youtu.be` short link.

use std::sync::OnceLock;

use regex::Regex;

use super::error::InvalidReference;

/// Compiled once, shared by every extraction.
static ID_PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();

const PATTERN_SOURCES: [&str; 3] = [
    r"v=([A-Za-z0-9_-]{11})",
    r"youtu\.be/([A-Za-z0-9_-]{11})",
    r"youtube\.com/(?:embed|shorts|live)/([A-Za-z0-9_-]{11})",
];

fn patterns() -> &'static [Regex] {
    ID_PATTERNS.get_or_init(|| {
        PATTERN_SOURCES
            .iter()
            .map(|src| Regex::new(src).expect("video id pattern must compile"))
            .collect()
    })
}

/// An 11-character YouTube video identifier.
///
/// Only produced by [`extract_video_id`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VideoId(String);

impl VideoId {
    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for VideoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for VideoId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<VideoId> for String {
    fn from(id: VideoId) -> Self {
        id.0
    }
}

/// Extracts the video identifier from a URL-ish reference string.
///
/// ```
/// use vidalign::video::extract_video_id;
///
/// let id = extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ").unwrap();
/// assert_eq!(id.as_str(), "dQw4w9WgXcQ");
/// assert!(extract_video_id("not a url").is_err());
/// ```
pub fn extract_video_id(reference: &str) -> Result<VideoId, InvalidReference> {
    let trimmed = reference.trim();

    patterns()
        .iter()
        .find_map(|pattern| pattern.captures(trimmed))
        .and_then(|caps| caps.get(1))
        .map(|m| VideoId(m.as_str().to_string()))
        .ok_or_else(|| InvalidReference::new(trimmed))
}
