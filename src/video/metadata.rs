use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::constants::COMBINED_TEXT_SEPARATOR;

use super::error::MetadataError;
use super::id::VideoId;

/// Descriptive text of a video. Fields may be empty but are never absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoMetadata {
    /// Video title.
    pub title: String,
    /// Video description.
    pub description: String,
}

impl VideoMetadata {
    /// Creates a metadata record.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }

    /// Title and description joined by a blank line (the text compared against a goal).
    pub fn combined_text(&self) -> String {
        let mut text = String::with_capacity(
            self.title.len() + COMBINED_TEXT_SEPARATOR.len() + self.description.len(),
        );
        text.push_str(&self.title);
        text.push_str(COMBINED_TEXT_SEPARATOR);
        text.push_str(&self.description);
        text
    }
}

#[async_trait]
/// Source of video metadata (title + description) keyed by video id.
pub trait MetadataProvider: Send + Sync {
    /// Fetches metadata for a single video.
    ///
    /// Returns [`MetadataError::VideoNotFound`] when the provider has no such video;
    /// every other variant means the provider itself failed.
    async fn fetch_metadata(&self, id: &VideoId) -> Result<VideoMetadata, MetadataError>;
}

#[async_trait]
impl<P: MetadataProvider + ?Sized> MetadataProvider for std::sync::Arc<P> {
    async fn fetch_metadata(&self, id: &VideoId) -> Result<VideoMetadata, MetadataError> {
        (**self).fetch_metadata(id).await
    }
}
