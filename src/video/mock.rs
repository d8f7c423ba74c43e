use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::error::MetadataError;
use super::id::VideoId;
use super::metadata::{MetadataProvider, VideoMetadata};

/// Failure the mock returns for every request once set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockFailure {
    /// Transport failure.
    Unavailable,
    /// Provider rejected the request with the given status (auth, quota, ...).
    Rejected(u16),
}

/// In-memory [`MetadataProvider`] for tests.
#[derive(Default)]
pub struct MockMetadataProvider {
    videos: HashMap<String, VideoMetadata>,
    failure: Mutex<Option<MockFailure>>,
    requests: Mutex<Vec<String>>,
}

impl MockMetadataProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers metadata for a raw 11-character id.
    pub fn with_video(mut self, id: &str, metadata: VideoMetadata) -> Self {
        self.videos.insert(id.to_string(), metadata);
        self
    }

    /// Makes every subsequent fetch fail.
    pub fn fail_with(&self, failure: MockFailure) {
        *self.failure.lock() = Some(failure);
    }

    pub fn clear_failure(&self) {
        *self.failure.lock() = None;
    }

    /// Ids requested so far, in call order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }
}

#[async_trait]
impl MetadataProvider for MockMetadataProvider {
    async fn fetch_metadata(&self, id: &VideoId) -> Result<VideoMetadata, MetadataError> {
        self.requests.lock().push(id.as_str().to_string());

        if let Some(failure) = *self.failure.lock() {
            return Err(match failure {
                MockFailure::Unavailable => MetadataError::Unavailable {
                    reason: "mock provider offline".to_string(),
                },
                MockFailure::Rejected(status) => MetadataError::Rejected {
                    status,
                    message: "mock provider rejected request".to_string(),
                },
            });
        }

        self.videos
            .get(id.as_str())
            .cloned()
            .ok_or_else(|| MetadataError::VideoNotFound {
                video_id: id.clone(),
            })
    }
}
