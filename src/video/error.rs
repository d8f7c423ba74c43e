use thiserror::Error;

use super::id::VideoId;

/// The reference string contained no recognizable video identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid YouTube URL: no video id found in '{reference}'")]
pub struct InvalidReference {
    /// The rejected input (truncated for display).
    pub reference: String,
}

impl InvalidReference {
    const MAX_ECHO_CHARS: usize = 120;

    pub(crate) fn new(reference: &str) -> Self {
        let mut echoed: String = reference.chars().take(Self::MAX_ECHO_CHARS).collect();
        if echoed.len() < reference.len() {
            echoed.push('…');
        }
        Self { reference: echoed }
    }
}

/// Failures talking to a metadata provider.
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("video not found: {video_id}")]
    VideoNotFound { video_id: VideoId },

    #[error("metadata provider unreachable: {reason}")]
    Unavailable { reason: String },

    #[error("metadata provider rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("invalid metadata response: {reason}")]
    InvalidResponse { reason: String },
}

impl MetadataError {
    /// Returns `true` for the "no such video" case (as opposed to a provider failure).
    pub fn is_not_found(&self) -> bool {
        matches!(self, MetadataError::VideoNotFound { .. })
    }
}

// The request URL carries the API key, so it is stripped before rendering.
impl From<reqwest::Error> for MetadataError {
    fn from(err: reqwest::Error) -> Self {
        let err = err.without_url();
        if err.is_decode() {
            MetadataError::InvalidResponse {
                reason: err.to_string(),
            }
        } else {
            MetadataError::Unavailable {
                reason: err.to_string(),
            }
        }
    }
}
