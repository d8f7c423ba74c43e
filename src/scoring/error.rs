use thiserror::Error;

use crate::embedding::EmbeddingError;
use crate::video::{InvalidReference, MetadataError, VideoId};

/// Why a scoring request produced no score.
#[derive(Debug, Error)]
pub enum ScoringError {
    /// No video identifier in the reference. User-correctable.
    #[error(transparent)]
    InvalidReference(#[from] InvalidReference),

    /// Well-formed identifier, but the provider has no such video. User-correctable.
    #[error("video not found: {video_id}")]
    VideoNotFound { video_id: VideoId },

    /// Transport/auth/quota failure at the metadata provider. May succeed on retry.
    #[error("metadata provider unavailable: {0}")]
    ProviderUnavailable(#[source] MetadataError),

    /// An ensemble member could not embed its input. Fatal to the request.
    #[error("embedding failed for model {model}: {source}")]
    EmbeddingFailure {
        model: String,
        #[source]
        source: EmbeddingError,
    },
}

impl ScoringError {
    /// Stable machine-readable tag for this failure category.
    pub fn kind(&self) -> &'static str {
        match self {
            ScoringError::InvalidReference(_) => "invalid_reference",
            ScoringError::VideoNotFound { .. } => "video_not_found",
            ScoringError::ProviderUnavailable(_) => "provider_unavailable",
            ScoringError::EmbeddingFailure { .. } => "embedding_failure",
        }
    }

    /// Returns `true` when rephrasing the input can fix the failure.
    pub fn is_user_correctable(&self) -> bool {
        matches!(
            self,
            ScoringError::InvalidReference(_) | ScoringError::VideoNotFound { .. }
        )
    }
}

impl From<MetadataError> for ScoringError {
    fn from(err: MetadataError) -> Self {
        match err {
            MetadataError::VideoNotFound { video_id } => ScoringError::VideoNotFound { video_id },
            other => ScoringError::ProviderUnavailable(other),
        }
    }
}
