//! Vidalign library crate (used by the server and integration tests).
//!
//! Scores how well a YouTube video's title and description align with a free-text
//! goal, as an integer in `0..=100` averaged over an ensemble of sentence-transformer
//! models.
//!
//! # Public API Surface
//!
//! ## Core Types
//! - [`Config`], [`ConfigError`] - Server configuration
//! - [`AlignmentScorer`], [`AlignmentScore`], [`PerModelScore`] - Scoring pipeline
//! - [`ScoringError`] - Why a request produced no score
//!
//! ## Video
//! - [`extract_video_id`], [`VideoId`] - URL to identifier
//! - [`MetadataProvider`], [`YouTubeClient`], [`VideoMetadata`] - Title/description lookup
//!
//! ## Embedding
//! - [`Ensemble`], [`EnsembleConfig`] - The fixed, ordered model set
//! - [`SentenceEmbedder`], [`EmbedderConfig`] - One candle-backed model
//! - [`TextEmbedder`] - The per-member seam
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod config;
pub mod constants;
pub mod embedding;
pub mod gateway;
pub mod scoring;
pub mod video;

pub use config::{Config, ConfigError};
pub use constants::{MAX_SCORE, REFERENCE_ENSEMBLE_SIZE, REFERENCE_MODELS};
pub use embedding::{
    EmbedderConfig, EmbeddingError, Ensemble, EnsembleConfig, SentenceEmbedder, TextEmbedder,
};
pub use scoring::{
    AlignmentScore, AlignmentScorer, PerModelScore, ScoringError, aggregate_scores,
    cosine_similarity, score_texts, similarity_to_percent,
};
#[cfg(any(test, feature = "mock"))]
pub use video::{MockFailure, MockMetadataProvider};
pub use video::{
    InvalidReference, MetadataError, MetadataProvider, VideoId, VideoMetadata, YouTubeClient,
    extract_video_id,
};
