//! Video/goal alignment scoring.
//!
//! Given a video reference and a goal, [`AlignmentScorer`] extracts the video id, fetches
//! title and description through a [`MetadataProvider`](crate::video::MetadataProvider),
//! and asks every ensemble member how similar the combined text is to the goal.
//!
//! # Score mapping
//!
//! Each member's cosine similarity `s ∈ [-1, 1]` becomes `floor((s + 1) * 50)`, clamped
//! to `0..=100` after the rescale. The request's score is the mean of those per-model
//! scores rounded half away from zero. Every score reflects exactly one judgment per
//! ensemble member: a member that fails to embed fails the request.

pub mod error;
pub mod scorer;
pub mod types;


pub use error::ScoringError;
pub use scorer::{AlignmentScorer, score_member, score_texts};
pub use types::{
    AlignmentScore, PerModelScore, aggregate_scores, cosine_similarity, similarity_to_percent,
};
