use serde::Serialize;

use crate::constants::MAX_SCORE;
use crate::embedding::EmbeddingError;

#[derive(Debug, Clone, PartialEq, Serialize)]
/// One ensemble member's judgment.
pub struct PerModelScore {
    /// Model name.
    pub model: String,
    /// Cosine similarity between the combined-text and goal embeddings.
    pub similarity: f32,
    /// `similarity` mapped onto `0..=100`.
    pub score: u8,
}

impl PerModelScore {
    /// Creates a per-model score from a raw similarity.
    pub fn from_similarity(model: impl Into<String>, similarity: f32) -> Self {
        Self {
            model: model.into(),
            similarity,
            score: similarity_to_percent(similarity),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
/// Result of one scoring request.
pub struct AlignmentScore {
    /// Rounded mean of every per-model score, in `0..=100`.
    pub score: u8,
    /// Per-model scores in ensemble order; always one per member.
    pub per_model: Vec<PerModelScore>,
}

impl AlignmentScore {
    /// Aggregates per-model scores (order is kept). `None` when `per_model` is empty.
    pub fn from_per_model(per_model: Vec<PerModelScore>) -> Option<Self> {
        let scores: Vec<u8> = per_model.iter().map(|p| p.score).collect();
        let score = aggregate_scores(&scores)?;
        Some(Self { score, per_model })
    }

    /// Number of models that contributed.
    pub fn model_count(&self) -> usize {
        self.per_model.len()
    }
}

impl std::fmt::Display for AlignmentScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{} ({} models)", self.score, MAX_SCORE, self.per_model.len())
    }
}

/// Dot product of two unit-normalized vectors from the same model.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32, EmbeddingError> {
    if a.len() != b.len() {
        return Err(EmbeddingError::DimensionMismatch {
            left: a.len(),
            right: b.len(),
        });
    }

    Ok(a.iter().zip(b).map(|(x, y)| x * y).sum())
}

/// Maps a similarity in `[-1, 1]` linearly onto `0..=100`, rounding down.
///
/// The clamp runs after the rescale, so drift slightly outside `[-1, 1]` lands on the bounds.
pub fn similarity_to_percent(similarity: f32) -> u8 {
    let scaled = ((f64::from(similarity) + 1.0) * 50.0).floor();
    if scaled.is_nan() {
        return 0;
    }
    scaled.clamp(0.0, f64::from(MAX_SCORE)) as u8
}

/// Rounded (half away from zero) mean of per-model scores. `None` for no scores.
pub fn aggregate_scores(scores: &[u8]) -> Option<u8> {
    if scores.is_empty() {
        return None;
    }

    let sum: u32 = scores.iter().map(|&s| u32::from(s)).sum();
    let mean = f64::from(sum) / scores.len() as f64;
    Some(mean.round().clamp(0.0, f64::from(MAX_SCORE)) as u8)
}
