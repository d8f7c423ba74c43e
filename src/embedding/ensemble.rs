//! The fixed, ordered set of embedding models used for scoring.
//!
//! An ensemble is loaded once at startup and shared read-only afterwards. Loading is
//! all-or-nothing: one member failing to load fails the whole ensemble, because the
//! aggregate score divides by the ensemble size.

use std::path::Path;

use tracing::info;

use crate::constants::REFERENCE_MODELS;

use super::device::select_device;
use super::embedder::{EmbedderConfig, SentenceEmbedder};
use super::error::EmbeddingError;

/// One ensemble member: text in, unit-normalized vector out.
///
/// Implementations must be deterministic: identical text yields an identical vector.
pub trait TextEmbedder: Send + Sync {
    /// Stable model name (used in logs and per-model results).
    fn name(&self) -> &str;

    /// Embeds `text` into a unit-normalized vector.
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;
}

/// Ordered member configurations.
#[derive(Debug, Clone, Default)]
pub struct EnsembleConfig {
    pub members: Vec<EmbedderConfig>,
}

impl EnsembleConfig {
    pub fn new(members: Vec<EmbedderConfig>) -> Self {
        Self { members }
    }

    /// The reference five-model ensemble, resolved under `models_dir`.
    pub fn reference(models_dir: &Path) -> Self {
        Self::new(
            REFERENCE_MODELS
                .iter()
                .map(|name| EmbedderConfig::in_models_dir(name, models_dir))
                .collect(),
        )
    }

    /// The reference ensemble with every member in stub mode.
    pub fn reference_stub() -> Self {
        Self::new(
            REFERENCE_MODELS
                .iter()
                .map(|name| EmbedderConfig::stub(*name))
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Fixed, ordered collection of embedding models.
#[derive(Debug)]
pub struct Ensemble<E: TextEmbedder = SentenceEmbedder> {
    members: Vec<E>,
}

impl<E: TextEmbedder> Ensemble<E> {
    /// Builds an ensemble from already-constructed members (order is kept).
    pub fn from_members(members: Vec<E>) -> Result<Self, EmbeddingError> {
        if members.is_empty() {
            return Err(EmbeddingError::EmptyEnsemble);
        }
        Ok(Self { members })
    }

    /// Members in scoring order.
    pub fn members(&self) -> &[E] {
        &self.members
    }

    /// Member names in scoring order.
    pub fn names(&self) -> Vec<&str> {
        self.members.iter().map(|m| m.name()).collect()
    }

    /// Number of members (the divisor of the aggregate score).
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns `true` if the ensemble has no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl Ensemble<SentenceEmbedder> {
    /// Loads every configured member on a shared device, failing on the first error.
    pub fn load(config: &EnsembleConfig) -> Result<Self, EmbeddingError> {
        if config.is_empty() {
            return Err(EmbeddingError::EmptyEnsemble);
        }

        let device = select_device();
        let members = config
            .members
            .iter()
            .cloned()
            .map(|member| SentenceEmbedder::load_on(member, &device))
            .collect::<Result<Vec<_>, _>>()?;

        info!(
            size = members.len(),
            stub = members.iter().any(SentenceEmbedder::is_stub),
            "Embedding ensemble ready"
        );

        Self::from_members(members)
    }

    /// Returns `true` if any member runs in stub mode.
    pub fn is_stub(&self) -> bool {
        self.members.iter().any(SentenceEmbedder::is_stub)
    }
}
