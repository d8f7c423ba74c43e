//! Embedding models and the scoring ensemble.
//!
//! - [`embedder`] wraps one sentence-transformer model (or a deterministic stub).
//! - [`ensemble`] holds the fixed, ordered set of models used by [`crate::scoring`].

/// Device selection (CPU / Metal / CUDA).
pub mod device;
/// Single-model embedder.
pub mod embedder;
/// Ordered model ensemble.
pub mod ensemble;
mod error;
/// Candle encoders and pooling.
pub mod model;
/// Tokenizer/config loading helpers.
pub mod utils;

#[cfg(test)]
mod tests;

pub use embedder::{EmbedderConfig, SentenceEmbedder, normalize};
pub use ensemble::{Ensemble, EnsembleConfig, TextEmbedder};
pub use error::EmbeddingError;
pub use model::Pooling;
