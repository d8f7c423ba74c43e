//! Single-model sentence embedder.
//!
//! Use [`EmbedderConfig::stub`] for tests/examples without model files.

/// Embedder configuration.
pub mod config;


pub use config::EmbedderConfig;

use candle_core::Device;
use tokenizers::Tokenizer;
use tracing::{debug, info, warn};

use crate::embedding::ensemble::TextEmbedder;
use crate::embedding::error::EmbeddingError;
use crate::embedding::model::{SentenceModel, max_seq_len_from_model_dir};
use crate::embedding::utils::load_tokenizer;

enum EmbedderBackend {
    Model {
        model: SentenceModel,
        tokenizer: Tokenizer,
        device: Device,
    },
    Stub {
        dim: usize,
    },
}

/// Maps text to a unit-normalized vector with one sentence-transformer model.
pub struct SentenceEmbedder {
    backend: EmbedderBackend,
    name: String,
    max_seq_len: usize,
}

impl std::fmt::Debug for SentenceEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SentenceEmbedder")
            .field("name", &self.name)
            .field(
                "backend",
                &match &self.backend {
                    EmbedderBackend::Model { model, device, .. } => {
                        format!("Model({}, {:?})", model.architecture(), device)
                    }
                    EmbedderBackend::Stub { dim } => format!("Stub(dim={})", dim),
                },
            )
            .field("max_seq_len", &self.max_seq_len)
            .finish()
    }
}

impl SentenceEmbedder {
    /// Loads the embedder on the CPU-or-GPU device picked by [`select_device`](crate::embedding::device::select_device).
    pub fn load(config: EmbedderConfig) -> Result<Self, EmbeddingError> {
        let device = crate::embedding::device::select_device();
        Self::load_on(config, &device)
    }

    /// Loads the embedder onto a specific device (stub mode is supported).
    pub fn load_on(config: EmbedderConfig, device: &Device) -> Result<Self, EmbeddingError> {
        config.validate()?;

        if config.testing_stub {
            warn!(model = %config.name, "Embedder running in STUB mode (testing only)");
            return Ok(Self {
                backend: EmbedderBackend::Stub {
                    dim: config.stub_dim,
                },
                max_seq_len: config
                    .max_seq_len
                    .unwrap_or_else(EmbedderConfig::default_max_seq_len),
                name: config.name,
            });
        }

        let max_seq_len = match config.max_seq_len {
            Some(len) => len,
            None => max_seq_len_from_model_dir(&config.model_dir)?
                .unwrap_or_else(EmbedderConfig::default_max_seq_len),
        };

        let tokenizer = load_tokenizer(&config.model_dir, max_seq_len).map_err(|e| {
            EmbeddingError::TokenizationFailed {
                reason: format!("Failed to load tokenizer for {}: {}", config.name, e),
            }
        })?;

        let model = SentenceModel::load(&config.model_dir, device)?;

        info!(
            model = %config.name,
            model_dir = %config.model_dir.display(),
            architecture = model.architecture(),
            pooling = ?model.pooling(),
            hidden_size = model.hidden_size(),
            max_seq_len,
            "Embedding model loaded"
        );

        Ok(Self {
            backend: EmbedderBackend::Model {
                model,
                tokenizer,
                device: device.clone(),
            },
            name: config.name,
            max_seq_len,
        })
    }

    /// Generates a unit-normalized embedding for a single string.
    pub fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        match &self.backend {
            EmbedderBackend::Model {
                model,
                tokenizer,
                device,
            } => self.embed_with_model(text, model, tokenizer, device),
            EmbedderBackend::Stub { dim } => Ok(self.embed_stub(text, *dim)),
        }
    }

    fn embed_with_model(
        &self,
        text: &str,
        model: &SentenceModel,
        tokenizer: &Tokenizer,
        device: &Device,
    ) -> Result<Vec<f32>, EmbeddingError> {
        let encoding =
            tokenizer
                .encode(text, true)
                .map_err(|e| EmbeddingError::TokenizationFailed {
                    reason: e.to_string(),
                })?;

        let token_ids = encoding.get_ids();
        if token_ids.is_empty() {
            return Err(EmbeddingError::TokenizationFailed {
                reason: "tokenizer produced no tokens".to_string(),
            });
        }

        debug!(
            model = %self.name,
            text_len = text.len(),
            token_count = token_ids.len(),
            "Generating embedding"
        );

        let pooled = model.encode(
            token_ids,
            encoding.get_type_ids(),
            encoding.get_attention_mask(),
            device,
        )?;

        if pooled.iter().any(|x| !x.is_finite()) {
            return Err(EmbeddingError::InferenceFailed {
                reason: format!("{} produced a non-finite embedding", self.name),
            });
        }

        Ok(normalize(pooled))
    }

    fn embed_stub(&self, text: &str, dim: usize) -> Vec<f32> {
        use std::hash::{DefaultHasher, Hash, Hasher};

        debug!(model = %self.name, text_len = text.len(), "Generating stub embedding");

        let mut hasher = DefaultHasher::new();
        self.name.hash(&mut hasher);
        text.hash(&mut hasher);
        let mut state = hasher.finish();

        let embedding = (0..dim)
            .map(|_| {
                state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
                ((state >> 32) as f32 / u32::MAX as f32) * 2.0 - 1.0
            })
            .collect();

        normalize(embedding)
    }

    /// Returns the model name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the max token count per input.
    pub fn max_seq_len(&self) -> usize {
        self.max_seq_len
    }

    /// Returns `true` if running in stub mode.
    pub fn is_stub(&self) -> bool {
        matches!(self.backend, EmbedderBackend::Stub { .. })
    }
}

impl TextEmbedder for SentenceEmbedder {
    fn name(&self) -> &str {
        &self.name
    }

    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        SentenceEmbedder::embed(self, text)
    }
}

/// Scales `embedding` to unit L2 norm (a zero vector is returned unchanged).
pub fn normalize(mut embedding: Vec<f32>) -> Vec<f32> {
    let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm > 0.0 {
        for x in &mut embedding {
            *x /= norm;
        }
    }

    embedding
}
