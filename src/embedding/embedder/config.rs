use std::path::{Path, PathBuf};

use crate::constants::{DEFAULT_MAX_SEQ_LEN, STUB_EMBEDDING_DIM};
use crate::embedding::error::EmbeddingError;

#[derive(Debug, Clone)]
/// Configuration for one [`SentenceEmbedder`](super::SentenceEmbedder).
pub struct EmbedderConfig {
    /// Model name (e.g. `sentence-transformers/all-MiniLM-L6-v2`).
    pub name: String,
    /// Directory with `config.json`, `tokenizer.json` and the weights.
    pub model_dir: PathBuf,
    /// Max tokens per input. `None` reads `sentence_bert_config.json`, then falls back
    /// to the crate default.
    pub max_seq_len: Option<usize>,
    /// Output dimension in stub mode.
    pub stub_dim: usize,
    /// If true, run in deterministic stub mode (no model files required).
    pub testing_stub: bool,
}

impl EmbedderConfig {
    /// Creates a config for a model directory.
    pub fn new<P: Into<PathBuf>>(name: impl Into<String>, model_dir: P) -> Self {
        Self {
            name: name.into(),
            model_dir: model_dir.into(),
            max_seq_len: None,
            stub_dim: STUB_EMBEDDING_DIM,
            testing_stub: false,
        }
    }

    /// Creates a config resolving `name` under `models_dir` by its last path segment
    /// (`org/model` → `{models_dir}/model`).
    pub fn in_models_dir(name: &str, models_dir: &Path) -> Self {
        let dir_name = name.rsplit('/').next().unwrap_or(name);
        Self::new(name, models_dir.join(dir_name))
    }

    /// Creates a stub config (no model files; produces deterministic embeddings).
    pub fn stub(name: impl Into<String>) -> Self {
        Self {
            testing_stub: true,
            ..Self::new(name, PathBuf::new())
        }
    }

    /// Overrides the stub output dimension.
    pub fn with_stub_dim(mut self, dim: usize) -> Self {
        self.stub_dim = dim;
        self
    }

    /// Overrides the max token count.
    pub fn with_max_seq_len(mut self, max_seq_len: usize) -> Self {
        self.max_seq_len = Some(max_seq_len);
        self
    }

    /// Max token count used when neither the config nor the model directory sets one.
    pub fn default_max_seq_len() -> usize {
        DEFAULT_MAX_SEQ_LEN
    }

    /// Validates required fields.
    pub fn validate(&self) -> Result<(), EmbeddingError> {
        if self.name.trim().is_empty() {
            return Err(EmbeddingError::InvalidConfig {
                reason: "model name is required".to_string(),
            });
        }

        if self.max_seq_len == Some(0) {
            return Err(EmbeddingError::InvalidConfig {
                reason: format!("max_seq_len must be positive for {}", self.name),
            });
        }

        if self.testing_stub {
            if self.stub_dim == 0 {
                return Err(EmbeddingError::InvalidConfig {
                    reason: "stub_dim must be positive".to_string(),
                });
            }
            return Ok(());
        }

        if self.model_dir.as_os_str().is_empty() {
            return Err(EmbeddingError::InvalidConfig {
                reason: format!("model_dir is required for {} (stubbing is disabled)", self.name),
            });
        }

        if !self.model_dir.is_dir() {
            return Err(EmbeddingError::ModelNotFound {
                path: self.model_dir.clone(),
            });
        }

        Ok(())
    }
}
