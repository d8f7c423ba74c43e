//! Sentence-transformer encoders on candle.
//!
//! A model directory follows the Hugging Face layout: `config.json`, `tokenizer.json`,
//! `model.safetensors` (or `pytorch_model.bin`), and optionally `1_Pooling/config.json`
//! and `sentence_bert_config.json`.

use std::path::Path;

use candle_core::{DType, Device, IndexOp, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config as BertConfig};
use candle_transformers::models::distilbert::{Config as DistilBertConfig, DistilBertModel};
use serde::Deserialize;

use super::error::EmbeddingError;
use super::utils::read_optional_json;

/// How token states are reduced to one sentence vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Pooling {
    /// Mean over non-masked tokens (sentence-transformers default).
    #[default]
    Mean,
    /// Hidden state of the first (`[CLS]`) token.
    Cls,
}

#[derive(Debug, Default, Deserialize)]
struct PoolingConfig {
    #[serde(default)]
    pooling_mode_cls_token: bool,
    #[serde(default)]
    pooling_mode_mean_tokens: bool,
}

#[derive(Debug, Deserialize)]
struct SentenceBertConfig {
    max_seq_length: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct ArchitectureProbe {
    #[serde(default)]
    model_type: Option<String>,
    #[serde(default)]
    hidden_size: Option<usize>,
    #[serde(default)]
    dim: Option<usize>,
}

impl Pooling {
    /// Reads `1_Pooling/config.json`; mean pooling when absent or unflagged.
    pub fn from_model_dir(model_dir: &Path) -> Result<Self, EmbeddingError> {
        let config: Option<PoolingConfig> =
            read_optional_json(&model_dir.join("1_Pooling").join("config.json"))?;

        Ok(match config {
            Some(c) if c.pooling_mode_cls_token && !c.pooling_mode_mean_tokens => Pooling::Cls,
            _ => Pooling::Mean,
        })
    }
}

/// `max_seq_length` from `sentence_bert_config.json`, if the directory has one.
pub fn max_seq_len_from_model_dir(model_dir: &Path) -> Result<Option<usize>, EmbeddingError> {
    let config: Option<SentenceBertConfig> =
        read_optional_json(&model_dir.join("sentence_bert_config.json"))?;
    Ok(config.and_then(|c| c.max_seq_length))
}

enum Encoder {
    Bert(BertModel),
    DistilBert(DistilBertModel),
}

/// A loaded transformer encoder plus its pooling strategy.
pub struct SentenceModel {
    encoder: Encoder,
    pooling: Pooling,
    hidden_size: usize,
}

impl std::fmt::Debug for SentenceModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SentenceModel")
            .field("architecture", &self.architecture())
            .field("pooling", &self.pooling)
            .field("hidden_size", &self.hidden_size)
            .finish()
    }
}

impl SentenceModel {
    pub fn load(model_dir: &Path, device: &Device) -> Result<Self, EmbeddingError> {
        let config_path = model_dir.join("config.json");
        if !config_path.exists() {
            return Err(EmbeddingError::ModelLoadFailed {
                reason: format!("Missing config.json in {}", model_dir.display()),
            });
        }
        let config_content = std::fs::read_to_string(&config_path)?;

        let probe: ArchitectureProbe =
            serde_json::from_str(&config_content).map_err(|e| EmbeddingError::ModelLoadFailed {
                reason: format!("Failed to parse config: {}", e),
            })?;
        let hidden_size = probe.hidden_size.or(probe.dim).unwrap_or_default();
        let model_type = probe.model_type.unwrap_or_else(|| "bert".to_string());

        let vb = Self::var_builder(model_dir, device)?;
        let pooling = Pooling::from_model_dir(model_dir)?;

        let encoder = match model_type.as_str() {
            "bert" => {
                let config: BertConfig = serde_json::from_str(&config_content).map_err(|e| {
                    EmbeddingError::ModelLoadFailed {
                        reason: format!("Failed to parse BERT config: {}", e),
                    }
                })?;
                let vb = if vb.contains_tensor("bert.embeddings.word_embeddings.weight") {
                    vb.pp("bert")
                } else {
                    vb
                };
                let model = BertModel::load(vb, &config).map_err(|e| {
                    EmbeddingError::ModelLoadFailed {
                        reason: format!("Failed to load BERT weights: {}", e),
                    }
                })?;
                Encoder::Bert(model)
            }
            "distilbert" => {
                let config: DistilBertConfig =
                    serde_json::from_str(&config_content).map_err(|e| {
                        EmbeddingError::ModelLoadFailed {
                            reason: format!("Failed to parse DistilBERT config: {}", e),
                        }
                    })?;
                let model = DistilBertModel::load(vb, &config).map_err(|e| {
                    EmbeddingError::ModelLoadFailed {
                        reason: format!("Failed to load DistilBERT weights: {}", e),
                    }
                })?;
                Encoder::DistilBert(model)
            }
            other => {
                return Err(EmbeddingError::UnsupportedArchitecture {
                    model_type: other.to_string(),
                });
            }
        };

        Ok(Self {
            encoder,
            pooling,
            hidden_size,
        })
    }

    fn var_builder(model_dir: &Path, device: &Device) -> Result<VarBuilder<'static>, EmbeddingError> {
        let safetensors = model_dir.join("model.safetensors");
        let pth = model_dir.join("pytorch_model.bin");

        let vb = if safetensors.exists() {
            // SAFETY: the weights file is not modified while mapped.
            unsafe { VarBuilder::from_mmaped_safetensors(&[safetensors], DType::F32, device) }
        } else if pth.exists() {
            VarBuilder::from_pth(&pth, DType::F32, device)
        } else {
            return Err(EmbeddingError::ModelLoadFailed {
                reason: format!(
                    "Missing model.safetensors or pytorch_model.bin in {}",
                    model_dir.display()
                ),
            });
        };

        vb.map_err(|e| EmbeddingError::ModelLoadFailed {
            reason: format!("Failed to read weights: {}", e),
        })
    }

    /// Runs the encoder over one tokenized input and returns the pooled (unnormalized) vector.
    pub fn encode(
        &self,
        token_ids: &[u32],
        type_ids: &[u32],
        attention_mask: &[u32],
        device: &Device,
    ) -> Result<Vec<f32>, EmbeddingError> {
        let seq_len = token_ids.len();
        let input_ids = Tensor::new(token_ids, device)?.unsqueeze(0)?;
        let mask = Tensor::new(attention_mask, device)?.unsqueeze(0)?;

        // hidden: [1, seq_len, hidden_size]
        let hidden = match &self.encoder {
            Encoder::Bert(model) => {
                let type_ids = Tensor::new(type_ids, device)?.unsqueeze(0)?;
                model.forward(&input_ids, &type_ids, Some(&mask))?
            }
            Encoder::DistilBert(model) => {
                // Non-zero entries mark masked positions; a single unpadded input masks nothing.
                let no_mask = Tensor::zeros((seq_len, seq_len), DType::U8, device)?;
                model.forward(&input_ids, &no_mask)?
            }
        };

        let pooled = match self.pooling {
            Pooling::Cls => hidden.i((0, 0))?,
            Pooling::Mean => {
                let weights = mask.to_dtype(DType::F32)?.unsqueeze(2)?;
                let summed = hidden.broadcast_mul(&weights)?.sum(1)?;
                let count = weights.sum(1)?;
                summed.broadcast_div(&count)?.squeeze(0)?
            }
        };

        Ok(pooled.to_vec1::<f32>()?)
    }

    pub fn architecture(&self) -> &'static str {
        match self.encoder {
            Encoder::Bert(_) => "bert",
            Encoder::DistilBert(_) => "distilbert",
        }
    }

    pub fn pooling(&self) -> Pooling {
        self.pooling
    }

    pub fn hidden_size(&self) -> usize {
        self.hidden_size
    }
}
