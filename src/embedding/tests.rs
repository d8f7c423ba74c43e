use super::*;
use crate::constants::{REFERENCE_ENSEMBLE_SIZE, REFERENCE_MODELS};
use std::path::PathBuf;

#[test]
fn test_reference_config_resolves_models_in_order() {
    let config = EnsembleConfig::reference(&PathBuf::from("/opt/models"));

    assert_eq!(config.len(), REFERENCE_ENSEMBLE_SIZE);
    let names: Vec<&str> = config.members.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, REFERENCE_MODELS.to_vec());
    assert_eq!(
        config.members[0].model_dir,
        PathBuf::from("/opt/models/all-MiniLM-L6-v2")
    );
    assert_eq!(
        config.members[4].model_dir,
        PathBuf::from("/opt/models/distilbert-base-nli-mean-tokens")
    );
}

#[test]
fn test_load_reference_stub_ensemble() {
    let ensemble = Ensemble::load(&EnsembleConfig::reference_stub()).unwrap();

    assert_eq!(ensemble.len(), 5);
    assert!(!ensemble.is_empty());
    assert!(ensemble.is_stub());
    assert_eq!(ensemble.names(), REFERENCE_MODELS.to_vec());
}

#[test]
fn test_load_empty_ensemble_fails() {
    let err = Ensemble::load(&EnsembleConfig::default()).unwrap_err();
    assert!(matches!(err, EmbeddingError::EmptyEnsemble));
}

#[test]
fn test_from_members_rejects_empty() {
    let err = Ensemble::<SentenceEmbedder>::from_members(Vec::new()).unwrap_err();
    assert!(matches!(err, EmbeddingError::EmptyEnsemble));
}

#[test]
fn test_load_is_all_or_nothing() {
    let config = EnsembleConfig::new(vec![
        EmbedderConfig::stub("first"),
        EmbedderConfig::new("missing", "/nonexistent/model/dir"),
        EmbedderConfig::stub("third"),
    ]);

    let err = Ensemble::load(&config).unwrap_err();
    assert!(matches!(err, EmbeddingError::ModelNotFound { .. }));
}

#[test]
fn test_members_keep_configured_order() {
    let config = EnsembleConfig::new(vec![
        EmbedderConfig::stub("zeta"),
        EmbedderConfig::stub("alpha"),
        EmbedderConfig::stub("mu"),
    ]);

    let ensemble = Ensemble::load(&config).unwrap();
    assert_eq!(ensemble.names(), vec!["zeta", "alpha", "mu"]);
}

#[test]
fn test_members_may_differ_in_dimension() {
    let config = EnsembleConfig::new(vec![
        EmbedderConfig::stub("small").with_stub_dim(8),
        EmbedderConfig::stub("large").with_stub_dim(32),
    ]);

    let ensemble = Ensemble::load(&config).unwrap();
    let dims: Vec<usize> = ensemble
        .members()
        .iter()
        .map(|m| m.embed("text").unwrap().len())
        .collect();
    assert_eq!(dims, vec![8, 32]);
}

mod model_dir_tests {
    use super::*;
    use crate::embedding::model::max_seq_len_from_model_dir;
    use std::fs;

    #[test]
    fn test_pooling_defaults_to_mean_without_config() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(Pooling::from_model_dir(dir.path()).unwrap(), Pooling::Mean);
    }

    #[test]
    fn test_pooling_reads_cls_mode() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("1_Pooling")).unwrap();
        fs::write(
            dir.path().join("1_Pooling").join("config.json"),
            r#"{"word_embedding_dimension": 384, "pooling_mode_cls_token": true, "pooling_mode_mean_tokens": false}"#,
        )
        .unwrap();

        assert_eq!(Pooling::from_model_dir(dir.path()).unwrap(), Pooling::Cls);
    }

    #[test]
    fn test_pooling_prefers_mean_when_both_flagged() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("1_Pooling")).unwrap();
        fs::write(
            dir.path().join("1_Pooling").join("config.json"),
            r#"{"pooling_mode_cls_token": true, "pooling_mode_mean_tokens": true}"#,
        )
        .unwrap();

        assert_eq!(Pooling::from_model_dir(dir.path()).unwrap(), Pooling::Mean);
    }

    #[test]
    fn test_malformed_pooling_config_is_a_load_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("1_Pooling")).unwrap();
        fs::write(dir.path().join("1_Pooling").join("config.json"), "{not json").unwrap();

        let err = Pooling::from_model_dir(dir.path()).unwrap_err();
        assert!(matches!(err, EmbeddingError::ModelLoadFailed { .. }));
    }

    #[test]
    fn test_max_seq_len_from_sentence_bert_config() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(max_seq_len_from_model_dir(dir.path()).unwrap(), None);

        fs::write(
            dir.path().join("sentence_bert_config.json"),
            r#"{"max_seq_length": 128, "do_lower_case": false}"#,
        )
        .unwrap();
        assert_eq!(max_seq_len_from_model_dir(dir.path()).unwrap(), Some(128));
    }

    #[test]
    fn test_model_load_requires_config_json() {
        let dir = tempfile::tempdir().unwrap();
        let err = model::SentenceModel::load(dir.path(), &candle_core::Device::Cpu).unwrap_err();
        assert!(err.to_string().contains("config.json"));
    }

    #[test]
    fn test_model_load_requires_weights() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("config.json"), r#"{"model_type": "bert"}"#).unwrap();

        let err = model::SentenceModel::load(dir.path(), &candle_core::Device::Cpu).unwrap_err();
        assert!(err.to_string().contains("model.safetensors"));
    }
}

mod real_model_tests {
    use super::*;
    use candle_core::{DType, Device, IndexOp, Tensor};
    use candle_nn::{VarBuilder, VarMap};
    use candle_transformers::models::bert::{BertModel, Config as BertConfig};
    use candle_transformers::models::distilbert::{Config as DistilBertConfig, DistilBertModel};
    use crate::embedding::model::SentenceModel;
    use std::fs;
    use std::path::Path;

    const HIDDEN: usize = 8;
    const VOCAB: usize = 32;
    const WORDS: [&str; 8] = ["rust", "learn", "video", "goal", "fast", "safe", "code", "cook"];

    fn bert_config_json() -> serde_json::Value {
        serde_json::json!({
            "model_type": "bert",
            "vocab_size": VOCAB,
            "hidden_size": HIDDEN,
            "num_hidden_layers": 1,
            "num_attention_heads": 2,
            "intermediate_size": 16,
            "hidden_act": "gelu",
            "hidden_dropout_prob": 0.0,
            "max_position_embeddings": 64,
            "type_vocab_size": 2,
            "initializer_range": 0.02,
            "layer_norm_eps": 1e-12,
            "pad_token_id": 0
        })
    }

    fn distilbert_config_json() -> serde_json::Value {
        serde_json::json!({
            "model_type": "distilbert",
            "vocab_size": VOCAB,
            "dim": HIDDEN,
            "n_layers": 1,
            "n_heads": 2,
            "hidden_dim": 16,
            "activation": "gelu",
            "max_position_embeddings": 64,
            "initializer_range": 0.02,
            "pad_token_id": 0
        })
    }

    /// Writes `config.json` and random `model.safetensors` for a tiny BERT; returns the
    /// in-memory model sharing those weights.
    fn write_tiny_bert(dir: &Path) -> BertModel {
        let json = bert_config_json();
        fs::write(dir.join("config.json"), json.to_string()).unwrap();

        let config: BertConfig = serde_json::from_value(json).unwrap();
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, &Device::Cpu);
        let model = BertModel::load(vb, &config).unwrap();
        varmap.save(dir.join("model.safetensors")).unwrap();
        model
    }

    fn write_tiny_distilbert(dir: &Path) {
        let json = distilbert_config_json();
        fs::write(dir.join("config.json"), json.to_string()).unwrap();

        let config: DistilBertConfig = serde_json::from_value(json).unwrap();
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, &Device::Cpu);
        DistilBertModel::load(vb, &config).unwrap();
        varmap.save(dir.join("model.safetensors")).unwrap();
    }

    fn write_cls_pooling(dir: &Path) {
        fs::create_dir(dir.join("1_Pooling")).unwrap();
        fs::write(
            dir.join("1_Pooling").join("config.json"),
            r#"{"pooling_mode_cls_token": true, "pooling_mode_mean_tokens": false}"#,
        )
        .unwrap();
    }

    /// Word-level tokenizer over `WORDS` (ids 1..), whitespace split, no special tokens.
    fn write_tokenizer(dir: &Path) {
        let mut vocab = serde_json::Map::new();
        vocab.insert("[UNK]".to_string(), serde_json::json!(0));
        for (i, word) in WORDS.iter().enumerate() {
            vocab.insert(word.to_string(), serde_json::json!(i + 1));
        }

        let tokenizer = serde_json::json!({
            "version": "1.0",
            "truncation": null,
            "padding": null,
            "added_tokens": [],
            "normalizer": null,
            "pre_tokenizer": {"type": "Whitespace"},
            "post_processor": null,
            "decoder": null,
            "model": {"type": "WordLevel", "vocab": vocab, "unk_token": "[UNK]"}
        });
        fs::write(dir.join("tokenizer.json"), tokenizer.to_string()).unwrap();
    }

    /// Hidden states `[seq_len][hidden]` for one input.
    fn hidden_states(model: &BertModel, ids: &[u32], mask: &[u32]) -> Vec<Vec<f32>> {
        let device = Device::Cpu;
        let input_ids = Tensor::new(ids, &device).unwrap().unsqueeze(0).unwrap();
        let type_ids = input_ids.zeros_like().unwrap();
        let mask = Tensor::new(mask, &device).unwrap().unsqueeze(0).unwrap();
        model
            .forward(&input_ids, &type_ids, Some(&mask))
            .unwrap()
            .i(0)
            .unwrap()
            .to_vec2::<f32>()
            .unwrap()
    }

    fn assert_close(left: &[f32], right: &[f32]) {
        assert_eq!(left.len(), right.len());
        for (l, r) in left.iter().zip(right) {
            assert!((l - r).abs() < 1e-5, "{l} vs {r}");
        }
    }

    #[test]
    fn test_bert_encode_has_hidden_size() {
        let dir = tempfile::tempdir().unwrap();
        write_tiny_bert(dir.path());

        let model = SentenceModel::load(dir.path(), &Device::Cpu).unwrap();
        let pooled = model
            .encode(&[1, 5, 7, 2], &[0, 0, 0, 0], &[1, 1, 1, 1], &Device::Cpu)
            .unwrap();

        assert_eq!(model.architecture(), "bert");
        assert_eq!(model.hidden_size(), HIDDEN);
        assert_eq!(model.pooling(), Pooling::Mean);
        assert_eq!(pooled.len(), HIDDEN);
        assert!(pooled.iter().all(|x| x.is_finite()));
    }

    #[test]
    fn test_distilbert_encode_has_hidden_size() {
        let dir = tempfile::tempdir().unwrap();
        write_tiny_distilbert(dir.path());

        let model = SentenceModel::load(dir.path(), &Device::Cpu).unwrap();
        let pooled = model
            .encode(&[1, 5, 7, 2], &[0, 0, 0, 0], &[1, 1, 1, 1], &Device::Cpu)
            .unwrap();

        assert_eq!(model.architecture(), "distilbert");
        assert_eq!(model.hidden_size(), HIDDEN);
        assert_eq!(pooled.len(), HIDDEN);
        assert!(pooled.iter().all(|x| x.is_finite()));
    }

    #[test]
    fn test_mean_pooling_is_masked_mean() {
        let dir = tempfile::tempdir().unwrap();
        let reference = write_tiny_bert(dir.path());
        let model = SentenceModel::load(dir.path(), &Device::Cpu).unwrap();

        let ids = [3, 4, 6, 0];
        let mask = [1, 1, 1, 0];
        let pooled = model.encode(&ids, &[0; 4], &mask, &Device::Cpu).unwrap();

        let hidden = hidden_states(&reference, &ids, &mask);
        let expected: Vec<f32> = (0..HIDDEN)
            .map(|d| hidden[..3].iter().map(|row| row[d]).sum::<f32>() / 3.0)
            .collect();

        assert_close(&pooled, &expected);
    }

    #[test]
    fn test_cls_pooling_takes_first_token() {
        let dir = tempfile::tempdir().unwrap();
        let reference = write_tiny_bert(dir.path());
        write_cls_pooling(dir.path());
        let model = SentenceModel::load(dir.path(), &Device::Cpu).unwrap();
        assert_eq!(model.pooling(), Pooling::Cls);

        let ids = [2, 8, 5];
        let mask = [1, 1, 1];
        let pooled = model.encode(&ids, &[0; 3], &mask, &Device::Cpu).unwrap();

        let hidden = hidden_states(&reference, &ids, &mask);
        assert_close(&pooled, &hidden[0]);
    }

    #[test]
    fn test_bert_prefixed_weights_load() {
        let dir = tempfile::tempdir().unwrap();
        let json = bert_config_json();
        fs::write(dir.path().join("config.json"), json.to_string()).unwrap();

        let config: BertConfig = serde_json::from_value(json).unwrap();
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, &Device::Cpu);
        BertModel::load(vb.pp("bert"), &config).unwrap();
        varmap.save(dir.path().join("model.safetensors")).unwrap();

        let model = SentenceModel::load(dir.path(), &Device::Cpu).unwrap();
        let pooled = model.encode(&[1, 2], &[0, 0], &[1, 1], &Device::Cpu).unwrap();
        assert_eq!(pooled.len(), HIDDEN);
    }

    #[test]
    fn test_unknown_architecture_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write_tiny_bert(dir.path());
        fs::write(
            dir.path().join("config.json"),
            r#"{"model_type": "mpnet", "hidden_size": 8}"#,
        )
        .unwrap();

        let err = SentenceModel::load(dir.path(), &Device::Cpu).unwrap_err();
        assert!(matches!(
            err,
            EmbeddingError::UnsupportedArchitecture { ref model_type } if model_type == "mpnet"
        ));
    }

    mod embedder_tests {
        use super::*;

        fn tiny_embedder(dir: &Path, max_seq_len: usize) -> SentenceEmbedder {
            write_tiny_bert(dir);
            write_tokenizer(dir);
            let config = EmbedderConfig::new("tiny-bert", dir).with_max_seq_len(max_seq_len);
            SentenceEmbedder::load_on(config, &Device::Cpu).unwrap()
        }

        #[test]
        fn test_real_embedding_is_unit_norm() {
            let dir = tempfile::tempdir().unwrap();
            let embedder = tiny_embedder(dir.path(), 16);

            assert!(!embedder.is_stub());
            let embedding = embedder.embed("learn rust code fast").unwrap();

            assert_eq!(embedding.len(), HIDDEN);
            let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
            assert!((norm - 1.0).abs() < 1e-5, "norm = {norm}");
        }

        #[test]
        fn test_real_embedding_is_deterministic() {
            let dir = tempfile::tempdir().unwrap();
            let embedder = tiny_embedder(dir.path(), 16);

            let first = embedder.embed("safe video").unwrap();
            let second = embedder.embed("safe video").unwrap();
            assert_eq!(first, second);
        }

        #[test]
        fn test_max_seq_len_truncates_long_input() {
            let dir = tempfile::tempdir().unwrap();
            let embedder = tiny_embedder(dir.path(), 3);
            assert_eq!(embedder.max_seq_len(), 3);

            let truncated = embedder.embed("rust learn video goal fast safe code").unwrap();
            let prefix = embedder.embed("rust learn video").unwrap();

            assert_close(&truncated, &prefix);
        }

        #[test]
        fn test_unknown_words_still_embed() {
            let dir = tempfile::tempdir().unwrap();
            let embedder = tiny_embedder(dir.path(), 16);

            let embedding = embedder.embed("completely unseen vocabulary").unwrap();
            assert!(embedding.iter().all(|x| x.is_finite()));
        }

        #[test]
        fn test_empty_text_has_no_tokens() {
            let dir = tempfile::tempdir().unwrap();
            let embedder = tiny_embedder(dir.path(), 16);

            let err = embedder.embed("").unwrap_err();
            assert!(matches!(err, EmbeddingError::TokenizationFailed { .. }));
        }
    }
}
