//! Cross-cutting, shared constants.
//!
//! The reference ensemble and the score scale are treated as fixed conventions across
//! modules (embedding, scoring, gateway). Change them here, not at call sites.

/// Length of a YouTube video identifier.
pub const VIDEO_ID_LEN: usize = 11;

/// Separator placed between title and description when building the combined text.
pub const COMBINED_TEXT_SEPARATOR: &str = "\n\n";

/// Upper bound of the alignment score scale (lower bound is `0`).
pub const MAX_SCORE: u8 = 100;

/// Sentence-transformer models making up the reference ensemble, in scoring order.
///
/// `all-MiniLM-L12-v2` takes the slot of `all-mpnet-base-v2` (MPNet is not in the
/// candle model zoo).
pub const REFERENCE_MODELS: [&str; 5] = [
    "sentence-transformers/all-MiniLM-L6-v2",
    "sentence-transformers/multi-qa-MiniLM-L6-cos-v1",
    "sentence-transformers/paraphrase-MiniLM-L3-v2",
    "sentence-transformers/all-MiniLM-L12-v2",
    "sentence-transformers/distilbert-base-nli-mean-tokens",
];

/// Size of the reference ensemble.
pub const REFERENCE_ENSEMBLE_SIZE: usize = REFERENCE_MODELS.len();

/// Default max tokens per input when the model directory does not say otherwise.
pub const DEFAULT_MAX_SEQ_LEN: usize = 256;

/// Embedding dimension used by stub embedders (matches the MiniLM family).
pub const STUB_EMBEDDING_DIM: usize = 384;

/// Default YouTube Data API v3 base URL.
pub const DEFAULT_YOUTUBE_API_URL: &str = "https://www.googleapis.com/youtube/v3";

/// Response header carrying the request outcome.
pub const VIDALIGN_STATUS_HEADER: &str = "x-vidalign-status";

/// Status header value for successful responses.
pub const VIDALIGN_STATUS_OK: &str = "ok";

/// Status value for a ready component.
pub const VIDALIGN_STATUS_READY: &str = "ready";

/// Status header value for a request that produced a score.
pub const VIDALIGN_STATUS_SCORED: &str = "scored";
