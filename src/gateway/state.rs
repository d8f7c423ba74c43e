use std::sync::Arc;

use crate::scoring::AlignmentScorer;
use crate::video::MetadataProvider;

/// Shared state handed to every handler.
pub struct HandlerState<P: MetadataProvider + 'static> {
    pub scorer: Arc<AlignmentScorer<P>>,

    /// `true` when the ensemble runs deterministic stub embedders.
    pub embedder_stub: bool,
}

impl<P: MetadataProvider + 'static> Clone for HandlerState<P> {
    fn clone(&self) -> Self {
        Self {
            scorer: Arc::clone(&self.scorer),
            embedder_stub: self.embedder_stub,
        }
    }
}

impl<P: MetadataProvider + 'static> HandlerState<P> {
    pub fn new(scorer: Arc<AlignmentScorer<P>>) -> Self {
        let embedder_stub = scorer.ensemble().is_stub();
        Self {
            scorer,
            embedder_stub,
        }
    }

    pub fn embedder_mode(&self) -> &'static str {
        if self.embedder_stub { "stub" } else { "real" }
    }
}
