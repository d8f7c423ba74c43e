use std::sync::Arc;

use futures_util::future::try_join_all;
use tracing::{debug, info, instrument};

use crate::embedding::{EmbeddingError, Ensemble, SentenceEmbedder, TextEmbedder};
use crate::video::{MetadataProvider, extract_video_id};

use super::error::ScoringError;
use super::types::{AlignmentScore, PerModelScore, cosine_similarity};

/// Scores video/goal alignment with a shared, read-only ensemble.
pub struct AlignmentScorer<P, E: TextEmbedder = SentenceEmbedder> {
    ensemble: Arc<Ensemble<E>>,
    provider: P,
}

impl<P, E: TextEmbedder> std::fmt::Debug for AlignmentScorer<P, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlignmentScorer")
            .field("models", &self.ensemble.names())
            .finish()
    }
}

impl<P, E> AlignmentScorer<P, E>
where
    P: MetadataProvider,
    E: TextEmbedder + 'static,
{
    pub fn new(ensemble: Arc<Ensemble<E>>, provider: P) -> Self {
        Self { ensemble, provider }
    }

    pub fn ensemble(&self) -> &Arc<Ensemble<E>> {
        &self.ensemble
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Scores how well the referenced video's title and description match `goal`.
    ///
    /// Any failure (bad reference, missing video, provider outage, one model failing)
    /// aborts the whole request; no partial score is produced.
    #[instrument(skip(self, reference, goal), fields(video_id = tracing::field::Empty))]
    pub async fn score(&self, reference: &str, goal: &str) -> Result<AlignmentScore, ScoringError> {
        let video_id = extract_video_id(reference)?;
        tracing::Span::current().record("video_id", tracing::field::display(&video_id));

        let metadata = self.provider.fetch_metadata(&video_id).await?;
        let text: Arc<str> = Arc::from(metadata.combined_text());
        let goal: Arc<str> = Arc::from(goal);

        debug!(
            text_len = text.len(),
            goal_len = goal.len(),
            models = self.ensemble.len(),
            "Scoring against ensemble"
        );

        let jobs = (0..self.ensemble.len()).map(|index| {
            let ensemble = Arc::clone(&self.ensemble);
            let text = Arc::clone(&text);
            let goal = Arc::clone(&goal);
            let model = ensemble.members()[index].name().to_string();

            async move {
                tokio::task::spawn_blocking(move || {
                    score_member(&ensemble.members()[index], &text, &goal)
                })
                .await
                .map_err(|e| ScoringError::EmbeddingFailure {
                    model,
                    source: EmbeddingError::InferenceFailed {
                        reason: format!("embedding task failed: {}", e),
                    },
                })?
            }
        });

        let per_model = try_join_all(jobs).await?;
        let result = finish(per_model, self.ensemble.len())?;

        info!(score = result.score, models = result.model_count(), "Alignment scored");

        Ok(result)
    }
}

/// Scores a combined text against a goal with every ensemble member, in order.
///
/// This is the synchronous core of [`AlignmentScorer::score`], minus extraction and fetch.
pub fn score_texts<E: TextEmbedder>(
    ensemble: &Ensemble<E>,
    text: &str,
    goal: &str,
) -> Result<AlignmentScore, ScoringError> {
    let per_model = ensemble
        .members()
        .iter()
        .map(|member| score_member(member, text, goal))
        .collect::<Result<Vec<_>, _>>()?;

    finish(per_model, ensemble.len())
}

/// Embeds both texts with one member and maps their similarity to a 0–100 score.
pub fn score_member<E: TextEmbedder + ?Sized>(
    member: &E,
    text: &str,
    goal: &str,
) -> Result<PerModelScore, ScoringError> {
    let failure = |source: EmbeddingError| ScoringError::EmbeddingFailure {
        model: member.name().to_string(),
        source,
    };

    let text_embedding = member.embed(text).map_err(failure)?;
    let goal_embedding = member.embed(goal).map_err(failure)?;
    let similarity = cosine_similarity(&text_embedding, &goal_embedding).map_err(failure)?;

    if !similarity.is_finite() {
        return Err(failure(EmbeddingError::InferenceFailed {
            reason: "similarity is not finite".to_string(),
        }));
    }

    let scored = PerModelScore::from_similarity(member.name(), similarity);
    debug!(model = %scored.model, similarity, score = scored.score, "Model scored");
    Ok(scored)
}

fn finish(per_model: Vec<PerModelScore>, expected: usize) -> Result<AlignmentScore, ScoringError> {
    debug_assert_eq!(per_model.len(), expected);

    AlignmentScore::from_per_model(per_model).ok_or_else(|| ScoringError::EmbeddingFailure {
        model: "<ensemble>".to_string(),
        source: EmbeddingError::EmptyEnsemble,
    })
}
