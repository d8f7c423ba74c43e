use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::constants::{VIDALIGN_STATUS_HEADER, VIDALIGN_STATUS_SCORED};
use crate::gateway::error::GatewayError;
use crate::gateway::state::HandlerState;
use crate::scoring::{AlignmentScore, PerModelScore};
use crate::video::MetadataProvider;

#[derive(Debug, Clone, Deserialize)]
pub struct ScoreRequest {
    pub video_url: String,
    pub goal: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoreResponse {
    pub score: u8,
    pub models: Vec<PerModelScore>,
}

impl From<AlignmentScore> for ScoreResponse {
    fn from(result: AlignmentScore) -> Self {
        Self {
            score: result.score,
            models: result.per_model,
        }
    }
}

#[instrument(skip(state, body))]
pub async fn score_handler<P>(
    State(state): State<HandlerState<P>>,
    body: Result<Json<ScoreRequest>, JsonRejection>,
) -> Result<Response, GatewayError>
where
    P: MetadataProvider + 'static,
{
    let Json(request) = body.map_err(|e| GatewayError::InvalidRequest(e.body_text()))?;

    debug!(goal_len = request.goal.len(), "Score request received");

    let result = state.scorer.score(&request.video_url, &request.goal).await?;

    let mut headers = HeaderMap::new();
    headers.insert(
        VIDALIGN_STATUS_HEADER,
        HeaderValue::from_static(VIDALIGN_STATUS_SCORED),
    );

    Ok((StatusCode::OK, headers, Json(ScoreResponse::from(result))).into_response())
}
