use axum::{
    Json,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::constants::VIDALIGN_STATUS_HEADER;
use crate::scoring::ScoringError;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Scoring(#[from] ScoringError),
}

#[derive(serde::Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
    pub kind: &'static str,
}

impl GatewayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            GatewayError::Scoring(err) => match err {
                ScoringError::InvalidReference(_) => StatusCode::BAD_REQUEST,
                ScoringError::VideoNotFound { .. } => StatusCode::NOT_FOUND,
                ScoringError::ProviderUnavailable(_) => StatusCode::BAD_GATEWAY,
                ScoringError::EmbeddingFailure { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            GatewayError::InvalidRequest(_) => "invalid_request",
            GatewayError::Scoring(err) => err.kind(),
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let kind = self.kind();

        if status.is_server_error() {
            tracing::error!(kind, error = %self, "Scoring request failed");
        } else {
            tracing::debug!(kind, error = %self, "Scoring request rejected");
        }

        let mut headers = HeaderMap::new();
        headers.insert(VIDALIGN_STATUS_HEADER, HeaderValue::from_static(kind));

        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: status.as_u16(),
            kind,
        });

        (status, headers, body).into_response()
    }
}
