//! HTTP gateway (Axum): the scoring form and its JSON endpoint.
//!
//! This module is primarily used by the `vidalign` server binary.

#![allow(missing_docs)]

pub mod error;
pub mod handler;
pub mod page;
pub mod state;


use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header::HeaderValue},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

pub use error::GatewayError;
pub use handler::{ScoreRequest, ScoreResponse, score_handler};
pub use page::index_handler;
pub use state::HandlerState;

use crate::constants::{VIDALIGN_STATUS_HEADER, VIDALIGN_STATUS_OK, VIDALIGN_STATUS_READY};
use crate::video::MetadataProvider;

pub fn create_router_with_state<P>(state: HandlerState<P>) -> Router
where
    P: MetadataProvider + 'static,
{
    Router::new()
        .route("/", get(index_handler))
        .route("/healthz", get(health_handler))
        .route("/ready", get(ready_handler::<P>))
        .route("/v1/score", post(score_handler::<P>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(serde::Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(serde::Serialize)]
pub struct ReadyResponse {
    pub status: &'static str,
    pub components: ComponentStatus,
}

#[derive(serde::Serialize)]
pub struct ComponentStatus {
    pub http: &'static str,
    pub embedding: &'static str,
    pub embedder_mode: &'static str,
    pub models: Vec<String>,
}

#[tracing::instrument]
pub async fn health_handler() -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(
        VIDALIGN_STATUS_HEADER,
        HeaderValue::from_static(VIDALIGN_STATUS_OK),
    );

    (
        StatusCode::OK,
        headers,
        Json(HealthResponse {
            status: VIDALIGN_STATUS_OK,
        }),
    )
        .into_response()
}

/// The ensemble is loaded before the listener binds, so a serving process is ready.
#[tracing::instrument(skip(state))]
pub async fn ready_handler<P>(State(state): State<HandlerState<P>>) -> Response
where
    P: MetadataProvider + 'static,
{
    let components = ComponentStatus {
        http: VIDALIGN_STATUS_READY,
        embedding: VIDALIGN_STATUS_READY,
        embedder_mode: state.embedder_mode(),
        models: state
            .scorer
            .ensemble()
            .names()
            .into_iter()
            .map(str::to_string)
            .collect(),
    };

    let mut headers = HeaderMap::new();
    headers.insert(
        VIDALIGN_STATUS_HEADER,
        HeaderValue::from_static(VIDALIGN_STATUS_READY),
    );

    (
        StatusCode::OK,
        headers,
        Json(ReadyResponse {
            status: VIDALIGN_STATUS_OK,
            components,
        }),
    )
        .into_response()
}
