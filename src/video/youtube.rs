//! YouTube Data API v3 metadata client.
//!
//! Only `videos.list` with `part=snippet` is used. Failures are returned as-is;
//! there is no retry or backoff here.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use crate::config::Config;
use crate::constants::DEFAULT_YOUTUBE_API_URL;

use super::error::MetadataError;
use super::id::VideoId;
use super::metadata::{MetadataProvider, VideoMetadata};

const USER_AGENT: &str = concat!("vidalign/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
struct VideoListResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
    #[serde(default)]
    snippet: Option<Snippet>,
}

#[derive(Debug, Default, Deserialize)]
struct Snippet {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
}

/// [`MetadataProvider`] backed by the YouTube Data API.
#[derive(Clone)]
pub struct YouTubeClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl std::fmt::Debug for YouTubeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YouTubeClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl YouTubeClient {
    /// Creates a client against the public API endpoint.
    pub fn new(api_key: impl Into<String>) -> Result<Self, MetadataError> {
        Self::with_base_url(api_key, DEFAULT_YOUTUBE_API_URL)
    }

    /// Creates a client against a custom base URL (e.g. a local stand-in).
    pub fn with_base_url(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, MetadataError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(MetadataError::from)?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    /// Creates a client from server configuration.
    pub fn from_config(config: &Config) -> Result<Self, MetadataError> {
        Self::with_base_url(config.youtube_api_key.clone(), config.youtube_api_url.clone())
    }

    /// Returns the configured base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl MetadataProvider for YouTubeClient {
    #[instrument(skip(self), fields(video_id = %id))]
    async fn fetch_metadata(&self, id: &VideoId) -> Result<VideoMetadata, MetadataError> {
        let url = format!("{}/videos", self.base_url);

        debug!("Querying YouTube videos.list");

        let response = self
            .http
            .get(&url)
            .query(&[
                ("part", "snippet"),
                ("id", id.as_str()),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
                .map(|envelope| envelope.error.message)
                .unwrap_or(body);

            warn!(status = status.as_u16(), message = %message, "YouTube API rejected request");
            return Err(MetadataError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let listing: VideoListResponse = response.json().await?;

        let Some(item) = listing.items.into_iter().next() else {
            info!("YouTube returned no items");
            return Err(MetadataError::VideoNotFound {
                video_id: id.clone(),
            });
        };

        let snippet = item.snippet.unwrap_or_default();
        let metadata = VideoMetadata::new(
            snippet.title.unwrap_or_default(),
            snippet.description.unwrap_or_default(),
        );

        debug!(
            title_len = metadata.title.len(),
            description_len = metadata.description.len(),
            "Fetched video metadata"
        );

        Ok(metadata)
    }
}
