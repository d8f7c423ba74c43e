//! Video references and metadata.
//!
//! - [`id`] turns a URL into a [`VideoId`].
//! - [`metadata`] defines [`VideoMetadata`] and the [`MetadataProvider`] seam.
//! - [`youtube`] implements the provider against the YouTube Data API.

mod error;
/// Video identifier extraction.
pub mod id;
/// Metadata record and provider trait.
pub mod metadata;
/// YouTube Data API client.
pub mod youtube;

#[cfg(any(test, feature = "mock"))]
mod mock;


pub use error::{InvalidReference, MetadataError};
pub use id::{VideoId, extract_video_id};
pub use metadata::{MetadataProvider, VideoMetadata};
#[cfg(any(test, feature = "mock"))]
pub use mock::{MockFailure, MockMetadataProvider};
pub use youtube::YouTubeClient;
