//! External metadata services.
//!
//! The recommender only needs two lookups: resolve a (title, artist) pair
//! to a track, and fetch that track's named audio attributes. Any service
//! offering both can implement [`MetadataSource`].

pub mod spotify;

pub use spotify::{SpotifyClient, SpotifyCredentials};

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use sonority_core::model::Attributes;

use crate::error::RecommendResult;

/// A metadata service's identifier for a track.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrackId(String);

impl TrackId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Track resolution and audio-feature lookup.
///
/// Both operations return `Ok(None)` for "no such thing" and `Err` for
/// failures of the service itself. Implementations must not retry.
#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// Human-readable service name, for logs and error messages.
    fn name(&self) -> &str;

    /// Find the best-matching track for a title and artist.
    async fn search_track(&self, title: &str, artist: &str) -> RecommendResult<Option<TrackId>>;

    /// Raw numeric attributes of a track. Extra attributes are allowed;
    /// missing ones are the caller's concern.
    async fn audio_features(&self, track_id: &TrackId) -> RecommendResult<Option<Attributes>>;
}
