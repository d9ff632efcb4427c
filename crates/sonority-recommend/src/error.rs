//! Recommendation error types.

use thiserror::Error;

/// Errors that can occur while serving a recommendation request.
#[derive(Debug, Error)]
pub enum RecommendError {
    /// The metadata service has no track matching the query.
    #[error("could not find '{title}' by '{artist}'")]
    NotFound { title: String, artist: String },

    /// The track resolved but the service has no audio features for it.
    #[error("could not retrieve audio features for track {track_id}")]
    FeaturesUnavailable { track_id: String },

    /// An HTTP request to the metadata service failed.
    #[error("HTTP error from {source_name}: {message}")]
    Http {
        source_name: String,
        message: String,
    },

    /// The metadata service rejected our credentials.
    #[error("authentication failed with {source_name}: {message}")]
    Auth {
        source_name: String,
        message: String,
    },

    /// The metadata service returned a rate-limit response.
    #[error("rate limited by {source_name}")]
    RateLimited { source_name: String },

    /// A response from the metadata service could not be parsed.
    #[error("parse error from {source_name}: {message}")]
    Parse {
        source_name: String,
        message: String,
    },

    /// An error propagated from `reqwest`.
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),

    /// An error propagated from the catalog or similarity search.
    #[error(transparent)]
    Catalog(#[from] sonority_core::Error),
}

impl RecommendError {
    /// Returns `true` when the query could not be resolved to a track.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` when the query vector could not be compared.
    pub fn is_incompatible(&self) -> bool {
        matches!(
            self,
            Self::Catalog(sonority_core::Error::IncompatibleVector { .. })
        )
    }

    /// Returns `true` for failures of the metadata service itself.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            Self::FeaturesUnavailable { .. }
                | Self::Http { .. }
                | Self::Auth { .. }
                | Self::RateLimited { .. }
                | Self::Parse { .. }
                | Self::Request(_)
        )
    }
}

/// Convenience alias for recommendation results.
pub type RecommendResult<T> = std::result::Result<T, RecommendError>;
