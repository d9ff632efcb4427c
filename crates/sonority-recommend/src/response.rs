//! Request/response mapping for the command layer.
//!
//! Turns a `{song, artist}` request into either
//! `{"recommended_songs": [...]}` or `{"error": "..."}` with an
//! HTTP-equivalent status code.

use serde::{Deserialize, Serialize};

use sonority_core::Recommendation;

use crate::error::RecommendError;
use crate::metadata::MetadataSource;
use crate::recommender::Recommender;

/// An incoming recommendation request. Both fields are required but
/// validated by [`respond`], not by deserialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendRequest {
    #[serde(default)]
    pub song: Option<String>,
    #[serde(default)]
    pub artist: Option<String>,
}

impl RecommendRequest {
    #[must_use]
    pub fn new(song: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            song: Some(song.into()),
            artist: Some(artist.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResponseBody {
    Songs { recommended_songs: Vec<Recommendation> },
    Error { error: String },
}

/// A response body plus its HTTP-equivalent status.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    pub status: u16,
    pub body: ResponseBody,
}

impl Response {
    #[must_use]
    pub fn ok(recommended_songs: Vec<Recommendation>) -> Self {
        Self {
            status: 200,
            body: ResponseBody::Songs { recommended_songs },
        }
    }

    #[must_use]
    pub fn error(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ResponseBody::Error {
                error: message.into(),
            },
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Status code for a failed recommendation.
#[must_use]
pub fn status_for(err: &RecommendError) -> u16 {
    if err.is_not_found() {
        404
    } else {
        500
    }
}

/// Parse a JSON request body.
///
/// # Errors
///
/// A 400 response naming the parse failure when `raw` is not a JSON
/// object of the request shape.
pub fn parse_request(raw: &str) -> Result<RecommendRequest, Response> {
    serde_json::from_str(raw).map_err(|e| {
        log::warn!("Rejecting malformed request: {}", e);
        Response::error(400, format!("Invalid request JSON: {}", e))
    })
}

/// Serve one request.
///
/// `None` for the recommender means the backend never finished starting
/// (no catalog or no metadata credentials).
pub async fn respond<S: MetadataSource>(
    recommender: Option<&Recommender<S>>,
    request: &RecommendRequest,
) -> Response {
    let Some(recommender) = recommender else {
        return Response::error(
            500,
            "Backend not initialized. Catalog or metadata client is missing.",
        );
    };

    let (Some(song), Some(artist)) = (non_empty(&request.song), non_empty(&request.artist)) else {
        return Response::error(400, "Please provide both 'song' and 'artist'.");
    };

    match recommender.recommend(song, artist).await {
        Ok(songs) => Response::ok(songs),
        Err(e) => {
            if e.is_upstream() {
                log::error!("Metadata service failed for '{}' by '{}': {}", song, artist, e);
            } else if e.is_incompatible() {
                log::warn!("Unusable features for '{}' by '{}': {}", song, artist, e);
            } else {
                log::info!("No recommendation for '{}' by '{}': {}", song, artist, e);
            }
            Response::error(status_for(&e), e.to_string())
        }
    }
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.trim().is_empty())
}
