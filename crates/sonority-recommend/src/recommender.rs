//! The recommendation orchestrator.
//!
//! A [`Recommender`] owns a shared, read-only [`Catalog`] and a
//! [`MetadataSource`]. Each request resolves the song, fetches its audio
//! features, projects them onto the recommendation feature set (missing
//! attributes become 0), and runs a fresh similarity scan.

use std::sync::Arc;

use sonority_core::{Catalog, FeatureVector, QueryVector, Recommendation};
use sonority_search::{find_similar, DEFAULT_RECOMMENDATIONS};

use crate::error::{RecommendError, RecommendResult};
use crate::metadata::MetadataSource;

#[derive(Debug)]
pub struct Recommender<S> {
    catalog: Arc<Catalog>,
    source: S,
    count: usize,
}

impl<S: MetadataSource> Recommender<S> {
    /// Build a recommender over an already-loaded catalog.
    pub fn new(catalog: Arc<Catalog>, source: S) -> Self {
        Self {
            catalog,
            source,
            count: DEFAULT_RECOMMENDATIONS,
        }
    }

    /// Number of songs returned per request.
    #[must_use]
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    /// Songs similar to `title` by `artist`, nearest first.
    ///
    /// # Errors
    ///
    /// - `NotFound` when the metadata source has no matching track
    /// - `FeaturesUnavailable` or another upstream error when the source
    ///   fails or has no features for the track
    /// - `Catalog(IncompatibleVector)` when a feature value is not finite
    pub async fn recommend(
        &self,
        title: &str,
        artist: &str,
    ) -> RecommendResult<Vec<Recommendation>> {
        log::info!("Recommending songs similar to '{}' by '{}'", title, artist);

        let track_id = self
            .source
            .search_track(title, artist)
            .await?
            .ok_or_else(|| RecommendError::NotFound {
                title: title.to_string(),
                artist: artist.to_string(),
            })?;
        log::debug!("Resolved to {} track {}", self.source.name(), track_id);

        let attributes = self
            .source
            .audio_features(&track_id)
            .await?
            .ok_or_else(|| RecommendError::FeaturesUnavailable {
                track_id: track_id.to_string(),
            })?;

        let features = FeatureVector::from_attributes(&attributes);
        let query = QueryVector::from_features(title, &features);
        let recommendations = find_similar(&self.catalog, &query, self.count)?;

        log::info!("Returning {} recommendations", recommendations.len());
        Ok(recommendations)
    }
}
