use serde::{Deserialize, Serialize};

/// A recommended song, identified by title and artist only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(rename = "song_name")]
    pub title: String,
    #[serde(rename = "artist_name")]
    pub artist: String,
}

impl Recommendation {
    #[must_use]
    pub fn new(title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
        }
    }
}
