//! The recommendation feature set and fixed-order feature vectors.
//!
//! Every vector that takes part in a similarity comparison is a
//! [`FeatureVector`]: one value per [`FeatureKey`], always in
//! [`FeatureKey::ALL`] order. Producers working from loosely-typed
//! attribute maps choose between [`FeatureVector::from_attributes`]
//! (missing keys default to 0) and [`FeatureVector::try_from_attributes`]
//! (missing keys are an error).

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Named numeric attributes as returned by a metadata service or read from
/// a catalog row.
pub type Attributes = HashMap<String, f64>;

/// One audio feature in the recommendation feature set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureKey {
    Key,
    Valence,
    Energy,
    Speechiness,
    Danceability,
    Acousticness,
    Instrumentalness,
    Liveness,
}

impl FeatureKey {
    /// Every feature key, in vector order.
    pub const ALL: [Self; 8] = [
        Self::Key,
        Self::Valence,
        Self::Energy,
        Self::Speechiness,
        Self::Danceability,
        Self::Acousticness,
        Self::Instrumentalness,
        Self::Liveness,
    ];

    /// The column / attribute name for this feature.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Key => "key",
            Self::Valence => "valence",
            Self::Energy => "energy",
            Self::Speechiness => "speechiness",
            Self::Danceability => "danceability",
            Self::Acousticness => "acousticness",
            Self::Instrumentalness => "instrumentalness",
            Self::Liveness => "liveness",
        }
    }

    /// Position of this key inside a [`FeatureVector`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for FeatureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A song's position in the recommendation feature space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FeatureVector([f64; 8]);

impl FeatureVector {
    #[must_use]
    pub const fn new(values: [f64; 8]) -> Self {
        Self(values)
    }

    /// Project an attribute map onto the feature set, defaulting missing
    /// keys to 0 and ignoring attributes outside the set.
    #[must_use]
    pub fn from_attributes(attributes: &Attributes) -> Self {
        let mut values = [0.0; 8];
        for key in FeatureKey::ALL {
            values[key.index()] = attributes.get(key.as_str()).copied().unwrap_or(0.0);
        }
        Self(values)
    }

    /// Project an attribute map onto the feature set, failing when any key
    /// is absent or not finite.
    pub fn try_from_attributes(attributes: &Attributes) -> Result<Self> {
        let mut values = [0.0; 8];
        let mut bad = Vec::new();
        for key in FeatureKey::ALL {
            match attributes.get(key.as_str()) {
                Some(value) if value.is_finite() => values[key.index()] = *value,
                _ => bad.push(key.as_str().to_string()),
            }
        }
        if bad.is_empty() {
            Ok(Self(values))
        } else {
            Err(Error::IncompatibleVector { keys: bad })
        }
    }

    #[must_use]
    pub const fn get(&self, key: FeatureKey) -> f64 {
        self.0[key.index()]
    }

    #[must_use]
    pub fn with(mut self, key: FeatureKey, value: f64) -> Self {
        self.0[key.index()] = value;
        self
    }

    #[must_use]
    pub const fn as_array(&self) -> &[f64; 8] {
        &self.0
    }

    /// Back to a named attribute map.
    #[must_use]
    pub fn to_attributes(&self) -> Attributes {
        FeatureKey::ALL
            .into_iter()
            .map(|key| (key.as_str().to_string(), self.get(key)))
            .collect()
    }

    /// Straight-line distance to `other` in feature space.
    #[must_use]
    pub fn euclidean_distance(&self, other: &Self) -> f64 {
        self.0
            .iter()
            .zip(other.0.iter())
            .map(|(a, b)| (a - b) * (a - b))
            .sum::<f64>()
            .sqrt()
    }
}
