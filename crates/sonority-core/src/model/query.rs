use crate::error::Result;
use crate::model::feature::{Attributes, FeatureVector};

/// A similarity query: the song it originates from plus its raw attributes.
///
/// The originating title drives self-exclusion during retrieval.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryVector {
    pub title: String,
    pub attributes: Attributes,
}

impl QueryVector {
    #[must_use]
    pub fn new(title: impl Into<String>, attributes: Attributes) -> Self {
        Self {
            title: title.into(),
            attributes,
        }
    }

    /// Build a query from an already-projected vector.
    #[must_use]
    pub fn from_features(title: impl Into<String>, features: &FeatureVector) -> Self {
        Self::new(title, features.to_attributes())
    }

    /// Project onto the feature set. Fails with `IncompatibleVector` if a
    /// key is missing.
    pub fn project(&self) -> Result<FeatureVector> {
        FeatureVector::try_from_attributes(&self.attributes)
    }
}
