pub mod feature;
pub mod query;
pub mod recommendation;

pub use feature::{Attributes, FeatureKey, FeatureVector};
pub use query::QueryVector;
pub use recommendation::Recommendation;
