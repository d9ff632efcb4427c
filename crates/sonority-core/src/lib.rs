//! Core domain model for sonority.
//!
//! This crate defines the recommendation feature set, feature vectors,
//! the in-memory song catalog and its CSV ingestion, and the error
//! taxonomy shared by the analysis, search, and recommendation crates.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod catalog;
pub mod error;
pub mod model;

pub use catalog::{Catalog, CatalogRow, RawTable};
pub use error::{Error, Result};
pub use model::{Attributes, FeatureKey, FeatureVector, QueryVector, Recommendation};
