//! Feature-space analysis for sonority.
//!
//! Diagnostic reports over the catalog's numeric columns: principal
//! component analysis (which features drive variance) and correlation
//! ranking against a target column such as `popularity`.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod correlation;
pub mod pca;

pub use correlation::{pearson, rank, CorrelationReport, FeatureCorrelation};
pub use pca::{analyze, ComponentReport, DEFAULT_COMPONENTS};
