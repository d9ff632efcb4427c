//! Nearest-neighbor song retrieval for sonority.
//!
//! Ranks every catalog row by Euclidean distance to a query in the
//! recommendation feature space. Each call is a full linear scan over the
//! read-only catalog; there is no index.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod retriever;

pub use retriever::{find_similar, nearest, Neighbor, DEFAULT_RECOMMENDATIONS};
