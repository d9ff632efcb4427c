//! Recommendation service layer for sonority.
//!
//! Wires the catalog and similarity search to an external metadata
//! service: resolve a (song, artist) pair, fetch its audio features,
//! and return the nearest catalog songs. Also hosts configuration and
//! the request/response mapping used by the command layer.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod config;
pub mod error;
pub mod metadata;
pub mod recommender;
pub mod resilience;
pub mod response;

pub use config::Config;
pub use error::{RecommendError, RecommendResult};
pub use metadata::{MetadataSource, SpotifyClient, SpotifyCredentials, TrackId};
pub use recommender::Recommender;
pub use response::{parse_request, respond, RecommendRequest, Response, ResponseBody};
