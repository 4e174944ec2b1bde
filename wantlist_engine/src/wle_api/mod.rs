//! The engine's public-facing API.
//!
//! [`WantlistApi`] carries the request/response operations over wantlist entities (sync, list, stats, cleanup,
//! deletes); [`MatchingApi`] runs the per-user match pass. Both are generic over the backend traits so hosts and
//! tests can swap implementations.
pub mod errors;
pub mod match_objects;
pub mod matching_api;
pub mod wantlist_api;

pub use matching_api::MatchingApi;
pub use wantlist_api::WantlistApi;
