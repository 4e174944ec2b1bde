//! The similarity heuristic that pairs wantlist items with seller listings.
pub mod scorer;
