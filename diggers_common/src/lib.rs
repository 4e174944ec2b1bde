mod confidence;

mod helpers;
mod secret;

pub use confidence::{Confidence, ConfidenceConversionError};
pub use helpers::{dedup_preserving_order, parse_boolean_flag};
pub use secret::Secret;
