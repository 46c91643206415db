//! Tick data cleaning for the tickbar system.
//!
//! This crate handles:
//! - Sign normalization (negative prices)
//! - Order-of-magnitude correction against a local median
//! - Missing price interpolation
//! - Same-timestamp record merging (VWAP)
//! - The fixed-order pipeline running all of the above

pub mod sign;
pub mod magnitude;
pub mod gaps;
pub mod duplicates;
pub mod pipeline;

pub use sign::normalize_signs;
pub use magnitude::{MagnitudeNormalizer, MagnitudeStats};
pub use gaps::{interpolate_gaps, GapStats};
pub use duplicates::{merge_duplicates, validate_sorted};
pub use pipeline::{CleaningPipeline, CleaningReport};
