//! OHLCV bar building for the tickbar system.
//!
//! This crate handles:
//! - Fixed-interval aggregation of cleaned ticks into OHLCV bars
//! - Bar sinks (in-memory, closure, CSV)

pub mod aggregator;
pub mod sink;

pub use aggregator::IntervalAggregator;
pub use sink::{BarSink, CsvBarSink, FnSink};
