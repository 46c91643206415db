//! Core data types for the tickbar system.

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Tick timestamp (naive wall-clock instant, sub-second precision).
pub type Timestamp = NaiveDateTime;

/// Quantity type (trade count/size is always a whole number).
pub type Quantity = u64;

/// Default textual timestamp format of tick files and bar output.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Parse a timestamp with an explicit format.
pub fn parse_timestamp_with(s: &str, format: &str) -> Result<Timestamp> {
    NaiveDateTime::parse_from_str(s.trim(), format)
        .map_err(|e| Error::parse(format!("invalid timestamp '{}': {}", s, e)))
}

/// Render a timestamp with an explicit format.
pub fn format_timestamp_with(ts: &Timestamp, format: &str) -> String {
    ts.format(format).to_string()
}

/// Convert milliseconds since Unix epoch (UTC) to a timestamp.
pub fn timestamp_from_ms(ms: i64) -> Option<Timestamp> {
    DateTime::from_timestamp_millis(ms).map(|dt| dt.naive_utc())
}

/// Convert a timestamp to milliseconds since Unix epoch (UTC).
#[inline]
pub fn timestamp_to_ms(ts: &Timestamp) -> i64 {
    ts.and_utc().timestamp_millis()
}

/// A single tick record.
///
/// A price of exactly zero means "missing". Negative prices and
/// order-of-magnitude outliers are repaired by the cleaning pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    /// Trade timestamp.
    pub timestamp: Timestamp,
    /// Trade price.
    pub price: f64,
    /// Traded quantity.
    pub quantity: Quantity,
}

impl Tick {
    /// Create a new tick.
    pub fn new(timestamp: Timestamp, price: f64, quantity: Quantity) -> Self {
        Self {
            timestamp,
            price,
            quantity,
        }
    }

    /// Is the price missing?
    #[inline]
    pub fn is_missing(&self) -> bool {
        self.price == 0.0
    }

    /// Notional value (price * quantity).
    #[inline]
    pub fn notional(&self) -> f64 {
        self.price * self.quantity as f64
    }
}

/// OHLCV bar for one fixed-width interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OhlcvBar {
    /// Interval start.
    pub interval_start: Timestamp,
    /// Open price.
    pub open: f64,
    /// High price.
    pub high: f64,
    /// Low price.
    pub low: f64,
    /// Close price.
    pub close: f64,
    /// Total volume.
    pub volume: Quantity,
}

impl OhlcvBar {
    /// Render as CSV record fields in output column order, with the
    /// interval start in `timestamp_format`.
    pub fn to_record(&self, timestamp_format: &str) -> [String; 6] {
        [
            format_timestamp_with(&self.interval_start, timestamp_format),
            self.open.to_string(),
            self.high.to_string(),
            self.low.to_string(),
            self.close.to_string(),
            self.volume.to_string(),
        ]
    }
}

/// Header row for bar output.
pub const BAR_HEADER: [&str; 6] = ["timestamp", "open", "high", "low", "close", "volume"];
