//! Tick file name metadata.
//!
//! Tick files are named `<ticker>_<feed>_<YYYYMMDD>_<series>_<hash>.csv`.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tickbar_core::{Error, Result, Timestamp};

/// Metadata parsed from a tick file name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickFileMetadata {
    /// Full path to the file.
    pub path: PathBuf,
    /// Instrument ticker.
    pub ticker: String,
    /// Trading day covered by the file.
    pub day: NaiveDate,
    /// Series number within the day.
    pub series: u32,
    /// Content hash.
    pub hash: String,
}

impl TickFileMetadata {
    /// Parse metadata from a file path.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| Error::parse(format!("invalid tick file name: {}", path.display())))?;

        let parts: Vec<&str> = stem.split('_').collect();
        if parts.len() < 5 {
            return Err(Error::parse(format!(
                "tick file name '{}' must look like TICKER_FEED_YYYYMMDD_SERIES_HASH.csv",
                stem
            )));
        }

        let day = NaiveDate::parse_from_str(parts[2], "%Y%m%d")
            .map_err(|e| Error::parse(format!("invalid day '{}' in '{}': {}", parts[2], stem, e)))?;
        let series = parts[3]
            .parse()
            .map_err(|_| Error::parse(format!("invalid series '{}' in '{}'", parts[3], stem)))?;

        Ok(Self {
            path: path.to_path_buf(),
            ticker: parts[0].to_string(),
            day,
            series,
            hash: parts[4].to_string(),
        })
    }

    /// Does this file's day fall within `[start.date(), end.date()]`?
    pub fn in_range(&self, start: Timestamp, end: Timestamp) -> bool {
        start.date() <= self.day && self.day <= end.date()
    }
}
