//! Configuration structures for the tickbar system.

use std::path::{Path, PathBuf};

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::interval::parse_interval;
use crate::types::{Timestamp, TIMESTAMP_FORMAT};

/// Main configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Cleaning pipeline configuration.
    pub cleaning: CleaningConfig,
    /// Bar aggregation configuration.
    pub aggregation: AggregationConfig,
    /// Tick file loading configuration.
    pub loader: LoaderConfig,
}

impl Config {
    /// Load a configuration from a JSON file. Missing sections use defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate all sections.
    pub fn validate(&self) -> Result<()> {
        self.cleaning.validate()?;
        self.aggregation.validate()?;
        Ok(())
    }
}

/// Cleaning heuristics.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CleaningConfig {
    /// Magnitude window size, odd and at least 3; the neighborhood spans
    /// `window_size / 2` records on each side of the record under test.
    pub window_size: usize,
    /// Relative deviation from the local median considered anomalous.
    pub anomaly_threshold: f64,
    /// Factor applied to a too-low outlier.
    pub magnitude_factor: f64,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            window_size: 5,
            anomaly_threshold: 0.5,
            magnitude_factor: 10.0,
        }
    }
}

impl CleaningConfig {
    /// Records on each side of the record under test.
    #[inline]
    pub fn half_window(&self) -> usize {
        self.window_size / 2
    }

    pub fn validate(&self) -> Result<()> {
        if self.window_size < 3 || self.window_size % 2 == 0 {
            return Err(Error::config(format!(
                "window_size must be odd and at least 3, got {}",
                self.window_size
            )));
        }
        if !(self.anomaly_threshold > 0.0) {
            return Err(Error::config(format!(
                "anomaly_threshold must be positive, got {}",
                self.anomaly_threshold
            )));
        }
        if !(self.magnitude_factor > 1.0) {
            return Err(Error::config(format!(
                "magnitude_factor must be greater than 1, got {}",
                self.magnitude_factor
            )));
        }
        Ok(())
    }
}

/// Bar aggregation parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregationConfig {
    /// Interval string (e.g. "1m", "1h30m").
    pub interval: String,
    /// Inclusive start; `None` means the earliest representable instant.
    pub start_date: Option<Timestamp>,
    /// Inclusive end; `None` means the latest representable instant.
    pub end_date: Option<Timestamp>,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            interval: "1m".to_string(),
            start_date: None,
            end_date: None,
        }
    }
}

impl AggregationConfig {
    /// Parsed interval duration.
    pub fn interval(&self) -> Result<Duration> {
        parse_interval(&self.interval)
    }

    /// Effective start bound.
    pub fn start(&self) -> Timestamp {
        self.start_date.unwrap_or(Timestamp::MIN)
    }

    /// Effective end bound.
    pub fn end(&self) -> Timestamp {
        self.end_date.unwrap_or(Timestamp::MAX)
    }

    pub fn validate(&self) -> Result<()> {
        self.interval()?;
        if self.start() > self.end() {
            return Err(Error::config(format!(
                "start_date {} is after end_date {}",
                self.start(),
                self.end()
            )));
        }
        Ok(())
    }
}

/// Tick file loading configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Directory holding tick CSV files.
    pub data_dir: PathBuf,
    /// Number of parallel loader threads (0 = auto).
    pub workers: usize,
    /// Timestamp format of the first CSV column.
    pub timestamp_format: String,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            workers: 0,
            timestamp_format: TIMESTAMP_FORMAT.to_string(),
        }
    }
}
