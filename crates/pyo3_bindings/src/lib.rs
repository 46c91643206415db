//! PyO3 bindings for the tickbar engine.
//!
//! Exposes the Rust implementations to Python:
//! - Tick cleaning (sign, magnitude, gaps, duplicates)
//! - Fixed-interval OHLCV aggregation
//!
//! Timestamps cross the boundary as milliseconds since the Unix epoch.

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use tickbar_bars::IntervalAggregator;
use tickbar_cleaning::{CleaningPipeline, CleaningReport as RustCleaningReport};
use tickbar_core::{
    parse_interval as rust_parse_interval, timestamp_from_ms, timestamp_to_ms, CleaningConfig,
    Error as RustError, OhlcvBar as RustOhlcvBar, Tick as RustTick, Timestamp,
};

fn to_py_err(err: RustError) -> PyErr {
    PyValueError::new_err(err.to_string())
}

fn ms_to_timestamp(ms: i64) -> PyResult<Timestamp> {
    timestamp_from_ms(ms)
        .ok_or_else(|| PyValueError::new_err(format!("timestamp out of range: {} ms", ms)))
}

// ============================================================================
// Python-exposed Types
// ============================================================================

/// A single tick record.
#[pyclass]
#[derive(Clone)]
pub struct Tick {
    #[pyo3(get, set)]
    pub ts_ms: i64,
    #[pyo3(get, set)]
    pub price: f64,
    #[pyo3(get, set)]
    pub quantity: u64,
}

#[pymethods]
impl Tick {
    #[new]
    fn new(ts_ms: i64, price: f64, quantity: u64) -> Self {
        Tick {
            ts_ms,
            price,
            quantity,
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "Tick(ts_ms={}, price={}, quantity={})",
            self.ts_ms, self.price, self.quantity
        )
    }
}

impl Tick {
    fn to_rust(&self) -> PyResult<RustTick> {
        Ok(RustTick::new(
            ms_to_timestamp(self.ts_ms)?,
            self.price,
            self.quantity,
        ))
    }
}

impl From<RustTick> for Tick {
    fn from(t: RustTick) -> Self {
        Tick {
            ts_ms: timestamp_to_ms(&t.timestamp),
            price: t.price,
            quantity: t.quantity,
        }
    }
}

/// OHLCV bar for one interval.
#[pyclass]
#[derive(Clone)]
pub struct OhlcvBar {
    #[pyo3(get)]
    pub ts_ms: i64,
    #[pyo3(get)]
    pub open: f64,
    #[pyo3(get)]
    pub high: f64,
    #[pyo3(get)]
    pub low: f64,
    #[pyo3(get)]
    pub close: f64,
    #[pyo3(get)]
    pub volume: u64,
}

#[pymethods]
impl OhlcvBar {
    fn __repr__(&self) -> String {
        format!(
            "OhlcvBar(ts_ms={}, o={}, h={}, l={}, c={}, v={})",
            self.ts_ms, self.open, self.high, self.low, self.close, self.volume
        )
    }
}

impl From<RustOhlcvBar> for OhlcvBar {
    fn from(b: RustOhlcvBar) -> Self {
        OhlcvBar {
            ts_ms: timestamp_to_ms(&b.interval_start),
            open: b.open,
            high: b.high,
            low: b.low,
            close: b.close,
            volume: b.volume,
        }
    }
}

/// What a cleaning run changed.
#[pyclass]
#[derive(Clone)]
pub struct CleaningReport {
    #[pyo3(get)]
    pub input_len: usize,
    #[pyo3(get)]
    pub sign_flips: usize,
    #[pyo3(get)]
    pub magnitude_corrections: usize,
    #[pyo3(get)]
    pub degenerate_windows: usize,
    #[pyo3(get)]
    pub gaps_filled: usize,
    #[pyo3(get)]
    pub unrecoverable_gaps: usize,
    #[pyo3(get)]
    pub duplicates_merged: usize,
    #[pyo3(get)]
    pub output_len: usize,
}

#[pymethods]
impl CleaningReport {
    fn __repr__(&self) -> String {
        format!(
            "CleaningReport(input_len={}, sign_flips={}, magnitude_corrections={}, gaps_filled={}, unrecoverable_gaps={}, duplicates_merged={}, output_len={})",
            self.input_len,
            self.sign_flips,
            self.magnitude_corrections,
            self.gaps_filled,
            self.unrecoverable_gaps,
            self.duplicates_merged,
            self.output_len
        )
    }
}

impl From<RustCleaningReport> for CleaningReport {
    fn from(r: RustCleaningReport) -> Self {
        CleaningReport {
            input_len: r.input_len,
            sign_flips: r.sign_flips,
            magnitude_corrections: r.magnitude_corrections,
            degenerate_windows: r.degenerate_windows,
            gaps_filled: r.gaps_filled,
            unrecoverable_gaps: r.unrecoverable_gaps,
            duplicates_merged: r.duplicates_merged,
            output_len: r.output_len,
        }
    }
}

// ============================================================================
// Functions
// ============================================================================

/// Clean a timestamp-sorted list of ticks.
///
/// Returns the cleaned ticks and a report of what changed.
#[pyfunction]
#[pyo3(signature = (ticks, window_size=5, anomaly_threshold=0.5, magnitude_factor=10.0))]
fn clean_ticks(
    ticks: Vec<Tick>,
    window_size: usize,
    anomaly_threshold: f64,
    magnitude_factor: f64,
) -> PyResult<(Vec<Tick>, CleaningReport)> {
    let config = CleaningConfig {
        window_size,
        anomaly_threshold,
        magnitude_factor,
    };
    let pipeline = CleaningPipeline::new(&config).map_err(to_py_err)?;

    let mut rust_ticks = ticks
        .iter()
        .map(Tick::to_rust)
        .collect::<PyResult<Vec<_>>>()?;
    let report = pipeline.clean(&mut rust_ticks).map_err(to_py_err)?;

    Ok((
        rust_ticks.into_iter().map(Tick::from).collect(),
        report.into(),
    ))
}

/// Aggregate cleaned ticks into OHLCV bars.
#[pyfunction]
#[pyo3(signature = (ticks, interval, start_ms=None, end_ms=None))]
fn aggregate(
    ticks: Vec<Tick>,
    interval: &str,
    start_ms: Option<i64>,
    end_ms: Option<i64>,
) -> PyResult<Vec<OhlcvBar>> {
    let interval = rust_parse_interval(interval).map_err(to_py_err)?;
    let start = start_ms.map(ms_to_timestamp).transpose()?.unwrap_or(Timestamp::MIN);
    let end = end_ms.map(ms_to_timestamp).transpose()?.unwrap_or(Timestamp::MAX);
    let aggregator = IntervalAggregator::new(interval, start, end).map_err(to_py_err)?;

    let rust_ticks = ticks
        .iter()
        .map(Tick::to_rust)
        .collect::<PyResult<Vec<_>>>()?;
    let bars = aggregator.aggregate_to_vec(&rust_ticks).map_err(to_py_err)?;

    Ok(bars.into_iter().map(OhlcvBar::from).collect())
}

/// Parse an interval such as "1h30m" into seconds.
#[pyfunction]
fn parse_interval_secs(interval: &str) -> PyResult<f64> {
    let duration = rust_parse_interval(interval).map_err(to_py_err)?;
    Ok(duration.num_milliseconds() as f64 / 1000.0)
}

// ============================================================================
// Module Definition
// ============================================================================

/// tickbar - tick cleaning and OHLCV aggregation in Rust.
#[pymodule]
fn tickbar(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Types
    m.add_class::<Tick>()?;
    m.add_class::<OhlcvBar>()?;
    m.add_class::<CleaningReport>()?;

    // Functions
    m.add_function(wrap_pyfunction!(clean_ticks, m)?)?;
    m.add_function(wrap_pyfunction!(aggregate, m)?)?;
    m.add_function(wrap_pyfunction!(parse_interval_secs, m)?)?;

    Ok(())
}
