//! Fixed-interval bar aggregation from cleaned ticks.
//!
//! The aggregator walks the tick sequence once. Intervals are laid end to
//! end starting at `max(start_date, first tick)`, and aggregation stops once
//! an interval would reach `min(end_date, last tick)`, so the trailing
//! partial interval is never emitted. Intervals without ticks produce no bar.

use chrono::Duration;
use tickbar_core::{
    AggregationConfig, Error, OhlcvBar, Quantity, Result, Tick, Timestamp,
};
use tracing::{debug, info};

use crate::sink::BarSink;

/// A bar that's currently being built.
#[derive(Debug, Clone)]
struct BarInProgress {
    interval_start: Timestamp,
    open: Option<f64>,
    high: f64,
    low: f64,
    close: f64,
    volume: Quantity,
    tick_count: usize,
}

impl BarInProgress {
    fn new(interval_start: Timestamp) -> Self {
        Self {
            interval_start,
            open: None,
            high: f64::NEG_INFINITY,
            low: f64::INFINITY,
            close: 0.0,
            volume: 0,
            tick_count: 0,
        }
    }

    fn add_tick(&mut self, tick: &Tick) {
        if self.open.is_none() {
            self.open = Some(tick.price);
        }
        self.high = self.high.max(tick.price);
        self.low = self.low.min(tick.price);
        self.close = tick.price;
        self.volume = self.volume.saturating_add(tick.quantity);
        self.tick_count += 1;
    }

    /// The finished bar, or `None` if no tick landed in the interval.
    fn to_bar(&self) -> Option<OhlcvBar> {
        let open = self.open?;

        Some(OhlcvBar {
            interval_start: self.interval_start,
            open,
            high: self.high,
            low: self.low,
            close: self.close,
            volume: self.volume,
        })
    }
}

/// Interval aggregator over an inclusive date range.
#[derive(Debug, Clone)]
pub struct IntervalAggregator {
    interval: Duration,
    start_date: Timestamp,
    end_date: Timestamp,
}

impl IntervalAggregator {
    /// Create an aggregator. The interval must be positive.
    pub fn new(interval: Duration, start_date: Timestamp, end_date: Timestamp) -> Result<Self> {
        if interval <= Duration::zero() {
            return Err(Error::config(format!(
                "interval must be positive, got {}",
                interval
            )));
        }
        Ok(Self {
            interval,
            start_date,
            end_date,
        })
    }

    /// Create an aggregator covering the full representable range.
    pub fn unbounded(interval: Duration) -> Result<Self> {
        Self::new(interval, Timestamp::MIN, Timestamp::MAX)
    }

    /// Create an aggregator from configuration.
    pub fn from_config(config: &AggregationConfig) -> Result<Self> {
        config.validate()?;
        Self::new(config.interval()?, config.start(), config.end())
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Aggregate `ticks` (sorted, cleaned) into `sink`.
    ///
    /// Returns the number of bars emitted. An empty sequence is rejected.
    pub fn aggregate<S>(&self, ticks: &[Tick], sink: &mut S) -> Result<usize>
    where
        S: BarSink + ?Sized,
    {
        let (first, last) = match (ticks.first(), ticks.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => {
                return Err(Error::insufficient_data(
                    "cannot aggregate an empty tick sequence",
                ))
            }
        };

        let mut interval_start = self.start_date.max(first.timestamp);
        let end_date = self.end_date.min(last.timestamp);
        let Some(mut interval_end) = interval_start.checked_add_signed(self.interval) else {
            return Ok(0);
        };

        // Ticks before the first interval lie outside the requested range.
        let mut i = ticks.partition_point(|t| t.timestamp < interval_start);
        let mut emitted = 0;

        while interval_end < end_date {
            let mut bar = BarInProgress::new(interval_start);
            while i < ticks.len() && ticks[i].timestamp < interval_end {
                bar.add_tick(&ticks[i]);
                i += 1;
            }

            if let Some(completed) = bar.to_bar() {
                debug!(
                    interval_start = %completed.interval_start,
                    ticks = bar.tick_count,
                    volume = completed.volume,
                    "bar closed"
                );
                sink.emit(&completed)?;
                emitted += 1;
            }

            interval_start = interval_end;
            interval_end = match interval_start.checked_add_signed(self.interval) {
                Some(next) => next,
                None => break,
            };
        }

        info!(
            bars = emitted,
            ticks_consumed = i,
            interval = %self.interval,
            "aggregation done"
        );
        Ok(emitted)
    }

    /// Aggregate into a new vector.
    pub fn aggregate_to_vec(&self, ticks: &[Tick]) -> Result<Vec<OhlcvBar>> {
        let mut bars = Vec::new();
        self.aggregate(ticks, &mut bars)?;
        Ok(bars)
    }
}
