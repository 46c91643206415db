//! Order-of-magnitude price correction.
//!
//! Feed encoding errors sometimes drop a decimal place, so a price of 100.0
//! arrives as 10.0. Each price is compared with the median of its local
//! neighborhood (the record itself excluded) and a too-low outlier is scaled
//! back up. Too-high outliers are left alone.

use statrs::statistics::{Data, Median};
use tickbar_core::{CleaningConfig, Tick};
use tracing::debug;

/// Counters produced by one magnitude pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MagnitudeStats {
    /// Prices scaled up.
    pub corrections: usize,
    /// Indices skipped because every neighbor price was zero.
    pub degenerate_windows: usize,
}

/// Local-median magnitude normalizer.
#[derive(Debug, Clone)]
pub struct MagnitudeNormalizer {
    /// Records on each side of the record under test.
    half_window: usize,
    /// Relative deviation considered anomalous.
    threshold: f64,
    /// Multiplier for too-low outliers.
    factor: f64,
}

impl MagnitudeNormalizer {
    /// Create a normalizer from the cleaning configuration.
    pub fn new(config: &CleaningConfig) -> Self {
        Self {
            half_window: config.half_window(),
            threshold: config.anomaly_threshold,
            factor: config.magnitude_factor,
        }
    }

    /// Does `price` deviate from `median` by more than the threshold?
    #[inline]
    pub fn is_anomalous(&self, price: f64, median: f64) -> bool {
        (price / median - 1.0).abs() > self.threshold
    }

    /// Correct too-low outliers in place.
    ///
    /// Indices are visited left to right, and each window sees corrections
    /// already applied at earlier indices.
    pub fn normalize(&self, ticks: &mut [Tick]) -> MagnitudeStats {
        let n = ticks.len();
        let mut stats = MagnitudeStats::default();
        let mut window = Vec::with_capacity(2 * self.half_window);

        for i in 0..n {
            // Missing prices are the gap interpolator's job.
            if ticks[i].is_missing() {
                continue;
            }

            let start = i.saturating_sub(self.half_window);
            let end = (i + self.half_window + 1).min(n);

            window.clear();
            window.extend(
                ticks[start..i]
                    .iter()
                    .chain(&ticks[i + 1..end])
                    .filter(|t| !t.is_missing())
                    .map(|t| t.price),
            );

            let Some(median) = local_median(&window) else {
                debug!(index = i, "no non-zero neighbors, skipping magnitude check");
                stats.degenerate_windows += 1;
                continue;
            };

            let price = ticks[i].price;
            if self.is_anomalous(price, median) && price < median {
                let corrected = price * self.factor;
                debug!(index = i, price, median, corrected, "scaling low magnitude outlier");
                ticks[i].price = corrected;
                stats.corrections += 1;
            }
        }

        stats
    }
}

impl Default for MagnitudeNormalizer {
    fn default() -> Self {
        Self::new(&CleaningConfig::default())
    }
}

/// Median of the window, or `None` when the window is empty.
fn local_median(prices: &[f64]) -> Option<f64> {
    if prices.is_empty() {
        return None;
    }
    Some(Data::new(prices.to_vec()).median())
}
