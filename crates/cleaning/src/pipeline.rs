//! Cleaning pipeline.
//!
//! Runs the four cleaning stages over one tick sequence, in place, in a
//! fixed order:
//!
//! 1. sign normalization (magnitudes need positive prices),
//! 2. magnitude correction (interpolation must average corrected prices),
//! 3. gap interpolation (merging must weight real prices, not zeros),
//! 4. duplicate merging.

use serde::Serialize;
use tickbar_core::{CleaningConfig, Result, Tick};
use tracing::info;

use crate::duplicates::{merge_duplicates, validate_sorted};
use crate::gaps::interpolate_gaps;
use crate::magnitude::MagnitudeNormalizer;
use crate::sign::normalize_signs;

/// Summary of what a cleaning run changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CleaningReport {
    /// Ticks before cleaning.
    pub input_len: usize,
    /// Negative prices made positive.
    pub sign_flips: usize,
    /// Low magnitude outliers scaled up.
    pub magnitude_corrections: usize,
    /// Indices skipped by the magnitude stage for lack of neighbors.
    pub degenerate_windows: usize,
    /// Missing prices filled.
    pub gaps_filled: usize,
    /// Missing prices that could not be filled.
    pub unrecoverable_gaps: usize,
    /// Records removed by duplicate merging.
    pub duplicates_merged: usize,
    /// Ticks after cleaning.
    pub output_len: usize,
}

impl CleaningReport {
    /// Did the run change anything?
    pub fn is_noop(&self) -> bool {
        self.sign_flips == 0
            && self.magnitude_corrections == 0
            && self.gaps_filled == 0
            && self.duplicates_merged == 0
    }
}

/// Fixed-order cleaning pipeline.
#[derive(Debug, Clone, Default)]
pub struct CleaningPipeline {
    magnitude: MagnitudeNormalizer,
}

impl CleaningPipeline {
    /// Create a pipeline from the cleaning configuration.
    pub fn new(config: &CleaningConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            magnitude: MagnitudeNormalizer::new(config),
        })
    }

    /// Clean `ticks` in place.
    ///
    /// The sequence must be sorted by timestamp; unsorted input is rejected
    /// before any stage runs.
    pub fn clean(&self, ticks: &mut Vec<Tick>) -> Result<CleaningReport> {
        validate_sorted(ticks)?;

        let mut report = CleaningReport {
            input_len: ticks.len(),
            ..CleaningReport::default()
        };

        report.sign_flips = normalize_signs(ticks);
        info!(flipped = report.sign_flips, "sign normalization done");

        let magnitude = self.magnitude.normalize(ticks);
        report.magnitude_corrections = magnitude.corrections;
        report.degenerate_windows = magnitude.degenerate_windows;
        info!(
            corrected = magnitude.corrections,
            skipped = magnitude.degenerate_windows,
            "magnitude normalization done"
        );

        let gaps = interpolate_gaps(ticks);
        report.gaps_filled = gaps.filled;
        report.unrecoverable_gaps = gaps.unrecoverable;
        info!(
            filled = gaps.filled,
            unrecoverable = gaps.unrecoverable,
            "gap interpolation done"
        );

        report.duplicates_merged = merge_duplicates(ticks);
        report.output_len = ticks.len();
        info!(
            merged = report.duplicates_merged,
            remaining = report.output_len,
            "duplicate merge done"
        );

        Ok(report)
    }
}
