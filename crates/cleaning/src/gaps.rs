//! Missing price interpolation.
//!
//! A zero price means "missing". Each one is filled from the nearest
//! non-zero price on either side: the mean of both when both exist, the
//! single neighbor otherwise. Neighbors come from the prices as they were
//! before the pass, so a run of gaps shares one pair of anchors.

use tickbar_core::Tick;
use tracing::warn;

/// Counters produced by one interpolation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GapStats {
    /// Missing prices that were filled.
    pub filled: usize,
    /// Missing prices with no non-zero neighbor on either side.
    pub unrecoverable: usize,
}

/// Fill zero prices in place. Quantities are never touched.
pub fn interpolate_gaps(ticks: &mut [Tick]) -> GapStats {
    let n = ticks.len();
    let mut stats = GapStats::default();

    // Nearest non-zero price strictly to the right of each index.
    let mut right: Vec<Option<f64>> = vec![None; n];
    let mut next = None;
    for i in (0..n).rev() {
        right[i] = next;
        if !ticks[i].is_missing() {
            next = Some(ticks[i].price);
        }
    }

    // Walking left to right, `left` holds the nearest pre-pass non-zero price
    // strictly to the left; filled values are never fed back into it.
    let mut left = None;
    for i in 0..n {
        if !ticks[i].is_missing() {
            left = Some(ticks[i].price);
            continue;
        }

        let filled = match (left, right[i]) {
            (Some(l), Some(r)) => (l + r) / 2.0,
            (Some(l), None) => l,
            (None, Some(r)) => r,
            (None, None) => {
                stats.unrecoverable += 1;
                continue;
            }
        };
        ticks[i].price = filled;
        stats.filled += 1;
    }

    if stats.unrecoverable > 0 {
        warn!(
            count = stats.unrecoverable,
            "no non-zero prices available, gaps left unrepaired"
        );
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn make_ticks(prices: &[f64]) -> Vec<Tick> {
        let t0 = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        prices
            .iter()
            .enumerate()
            .map(|(i, &p)| Tick::new(t0 + Duration::seconds(i as i64), p, i as u64 + 1))
            .collect()
    }

    fn prices(ticks: &[Tick]) -> Vec<f64> {
        ticks.iter().map(|t| t.price).collect()
    }

    #[test]
    fn test_run_of_gaps_shares_anchors() {
        let mut ticks = make_ticks(&[10.0, 0.0, 0.0, 16.0]);
        let stats = interpolate_gaps(&mut ticks);

        assert_eq!(stats.filled, 2);
        assert_eq!(prices(&ticks), vec![10.0, 13.0, 13.0, 16.0]);
    }

    #[test]
    fn test_single_gap() {
        let mut ticks = make_ticks(&[10.0, 0.0, 20.0]);
        interpolate_gaps(&mut ticks);
        assert_eq!(prices(&ticks), vec![10.0, 15.0, 20.0]);
    }

    #[test]
    fn test_leading_and_trailing_gaps() {
        let mut ticks = make_ticks(&[0.0, 0.0, 5.0, 7.0, 0.0]);
        let stats = interpolate_gaps(&mut ticks);

        assert_eq!(stats.filled, 3);
        assert_eq!(prices(&ticks), vec![5.0, 5.0, 5.0, 7.0, 7.0]);
    }

    #[test]
    fn test_all_zero_unrecoverable() {
        let mut ticks = make_ticks(&[0.0, 0.0, 0.0]);
        let stats = interpolate_gaps(&mut ticks);

        assert_eq!(stats.filled, 0);
        assert_eq!(stats.unrecoverable, 3);
        assert_eq!(prices(&ticks), vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_quantities_untouched() {
        let mut ticks = make_ticks(&[0.0, 3.0, 0.0]);
        interpolate_gaps(&mut ticks);

        let quantities: Vec<u64> = ticks.iter().map(|t| t.quantity).collect();
        assert_eq!(quantities, vec![1, 2, 3]);
    }

    #[test]
    fn test_separate_gap_runs() {
        let mut ticks = make_ticks(&[2.0, 0.0, 4.0, 0.0, 0.0, 10.0]);
        interpolate_gaps(&mut ticks);
        assert_eq!(prices(&ticks), vec![2.0, 3.0, 4.0, 7.0, 7.0, 10.0]);
    }

    #[test]
    fn test_no_gaps_is_noop() {
        let raw = [1.0, 2.0, 3.0];
        let mut ticks = make_ticks(&raw);
        let stats = interpolate_gaps(&mut ticks);
        assert_eq!(stats, GapStats::default());
        assert_eq!(prices(&ticks), raw.to_vec());
    }

    #[test]
    fn test_empty() {
        let mut ticks: Vec<Tick> = Vec::new();
        assert_eq!(interpolate_gaps(&mut ticks), GapStats::default());
    }
}
