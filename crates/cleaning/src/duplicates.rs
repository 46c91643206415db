//! Same-timestamp record merging.

use tickbar_core::{Error, Result, Tick};

/// Collapse runs of adjacent ticks sharing a timestamp into one tick.
///
/// Each duplicate is folded into the record before it using a two-way
/// volume-weighted average, and the merged record is then compared with the
/// next one, so a run of any length ends up as a single record. Only
/// adjacent duplicates are merged; the input must be sorted.
///
/// When both quantities are zero the VWAP is undefined and the earlier
/// price is kept.
///
/// Returns the number of records removed.
pub fn merge_duplicates(ticks: &mut Vec<Tick>) -> usize {
    if ticks.len() < 2 {
        return 0;
    }

    // `write` is the index of the last kept record; `read` scans ahead.
    let mut write = 0;
    for read in 1..ticks.len() {
        let current = ticks[read];
        let kept = &mut ticks[write];

        if current.timestamp == kept.timestamp {
            let quantity = kept.quantity.saturating_add(current.quantity);
            if quantity > 0 {
                kept.price = (kept.notional() + current.notional()) / quantity as f64;
            }
            kept.quantity = quantity;
        } else {
            write += 1;
            ticks[write] = current;
        }
    }

    let removed = ticks.len() - (write + 1);
    ticks.truncate(write + 1);
    removed
}

/// Check that timestamps never decrease.
pub fn validate_sorted(ticks: &[Tick]) -> Result<()> {
    match ticks
        .windows(2)
        .position(|pair| pair[1].timestamp < pair[0].timestamp)
    {
        Some(i) => Err(Error::data(format!(
            "ticks not sorted by timestamp: index {} ({}) precedes index {} ({})",
            i + 1,
            ticks[i + 1].timestamp,
            i,
            ticks[i].timestamp
        ))),
        None => Ok(()),
    }
}
