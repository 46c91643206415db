//! Sign normalization.

use tickbar_core::Tick;

/// Replace every price with its absolute value.
///
/// Returns the number of prices that were negative.
pub fn normalize_signs(ticks: &mut [Tick]) -> usize {
    let mut flipped = 0;
    for tick in ticks.iter_mut() {
        if tick.price < 0.0 {
            flipped += 1;
        }
        tick.price = tick.price.abs();
    }
    flipped
}
