// =============================================================================
// Simple Moving Average (SMA)
// =============================================================================
//
// sma[i] = mean(values[i - period + 1 ..= i])   for i >= period - 1
// sma[i] = None                                  otherwise

use super::{assert_period, Series};

/// Trailing arithmetic mean over `period` values, aligned with `values`.
///
/// # Panics
/// If `period == 0`.
pub fn sma(values: &[f64], period: usize) -> Series {
    assert_period("sma", period);

    let mut out = vec![None; values.len()];
    if values.len() < period {
        return out;
    }

    for (offset, window) in values.windows(period).enumerate() {
        let mean = window.iter().sum::<f64>() / period as f64;
        out[offset + period - 1] = Some(mean);
    }
    out
}
