// =============================================================================
// Relative Strength Index (RSI) — trailing simple average
// =============================================================================
//
// Step 1: Compute price changes (deltas) from consecutive prices.
// Step 2: Split each delta into a gain (positive part) and a loss (magnitude
//         of the negative part).
// Step 3: Once `period` deltas exist, average the LAST `period` gains and
//         losses. This is a plain trailing mean, not Wilder's recursive
//         smoothing.
// Step 4: RS  = avg_gain / avg_loss
//         RSI = 100 - 100 / (1 + RS)
//
// An average loss of exactly zero yields 100, including the flat-market case
// where the average gain is zero as well.
// =============================================================================

use super::{assert_period, Series};

/// RSI aligned with `values`. Index 0 and the first `period - 1` deltas are
/// `None`.
///
/// # Panics
/// If `period == 0`.
pub fn rsi(values: &[f64], period: usize) -> Series {
    assert_period("rsi", period);

    let mut out = vec![None; values.len()];
    let mut gains = Vec::with_capacity(values.len());
    let mut losses = Vec::with_capacity(values.len());
    let period_f = period as f64;

    for i in 1..values.len() {
        let delta = values[i] - values[i - 1];
        gains.push(delta.max(0.0));
        losses.push((-delta).max(0.0));

        if gains.len() >= period {
            let from = gains.len() - period;
            let avg_gain = gains[from..].iter().sum::<f64>() / period_f;
            let avg_loss = losses[from..].iter().sum::<f64>() / period_f;
            out[i] = Some(rsi_from_averages(avg_gain, avg_loss));
        }
    }

    out
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    100.0 - 100.0 / (1.0 + rs)
}
