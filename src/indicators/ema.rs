// =============================================================================
// Exponential Moving Average (EMA)
// =============================================================================
//
// EMA gives more weight to recent prices, making it more responsive to new
// information than the Simple Moving Average (SMA).
//
// Formula:
//   multiplier = 2 / (period + 1)
//   EMA_t      = value_t * multiplier + EMA_{t-1} * (1 - multiplier)
//
// The first EMA value is seeded with the SMA of the first `period` populated
// values, counted from the first populated index. Empty slots after the seed
// carry the previous EMA forward, which matters when the input is itself an
// indicator with a warm-up (the MACD line).
// =============================================================================

use super::{assert_period, Series};

/// EMA over a series that may contain empty slots.
///
/// # Panics
/// If `period == 0`.
pub fn ema(values: &[Option<f64>], period: usize) -> Series {
    assert_period("ema", period);

    let mut out = vec![None; values.len()];
    let Some(first) = values.iter().position(Option::is_some) else {
        return out;
    };

    // Seed: SMA of the first `period` populated values.
    let mut seen = 0usize;
    let mut sum = 0.0;
    let mut seed_idx = None;
    for (i, v) in values.iter().enumerate().skip(first) {
        if let Some(v) = v {
            sum += v;
            seen += 1;
            if seen == period {
                seed_idx = Some(i);
                break;
            }
        }
    }
    let Some(seed_idx) = seed_idx else {
        return out;
    };

    let multiplier = 2.0 / (period as f64 + 1.0);
    let mut prev = sum / period as f64;
    out[seed_idx] = Some(prev);

    for i in seed_idx + 1..values.len() {
        if let Some(v) = values[i] {
            prev = v * multiplier + prev * (1.0 - multiplier);
        }
        out[i] = Some(prev);
    }

    out
}

/// EMA over a fully populated price column.
pub fn ema_of(values: &[f64], period: usize) -> Series {
    let wrapped: Vec<Option<f64>> = values.iter().copied().map(Some).collect();
    ema(&wrapped, period)
}
