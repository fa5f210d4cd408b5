// =============================================================================
// Moving Average Convergence Divergence (MACD)
// =============================================================================
//
//   macd[i]      = EMA_fast[i] - EMA_slow[i]
//   signal       = EMA_signal(macd)      (seeded after the MACD warm-up)
//   histogram[i] = macd[i] - signal[i]
//
// Every arithmetic step propagates `None`, so the signal line's own warm-up
// stacks on top of the slow EMA's.

use serde::Serialize;

use super::{ema, ema_of, Series};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Macd {
    pub macd: Series,
    pub signal: Series,
    pub histogram: Series,
}

/// # Panics
/// If any of the three periods is zero.
pub fn macd(values: &[f64], fast: usize, slow: usize, signal: usize) -> Macd {
    let fast_ema = ema_of(values, fast);
    let slow_ema = ema_of(values, slow);

    let macd_line = subtract(&fast_ema, &slow_ema);
    let signal_line = ema(&macd_line, signal);
    let histogram = subtract(&macd_line, &signal_line);

    Macd {
        macd: macd_line,
        signal: signal_line,
        histogram,
    }
}

fn subtract(a: &[Option<f64>], b: &[Option<f64>]) -> Series {
    a.iter()
        .zip(b)
        .map(|(x, y)| match (x, y) {
            (Some(x), Some(y)) => Some(x - y),
            _ => None,
        })
        .collect()
}
