// =============================================================================
// Realized Volatility (annualised, percent)
// =============================================================================
//
// Take the trailing `period` prices, compute simple returns between
// consecutive points, then annualise the population standard deviation of
// those returns with sqrt(252) trading days.

use tracing::debug;

use super::assert_period;

const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Annualised volatility in percent. Returns `0.0` when fewer than `period`
/// prices are available or the result is not finite.
///
/// A return whose base price is zero contributes `0.0`.
///
/// # Panics
/// If `period == 0`.
pub fn volatility(values: &[f64], period: usize) -> f64 {
    assert_period("volatility", period);

    if values.len() < period {
        return 0.0;
    }

    let window = &values[values.len() - period..];
    let returns: Vec<f64> = window
        .windows(2)
        .map(|w| {
            if w[0] == 0.0 {
                debug!("volatility: zero base price, return treated as 0");
                0.0
            } else {
                (w[1] - w[0]) / w[0]
            }
        })
        .collect();

    if returns.is_empty() {
        return 0.0;
    }

    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;
    let annualised = variance.sqrt() * TRADING_DAYS_PER_YEAR.sqrt() * 100.0;

    if annualised.is_finite() {
        annualised
    } else {
        0.0
    }
}
