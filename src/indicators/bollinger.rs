// =============================================================================
// Bollinger Bands
// =============================================================================
//
// Bollinger Bands consist of a middle band (SMA), an upper band (SMA + k*σ),
// and a lower band (SMA - k*σ). σ is the population standard deviation of the
// trailing window (divides by `period`).

use serde::Serialize;

use super::{assert_period, sma, Series};

/// Three index-aligned band series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BollingerBands {
    pub upper: Series,
    pub middle: Series,
    pub lower: Series,
}

/// Calculate the bands for every index of `values`.
///
/// All three bands are `None` wherever the middle SMA is `None`.
///
/// # Panics
/// If `period == 0`.
pub fn bollinger(values: &[f64], period: usize, num_std: f64) -> BollingerBands {
    assert_period("bollinger", period);

    let middle = sma(values, period);
    let mut upper = vec![None; values.len()];
    let mut lower = vec![None; values.len()];

    for (i, mean) in middle.iter().enumerate() {
        let Some(mean) = *mean else { continue };
        let window = &values[i + 1 - period..=i];
        let variance = window.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / period as f64;
        let std_dev = variance.sqrt();

        upper[i] = Some(mean + num_std * std_dev);
        lower[i] = Some(mean - num_std * std_dev);
    }

    BollingerBands {
        upper,
        middle,
        lower,
    }
}
