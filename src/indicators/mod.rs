// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free implementations of the indicators behind the market
// analytics view. Every series-producing function returns one slot per input
// element; `None` marks "not enough history yet" and is never an error.
//
// Periods of zero are a caller bug and panic immediately.

pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod series;
pub mod sma;
pub mod volatility;

pub use bollinger::{bollinger, BollingerBands};
pub use ema::{ema, ema_of};
pub use macd::{macd, Macd};
pub use rsi::rsi;
pub use series::{IndicatorSeries, IndicatorSnapshot};
pub use sma::sma;
pub use volatility::volatility;

/// Index-aligned indicator output. `None` = insufficient history.
pub type Series = Vec<Option<f64>>;

/// Most recent populated value of a series.
pub fn last_valid(series: &[Option<f64>]) -> Option<f64> {
    series.iter().rev().find_map(|v| *v)
}

pub(crate) fn assert_period(name: &str, period: usize) {
    assert!(period > 0, "{name} period must be at least 1, got 0");
}
