// =============================================================================
// Indicator Series — every chart overlay for one price history
// =============================================================================

use serde::Serialize;
use tracing::debug;

use super::{bollinger, last_valid, macd, rsi, sma, BollingerBands, Macd, Series};
use crate::runtime_config::IndicatorSettings;
use crate::types::{closes, PricePoint};

/// Parallel arrays aligned 1:1 with the input history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorSeries {
    pub ma7: Series,
    pub ma30: Series,
    pub ma90: Series,
    pub rsi: Series,
    pub bollinger: BollingerBands,
    pub macd: Macd,
}

impl IndicatorSeries {
    /// Compute all overlays from the `average_price` column of `points`.
    pub fn compute(points: &[PricePoint], settings: &IndicatorSettings) -> Self {
        let prices = closes(points);
        let series = Self {
            ma7: sma(&prices, 7),
            ma30: sma(&prices, 30),
            ma90: sma(&prices, 90),
            rsi: rsi(&prices, settings.rsi_period),
            bollinger: bollinger(
                &prices,
                settings.bollinger_period,
                settings.bollinger_std_dev,
            ),
            macd: macd(
                &prices,
                settings.macd_fast,
                settings.macd_slow,
                settings.macd_signal,
            ),
        };

        debug!(points = points.len(), "indicator series computed");
        series
    }

    pub fn len(&self) -> usize {
        self.ma7.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ma7.is_empty()
    }

    /// Last populated value of every overlay.
    pub fn latest(&self) -> IndicatorSnapshot {
        IndicatorSnapshot {
            ma7: last_valid(&self.ma7),
            ma30: last_valid(&self.ma30),
            ma90: last_valid(&self.ma90),
            rsi: last_valid(&self.rsi),
            bollinger_upper: last_valid(&self.bollinger.upper),
            bollinger_middle: last_valid(&self.bollinger.middle),
            bollinger_lower: last_valid(&self.bollinger.lower),
            macd: last_valid(&self.macd.macd),
            macd_signal: last_valid(&self.macd.signal),
            macd_histogram: last_valid(&self.macd.histogram),
        }
    }
}

/// Most recent reading of each indicator, for dashboard tiles.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IndicatorSnapshot {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ma7: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ma30: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ma90: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rsi: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bollinger_upper: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bollinger_middle: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bollinger_lower: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub macd: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub macd_signal: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub macd_histogram: Option<f64>,
}
