// =============================================================================
// Trend Direction
// =============================================================================
//
// Decision rule (latest values only):
//   price > MA7 > MA30  => up
//   price < MA7 < MA30  => down
//   anything else       => sideways
//
// Needs at least 30 observations, otherwise the stack is not trustworthy.

use crate::types::{PricePoint, TrendDirection};

/// Minimum history length before a trend is reported.
pub const TREND_MIN_POINTS: usize = 30;

/// Classify the trend from the history and its MA7 / MA30 series.
pub fn classify_trend(
    points: &[PricePoint],
    ma7: &[Option<f64>],
    ma30: &[Option<f64>],
) -> TrendDirection {
    if points.len() < TREND_MIN_POINTS {
        return TrendDirection::Sideways;
    }

    let (Some(Some(short)), Some(Some(long))) = (ma7.last(), ma30.last()) else {
        return TrendDirection::Sideways;
    };
    let price = points[points.len() - 1].average_price;

    if price > *short && short > long {
        TrendDirection::Up
    } else if price < *short && short < long {
        TrendDirection::Down
    } else {
        TrendDirection::Sideways
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::sma;
    use crate::types::closes;
    use chrono::{Duration, TimeZone, Utc};

    fn history(prices: impl IntoIterator<Item = f64>) -> Vec<PricePoint> {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        prices
            .into_iter()
            .enumerate()
            .map(|(i, p)| PricePoint {
                timestamp: start + Duration::days(i as i64),
                average_price: p,
                volume: 1.0,
                price_change: 0.0,
                region: String::new(),
            })
            .collect()
    }

    fn trend_of(points: &[PricePoint]) -> TrendDirection {
        let prices = closes(points);
        classify_trend(points, &sma(&prices, 7), &sma(&prices, 30))
    }

    #[test]
    fn short_history_is_sideways() {
        let pts = history((0..29).map(|i| i as f64));
        assert_eq!(trend_of(&pts), TrendDirection::Sideways);
        // Even with hand-made averages that would say "up".
        assert_eq!(
            classify_trend(&pts, &[Some(10.0)], &[Some(1.0)]),
            TrendDirection::Sideways
        );
    }

    #[test]
    fn rising_series_is_up() {
        assert_eq!(trend_of(&history((0..40).map(|i| 100.0 + i as f64))), TrendDirection::Up);
    }

    #[test]
    fn falling_series_is_down() {
        assert_eq!(trend_of(&history((0..40).map(|i| 200.0 - i as f64))), TrendDirection::Down);
    }

    #[test]
    fn flat_series_is_sideways() {
        assert_eq!(trend_of(&history(std::iter::repeat(50.0).take(40))), TrendDirection::Sideways);
    }

    #[test]
    fn missing_latest_average_is_sideways() {
        let pts = history((0..30).map(|i| i as f64));
        let ma7 = vec![Some(1.0); 30];
        let mut ma30 = vec![Some(0.5); 30];
        ma30[29] = None;
        assert_eq!(classify_trend(&pts, &ma7, &ma30), TrendDirection::Sideways);
    }

    #[test]
    fn crossed_stack_is_sideways() {
        let pts = history((0..30).map(|_| 100.0));
        // price > ma7 but ma7 < ma30
        let got = classify_trend(&pts, &[Some(90.0)], &[Some(95.0)]);
        assert_eq!(got, TrendDirection::Sideways);
    }
}
