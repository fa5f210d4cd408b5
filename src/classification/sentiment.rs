// =============================================================================
// Market Sentiment
// =============================================================================
//
// Each signal casts one independent vote:
//
//   RSI > 70            => bearish (overbought)
//   RSI < 30            => bullish (oversold)
//   50 < RSI <= 70      => bullish
//   30 <= RSI < 50      => bearish
//   MACD > 0 / < 0      => bullish / bearish
//   change > 2% / < -2% => bullish / bearish
//
// The side with more votes wins; a tie (including 0-0) is neutral.

use tracing::trace;

use crate::indicators::last_valid;
use crate::types::{PricePoint, Sentiment};

/// Classify sentiment from the history, its RSI series and its MACD line.
///
/// Fewer than two price points is always [`Sentiment::Neutral`]. A series
/// with no populated value simply casts no vote.
pub fn classify_sentiment(
    points: &[PricePoint],
    rsi: &[Option<f64>],
    macd_line: &[Option<f64>],
) -> Sentiment {
    if points.len() < 2 {
        return Sentiment::Neutral;
    }

    let mut bullish = 0u32;
    let mut bearish = 0u32;

    if let Some(rsi) = last_valid(rsi) {
        if rsi > 70.0 {
            bearish += 1;
        } else if rsi < 30.0 {
            bullish += 1;
        } else if rsi > 50.0 {
            bullish += 1;
        } else if rsi < 50.0 {
            bearish += 1;
        }
    }

    if let Some(macd) = last_valid(macd_line) {
        if macd > 0.0 {
            bullish += 1;
        } else if macd < 0.0 {
            bearish += 1;
        }
    }

    let change = points[points.len() - 1].price_change;
    if change > 2.0 {
        bullish += 1;
    } else if change < -2.0 {
        bearish += 1;
    }

    trace!(bullish, bearish, "sentiment votes");

    match bullish.cmp(&bearish) {
        std::cmp::Ordering::Greater => Sentiment::Bullish,
        std::cmp::Ordering::Less => Sentiment::Bearish,
        std::cmp::Ordering::Equal => Sentiment::Neutral,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn points(last_change: f64) -> Vec<PricePoint> {
        let ts = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        [0.0, last_change]
            .iter()
            .map(|&c| PricePoint {
                timestamp: ts,
                average_price: 75_000.0,
                volume: 0.0,
                price_change: c,
                region: String::new(),
            })
            .collect()
    }

    #[test]
    fn fewer_than_two_points_is_neutral() {
        assert_eq!(classify_sentiment(&[], &[], &[]), Sentiment::Neutral);
        let two = points(10.0);
        assert_eq!(classify_sentiment(&two[1..], &[Some(20.0)], &[Some(5.0)]), Sentiment::Neutral);
    }

    #[test]
    fn no_signals_is_neutral() {
        assert_eq!(classify_sentiment(&points(0.0), &[None], &[None]), Sentiment::Neutral);
    }

    #[test]
    fn overbought_rsi_votes_bearish() {
        assert_eq!(classify_sentiment(&points(0.0), &[Some(75.0)], &[]), Sentiment::Bearish);
    }

    #[test]
    fn oversold_rsi_votes_bullish() {
        assert_eq!(classify_sentiment(&points(0.0), &[Some(25.0)], &[]), Sentiment::Bullish);
    }

    #[test]
    fn rsi_boundaries() {
        let p = points(0.0);
        assert_eq!(classify_sentiment(&p, &[Some(70.0)], &[]), Sentiment::Bullish);
        assert_eq!(classify_sentiment(&p, &[Some(30.0)], &[]), Sentiment::Bearish);
        assert_eq!(classify_sentiment(&p, &[Some(50.0)], &[]), Sentiment::Neutral);
    }

    #[test]
    fn last_populated_values_are_used() {
        let p = points(0.0);
        let rsi = [Some(20.0), Some(60.0), None];
        let macd = [Some(-1.0), Some(2.0), None];
        assert_eq!(classify_sentiment(&p, &rsi, &macd), Sentiment::Bullish);
    }

    #[test]
    fn majority_wins() {
        // RSI 60 bullish, MACD negative bearish, change +3 bullish.
        let got = classify_sentiment(&points(3.0), &[Some(60.0)], &[Some(-0.5)]);
        assert_eq!(got, Sentiment::Bullish);
    }

    #[test]
    fn tie_is_neutral() {
        // RSI 45 bearish, MACD positive bullish.
        let got = classify_sentiment(&points(0.0), &[Some(45.0)], &[Some(0.5)]);
        assert_eq!(got, Sentiment::Neutral);
    }

    #[test]
    fn price_change_threshold_is_strict() {
        assert_eq!(classify_sentiment(&points(2.0), &[], &[]), Sentiment::Neutral);
        assert_eq!(classify_sentiment(&points(-2.5), &[], &[]), Sentiment::Bearish);
    }
}
