// =============================================================================
// Analytics Aggregator
// =============================================================================
//
// Combines the indicator and classification engines with listing and
// transaction aggregates supplied by the caller into two read-only views:
//
//   - AnalyticsSnapshot: price / volume deltas, supply, sentiment, trend,
//     volatility.
//   - SummaryStats: a compact dashboard header that also carries the market
//     phase and the next scheduled refresh.
//
// Nothing is cached. Every call recomputes from the slices it is given.
//
// The "24h" figures compare the last two sampling periods, and the 24h
// high / low are taken from the latest point only.
// =============================================================================

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::Serialize;
use tracing::debug;

use crate::classification::{classify_sentiment, classify_trend};
use crate::indicators::{macd, rsi, sma, volatility, IndicatorSeries};
use crate::market_clock::{market_phase, next_update, MarketPhase};
use crate::runtime_config::{IndicatorSettings, RuntimeConfig};
use crate::types::{closes, Listing, PricePoint, Sentiment, Transaction, TrendDirection};

// =============================================================================
// Snapshot types
// =============================================================================

/// Scalar market summary derived from the full price history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsSnapshot {
    pub current_price: f64,
    pub price_change_24h: f64,
    pub price_change_percent_24h: f64,
    pub volume_24h: f64,
    pub volume_change_percent_24h: f64,
    pub high_24h: f64,
    pub low_24h: f64,
    pub market_cap: f64,
    pub total_credits_available: f64,
    pub active_listings: usize,
    pub average_transaction_size: f64,
    pub market_sentiment: Sentiment,
    pub trend_direction: TrendDirection,
    /// Annualised volatility, percent.
    pub volatility_index: f64,
}

impl AnalyticsSnapshot {
    /// Snapshot reported when there is no price history at all.
    pub fn empty(default_price: f64) -> Self {
        Self {
            current_price: default_price,
            price_change_24h: 0.0,
            price_change_percent_24h: 0.0,
            volume_24h: 0.0,
            volume_change_percent_24h: 0.0,
            high_24h: default_price,
            low_24h: default_price,
            market_cap: 0.0,
            total_credits_available: 0.0,
            active_listings: 0,
            average_transaction_size: 0.0,
            market_sentiment: Sentiment::Neutral,
            trend_direction: TrendDirection::Sideways,
            volatility_index: 0.0,
        }
    }
}

/// Dashboard header: headline numbers plus session state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStats {
    pub current_price: f64,
    pub price_change_percent_24h: f64,
    pub volume_24h: f64,
    pub active_listings: usize,
    pub total_credits_available: f64,
    /// Completed transactions in the trailing 24 hours.
    pub transactions_24h: usize,
    pub credits_traded_24h: f64,
    pub value_traded_24h: f64,
    pub market_status: MarketPhase,
    pub next_update: DateTime<Utc>,
}

// =============================================================================
// AnalyticsAggregator
// =============================================================================

pub struct AnalyticsAggregator {
    settings: IndicatorSettings,
    default_price: f64,
}

impl AnalyticsAggregator {
    pub fn new(settings: IndicatorSettings, default_price: f64) -> Self {
        Self {
            settings,
            default_price,
        }
    }

    pub fn from_config(config: &RuntimeConfig) -> Self {
        Self::new(config.indicators.clone(), config.default_price)
    }

    pub fn settings(&self) -> &IndicatorSettings {
        &self.settings
    }

    /// Every chart overlay for `history`.
    pub fn indicators(&self, history: &[PricePoint]) -> IndicatorSeries {
        IndicatorSeries::compute(history, &self.settings)
    }

    /// Build the analytics snapshot.
    ///
    /// Only active listings and completed transactions are counted.
    pub fn analytics(
        &self,
        history: &[PricePoint],
        listings: &[Listing],
        transactions: &[Transaction],
    ) -> AnalyticsSnapshot {
        let Some(latest) = history.last() else {
            debug!("empty price history, reporting default snapshot");
            return AnalyticsSnapshot::empty(self.default_price);
        };
        let previous = if history.len() >= 2 {
            &history[history.len() - 2]
        } else {
            latest
        };

        // ── 24h deltas ──────────────────────────────────────────────────
        let current_price = latest.average_price;
        let price_change_24h = current_price - previous.average_price;
        let price_change_percent_24h = percent_of(price_change_24h, previous.average_price);
        let volume_24h = latest.volume;
        let volume_change_percent_24h = percent_of(volume_24h - previous.volume, previous.volume);

        // ── Supply ──────────────────────────────────────────────────────
        let (active_listings, total_credits_available) = listings
            .iter()
            .filter(|l| l.is_active())
            .fold((0usize, 0.0), |(n, qty), l| (n + 1, qty + l.quantity));
        let market_cap = total_credits_available * current_price;

        // ── Transactions ────────────────────────────────────────────────
        let (completed, traded) = transactions
            .iter()
            .filter(|t| t.is_completed())
            .fold((0usize, 0.0), |(n, qty), t| (n + 1, qty + t.quantity));
        let average_transaction_size = if completed > 0 {
            traded / completed as f64
        } else {
            0.0
        };

        // ── Indicators & classification ─────────────────────────────────
        let prices = closes(history);
        let ma7 = sma(&prices, 7);
        let ma30 = sma(&prices, 30);
        let rsi_series = rsi(&prices, self.settings.rsi_period);
        let macd_series = macd(
            &prices,
            self.settings.macd_fast,
            self.settings.macd_slow,
            self.settings.macd_signal,
        );

        let market_sentiment = classify_sentiment(history, &rsi_series, &macd_series.macd);
        let trend_direction = classify_trend(history, &ma7, &ma30);
        let volatility_index = volatility(&prices, self.settings.volatility_period);

        debug!(
            points = history.len(),
            current_price,
            active_listings,
            sentiment = %market_sentiment,
            trend = %trend_direction,
            volatility = format!("{:.2}", volatility_index),
            "analytics snapshot computed"
        );

        AnalyticsSnapshot {
            current_price,
            price_change_24h,
            price_change_percent_24h,
            volume_24h,
            volume_change_percent_24h,
            high_24h: current_price,
            low_24h: current_price,
            market_cap,
            total_credits_available,
            active_listings,
            average_transaction_size,
            market_sentiment,
            trend_direction,
            volatility_index,
        }
    }

    /// Build the dashboard header as of `now`.
    pub fn summary_stats<Tz: TimeZone>(
        &self,
        history: &[PricePoint],
        listings: &[Listing],
        transactions: &[Transaction],
        now: &DateTime<Tz>,
    ) -> SummaryStats {
        let snapshot = self.analytics(history, listings, transactions);

        let now_utc = now.with_timezone(&Utc);
        let since = now_utc - Duration::hours(24);
        let (transactions_24h, credits_traded_24h, value_traded_24h) = transactions
            .iter()
            .filter(|t| t.is_completed() && t.timestamp >= since && t.timestamp <= now_utc)
            .fold((0usize, 0.0, 0.0), |(n, qty, value), t| {
                (n + 1, qty + t.quantity, value + t.total_amount)
            });

        SummaryStats {
            current_price: snapshot.current_price,
            price_change_percent_24h: snapshot.price_change_percent_24h,
            volume_24h: snapshot.volume_24h,
            active_listings: snapshot.active_listings,
            total_credits_available: snapshot.total_credits_available,
            transactions_24h,
            credits_traded_24h,
            value_traded_24h,
            market_status: market_phase(now),
            next_update: next_update(now).with_timezone(&Utc),
        }
    }
}

impl Default for AnalyticsAggregator {
    fn default() -> Self {
        Self::from_config(&RuntimeConfig::default())
    }
}

/// `delta / base * 100`, or 0 when the base is zero.
fn percent_of(delta: f64, base: f64) -> f64 {
    if base == 0.0 {
        0.0
    } else {
        delta / base * 100.0
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ListingStatus, TransactionStatus};

    fn ts(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, day, hour, 0, 0).unwrap()
    }

    fn point(price: f64, volume: f64, change: f64) -> PricePoint {
        PricePoint {
            timestamp: ts(1, 0),
            average_price: price,
            volume,
            price_change: change,
            region: "global".into(),
        }
    }

    fn rising(n: usize) -> Vec<PricePoint> {
        (0..n)
            .map(|i| PricePoint {
                timestamp: ts(1, 0) + Duration::days(i as i64),
                ..point(70_000.0 + i as f64 * 50.0, 100.0, 0.0)
            })
            .collect()
    }

    #[test]
    fn empty_history_returns_default_snapshot() {
        let snap = AnalyticsAggregator::default().analytics(&[], &[], &[]);
        assert_eq!(snap, AnalyticsSnapshot::empty(75_000.0));
        assert_eq!(snap.current_price, 75_000.0);
        assert_eq!(snap.price_change_24h, 0.0);
        assert_eq!(snap.volume_24h, 0.0);
        assert_eq!(snap.market_sentiment, Sentiment::Neutral);
        assert_eq!(snap.trend_direction, TrendDirection::Sideways);
    }

    #[test]
    fn empty_history_ignores_listings() {
        let listings = [Listing::active(70_000.0, 5.0)];
        let snap = AnalyticsAggregator::default().analytics(&[], &listings, &[]);
        assert_eq!(snap.active_listings, 0);
        assert_eq!(snap.market_cap, 0.0);
    }

    #[test]
    fn deltas_compare_last_two_points() {
        let history = [
            point(70_000.0, 10.0, 0.0),
            point(100.0, 40.0, 0.0),
            point(110.0, 50.0, 0.0),
        ];
        let snap = AnalyticsAggregator::default().analytics(&history, &[], &[]);
        assert_eq!(snap.current_price, 110.0);
        assert!((snap.price_change_24h - 10.0).abs() < 1e-12);
        assert!((snap.price_change_percent_24h - 10.0).abs() < 1e-12);
        assert_eq!(snap.volume_24h, 50.0);
        assert!((snap.volume_change_percent_24h - 25.0).abs() < 1e-12);
        // High/low come from the latest point only.
        assert_eq!(snap.high_24h, 110.0);
        assert_eq!(snap.low_24h, 110.0);
    }

    #[test]
    fn zero_previous_volume_reports_no_change() {
        let history = [point(100.0, 0.0, 0.0), point(101.0, 20.0, 0.0)];
        let snap = AnalyticsAggregator::default().analytics(&history, &[], &[]);
        assert_eq!(snap.volume_change_percent_24h, 0.0);
    }

    #[test]
    fn single_point_has_zero_deltas() {
        let snap = AnalyticsAggregator::default().analytics(&[point(80_000.0, 5.0, 3.0)], &[], &[]);
        assert_eq!(snap.price_change_24h, 0.0);
        assert_eq!(snap.price_change_percent_24h, 0.0);
        assert_eq!(snap.volume_change_percent_24h, 0.0);
        assert_eq!(snap.market_sentiment, Sentiment::Neutral);
    }

    #[test]
    fn supply_and_market_cap_use_active_listings() {
        let mut withdrawn = Listing::active(60_000.0, 100.0);
        withdrawn.status = ListingStatus::Withdrawn;
        let listings = [Listing::active(75_000.0, 10.0), Listing::active(76_000.0, 5.0), withdrawn];
        let history = [point(80_000.0, 1.0, 0.0)];
        let snap = AnalyticsAggregator::default().analytics(&history, &listings, &[]);
        assert_eq!(snap.active_listings, 2);
        assert_eq!(snap.total_credits_available, 15.0);
        assert_eq!(snap.market_cap, 15.0 * 80_000.0);
    }

    #[test]
    fn average_transaction_size_over_completed() {
        let mut pending = Transaction::completed(100.0, 1.0, ts(1, 0));
        pending.status = TransactionStatus::Pending;
        let txs = [
            Transaction::completed(2.0, 150_000.0, ts(1, 0)),
            Transaction::completed(4.0, 300_000.0, ts(1, 1)),
            pending,
        ];
        let history = [point(75_000.0, 1.0, 0.0)];
        let snap = AnalyticsAggregator::default().analytics(&history, &[], &txs);
        assert_eq!(snap.average_transaction_size, 3.0);
    }

    #[test]
    fn classification_delegates_to_engines() {
        let history = rising(40);
        let agg = AnalyticsAggregator::default();
        let snap = agg.analytics(&history, &[], &[]);

        let prices = closes(&history);
        let expected_sentiment = classify_sentiment(
            &history,
            &rsi(&prices, 14),
            &macd(&prices, 12, 26, 9).macd,
        );
        assert_eq!(snap.market_sentiment, expected_sentiment);
        assert_eq!(snap.trend_direction, TrendDirection::Up);
        assert_eq!(snap.volatility_index, volatility(&prices, 20));
        assert!(snap.volatility_index > 0.0);
    }

    #[test]
    fn summary_counts_trailing_day_only() {
        let now = ts(5, 10);
        let mut cancelled = Transaction::completed(9.0, 9.0, ts(5, 9));
        cancelled.status = TransactionStatus::Cancelled;
        let txs = [
            Transaction::completed(1.0, 75_000.0, ts(5, 9)),
            Transaction::completed(2.0, 150_000.0, ts(4, 11)),
            Transaction::completed(8.0, 600_000.0, ts(4, 9)),
            cancelled,
        ];
        let stats = AnalyticsAggregator::default().summary_stats(
            &[point(75_000.0, 3.0, 0.0)],
            &[Listing::active(75_000.0, 4.0)],
            &txs,
            &now,
        );
        assert_eq!(stats.transactions_24h, 2);
        assert_eq!(stats.credits_traded_24h, 3.0);
        assert_eq!(stats.value_traded_24h, 225_000.0);
        assert_eq!(stats.active_listings, 1);
        // 2024-03-05 is a Tuesday.
        assert_eq!(stats.market_status, MarketPhase::Open);
        assert_eq!(stats.next_update, ts(5, 10));
    }

    #[test]
    fn summary_on_empty_market() {
        let stats = AnalyticsAggregator::default().summary_stats(&[], &[], &[], &ts(2, 12));
        assert_eq!(stats.current_price, 75_000.0);
        assert_eq!(stats.transactions_24h, 0);
        assert_eq!(stats.market_status, MarketPhase::Closed);
    }

    #[test]
    fn indicators_use_configured_settings() {
        let settings = IndicatorSettings {
            rsi_period: 2,
            ..IndicatorSettings::default()
        };
        let agg = AnalyticsAggregator::new(settings, 75_000.0);
        let series = agg.indicators(&rising(5));
        assert!(series.rsi[1].is_none());
        assert_eq!(series.rsi[2], Some(100.0));
    }
}
