// =============================================================================
// Central Application State — Carbon Market Analytics service
// =============================================================================
//
// Ties the market store, the analytics aggregator and the order-book
// synthesizer together for the REST layer and the refresh loop.
//
// Thread safety:
//   - Atomic counter for lock-free version tracking.
//   - parking_lot locks for the few mutable pieces (RNG-backed synthesizer,
//     last computed summary, last observed market phase).
//   - The analytics core itself is stateless.
// =============================================================================

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, TimeZone};
use parking_lot::{Mutex, RwLock};
use rand::rngs::StdRng;
use tracing::info;

use crate::analytics::{AnalyticsAggregator, AnalyticsSnapshot, SummaryStats};
use crate::indicators::IndicatorSeries;
use crate::market_clock::MarketPhase;
use crate::market_data::{MarketDepth, OrderBookSynthesizer};
use crate::runtime_config::RuntimeConfig;
use crate::store::MarketStore;
use crate::types::filter_region;

/// Shared state handed to every request via `Arc<AppState>`.
pub struct AppState {
    /// Incremented on every store mutation and scheduled refresh.
    pub state_version: AtomicU64,

    pub runtime_config: RuntimeConfig,
    pub store: Arc<MarketStore>,
    pub aggregator: AnalyticsAggregator,
    pub order_book: Mutex<OrderBookSynthesizer<StdRng>>,

    /// Summary produced by the last scheduled refresh.
    pub last_summary: RwLock<Option<SummaryStats>>,
    last_phase: RwLock<Option<MarketPhase>>,

    pub start_time: std::time::Instant,
}

impl AppState {
    pub fn new(config: RuntimeConfig) -> Self {
        Self::with_store(config, Arc::new(MarketStore::new()))
    }

    pub fn with_store(config: RuntimeConfig, store: Arc<MarketStore>) -> Self {
        let aggregator = AnalyticsAggregator::from_config(&config);
        let order_book = OrderBookSynthesizer::from_settings(config.order_book.clone());

        Self {
            state_version: AtomicU64::new(1),
            runtime_config: config,
            store,
            aggregator,
            order_book: Mutex::new(order_book),
            last_summary: RwLock::new(None),
            last_phase: RwLock::new(None),
            start_time: std::time::Instant::now(),
        }
    }

    // ── Version Management ──────────────────────────────────────────────

    pub fn increment_version(&self) -> u64 {
        self.state_version.fetch_add(1, Ordering::SeqCst)
    }

    pub fn current_state_version(&self) -> u64 {
        self.state_version.load(Ordering::SeqCst)
    }

    // ── Views ───────────────────────────────────────────────────────────

    // Each view works from one store snapshot, so a concurrent feed write
    // is either fully visible or not at all.

    pub fn analytics(&self, region: Option<&str>) -> AnalyticsSnapshot {
        let snap = self.store.snapshot();
        let history = filter_region(&snap.price_history, region);
        self.aggregator
            .analytics(&history, &snap.listings, &snap.transactions)
    }

    pub fn summary<Tz: TimeZone>(&self, region: Option<&str>, now: &DateTime<Tz>) -> SummaryStats {
        let snap = self.store.snapshot();
        let history = filter_region(&snap.price_history, region);
        self.aggregator
            .summary_stats(&history, &snap.listings, &snap.transactions, now)
    }

    pub fn indicators(&self, region: Option<&str>) -> IndicatorSeries {
        let history = filter_region(&self.store.price_history(), region);
        self.aggregator.indicators(&history)
    }

    pub fn market_depth(&self) -> MarketDepth {
        let listings = self.store.listings();
        self.order_book.lock().synthesize(&listings)
    }

    // ── Scheduled refresh ───────────────────────────────────────────────

    /// Recompute the global summary, remember it, and log phase changes.
    pub fn refresh_summary<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> SummaryStats {
        let summary = self.summary(None, now);

        let previous = self.last_phase.write().replace(summary.market_status);
        if previous != Some(summary.market_status) {
            info!(
                from = ?previous,
                to = %summary.market_status,
                "market phase changed"
            );
        }

        *self.last_summary.write() = Some(summary.clone());
        self.increment_version();
        summary
    }
}
