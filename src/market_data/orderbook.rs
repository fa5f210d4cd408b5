// =============================================================================
// Order Book Synthesizer — depth-of-market view for the credit marketplace
// =============================================================================
//
// Asks are real: active listings bucketed to the nearest `bucket_size`
// (round half up) and aggregated per bucket.
//
// Bids are synthetic. There is no buy-side order flow, so a ladder of
// `bid_levels` rungs is laid out below the reference price:
//
//   price_i = round(reference * (1 - first_bid_discount - i * bid_step))
//
// with quantity and order count drawn from an injected RNG. Seeding that RNG
// makes the whole book reproducible.
//
// Both sides are sorted by price, descending. The reference price and the
// "best" price of each side are the first entry of that side.

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::debug;

use crate::runtime_config::OrderBookSettings;
use crate::types::Listing;

/// One aggregated price bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepthLevel {
    pub price: i64,
    pub quantity: f64,
    pub order_count: u32,
}

/// Full depth view for both sides of the book.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketDepth {
    pub bids: Vec<DepthLevel>,
    pub asks: Vec<DepthLevel>,
    pub spread: f64,
    pub spread_percent: f64,
    pub total_bid_volume: f64,
    pub total_ask_volume: f64,
}

/// Builds [`MarketDepth`] snapshots from listings plus a synthetic bid side.
pub struct OrderBookSynthesizer<R: Rng> {
    settings: OrderBookSettings,
    rng: R,
}

impl OrderBookSynthesizer<StdRng> {
    /// Seeded from `settings.rng_seed` when present, OS entropy otherwise.
    pub fn from_settings(settings: OrderBookSettings) -> Self {
        let rng = match settings.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::new(settings, rng)
    }
}

impl<R: Rng> OrderBookSynthesizer<R> {
    /// # Panics
    /// `synthesize` panics if the bid quantity or order-count ranges are
    /// empty; [`OrderBookSettings::validate`] rules that out.
    pub fn new(settings: OrderBookSettings, rng: R) -> Self {
        Self { settings, rng }
    }

    pub fn settings(&self) -> &OrderBookSettings {
        &self.settings
    }

    /// Build a depth snapshot from the current listings.
    pub fn synthesize(&mut self, listings: &[Listing]) -> MarketDepth {
        let asks = aggregate_asks(listings, self.settings.bucket_size);
        let reference = asks
            .first()
            .map(|l| l.price as f64)
            .unwrap_or(self.settings.fallback_price);
        let bids = self.synthetic_bids(reference);

        let discount = self.settings.first_bid_discount;
        let best_bid = bids
            .first()
            .map(|l| l.price as f64)
            .unwrap_or(reference * (1.0 - discount));
        let best_ask = asks
            .first()
            .map(|l| l.price as f64)
            .unwrap_or(reference * (1.0 + discount));

        let spread = best_ask - best_bid;
        let spread_percent = if best_bid > 0.0 {
            spread / best_bid * 100.0
        } else {
            0.0
        };

        let total_bid_volume = bids.iter().map(|l| l.quantity).sum();
        let total_ask_volume = asks.iter().map(|l| l.quantity).sum();

        debug!(
            ask_levels = asks.len(),
            bid_levels = bids.len(),
            reference,
            spread,
            "order book synthesised"
        );

        MarketDepth {
            bids,
            asks,
            spread,
            spread_percent,
            total_bid_volume,
            total_ask_volume,
        }
    }

    fn synthetic_bids(&mut self, reference: f64) -> Vec<DepthLevel> {
        let s = &self.settings;
        let mut bids = Vec::with_capacity(s.bid_levels);

        for i in 0..s.bid_levels {
            let discount = s.first_bid_discount + i as f64 * s.bid_step;
            let price = round_half_up(reference * (1.0 - discount));
            if price <= 0.0 {
                break;
            }
            let quantity = self.rng.random_range(s.bid_quantity_min..s.bid_quantity_max);
            let order_count = self.rng.random_range(s.bid_orders_min..=s.bid_orders_max);
            bids.push(DepthLevel {
                price: price as i64,
                quantity,
                order_count,
            });
        }

        bids.sort_by(|a, b| b.price.cmp(&a.price));
        bids
    }
}

/// Bucket active listings by price and aggregate each bucket, highest first.
pub fn aggregate_asks(listings: &[Listing], bucket_size: f64) -> Vec<DepthLevel> {
    let mut buckets: BTreeMap<i64, (f64, u32)> = BTreeMap::new();

    for listing in listings.iter().filter(|l| l.is_active()) {
        let bucket = bucket_price(listing.price, bucket_size);
        let entry = buckets.entry(bucket).or_insert((0.0, 0));
        entry.0 += listing.quantity;
        entry.1 += 1;
    }

    buckets
        .into_iter()
        .rev()
        .map(|(price, (quantity, order_count))| DepthLevel {
            price,
            quantity,
            order_count,
        })
        .collect()
}

/// Nearest multiple of `bucket_size`, halves rounded up.
pub fn bucket_price(price: f64, bucket_size: f64) -> i64 {
    (round_half_up(price / bucket_size) * bucket_size) as i64
}

fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}
