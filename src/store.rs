// =============================================================================
// Market Store — in-memory feed of price history, listings and transactions
// =============================================================================
//
// Stands in for the external market-data source and the listing /
// transaction repositories. Readers get cloned snapshots so the analytics
// core only ever sees immutable slices.

use std::path::Path;

use anyhow::{Context, Result};
use parking_lot::RwLock;
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::types::{Listing, PricePoint, Transaction};

#[derive(Debug, Error, PartialEq)]
pub enum StoreError {
    #[error("price point {index} is older than the latest stored point")]
    NonChronological { index: usize },

    #[error("{field} at index {index} must be a finite, non-negative number")]
    InvalidNumber { field: &'static str, index: usize },
}

/// Preload file layout. Every section is optional.
#[derive(Debug, Default, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub price_points: Vec<PricePoint>,
    #[serde(default)]
    pub listings: Vec<Listing>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

/// Point-in-time copy of every feed, taken under one set of read locks.
#[derive(Debug, Clone, Default)]
pub struct MarketSnapshot {
    pub price_history: Vec<PricePoint>,
    pub listings: Vec<Listing>,
    pub transactions: Vec<Transaction>,
}

pub struct MarketStore {
    price_history: RwLock<Vec<PricePoint>>,
    listings: RwLock<Vec<Listing>>,
    transactions: RwLock<Vec<Transaction>>,
}

impl MarketStore {
    pub fn new() -> Self {
        Self {
            price_history: RwLock::new(Vec::new()),
            listings: RwLock::new(Vec::new()),
            transactions: RwLock::new(Vec::new()),
        }
    }

    /// Load a seed file and populate the store from it.
    pub fn load_seed(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read seed file {}", path.display()))?;
        let seed: SeedData = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse seed file {}", path.display()))?;

        // Check every section before touching the store so a bad file
        // leaves it exactly as it was.
        {
            let history = self.price_history.read();
            validate_price_points(history.last(), &seed.price_points)
                .with_context(|| format!("invalid price points in {}", path.display()))?;
        }
        validate_listings(&seed.listings)
            .with_context(|| format!("invalid listings in {}", path.display()))?;
        validate_transactions(&seed.transactions)
            .with_context(|| format!("invalid transactions in {}", path.display()))?;

        let points = seed.price_points.len();
        self.append_price_points(seed.price_points)
            .with_context(|| format!("invalid price points in {}", path.display()))?;
        *self.listings.write() = seed.listings;
        self.transactions.write().extend(seed.transactions);

        info!(path = %path.display(), points, "market seed loaded");
        Ok(())
    }

    // ── Readers ─────────────────────────────────────────────────────────

    pub fn price_history(&self) -> Vec<PricePoint> {
        self.price_history.read().clone()
    }

    pub fn listings(&self) -> Vec<Listing> {
        self.listings.read().clone()
    }

    pub fn transactions(&self) -> Vec<Transaction> {
        self.transactions.read().clone()
    }

    /// All three feeds as one consistent view. Writers hold at most one of
    /// these locks at a time, so no write can land between the reads.
    pub fn snapshot(&self) -> MarketSnapshot {
        let history = self.price_history.read();
        let listings = self.listings.read();
        let transactions = self.transactions.read();
        MarketSnapshot {
            price_history: history.clone(),
            listings: listings.clone(),
            transactions: transactions.clone(),
        }
    }

    // ── Writers ─────────────────────────────────────────────────────────

    /// Append points, which must continue the existing chronology.
    /// Returns the new history length. Nothing is stored on error.
    pub fn append_price_points(&self, points: Vec<PricePoint>) -> Result<usize, StoreError> {
        let mut history = self.price_history.write();
        validate_price_points(history.last(), &points)?;
        history.extend(points);
        Ok(history.len())
    }

    /// Swap in a new listing snapshot.
    pub fn replace_listings(&self, listings: Vec<Listing>) -> Result<usize, StoreError> {
        validate_listings(&listings)?;
        let count = listings.len();
        *self.listings.write() = listings;
        Ok(count)
    }

    pub fn append_transactions(&self, transactions: Vec<Transaction>) -> Result<usize, StoreError> {
        validate_transactions(&transactions)?;
        let mut stored = self.transactions.write();
        stored.extend(transactions);
        Ok(stored.len())
    }
}

impl Default for MarketStore {
    fn default() -> Self {
        Self::new()
    }
}

/// `points` must be valid numbers and continue the chronology after `last`.
fn validate_price_points(
    last: Option<&PricePoint>,
    points: &[PricePoint],
) -> Result<(), StoreError> {
    let mut last = last.map(|p| p.timestamp);
    for (index, p) in points.iter().enumerate() {
        check_number("average_price", p.average_price, index)?;
        check_number("volume", p.volume, index)?;
        if !p.price_change.is_finite() {
            return Err(StoreError::InvalidNumber {
                field: "price_change",
                index,
            });
        }
        if last.is_some_and(|t| p.timestamp < t) {
            return Err(StoreError::NonChronological { index });
        }
        last = Some(p.timestamp);
    }
    Ok(())
}

fn validate_listings(listings: &[Listing]) -> Result<(), StoreError> {
    for (index, l) in listings.iter().enumerate() {
        check_number("price", l.price, index)?;
        check_number("quantity", l.quantity, index)?;
    }
    Ok(())
}

fn validate_transactions(transactions: &[Transaction]) -> Result<(), StoreError> {
    for (index, t) in transactions.iter().enumerate() {
        check_number("quantity", t.quantity, index)?;
        check_number("total_amount", t.total_amount, index)?;
    }
    Ok(())
}

fn check_number(field: &'static str, value: f64, index: usize) -> Result<(), StoreError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(StoreError::InvalidNumber { field, index })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn point(day: i64, price: f64) -> PricePoint {
        PricePoint {
            timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::days(day),
            average_price: price,
            volume: 1.0,
            price_change: 0.0,
            region: "global".into(),
        }
    }

    #[test]
    fn append_keeps_chronology() {
        let store = MarketStore::new();
        assert_eq!(store.append_price_points(vec![point(0, 1.0), point(1, 2.0)]), Ok(2));
        assert_eq!(
            store.append_price_points(vec![point(2, 3.0), point(0, 4.0)]),
            Err(StoreError::NonChronological { index: 1 })
        );
        // Rejected batch leaves the history untouched.
        assert_eq!(store.price_history().len(), 2);
    }

    #[test]
    fn negative_price_is_rejected() {
        let store = MarketStore::new();
        let err = store.append_price_points(vec![point(0, -5.0)]).unwrap_err();
        assert_eq!(err, StoreError::InvalidNumber { field: "average_price", index: 0 });
    }

    #[test]
    fn replace_listings_swaps_snapshot() {
        let store = MarketStore::new();
        store.replace_listings(vec![Listing::active(1.0, 1.0)]).unwrap();
        store
            .replace_listings(vec![Listing::active(2.0, 1.0), Listing::active(3.0, 1.0)])
            .unwrap();
        let prices: Vec<f64> = store.listings().iter().map(|l| l.price).collect();
        assert_eq!(prices, vec![2.0, 3.0]);
    }

    #[test]
    fn nan_quantity_is_rejected() {
        let store = MarketStore::new();
        let tx = Transaction::completed(f64::NAN, 1.0, Utc::now());
        assert!(store.append_transactions(vec![tx]).is_err());
        assert!(store.transactions().is_empty());
    }

    #[test]
    fn load_seed_populates_store() {
        let path = std::env::temp_dir().join(format!("market_seed_{}.json", std::process::id()));
        let json = r#"{
            "price_points": [
                { "timestamp": "2024-01-01T00:00:00Z", "average_price": 74000.0, "volume": 12.0 },
                { "timestamp": "2024-01-02T00:00:00Z", "average_price": 75000.0, "volume": 9.0 }
            ],
            "listings": [ { "price": 75400.0, "quantity": 10.0 } ]
        }"#;
        std::fs::write(&path, json).unwrap();

        let store = MarketStore::new();
        store.load_seed(&path).unwrap();
        assert_eq!(store.price_history().len(), 2);
        assert_eq!(store.listings().len(), 1);
        assert!(store.transactions().is_empty());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn snapshot_copies_every_feed() {
        let store = MarketStore::new();
        store.append_price_points(vec![point(0, 1.0)]).unwrap();
        store.replace_listings(vec![Listing::active(2.0, 3.0)]).unwrap();
        store
            .append_transactions(vec![Transaction::completed(1.0, 2.0, Utc::now())])
            .unwrap();

        let snap = store.snapshot();
        store.replace_listings(Vec::new()).unwrap();
        assert_eq!(snap.price_history.len(), 1);
        assert_eq!(snap.listings, vec![Listing::active(2.0, 3.0)]);
        assert_eq!(snap.transactions.len(), 1);
    }

    #[test]
    fn rejected_seed_leaves_store_untouched() {
        let path = std::env::temp_dir().join(format!("bad_seed_{}.json", std::process::id()));
        let json = r#"{
            "price_points": [
                { "timestamp": "2024-01-01T00:00:00Z", "average_price": 74000.0 }
            ],
            "listings": [ { "price": -1.0, "quantity": 10.0 } ],
            "transactions": [
                { "quantity": 1.0, "total_amount": 75000.0, "timestamp": "2024-01-01T00:00:00Z" }
            ]
        }"#;
        std::fs::write(&path, json).unwrap();

        let store = MarketStore::new();
        assert!(store.load_seed(&path).is_err());
        assert!(store.price_history().is_empty());
        assert!(store.listings().is_empty());
        assert!(store.transactions().is_empty());
        let _ = std::fs::remove_file(&path);
    }
}
