// =============================================================================
// Shared types used across the carbon market analytics engine
// =============================================================================
//
// These are the plain-data inputs the engine consumes from its collaborators
// (market-data source, listing repository, transaction repository) and the
// qualitative labels it produces. Nothing here is mutated by the core.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One sampling period (typically a day) of aggregated market activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub timestamp: DateTime<Utc>,
    pub average_price: f64,
    #[serde(default)]
    pub volume: f64,
    /// Period-over-period change in percent.
    #[serde(default)]
    pub price_change: f64,
    #[serde(default)]
    pub region: String,
}

/// Extract the `average_price` column of a history.
pub fn closes(points: &[PricePoint]) -> Vec<f64> {
    points.iter().map(|p| p.average_price).collect()
}

/// Keep only the points belonging to `region`. `None` keeps everything.
pub fn filter_region(points: &[PricePoint], region: Option<&str>) -> Vec<PricePoint> {
    match region {
        Some(r) => points
            .iter()
            .filter(|p| p.region.eq_ignore_ascii_case(r))
            .cloned()
            .collect(),
        None => points.to_vec(),
    }
}

/// Lifecycle state of a marketplace listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ListingStatus {
    #[default]
    Active,
    Sold,
    Withdrawn,
}

/// Sell-side offer of carbon credits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    /// Price per credit.
    pub price: f64,
    /// Credits offered.
    pub quantity: f64,
    #[serde(default)]
    pub status: ListingStatus,
}

impl Listing {
    pub fn active(price: f64, quantity: f64) -> Self {
        Self {
            price,
            quantity,
            status: ListingStatus::Active,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == ListingStatus::Active
    }
}

/// Settlement state of a marketplace transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Pending,
    #[default]
    Completed,
    Cancelled,
}

/// A purchase of credits against a listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub quantity: f64,
    pub total_amount: f64,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub status: TransactionStatus,
}

impl Transaction {
    pub fn completed(quantity: f64, total_amount: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            quantity,
            total_amount,
            timestamp,
            status: TransactionStatus::Completed,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == TransactionStatus::Completed
    }
}

/// Qualitative market mood derived from momentum signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Bullish,
    Bearish,
    #[default]
    Neutral,
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bullish => write!(f, "bullish"),
            Self::Bearish => write!(f, "bearish"),
            Self::Neutral => write!(f, "neutral"),
        }
    }
}

/// Direction of the moving-average stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Up,
    Down,
    #[default]
    Sideways,
}

impl std::fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Up => write!(f, "up"),
            Self::Down => write!(f, "down"),
            Self::Sideways => write!(f, "sideways"),
        }
    }
}
