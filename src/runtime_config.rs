// =============================================================================
// Runtime Configuration — analytics settings with serde defaults
// =============================================================================
//
// Central configuration hub for the analytics engine. Every tunable lives
// here: indicator look-backs, order-book synthesis parameters, and the
// service shell's bind address / seed file.
//
// All fields carry `#[serde(default)]` so that a partial JSON file loads and
// missing keys fall back to the values the engine ships with.
//
// =============================================================================

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_rsi_period() -> usize {
    14
}

fn default_bollinger_period() -> usize {
    20
}

fn default_bollinger_std_dev() -> f64 {
    2.0
}

fn default_macd_fast() -> usize {
    12
}

fn default_macd_slow() -> usize {
    26
}

fn default_macd_signal() -> usize {
    9
}

fn default_volatility_period() -> usize {
    20
}

fn default_bucket_size() -> f64 {
    1000.0
}

fn default_bid_levels() -> usize {
    10
}

fn default_price() -> f64 {
    75_000.0
}

fn default_first_bid_discount() -> f64 {
    0.02
}

fn default_bid_step() -> f64 {
    0.01
}

fn default_bid_quantity_min() -> f64 {
    10.0
}

fn default_bid_quantity_max() -> f64 {
    60.0
}

fn default_bid_orders_min() -> u32 {
    1
}

fn default_bid_orders_max() -> u32 {
    5
}

fn default_bind_addr() -> String {
    "0.0.0.0:3001".to_string()
}

// =============================================================================
// Validation errors
// =============================================================================

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be at least 1")]
    ZeroPeriod { name: &'static str },

    #[error("MACD fast period ({fast}) must be shorter than slow period ({slow})")]
    MacdPeriods { fast: usize, slow: usize },

    #[error("Bollinger std-dev multiplier must be non-negative, got {0}")]
    NegativeStdDev(f64),

    #[error("order book bucket size must be positive, got {0}")]
    BucketSize(f64),

    #[error("invalid range for {name}: {min} >= {max}")]
    InvertedRange {
        name: &'static str,
        min: f64,
        max: f64,
    },

    #[error("{name} must be positive, got {value}")]
    NonPositive { name: &'static str, value: f64 },
}

// =============================================================================
// IndicatorSettings
// =============================================================================

/// Look-back windows for the oscillators and bands. The 7/30/90 moving
/// averages are fixed by the series layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSettings {
    #[serde(default = "default_rsi_period")]
    pub rsi_period: usize,

    #[serde(default = "default_bollinger_period")]
    pub bollinger_period: usize,

    /// Band half-width in standard deviations.
    #[serde(default = "default_bollinger_std_dev")]
    pub bollinger_std_dev: f64,

    #[serde(default = "default_macd_fast")]
    pub macd_fast: usize,

    #[serde(default = "default_macd_slow")]
    pub macd_slow: usize,

    #[serde(default = "default_macd_signal")]
    pub macd_signal: usize,

    #[serde(default = "default_volatility_period")]
    pub volatility_period: usize,
}

impl Default for IndicatorSettings {
    fn default() -> Self {
        Self {
            rsi_period: default_rsi_period(),
            bollinger_period: default_bollinger_period(),
            bollinger_std_dev: default_bollinger_std_dev(),
            macd_fast: default_macd_fast(),
            macd_slow: default_macd_slow(),
            macd_signal: default_macd_signal(),
            volatility_period: default_volatility_period(),
        }
    }
}

impl IndicatorSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("rsi_period", self.rsi_period),
            ("bollinger_period", self.bollinger_period),
            ("macd_fast", self.macd_fast),
            ("macd_slow", self.macd_slow),
            ("macd_signal", self.macd_signal),
            ("volatility_period", self.volatility_period),
        ] {
            if value == 0 {
                return Err(ConfigError::ZeroPeriod { name });
            }
        }
        if self.macd_fast >= self.macd_slow {
            return Err(ConfigError::MacdPeriods {
                fast: self.macd_fast,
                slow: self.macd_slow,
            });
        }
        if self.bollinger_std_dev < 0.0 {
            return Err(ConfigError::NegativeStdDev(self.bollinger_std_dev));
        }
        Ok(())
    }
}

// =============================================================================
// OrderBookSettings
// =============================================================================

/// Shape of the synthesised depth view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderBookSettings {
    /// Asks are grouped into price buckets of this width.
    #[serde(default = "default_bucket_size")]
    pub bucket_size: f64,

    /// Number of synthetic bid rungs.
    #[serde(default = "default_bid_levels")]
    pub bid_levels: usize,

    /// Reference price when there are no asks.
    #[serde(default = "default_price")]
    pub fallback_price: f64,

    /// Discount of the top bid below the reference price (fraction).
    #[serde(default = "default_first_bid_discount")]
    pub first_bid_discount: f64,

    /// Additional discount per rung (fraction).
    #[serde(default = "default_bid_step")]
    pub bid_step: f64,

    #[serde(default = "default_bid_quantity_min")]
    pub bid_quantity_min: f64,

    #[serde(default = "default_bid_quantity_max")]
    pub bid_quantity_max: f64,

    #[serde(default = "default_bid_orders_min")]
    pub bid_orders_min: u32,

    #[serde(default = "default_bid_orders_max")]
    pub bid_orders_max: u32,

    /// Fixed RNG seed for reproducible bids. `None` seeds from OS entropy.
    #[serde(default)]
    pub rng_seed: Option<u64>,
}

impl Default for OrderBookSettings {
    fn default() -> Self {
        Self {
            bucket_size: default_bucket_size(),
            bid_levels: default_bid_levels(),
            fallback_price: default_price(),
            first_bid_discount: default_first_bid_discount(),
            bid_step: default_bid_step(),
            bid_quantity_min: default_bid_quantity_min(),
            bid_quantity_max: default_bid_quantity_max(),
            bid_orders_min: default_bid_orders_min(),
            bid_orders_max: default_bid_orders_max(),
            rng_seed: None,
        }
    }
}

impl OrderBookSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.bucket_size > 0.0) {
            return Err(ConfigError::BucketSize(self.bucket_size));
        }
        if !(self.fallback_price > 0.0) {
            return Err(ConfigError::NonPositive {
                name: "fallback_price",
                value: self.fallback_price,
            });
        }
        if self.bid_quantity_min >= self.bid_quantity_max {
            return Err(ConfigError::InvertedRange {
                name: "bid_quantity",
                min: self.bid_quantity_min,
                max: self.bid_quantity_max,
            });
        }
        if self.bid_orders_min > self.bid_orders_max {
            return Err(ConfigError::InvertedRange {
                name: "bid_orders",
                min: self.bid_orders_min as f64,
                max: self.bid_orders_max as f64,
            });
        }
        Ok(())
    }
}

// =============================================================================
// RuntimeConfig
// =============================================================================

/// Top-level configuration for the analytics service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    #[serde(default)]
    pub indicators: IndicatorSettings,

    #[serde(default)]
    pub order_book: OrderBookSettings,

    /// Price reported when there is no history at all.
    #[serde(default = "default_price")]
    pub default_price: f64,

    /// REST listen address.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Optional JSON file with price points, listings and transactions to
    /// preload into the in-memory store.
    #[serde(default)]
    pub seed_file: Option<PathBuf>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            indicators: IndicatorSettings::default(),
            order_book: OrderBookSettings::default(),
            default_price: default_price(),
            bind_addr: default_bind_addr(),
            seed_file: None,
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// If the file does not exist, returns an error so the caller can fall
    /// back to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read runtime config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse runtime config from {}", path.display()))?;

        config
            .validate()
            .with_context(|| format!("invalid runtime config in {}", path.display()))?;

        info!(
            path = %path.display(),
            bind_addr = %config.bind_addr,
            "runtime config loaded"
        );

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.indicators.validate()?;
        self.order_book.validate()?;
        if !(self.default_price > 0.0) {
            return Err(ConfigError::NonPositive {
                name: "default_price",
                value: self.default_price,
            });
        }
        Ok(())
    }
}
