pub mod orderbook;

// Re-export the depth types for convenient access (e.g. `use crate::market_data::MarketDepth`).
pub use orderbook::{aggregate_asks, bucket_price, DepthLevel, MarketDepth, OrderBookSynthesizer};
