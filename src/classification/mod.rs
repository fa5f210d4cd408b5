// =============================================================================
// Classification Module
// =============================================================================
//
// Qualitative labels derived from indicator output:
// - Sentiment (bullish / bearish / neutral) from RSI, MACD and latest change
// - Trend direction (up / down / sideways) from the price vs MA7 vs MA30 stack

pub mod sentiment;
pub mod trend;

pub use sentiment::classify_sentiment;
pub use trend::classify_trend;
