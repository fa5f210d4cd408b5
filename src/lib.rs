// =============================================================================
// Carbon Market Analytics — library root
// =============================================================================
//
// Technical-indicator engine, sentiment / trend classification, order-book
// synthesis and market-session clock for the carbon-credit marketplace,
// plus the in-memory store and REST shell that serve them.

pub mod analytics;
pub mod api;
pub mod app_state;
pub mod classification;
pub mod indicators;
pub mod market_clock;
pub mod market_data;
pub mod refresh;
pub mod runtime_config;
pub mod store;
pub mod types;
