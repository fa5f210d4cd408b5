// =============================================================================
// Refresh Loop — recompute the summary on every 15-minute boundary
// =============================================================================

use std::sync::Arc;

use chrono::{DateTime, Duration, Local, TimeZone};
use tracing::{debug, info};

use crate::app_state::AppState;
use crate::market_clock::{next_update, REFRESH_INTERVAL_MINUTES};

/// A boundary closer than this is treated as already reached. Covers a
/// sleep that wakes a few milliseconds early.
pub const MIN_REFRESH_LEAD_MS: i64 = 1_000;

/// How long to sleep from `now` until the next refresh boundary.
///
/// When `now` already sits on (or, within the minute, past) its rounded
/// boundary, or less than [`MIN_REFRESH_LEAD_MS`] before it, the following
/// slot is used.
pub fn delay_until_next_refresh<Tz: TimeZone>(now: &DateTime<Tz>) -> std::time::Duration {
    let mut next = next_update(now);
    if next.clone() - now.clone() < Duration::milliseconds(MIN_REFRESH_LEAD_MS) {
        next = next + Duration::minutes(REFRESH_INTERVAL_MINUTES);
    }
    (next - now.clone())
        .to_std()
        .unwrap_or(std::time::Duration::from_secs(1))
}

/// Runs forever; spawn it on the tokio runtime.
pub async fn run_refresh_loop(state: Arc<AppState>) {
    info!("refresh loop starting");
    state.refresh_summary(&Local::now());

    loop {
        let delay = delay_until_next_refresh(&Local::now());
        debug!(delay_secs = delay.as_secs(), "sleeping until next refresh");
        tokio::time::sleep(delay).await;

        let summary = state.refresh_summary(&Local::now());
        debug!(
            phase = %summary.market_status,
            price = summary.current_price,
            transactions_24h = summary.transactions_24h,
            "scheduled refresh complete"
        );
    }
}
