// =============================================================================
// Market Status Clock
// =============================================================================
//
// Maps a wall-clock instant (in whatever time zone the caller supplies) to a
// trading-session phase, and computes the next 15-minute refresh boundary.
//
//   Sat / Sun        => closed
//   [08:00, 09:00)   => pre_market
//   [09:00, 17:00)   => open
//   [17:00, 18:00)   => after_hours
//   otherwise        => closed

use chrono::{DateTime, Datelike, Duration, TimeZone, Timelike, Utc, Weekday};
use serde::{Deserialize, Serialize};

/// Minutes between scheduled analytics refreshes.
pub const REFRESH_INTERVAL_MINUTES: i64 = 15;

/// Trading-session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketPhase {
    Open,
    Closed,
    PreMarket,
    AfterHours,
}

impl std::fmt::Display for MarketPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Closed => write!(f, "closed"),
            Self::PreMarket => write!(f, "pre_market"),
            Self::AfterHours => write!(f, "after_hours"),
        }
    }
}

/// Session phase at `time`, judged on its local weekday and hour.
pub fn market_phase<Tz: TimeZone>(time: &DateTime<Tz>) -> MarketPhase {
    if matches!(time.weekday(), Weekday::Sat | Weekday::Sun) {
        return MarketPhase::Closed;
    }

    match time.hour() {
        9..=16 => MarketPhase::Open,
        8 => MarketPhase::PreMarket,
        17 => MarketPhase::AfterHours,
        _ => MarketPhase::Closed,
    }
}

/// Round the minute of `time` up to a multiple of 15 and zero the seconds.
///
/// Minute 60 rolls into the next hour. The rounding works on the minute
/// field alone, so 10:15:30 maps to 10:15:00.
pub fn next_update<Tz: TimeZone>(time: &DateTime<Tz>) -> DateTime<Tz> {
    let minute = i64::from(time.minute());
    let top_of_hour = time.clone()
        - Duration::minutes(minute)
        - Duration::seconds(i64::from(time.second()))
        - Duration::nanoseconds(i64::from(time.nanosecond()));

    let slot = (minute + REFRESH_INTERVAL_MINUTES - 1) / REFRESH_INTERVAL_MINUTES
        * REFRESH_INTERVAL_MINUTES;
    top_of_hour + Duration::minutes(slot)
}

/// Serialisable pairing of the current phase and the next refresh.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketStatus {
    pub phase: MarketPhase,
    pub next_update: DateTime<Utc>,
}

impl MarketStatus {
    pub fn at<Tz: TimeZone>(time: &DateTime<Tz>) -> Self {
        Self {
            phase: market_phase(time),
            next_update: next_update(time).with_timezone(&Utc),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    // 2024-03-05 is a Tuesday, 2024-03-02 a Saturday.
    fn utc(day: u32, h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, day, h, m, s).unwrap()
    }

    #[test]
    fn weekend_is_closed() {
        assert_eq!(market_phase(&utc(2, 10, 0, 0)), MarketPhase::Closed);
        assert_eq!(market_phase(&utc(3, 12, 0, 0)), MarketPhase::Closed);
    }

    #[test]
    fn weekday_phases() {
        assert_eq!(market_phase(&utc(5, 10, 0, 0)), MarketPhase::Open);
        assert_eq!(market_phase(&utc(5, 8, 30, 0)), MarketPhase::PreMarket);
        assert_eq!(market_phase(&utc(5, 17, 15, 0)), MarketPhase::AfterHours);
        assert_eq!(market_phase(&utc(5, 7, 59, 59)), MarketPhase::Closed);
        assert_eq!(market_phase(&utc(5, 18, 0, 0)), MarketPhase::Closed);
    }

    #[test]
    fn session_boundaries_are_half_open() {
        assert_eq!(market_phase(&utc(5, 9, 0, 0)), MarketPhase::Open);
        assert_eq!(market_phase(&utc(5, 16, 59, 59)), MarketPhase::Open);
        assert_eq!(market_phase(&utc(5, 17, 0, 0)), MarketPhase::AfterHours);
    }

    #[test]
    fn phase_uses_local_clock_of_the_offset() {
        // 07:30 UTC is 09:30 at +02:00.
        let tz = FixedOffset::east_opt(2 * 3600).unwrap();
        let t = utc(5, 7, 30, 0).with_timezone(&tz);
        assert_eq!(market_phase(&t), MarketPhase::Open);
    }

    #[test]
    fn next_update_rounds_up_to_quarter_hour() {
        let t = utc(5, 10, 7, 42) + Duration::milliseconds(123);
        assert_eq!(next_update(&t), utc(5, 10, 15, 0));
    }

    #[test]
    fn next_update_rolls_into_next_hour() {
        assert_eq!(next_update(&utc(5, 10, 46, 5)), utc(5, 11, 0, 0));
        assert_eq!(next_update(&utc(5, 23, 50, 0)), utc(6, 0, 0, 0));
    }

    #[test]
    fn next_update_on_boundary_keeps_minute() {
        assert_eq!(next_update(&utc(5, 10, 0, 0)), utc(5, 10, 0, 0));
        assert_eq!(next_update(&utc(5, 10, 15, 30)), utc(5, 10, 15, 0));
    }

    #[test]
    fn status_serialises_snake_case() {
        let status = MarketStatus::at(&utc(5, 8, 30, 0));
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["phase"], "pre_market");
        assert_eq!(status.next_update, utc(5, 8, 30, 0));
    }
}
