//! Temporal predicates over product snapshots.
//!
//! Pure and deterministic: every function takes the reference instant
//! explicitly. Absent dates make a predicate `false`, never an error.

use chrono::{DateTime, Duration, Utc};

use crate::product::Product;

/// Fixed day length; no calendar, timezone or leap-second adjustment.
pub const MILLIS_PER_DAY: i64 = 86_400_000;

/// Duration of `days` fixed-length days.
pub fn days_to_duration(days: u32) -> Duration {
    Duration::milliseconds(i64::from(days) * MILLIS_PER_DAY)
}

/// `true` iff both season bounds are set and `start < now < end` (both exclusive).
pub fn is_in_season(p: &Product, now: DateTime<Utc>) -> bool {
    match (p.season_start_date, p.season_end_date) {
        (Some(start), Some(end)) => start < now && now < end,
        _ => false,
    }
}

/// `true` iff restock arriving `lead_time` days from `now` lands after the
/// season end. The season start is not consulted.
pub fn will_delay_exceed_season(p: &Product, now: DateTime<Utc>) -> bool {
    let Some(end) = p.season_end_date else {
        return false;
    };

    match now.checked_add_signed(days_to_duration(p.lead_time)) {
        Some(arrival) => arrival > end,
        // Arrival beyond the representable range is certainly past the season.
        None => true,
    }
}

/// `true` iff an expiry date is set and `expiry <= now` (the instant itself counts).
pub fn is_expired(p: &Product, now: DateTime<Utc>) -> bool {
    match p.expiry_date {
        Some(expiry) => expiry <= now,
        None => false,
    }
}
