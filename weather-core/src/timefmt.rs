//! Local-time labels for a place, derived from UTC plus the place's offset.
//!
//! The host timezone is never consulted: every displayed timestamp goes
//! through these helpers so a city in another zone shows its own clock.

use chrono::{DateTime, Duration, Utc};

const SECS_PER_DAY: i64 = 86_400;

/// 12-hour label without minutes, e.g. "1PM" or "12AM".
pub fn format_time_for_location(unix_secs: i64, tz_offset_secs: i32) -> String {
    let shifted = unix_secs.saturating_add(i64::from(tz_offset_secs));
    let hour = shifted.rem_euclid(SECS_PER_DAY) / 3600;
    let suffix = if hour >= 12 { "PM" } else { "AM" };
    let display_hour = (hour + 11) % 12 + 1;
    format!("{display_hour}{suffix}")
}

/// Date label such as "Sunday, 5 Jan 2025" for `instant` at the given offset.
pub fn format_date_for_location(instant: DateTime<Utc>, tz_offset_secs: i32) -> String {
    let shifted = instant
        .checked_add_signed(Duration::seconds(i64::from(tz_offset_secs)))
        .unwrap_or(instant);
    shifted.format("%A, %-d %b %Y").to_string()
}

/// Today's date label at the given offset.
pub fn format_today_for_location(tz_offset_secs: i32) -> String {
    format_date_for_location(Utc::now(), tz_offset_secs)
}
