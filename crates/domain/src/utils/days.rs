//! Pure calendar/day-key utilities
//!
//! Day keys are canonical `YYYY-MM-DD` strings naming a local calendar date.
//! Every function here is total: invalid numeric or textual input clamps to
//! a sensible bound instead of erroring. Day bounds are half-open
//! `[start, end)` with the upper bound at local midnight of the *next*
//! calendar date, so days shortened or stretched by DST transitions
//! aggregate correctly.

use chrono::{DateTime, Duration, Local, LocalResult, NaiveDate, NaiveTime, TimeZone};

use crate::constants::MS_PER_MINUTE;

const DAY_KEY_FORMAT: &str = "%Y-%m-%d";

/// Day key for a unix-millisecond timestamp, local calendar date.
pub fn day_key(ts_ms: i64) -> String {
    local_datetime(ts_ms).format(DAY_KEY_FORMAT).to_string()
}

/// Half-open `[start, end)` bounds of a day in unix milliseconds.
pub fn day_bounds(day_key: &str) -> (i64, i64) {
    let date = parse_day_key(day_key);
    let next = date.succ_opt().unwrap_or(date);
    (day_start_ms(date), day_start_ms(next))
}

/// Milliseconds of `[start_ms, end_ms)` falling inside the given day.
///
/// Returns 0 when the interval is empty (`end_ms <= start_ms`) or disjoint
/// from the day.
pub fn overlap_ms(start_ms: i64, end_ms: i64, day_key: &str) -> i64 {
    if end_ms <= start_ms {
        return 0;
    }
    let (day_start, day_end) = day_bounds(day_key);
    let clamped_start = start_ms.max(day_start);
    let clamped_end = end_ms.min(day_end);
    (clamped_end - clamped_start).max(0)
}

/// Ordered day keys covering `[start_ms, end_ms]`, inclusive of both
/// endpoints' days. Empty when the interval is reversed.
pub fn days_between(start_ms: i64, end_ms: i64) -> Vec<String> {
    walk_dates(local_datetime(start_ms).date_naive(), local_datetime(end_ms).date_naive())
}

/// Ordered day keys from `start_key` through `end_key` inclusive.
pub fn keys_in_range(start_key: &str, end_key: &str) -> Vec<String> {
    walk_dates(parse_day_key(start_key), parse_day_key(end_key))
}

/// Day key `offset` calendar days away from `day_key` (negative walks back).
pub fn add_days(day_key: &str, offset: i64) -> String {
    let date = parse_day_key(day_key);
    let shifted = date.checked_add_signed(Duration::days(offset)).unwrap_or(date);
    shifted.format(DAY_KEY_FORMAT).to_string()
}

/// Whole minutes in a millisecond duration, floored, never negative.
pub fn minutes_from_ms(ms: i64) -> u32 {
    u32::try_from(ms.max(0) / MS_PER_MINUTE).unwrap_or(u32::MAX)
}

/// `HH:MM` local wall-clock rendering of a timestamp.
pub fn format_clock_time(ts_ms: i64) -> String {
    local_datetime(ts_ms).format("%H:%M").to_string()
}

fn local_datetime(ts_ms: i64) -> DateTime<Local> {
    match Local.timestamp_millis_opt(ts_ms) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _) => earliest,
        // Out-of-range timestamps clamp to the epoch
        LocalResult::None => DateTime::<Local>::from(std::time::UNIX_EPOCH),
    }
}

fn parse_day_key(key: &str) -> NaiveDate {
    // Malformed keys clamp to the epoch date
    NaiveDate::parse_from_str(key, DAY_KEY_FORMAT).unwrap_or_default()
}

fn day_start_ms(date: NaiveDate) -> i64 {
    let midnight = date.and_time(NaiveTime::MIN);
    match Local.from_local_datetime(&midnight) {
        LocalResult::Single(dt) => dt.timestamp_millis(),
        LocalResult::Ambiguous(earliest, _) => earliest.timestamp_millis(),
        // DST gap at midnight: the day starts at the earliest valid local
        // time after the jump
        LocalResult::None => Local
            .from_local_datetime(&(midnight + Duration::hours(1)))
            .earliest()
            .map_or_else(|| midnight.and_utc().timestamp_millis(), |dt| dt.timestamp_millis()),
    }
}

fn walk_dates(first: NaiveDate, last: NaiveDate) -> Vec<String> {
    let mut keys = Vec::new();
    let mut current = first;
    while current <= last {
        keys.push(current.format(DAY_KEY_FORMAT).to_string());
        match current.succ_opt() {
            Some(next) => current = next,
            None => break,
        }
    }
    keys
}
