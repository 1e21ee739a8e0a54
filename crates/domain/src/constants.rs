//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application.

// Time conversion constants
pub const MS_PER_SECOND: i64 = 1_000;
pub const MS_PER_MINUTE: i64 = 60_000;
pub const MS_PER_HOUR: i64 = 3_600_000;

// Work reminder fires one hour into a session
pub const WORK_REMINDER_AFTER_MS: i64 = MS_PER_HOUR;

// Tick cadence: fine-grained while a session or break is live, coarse
// otherwise. A resource policy, not a correctness requirement.
pub const ACTIVE_TICK_INTERVAL_MS: u64 = 1_000;
pub const IDLE_TICK_INTERVAL_MS: u64 = 60_000;

// Statistics windows (trailing, inclusive of today)
pub const STATS_WINDOW_SHORT_DAYS: i64 = 7;
pub const STATS_WINDOW_LONG_DAYS: i64 = 30;
