//! Daily aggregation engine and memoized summary cache

pub mod aggregation;
pub mod cache;

pub use aggregation::{build_daily_summary, session_ms_for_day};
pub use cache::{live_session_overlaps, SummaryCache};
