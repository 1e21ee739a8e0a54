//! Derived daily summary types
//!
//! Produced by the aggregation engine, memoized by the summary cache, never
//! persisted.

use serde::{Deserialize, Serialize};

/// Per-activity slice of a day's summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyActivitySummary {
    pub activity_id: String,
    pub activity_name: String,
    pub color: Option<String>,
    /// Goal for the day; 0 when no goal is set
    pub goal_minutes: u32,
    /// Whole minutes worked on this activity within the day
    pub worked_minutes: u32,
    pub note: Option<String>,
}

/// Aggregated view of a single calendar day.
///
/// `is_complete` is true only when the day has at least one goal and every
/// goal's worked minutes reached its target. `total_worked_minutes` floors
/// the summed overlap milliseconds, so it can legitimately differ from the
/// sum of the per-activity minutes by a few minutes on busy days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySummary {
    pub date: String,
    pub total_goal_minutes: u32,
    pub total_worked_minutes: u32,
    pub is_complete: bool,
    /// Entries sorted by activity name for stable display
    pub activities: Vec<DailyActivitySummary>,
}
