//! Streak and statistics result types

use serde::{Deserialize, Serialize};

use super::Activity;

/// Worked minutes on one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayMinutes {
    pub date: String,
    pub minutes: u32,
}

/// Cross-activity statistics for the whole system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallStats {
    /// Run of complete days ending at today
    pub current_streak: u32,
    /// Longest run of complete days anywhere in history
    pub best_streak: u32,
    /// Total worked minutes over the trailing 7 days, today inclusive
    pub last7_total: u32,
    /// Total worked minutes over the trailing 30 days, today inclusive
    pub last30_total: u32,
}

/// Worked-minute totals for one activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityTotals {
    pub last7: u32,
    pub last30: u32,
    pub all_time: u32,
}

/// Historical statistics for one activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityStats {
    pub activity: Activity,
    pub totals: ActivityTotals,
    /// Rounded mean of worked minutes over trailing-30 days with any work;
    /// 0 when no such days
    pub average_per_tracked_day: u32,
    /// Goal-met days divided by goal days; 0.0 when the activity has no
    /// goals (never NaN)
    pub completion_rate: f64,
    /// Day with the most worked minutes in the trailing 30; first occurrence
    /// wins ties
    pub best_day: Option<DayMinutes>,
    /// One entry per day of the trailing-30 window, oldest first
    pub daily_minutes: Vec<DayMinutes>,
}
