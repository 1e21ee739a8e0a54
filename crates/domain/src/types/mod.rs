//! Domain data types
//!
//! Entity types persisted through the repository ports, plus the input and
//! update payloads used to create and modify them. Derived (never persisted)
//! types live in the submodules: [`summary`] for the daily aggregation
//! output, [`stats`] for streak/statistics results and [`tracking`] for the
//! tracking adapter and external command vocabulary.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod stats;
pub mod summary;
pub mod tracking;

pub use stats::{ActivityStats, ActivityTotals, DayMinutes, OverallStats};
pub use summary::{DailyActivitySummary, DailySummary};
pub use tracking::{TrackingAction, TrackingPayload};

/// A user-defined activity that time is tracked against.
///
/// Identity is immutable; name, color and the default daily goal are
/// mutable. Deleting an activity cascades to its goals, sessions and notes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: String,
    pub name: String,
    pub color: Option<String>,
    /// Creation time, unix milliseconds
    pub created_at: i64,
    /// When set (> 0), `ensure_daily_goals` seeds a goal for each new day
    pub default_goal_minutes: Option<u32>,
}

impl Activity {
    /// Mint a new activity with a fresh id. Names are stored trimmed.
    pub fn new(input: ActivityInput, now_ms: i64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: input.name.trim().to_string(),
            color: input.color,
            created_at: now_ms,
            default_goal_minutes: input.default_goal_minutes,
        }
    }

    /// Apply an update payload; `None` fields keep the current value.
    pub fn apply(&mut self, updates: ActivityUpdate) {
        if let Some(name) = updates.name {
            self.name = name.trim().to_string();
        }
        if let Some(color) = updates.color {
            self.color = Some(color);
        }
        if let Some(minutes) = updates.default_goal_minutes {
            self.default_goal_minutes = Some(minutes);
        }
    }
}

/// Payload for creating an activity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityInput {
    pub name: String,
    pub color: Option<String>,
    pub default_goal_minutes: Option<u32>,
}

/// Partial update for an activity; `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityUpdate {
    pub name: Option<String>,
    pub color: Option<String>,
    pub default_goal_minutes: Option<u32>,
}

/// A per-day minute goal for one activity.
///
/// Invariant: `goal_minutes > 0`; a goal of zero is represented by the
/// absence of the record, not by a zero row. Unique per `(date, activity)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyGoal {
    pub id: String,
    /// Day key, `YYYY-MM-DD` local calendar date
    pub date: String,
    pub activity_id: String,
    pub goal_minutes: u32,
}

/// A tracked work interval.
///
/// `end_ts == None` marks the currently running session; at most one session
/// across the whole system may be open at any time. A session may span
/// multiple calendar days; aggregation splits it by day boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub activity_id: String,
    /// Start time, unix milliseconds
    pub start_ts: i64,
    /// End time, unix milliseconds; absent while running
    pub end_ts: Option<i64>,
    /// Day key of the session's start
    pub date: String,
}

impl Session {
    /// True while the session has no recorded end.
    pub fn is_open(&self) -> bool {
        self.end_ts.is_none()
    }
}

/// A free-text note attached to one activity on one day.
///
/// Unique per `(date, activity)`; empty text deletes the record rather than
/// storing an empty string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    pub date: String,
    pub activity_id: String,
    pub text: String,
    /// Last-updated time, unix milliseconds
    pub updated_at: i64,
}

/// Full-fidelity backup snapshot of all persisted entities.
///
/// Used for backup/inspection only; partial import merge logic is out of
/// scope.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportSnapshot {
    pub activities: Vec<Activity>,
    pub goals: Vec<DailyGoal>,
    pub sessions: Vec<Session>,
    pub notes: Vec<Note>,
    /// RFC 3339 timestamp of the export
    pub exported_at: String,
}
