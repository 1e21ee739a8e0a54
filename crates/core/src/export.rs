//! JSON backup export
//!
//! Produces a full-fidelity snapshot of every persisted entity. Import is
//! deliberately not implemented.

use chrono::{SecondsFormat, TimeZone, Utc};
use goaltimer_domain::{
    Activity, DailyGoal, ExportSnapshot, GoalTimerError, Note, Result, Session,
};

/// Assemble a snapshot of all entities stamped at `exported_at_ms`.
pub fn build_snapshot(
    activities: &[Activity],
    goals: &[DailyGoal],
    sessions: &[Session],
    notes: &[Note],
    exported_at_ms: i64,
) -> ExportSnapshot {
    ExportSnapshot {
        activities: activities.to_vec(),
        goals: goals.to_vec(),
        sessions: sessions.to_vec(),
        notes: notes.to_vec(),
        exported_at: rfc3339(exported_at_ms),
    }
}

/// Pretty-printed JSON rendering of a snapshot.
pub fn to_json(snapshot: &ExportSnapshot) -> Result<String> {
    serde_json::to_string_pretty(snapshot)
        .map_err(|err| GoalTimerError::Internal(format!("export serialization: {err}")))
}

fn rfc3339(ts_ms: i64) -> String {
    Utc.timestamp_millis_opt(ts_ms)
        .earliest()
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_default()
}
