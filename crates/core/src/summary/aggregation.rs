//! Daily aggregation engine
//!
//! Pure functions turning raw session intervals into day-bucketed
//! worked-minute totals. An open session contributes partial minutes by
//! substituting `now_ms` for its missing end timestamp.

use std::collections::{HashMap, HashSet};

use goaltimer_domain::days;
use goaltimer_domain::{
    Activity, DailyActivitySummary, DailyGoal, DailySummary, Note, Session,
};

/// Milliseconds of a session falling inside the given day.
///
/// Open sessions are clamped at `now_ms`; a session whose effective end is
/// at or before its start contributes nothing.
pub fn session_ms_for_day(session: &Session, day_key: &str, now_ms: i64) -> i64 {
    let end = session.end_ts.unwrap_or(now_ms);
    days::overlap_ms(session.start_ts, end, day_key)
}

/// Build the summary for one calendar day.
///
/// An activity appears in the output only when it has a goal for the day, a
/// note for the day, or nonzero worked time; untouched activities are
/// omitted to keep summaries small. `total_worked_minutes` floors the
/// *summed* overlap milliseconds; per-activity minutes floor individually,
/// so the two can differ by design. Completion requires at least one goal
/// and every goal met.
pub fn build_daily_summary(
    day_key: &str,
    activities: &[Activity],
    goals: &[DailyGoal],
    sessions: &[Session],
    notes: &[Note],
    now_ms: i64,
) -> DailySummary {
    let goals_for_date: Vec<&DailyGoal> = goals.iter().filter(|g| g.date == day_key).collect();
    let notes_for_date: Vec<&Note> = notes.iter().filter(|n| n.date == day_key).collect();

    let mut worked_by_activity: HashMap<&str, i64> = HashMap::new();
    for session in sessions {
        let worked_ms = session_ms_for_day(session, day_key, now_ms);
        if worked_ms <= 0 {
            continue;
        }
        *worked_by_activity.entry(session.activity_id.as_str()).or_insert(0) += worked_ms;
    }

    let goals_by_activity: HashMap<&str, &DailyGoal> =
        goals_for_date.iter().map(|g| (g.activity_id.as_str(), *g)).collect();
    let notes_by_activity: HashMap<&str, &Note> =
        notes_for_date.iter().map(|n| (n.activity_id.as_str(), *n)).collect();

    let mut relevant: HashSet<&str> = HashSet::new();
    relevant.extend(goals_for_date.iter().map(|g| g.activity_id.as_str()));
    relevant.extend(notes_for_date.iter().map(|n| n.activity_id.as_str()));
    relevant.extend(worked_by_activity.keys().copied());

    let mut entries: Vec<DailyActivitySummary> = activities
        .iter()
        .filter(|activity| relevant.contains(activity.id.as_str()))
        .map(|activity| {
            let worked_ms = worked_by_activity.get(activity.id.as_str()).copied().unwrap_or(0);
            DailyActivitySummary {
                activity_id: activity.id.clone(),
                activity_name: activity.name.clone(),
                color: activity.color.clone(),
                goal_minutes: goals_by_activity
                    .get(activity.id.as_str())
                    .map_or(0, |g| g.goal_minutes),
                worked_minutes: days::minutes_from_ms(worked_ms),
                note: notes_by_activity.get(activity.id.as_str()).map(|n| n.text.clone()),
            }
        })
        .collect();
    entries.sort_by(|a, b| a.activity_name.cmp(&b.activity_name));

    let total_goal_minutes =
        goals_for_date.iter().fold(0u32, |acc, g| acc.saturating_add(g.goal_minutes));
    let total_worked_ms: i64 = worked_by_activity.values().sum();
    let total_worked_minutes = days::minutes_from_ms(total_worked_ms);

    let has_goals = !goals_for_date.is_empty();
    let is_complete = has_goals
        && goals_for_date.iter().all(|goal| {
            let worked_ms =
                worked_by_activity.get(goal.activity_id.as_str()).copied().unwrap_or(0);
            days::minutes_from_ms(worked_ms) >= goal.goal_minutes
        });

    DailySummary {
        date: day_key.to_string(),
        total_goal_minutes,
        total_worked_minutes,
        is_complete,
        activities: entries,
    }
}
