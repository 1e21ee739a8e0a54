//! Streak and per-activity statistics
//!
//! Built on top of the aggregation engine: callers pass a summary provider
//! (usually the coordinator's cached read path) so every day is computed at
//! most once per query.

use std::collections::HashSet;

use goaltimer_domain::constants::{STATS_WINDOW_LONG_DAYS, STATS_WINDOW_SHORT_DAYS};
use goaltimer_domain::days;
use goaltimer_domain::{
    Activity, ActivityStats, ActivityTotals, DailyGoal, DailySummary, DayMinutes, OverallStats,
    Session,
};

/// Cross-activity streaks and rolling totals.
///
/// A day counts toward a streak only when it has at least one goal and is
/// complete. `best_streak` is the longest counting run anywhere in history;
/// `current_streak` walks backward from today until a non-counting day.
pub fn overall_stats<F>(goals: &[DailyGoal], today: &str, mut summary_for: F) -> OverallStats
where
    F: FnMut(&str) -> DailySummary,
{
    let last7_total = window_total(today, STATS_WINDOW_SHORT_DAYS, &mut summary_for);
    let last30_total = window_total(today, STATS_WINDOW_LONG_DAYS, &mut summary_for);

    let mut goal_dates: Vec<&str> = goals.iter().map(|g| g.date.as_str()).collect();
    goal_dates.sort_unstable();
    goal_dates.dedup();
    let Some(&earliest) = goal_dates.first() else {
        return OverallStats { current_streak: 0, best_streak: 0, last7_total, last30_total };
    };

    let goal_days: HashSet<&str> = goal_dates.iter().copied().collect();
    let all_dates = days::keys_in_range(earliest, today);

    let mut counting = Vec::with_capacity(all_dates.len());
    let mut best_streak = 0u32;
    let mut rolling = 0u32;
    for date in &all_dates {
        let counts = goal_days.contains(date.as_str()) && summary_for(date).is_complete;
        counting.push(counts);
        if counts {
            rolling += 1;
            best_streak = best_streak.max(rolling);
        } else {
            rolling = 0;
        }
    }

    let current_streak =
        u32::try_from(counting.iter().rev().take_while(|counts| **counts).count())
            .unwrap_or(u32::MAX);

    OverallStats { current_streak, best_streak, last7_total, last30_total }
}

/// Historical statistics for one activity.
///
/// The caller resolves the activity (an unknown id is a `NotFound` contract
/// error before this function is reached).
pub fn activity_stats<F>(
    activity: &Activity,
    goals: &[DailyGoal],
    sessions: &[Session],
    today: &str,
    mut summary_for: F,
) -> ActivityStats
where
    F: FnMut(&str) -> DailySummary,
{
    let mut minutes_for_date = |date: &str| -> u32 {
        summary_for(date)
            .activities
            .iter()
            .find(|entry| entry.activity_id == activity.id)
            .map_or(0, |entry| entry.worked_minutes)
    };

    let last7_dates = window_dates(today, STATS_WINDOW_SHORT_DAYS);
    let last30_dates = window_dates(today, STATS_WINDOW_LONG_DAYS);
    let last7 = sum_minutes(&last7_dates, &mut minutes_for_date);
    let last30 = sum_minutes(&last30_dates, &mut minutes_for_date);

    // All-time starts at the earliest day the activity has a goal or session
    let mut first_dates: Vec<&str> = goals
        .iter()
        .filter(|g| g.activity_id == activity.id)
        .map(|g| g.date.as_str())
        .chain(
            sessions
                .iter()
                .filter(|s| s.activity_id == activity.id)
                .map(|s| s.date.as_str()),
        )
        .collect();
    first_dates.sort_unstable();
    let earliest = first_dates.first().copied().unwrap_or(today);
    let all_time = sum_minutes(&days::keys_in_range(earliest, today), &mut minutes_for_date);

    let daily_minutes: Vec<DayMinutes> = last30_dates
        .iter()
        .map(|date| DayMinutes { date: date.clone(), minutes: minutes_for_date(date) })
        .collect();

    let tracked: Vec<u32> =
        daily_minutes.iter().map(|entry| entry.minutes).filter(|m| *m > 0).collect();
    let average_per_tracked_day = if tracked.is_empty() {
        0
    } else {
        let total: u32 = tracked.iter().fold(0u32, |acc, m| acc.saturating_add(*m));
        let count = u32::try_from(tracked.len()).unwrap_or(u32::MAX);
        // Round-half-up integer mean, matching the displayed value
        (total + count / 2) / count
    };

    let mut goal_days = 0u32;
    let mut met_days = 0u32;
    for goal in goals.iter().filter(|g| g.activity_id == activity.id) {
        goal_days += 1;
        if minutes_for_date(&goal.date) >= goal.goal_minutes {
            met_days += 1;
        }
    }
    let completion_rate =
        if goal_days == 0 { 0.0 } else { f64::from(met_days) / f64::from(goal_days) };

    let mut best_day: Option<DayMinutes> = None;
    for entry in &daily_minutes {
        let is_better = best_day.as_ref().map_or(true, |best| entry.minutes > best.minutes);
        if is_better {
            best_day = Some(entry.clone());
        }
    }

    ActivityStats {
        activity: activity.clone(),
        totals: ActivityTotals { last7, last30, all_time },
        average_per_tracked_day,
        completion_rate,
        best_day,
        daily_minutes,
    }
}

fn window_dates(today: &str, window_days: i64) -> Vec<String> {
    let start = days::add_days(today, -(window_days - 1));
    days::keys_in_range(&start, today)
}

fn window_total<F>(today: &str, window_days: i64, summary_for: &mut F) -> u32
where
    F: FnMut(&str) -> DailySummary,
{
    window_dates(today, window_days)
        .iter()
        .fold(0u32, |acc, date| acc.saturating_add(summary_for(date).total_worked_minutes))
}

fn sum_minutes<F>(dates: &[String], minutes_for_date: &mut F) -> u32
where
    F: FnMut(&str) -> u32,
{
    dates.iter().fold(0u32, |acc, date| acc.saturating_add(minutes_for_date(date)))
}
