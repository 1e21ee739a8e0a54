//! Memoized summary cache
//!
//! Maps day keys to the last computed summary. The cache itself is a dumb
//! store; the read-path rule (bypass, and do not write, any day the live
//! running session overlaps) is a pure predicate checked by the caller
//! before every read, so correctness never depends on tick cadence.

use std::collections::HashMap;

use goaltimer_domain::{DailySummary, Session};

use super::aggregation::session_ms_for_day;

/// Day-keyed store of computed summaries with precise invalidation.
#[derive(Debug, Default)]
pub struct SummaryCache {
    entries: HashMap<String, DailySummary>,
}

impl SummaryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached summary for a day, if present.
    pub fn get(&self, day_key: &str) -> Option<&DailySummary> {
        self.entries.get(day_key)
    }

    /// Store a computed summary under its own day key.
    pub fn insert(&mut self, summary: DailySummary) {
        self.entries.insert(summary.date.clone(), summary);
    }

    /// Drop entries for every listed day.
    pub fn invalidate<I>(&mut self, day_keys: I)
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        for key in day_keys {
            self.entries.remove(key.as_ref());
        }
    }

    /// Drop everything. Used when a mutation (activity rename, delete)
    /// touches every summary.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// True when the open session has nonzero overlap with the day at `now_ms`.
///
/// Such days change every tick, so their summaries must be recomputed and
/// never cached.
pub fn live_session_overlaps(running: Option<&Session>, day_key: &str, now_ms: i64) -> bool {
    running.is_some_and(|session| session_ms_for_day(session, day_key, now_ms) > 0)
}

#[cfg(test)]
mod tests {
    use goaltimer_domain::days::day_bounds;

    use super::*;

    fn summary(date: &str) -> DailySummary {
        DailySummary {
            date: date.into(),
            total_goal_minutes: 0,
            total_worked_minutes: 0,
            is_complete: false,
            activities: Vec::new(),
        }
    }

    #[test]
    fn invalidate_removes_only_listed_days() {
        let mut cache = SummaryCache::new();
        cache.insert(summary("2024-01-01"));
        cache.insert(summary("2024-01-02"));
        cache.insert(summary("2024-01-03"));

        cache.invalidate(["2024-01-01", "2024-01-03"]);

        assert!(cache.get("2024-01-01").is_none());
        assert!(cache.get("2024-01-02").is_some());
        assert!(cache.get("2024-01-03").is_none());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn clear_empties_the_cache() {
        let mut cache = SummaryCache::new();
        cache.insert(summary("2024-01-01"));
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn live_overlap_predicate_matches_open_session_days() {
        let (day_start, _) = day_bounds("2024-01-01");
        let session = Session {
            id: "s".into(),
            activity_id: "a".into(),
            start_ts: day_start + 1_000,
            end_ts: None,
            date: "2024-01-01".into(),
        };
        let now = day_start + 60_000;

        assert!(live_session_overlaps(Some(&session), "2024-01-01", now));
        assert!(!live_session_overlaps(Some(&session), "2024-01-02", now));
        assert!(!live_session_overlaps(None, "2024-01-01", now));
    }
}
