//! Session lifecycle coordinator - core business logic
//!
//! The single authoritative owner of "what is running now". All lifecycle
//! operations serialize through one async mutex: a logical operation
//! completes fully (durable writes first, then in-memory state, then
//! best-effort collaborators) before the next begins, so a crash
//! mid-operation leaves durable and in-memory state consistent with "not
//! yet applied" rather than partially applied.

use std::collections::HashSet;
use std::sync::Arc;

use goaltimer_domain::constants::MS_PER_MINUTE;
use goaltimer_domain::days;
use goaltimer_domain::{
    Activity, ActivityInput, ActivityStats, ActivityUpdate, DailyGoal, DailySummary,
    GoalTimerError, Note, OverallStats, Result, Session, TrackingAction, TrackingPayload,
};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::export;
use crate::stats;
use crate::summary::aggregation::build_daily_summary;
use crate::summary::cache::{live_session_overlaps, SummaryCache};
use crate::sync::SyncService;

use super::ports::{
    ActivityRepository, Clock, GoalRepository, HapticsPort, NotificationScheduler,
    NoteRepository, SessionRepository, TrackingAdapter,
};
use super::reminders::ReminderScheduler;

/// Collaborators injected into the coordinator at construction.
///
/// The coordinator is built exactly once at process start and handed to
/// callers by reference. There is no ambient global instance.
pub struct CoordinatorDeps {
    pub activities: Arc<dyn ActivityRepository>,
    pub goals: Arc<dyn GoalRepository>,
    pub sessions: Arc<dyn SessionRepository>,
    pub notes: Arc<dyn NoteRepository>,
    pub notifier: Arc<dyn NotificationScheduler>,
    pub adapter: Arc<dyn TrackingAdapter>,
    pub haptics: Arc<dyn HapticsPort>,
    pub sync: Arc<dyn SyncService>,
    pub clock: Arc<dyn Clock>,
}

/// Everything guarded by the coordinator's serialization mutex.
struct EngineState {
    ready: bool,
    activities: Vec<Activity>,
    goals: Vec<DailyGoal>,
    sessions: Vec<Session>,
    notes: Vec<Note>,
    running: Option<Session>,
    break_ends_at: Option<i64>,
    now_ms: i64,
    cache: SummaryCache,
    reminders: ReminderScheduler,
    pending_action: Option<TrackingAction>,
}

enum SuspendMode {
    Pause,
    Stop,
}

/// Authoritative session lifecycle state machine.
pub struct TrackingCoordinator {
    activities: Arc<dyn ActivityRepository>,
    goals: Arc<dyn GoalRepository>,
    sessions: Arc<dyn SessionRepository>,
    notes: Arc<dyn NoteRepository>,
    adapter: Arc<dyn TrackingAdapter>,
    haptics: Arc<dyn HapticsPort>,
    sync: Arc<dyn SyncService>,
    clock: Arc<dyn Clock>,
    state: Mutex<EngineState>,
}

impl TrackingCoordinator {
    /// Create a coordinator from its collaborators. Call [`load`] before
    /// anything else.
    ///
    /// [`load`]: Self::load
    pub fn new(deps: CoordinatorDeps) -> Self {
        let now_ms = deps.clock.now_ms();
        let state = EngineState {
            ready: false,
            activities: Vec::new(),
            goals: Vec::new(),
            sessions: Vec::new(),
            notes: Vec::new(),
            running: None,
            break_ends_at: None,
            now_ms,
            cache: SummaryCache::new(),
            reminders: ReminderScheduler::new(deps.notifier),
            pending_action: None,
        };
        Self {
            activities: deps.activities,
            goals: deps.goals,
            sessions: deps.sessions,
            notes: deps.notes,
            adapter: deps.adapter,
            haptics: deps.haptics,
            sync: deps.sync,
            clock: deps.clock,
            state: Mutex::new(state),
        }
    }

    /// Load durable state and bring the engine online.
    ///
    /// Rediscovers a still-open session as the running session, seeds
    /// today's default goals, reconciles the tracking adapter, and drains a
    /// buffered external action.
    pub async fn load(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        if let Err(err) = self.adapter.init().await {
            warn!(error = %err, "tracking adapter init failed");
        }
        state.activities = self.activities.list().await?;
        state.goals = self.goals.list().await?;
        state.sessions = self.sessions.list().await?;
        state.notes = self.notes.list().await?;
        let now_ms = self.clock.now_ms();
        state.now_ms = now_ms;
        let today = days::day_key(now_ms);
        self.ensure_daily_goals_locked(&mut state, &today).await?;
        state.running = self.sessions.get_running_session().await?;
        state.ready = true;
        if let Err(err) = self.sync.sync().await {
            warn!(error = %err, "sync failed");
        }
        self.reconcile_adapter(&state).await;
        if let Some(running) = state.running.clone() {
            // Recovered session: re-arm the reminder relative to its start,
            // so a process restart near the hour mark still reminds soon
            state.reminders.schedule_work_reminder(&running, now_ms).await;
        }
        if let Some(action) = state.pending_action.take() {
            debug!(?action, "applying buffered external action");
            self.apply_external_action(&mut state, action).await?;
        }
        info!(
            activities = state.activities.len(),
            sessions = state.sessions.len(),
            running = state.running.is_some(),
            "engine loaded"
        );
        Ok(())
    }

    /// Whether [`load`] has completed.
    ///
    /// [`load`]: Self::load
    pub async fn is_ready(&self) -> bool {
        self.state.lock().await.ready
    }

    /// The currently open session, if any.
    pub async fn running_session(&self) -> Option<Session> {
        self.state.lock().await.running.clone()
    }

    /// End of the active break, unix milliseconds.
    pub async fn break_ends_at(&self) -> Option<i64> {
        self.state.lock().await.break_ends_at
    }

    /// True while a session is running or a break is active; drives the
    /// fine-grained tick cadence.
    pub async fn is_engaged(&self) -> bool {
        let state = self.state.lock().await;
        state.running.is_some() || state.break_ends_at.is_some()
    }

    /// All known activities, creation order.
    pub async fn activities(&self) -> Vec<Activity> {
        self.state.lock().await.activities.clone()
    }

    /// All known sessions, including the open one.
    pub async fn sessions(&self) -> Vec<Session> {
        self.state.lock().await.sessions.clone()
    }

    /* ---------------------------------------------------------------- */
    /* Entity operations */
    /* ---------------------------------------------------------------- */

    /// Create an activity.
    pub async fn create_activity(&self, input: ActivityInput) -> Result<Activity> {
        let mut state = self.state.lock().await;
        let activity = self.activities.create(input).await?;
        state.activities.push(activity.clone());
        state.cache.clear();
        Ok(activity)
    }

    /// Update an activity's name, color or default goal.
    pub async fn update_activity(&self, id: &str, updates: ActivityUpdate) -> Result<Activity> {
        let mut state = self.state.lock().await;
        let updated = self.activities.update(id, updates).await?;
        if let Some(existing) = state.activities.iter_mut().find(|a| a.id == id) {
            *existing = updated.clone();
        }
        state.cache.clear();
        Ok(updated)
    }

    /// Delete an activity; goals, sessions and notes cascade. Stops
    /// tracking when the deleted activity was the one running.
    pub async fn delete_activity(&self, id: &str) -> Result<()> {
        let mut state = self.state.lock().await;
        if !state.activities.iter().any(|a| a.id == id) {
            return Err(GoalTimerError::NotFound(format!("activity {id}")));
        }
        self.activities.delete(id).await?;
        state.activities.retain(|a| a.id != id);
        state.goals.retain(|g| g.activity_id != id);
        state.sessions.retain(|s| s.activity_id != id);
        state.notes.retain(|n| n.activity_id != id);
        if state.running.as_ref().is_some_and(|s| s.activity_id == id) {
            state.running = None;
            state.reminders.cancel_work_reminder().await;
            if let Err(err) = self.adapter.stop_tracking().await {
                warn!(error = %err, "tracking adapter stop failed");
            }
        }
        state.cache.clear();
        Ok(())
    }

    /// Set (or, with 0 minutes, remove) the goal for `(date, activity)`.
    pub async fn set_goal(&self, activity_id: &str, date: &str, goal_minutes: u32) -> Result<()> {
        let mut state = self.state.lock().await;
        if goal_minutes == 0 {
            // A zero goal is represented as absence, not a zero record
            self.goals.delete_goal(activity_id, date).await?;
            state.goals.retain(|g| !(g.activity_id == activity_id && g.date == date));
            state.cache.invalidate([date]);
            return Ok(());
        }
        let goal = self.goals.set_goal(activity_id, date, goal_minutes).await?;
        match state
            .goals
            .iter_mut()
            .find(|g| g.activity_id == activity_id && g.date == date)
        {
            Some(existing) => *existing = goal,
            None => state.goals.push(goal),
        }
        state.cache.invalidate([date]);
        Ok(())
    }

    /// Remove the goal for `(date, activity)`.
    pub async fn delete_goal(&self, activity_id: &str, date: &str) -> Result<()> {
        let mut state = self.state.lock().await;
        self.goals.delete_goal(activity_id, date).await?;
        state.goals.retain(|g| !(g.activity_id == activity_id && g.date == date));
        state.cache.invalidate([date]);
        Ok(())
    }

    /// Seed goals from activity defaults for a day that has none yet.
    pub async fn ensure_daily_goals(&self, date: &str) -> Result<()> {
        let mut state = self.state.lock().await;
        self.ensure_daily_goals_locked(&mut state, date).await
    }

    /// Upsert the note for `(date, activity)`. Empty text deletes.
    pub async fn upsert_note(&self, activity_id: &str, date: &str, text: &str) -> Result<()> {
        let mut state = self.state.lock().await;
        if text.trim().is_empty() {
            self.notes.delete_note(activity_id, date).await?;
            state.notes.retain(|n| !(n.activity_id == activity_id && n.date == date));
            state.cache.invalidate([date]);
            return Ok(());
        }
        let updated_at = self.clock.now_ms();
        let note = self.notes.upsert_note(activity_id, date, text, updated_at).await?;
        match state
            .notes
            .iter_mut()
            .find(|n| n.activity_id == activity_id && n.date == date)
        {
            Some(existing) => *existing = note,
            None => state.notes.push(note),
        }
        state.cache.invalidate([date]);
        Ok(())
    }

    /// Remove the note for `(date, activity)`.
    pub async fn delete_note(&self, activity_id: &str, date: &str) -> Result<()> {
        let mut state = self.state.lock().await;
        self.notes.delete_note(activity_id, date).await?;
        state.notes.retain(|n| !(n.activity_id == activity_id && n.date == date));
        state.cache.invalidate([date]);
        Ok(())
    }

    /* ---------------------------------------------------------------- */
    /* Session lifecycle */
    /* ---------------------------------------------------------------- */

    /// Start tracking an activity, closing any running session first.
    ///
    /// Clears an active break, re-arms the hourly reminder relative to the
    /// new session's start, and surfaces the new state through the tracking
    /// adapter. Unknown activity ids fail with `NotFound`.
    pub async fn start_tracking(&self, activity_id: &str) -> Result<()> {
        let mut state = self.state.lock().await;
        let activity = state
            .activities
            .iter()
            .find(|a| a.id == activity_id)
            .cloned()
            .ok_or_else(|| GoalTimerError::NotFound(format!("activity {activity_id}")))?;

        state.reminders.cancel_break_end().await;
        state.break_ends_at = None;
        state.reminders.cancel_work_reminder().await;

        let now_ms = self.clock.now_ms();
        self.close_running_session(&mut state, now_ms).await?;

        let session =
            self.sessions.create_session(activity_id, now_ms, &days::day_key(now_ms)).await?;
        state.sessions.push(session.clone());
        state.running = Some(session.clone());
        state.now_ms = now_ms;
        state.cache.invalidate([session.date.as_str()]);

        let payload = TrackingPayload {
            activity_id: activity.id.clone(),
            activity_name: activity.name.clone(),
            start_ts: session.start_ts,
        };
        if let Err(err) = self.adapter.start_tracking(payload).await {
            warn!(error = %err, "tracking adapter start failed");
        }
        state.reminders.schedule_work_reminder(&session, now_ms).await;
        self.haptic_tick().await;
        info!(activity = %activity.name, "tracking started");
        Ok(())
    }

    /// Close the running session and show the paused display state.
    /// No-op when idle.
    pub async fn pause_tracking(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        self.suspend_running(&mut state, &SuspendMode::Pause).await
    }

    /// Close the running session and clear the display state entirely.
    /// No-op when idle.
    pub async fn stop_tracking(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        self.suspend_running(&mut state, &SuspendMode::Stop).await
    }

    /// Switch to another activity; closing the previous session is
    /// implicit in [`start_tracking`].
    ///
    /// [`start_tracking`]: Self::start_tracking
    pub async fn switch_tracking(&self, activity_id: &str) -> Result<()> {
        self.start_tracking(activity_id).await
    }

    /// Pause when the given activity is running, start it otherwise.
    pub async fn toggle_tracking(&self, activity_id: &str) -> Result<()> {
        let is_current = {
            let state = self.state.lock().await;
            state.running.as_ref().is_some_and(|s| s.activity_id == activity_id)
        };
        if is_current {
            self.pause_tracking().await
        } else {
            self.start_tracking(activity_id).await
        }
    }

    /// Start a break, pausing any running session first. Zero minutes is a
    /// no-op.
    pub async fn start_break(&self, minutes: u32) -> Result<()> {
        if minutes == 0 {
            return Ok(());
        }
        let mut state = self.state.lock().await;
        let ends_at = self.clock.now_ms() + i64::from(minutes) * MS_PER_MINUTE;
        self.suspend_running(&mut state, &SuspendMode::Pause).await?;
        state.break_ends_at = Some(ends_at);
        state.reminders.schedule_break_end(minutes).await;
        info!(minutes, "break started");
        Ok(())
    }

    /// Clear the break state and its pending notification. Idempotent.
    pub async fn end_break(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        state.break_ends_at = None;
        state.reminders.cancel_break_end().await;
        Ok(())
    }

    /* ---------------------------------------------------------------- */
    /* Derived reads */
    /* ---------------------------------------------------------------- */

    /// Summary for one day, served from cache unless the live session
    /// overlaps it.
    pub async fn daily_summary(&self, date: &str) -> DailySummary {
        let mut state = self.state.lock().await;
        Self::summary_for(&mut state, date)
    }

    /// Streaks and rolling totals across all activities.
    pub async fn overall_stats(&self) -> OverallStats {
        let mut state = self.state.lock().await;
        let today = days::day_key(state.now_ms);
        let goals = state.goals.clone();
        stats::overall_stats(&goals, &today, |date| Self::summary_for(&mut state, date))
    }

    /// Historical statistics for one activity. Unknown ids fail with
    /// `NotFound`.
    pub async fn activity_stats(&self, activity_id: &str) -> Result<ActivityStats> {
        let mut state = self.state.lock().await;
        let activity = state
            .activities
            .iter()
            .find(|a| a.id == activity_id)
            .cloned()
            .ok_or_else(|| GoalTimerError::NotFound(format!("activity {activity_id}")))?;
        let today = days::day_key(state.now_ms);
        let goals = state.goals.clone();
        let sessions = state.sessions.clone();
        Ok(stats::activity_stats(&activity, &goals, &sessions, &today, |date| {
            Self::summary_for(&mut state, date)
        }))
    }

    /// Full-fidelity JSON snapshot of all entities.
    pub async fn export_data(&self) -> Result<String> {
        let state = self.state.lock().await;
        let snapshot = export::build_snapshot(
            &state.activities,
            &state.goals,
            &state.sessions,
            &state.notes,
            self.clock.now_ms(),
        );
        export::to_json(&snapshot)
    }

    /* ---------------------------------------------------------------- */
    /* Tick / lifecycle transitions */
    /* ---------------------------------------------------------------- */

    /// Advance "now": expire an elapsed break and keep the running
    /// session's live days invalidated so open-session minutes accrue.
    pub async fn refresh_now(&self) {
        let mut state = self.state.lock().await;
        self.refresh_now_locked(&mut state);
    }

    /// Immediate refresh plus tracking-adapter reconciliation on return
    /// from background, without waiting for the next periodic tick.
    pub async fn on_foreground(&self) {
        let mut state = self.state.lock().await;
        self.refresh_now_locked(&mut state);
        self.reconcile_adapter(&state).await;
    }

    /// Apply an externally-delivered pause/stop command, buffering it until
    /// the engine is ready. At most one command is held; newer commands
    /// overwrite older undelivered ones.
    pub async fn handle_external_action(&self, action: TrackingAction) -> Result<()> {
        let mut state = self.state.lock().await;
        if !state.ready {
            debug!(?action, "engine not ready, buffering external action");
            state.pending_action = Some(action);
            return Ok(());
        }
        self.apply_external_action(&mut state, action).await
    }

    /* ---------------------------------------------------------------- */
    /* Internals */
    /* ---------------------------------------------------------------- */

    fn refresh_now_locked(&self, state: &mut EngineState) {
        let now_ms = self.clock.now_ms();
        state.now_ms = now_ms;
        if state.break_ends_at.is_some_and(|ends_at| now_ms >= ends_at) {
            // Natural expiry: the notification fires on its own
            state.break_ends_at = None;
        }
        if let Some(running) = state.running.clone() {
            state.cache.invalidate(days::days_between(running.start_ts, now_ms));
        }
    }

    fn summary_for(state: &mut EngineState, date: &str) -> DailySummary {
        let live = live_session_overlaps(state.running.as_ref(), date, state.now_ms);
        if !live {
            if let Some(cached) = state.cache.get(date) {
                return cached.clone();
            }
        }
        let summary = build_daily_summary(
            date,
            &state.activities,
            &state.goals,
            &state.sessions,
            &state.notes,
            state.now_ms,
        );
        if !live {
            state.cache.insert(summary.clone());
        }
        summary
    }

    /// Close the open session at `now_ms`. Durable write first; in-memory
    /// state and cache follow only on success.
    async fn close_running_session(
        &self,
        state: &mut EngineState,
        now_ms: i64,
    ) -> Result<Option<Session>> {
        let Some(running) = state.running.clone() else {
            return Ok(None);
        };
        self.sessions.end_session(&running.id, now_ms).await?;
        if let Some(stored) = state.sessions.iter_mut().find(|s| s.id == running.id) {
            stored.end_ts = Some(now_ms);
        }
        state.running = None;
        state.cache.invalidate(days::days_between(running.start_ts, now_ms));
        Ok(Some(running))
    }

    async fn suspend_running(&self, state: &mut EngineState, mode: &SuspendMode) -> Result<()> {
        if state.running.is_none() {
            return Ok(());
        }
        state.reminders.cancel_work_reminder().await;
        let now_ms = self.clock.now_ms();
        let closed = self.close_running_session(state, now_ms).await?;
        state.now_ms = now_ms;
        match mode {
            SuspendMode::Pause => {
                let payload = closed.as_ref().and_then(|s| Self::payload_for(state, s));
                if let Err(err) = self.adapter.pause_tracking(payload).await {
                    warn!(error = %err, "tracking adapter pause failed");
                }
            }
            SuspendMode::Stop => {
                if let Err(err) = self.adapter.stop_tracking().await {
                    warn!(error = %err, "tracking adapter stop failed");
                }
            }
        }
        self.haptic_tick().await;
        info!("tracking suspended");
        Ok(())
    }

    async fn apply_external_action(
        &self,
        state: &mut EngineState,
        action: TrackingAction,
    ) -> Result<()> {
        if state.running.is_none() {
            // Already satisfied; reconcile a stale external display
            if let Err(err) = self.adapter.stop_tracking().await {
                warn!(error = %err, "tracking adapter stop failed");
            }
            return Ok(());
        }
        match action {
            TrackingAction::Pause => self.suspend_running(state, &SuspendMode::Pause).await,
            TrackingAction::Stop => self.suspend_running(state, &SuspendMode::Stop).await,
        }
    }

    async fn ensure_daily_goals_locked(&self, state: &mut EngineState, date: &str) -> Result<()> {
        let to_create: Vec<(String, u32)> = {
            let existing: HashSet<&str> = state
                .goals
                .iter()
                .filter(|g| g.date == date)
                .map(|g| g.activity_id.as_str())
                .collect();
            state
                .activities
                .iter()
                .filter(|a| {
                    a.default_goal_minutes.is_some_and(|m| m > 0)
                        && !existing.contains(a.id.as_str())
                })
                .map(|a| (a.id.clone(), a.default_goal_minutes.unwrap_or_default()))
                .collect()
        };
        if to_create.is_empty() {
            return Ok(());
        }
        for (activity_id, minutes) in to_create {
            let goal = self.goals.set_goal(&activity_id, date, minutes).await?;
            state.goals.push(goal);
        }
        state.cache.invalidate([date]);
        Ok(())
    }

    async fn reconcile_adapter(&self, state: &EngineState) {
        let Some(running) = state.running.as_ref() else {
            return;
        };
        match Self::payload_for(state, running) {
            Some(payload) => {
                if let Err(err) = self.adapter.start_tracking(payload).await {
                    warn!(error = %err, "tracking adapter start failed");
                }
            }
            None => {
                // The session's activity no longer exists; clear the display
                if let Err(err) = self.adapter.stop_tracking().await {
                    warn!(error = %err, "tracking adapter stop failed");
                }
            }
        }
    }

    fn payload_for(state: &EngineState, session: &Session) -> Option<TrackingPayload> {
        state.activities.iter().find(|a| a.id == session.activity_id).map(|activity| {
            TrackingPayload {
                activity_id: activity.id.clone(),
                activity_name: activity.name.clone(),
                start_ts: session.start_ts,
            }
        })
    }

    async fn haptic_tick(&self) {
        if let Err(err) = self.haptics.selection_tick().await {
            debug!(error = %err, "haptic feedback failed");
        }
    }
}
