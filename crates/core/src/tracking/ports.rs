//! Port interfaces for the tracking engine
//!
//! These traits define the boundaries between core business logic
//! and infrastructure implementations. Repository ports are the durable
//! source of truth; the remaining collaborators are best-effort.

use std::time::Duration;

use async_trait::async_trait;
use goaltimer_domain::{
    Activity, ActivityInput, ActivityUpdate, DailyGoal, Note, Result, Session, TrackingPayload,
};

/// Trait for persisting and listing activities
#[async_trait]
pub trait ActivityRepository: Send + Sync {
    /// List all activities, oldest first
    async fn list(&self) -> Result<Vec<Activity>>;

    /// Create a new activity
    async fn create(&self, input: ActivityInput) -> Result<Activity>;

    /// Update an existing activity; unknown ids fail with `NotFound`
    async fn update(&self, id: &str, updates: ActivityUpdate) -> Result<Activity>;

    /// Delete an activity. Goals, sessions and notes cascade.
    async fn delete(&self, id: &str) -> Result<()>;
}

/// Trait for persisting daily goals
#[async_trait]
pub trait GoalRepository: Send + Sync {
    /// List all goals ordered by date
    async fn list(&self) -> Result<Vec<DailyGoal>>;

    /// Goals for one day
    async fn get_by_date(&self, date: &str) -> Result<Vec<DailyGoal>>;

    /// Upsert the goal for `(date, activity)`
    async fn set_goal(&self, activity_id: &str, date: &str, goal_minutes: u32)
        -> Result<DailyGoal>;

    /// Remove the goal for `(date, activity)`
    async fn delete_goal(&self, activity_id: &str, date: &str) -> Result<()>;
}

/// Trait for persisting sessions
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// List all sessions ordered by start time
    async fn list(&self) -> Result<Vec<Session>>;

    /// The session with no end timestamp, if any. Used to rediscover the
    /// running session after a process restart.
    async fn get_running_session(&self) -> Result<Option<Session>>;

    /// Create a new open session
    async fn create_session(&self, activity_id: &str, start_ts: i64, date: &str)
        -> Result<Session>;

    /// Record the end timestamp of a session
    async fn end_session(&self, session_id: &str, end_ts: i64) -> Result<()>;

    /// Delete all sessions belonging to an activity
    async fn delete_by_activity(&self, activity_id: &str) -> Result<()>;
}

/// Trait for persisting notes
#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// List all notes, most recently updated first
    async fn list(&self) -> Result<Vec<Note>>;

    /// Notes for one day
    async fn get_by_date(&self, date: &str) -> Result<Vec<Note>>;

    /// Upsert the note for `(date, activity)`
    async fn upsert_note(
        &self,
        activity_id: &str,
        date: &str,
        text: &str,
        updated_at: i64,
    ) -> Result<Note>;

    /// Remove the note for `(date, activity)`
    async fn delete_note(&self, activity_id: &str, date: &str) -> Result<()>;
}

/// Notification kinds double as tags for the reconciliation sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    /// "Break over" fired when a break elapses
    BreakEnd,
    /// "Still working?" fired an hour into a session
    WorkReminder,
    /// Persistent "currently tracking" indicator
    Tracking,
}

/// Content of a notification to schedule.
#[derive(Debug, Clone)]
pub struct NotificationRequest {
    pub kind: NotificationKind,
    pub title: String,
    pub body: String,
}

/// A pending notification as reported by the scheduler.
#[derive(Debug, Clone)]
pub struct ScheduledNotification {
    /// Cancellation handle
    pub handle: String,
    pub kind: NotificationKind,
    /// Scheduled fire time, unix milliseconds
    pub fire_at_ms: i64,
}

/// Trait for the external notification system.
///
/// Failures are never essential to the correctness of tracked time; callers
/// treat every operation as best-effort.
#[async_trait]
pub trait NotificationScheduler: Send + Sync {
    /// Schedule a notification after `delay`; returns a cancel handle
    async fn schedule(&self, request: NotificationRequest, delay: Duration) -> Result<String>;

    /// Cancel a pending notification by handle. Unknown handles are a no-op.
    async fn cancel(&self, handle: &str) -> Result<()>;

    /// Pending notifications of one kind, for the reconciliation sweep
    /// after a process restart invalidates stored handles.
    async fn pending(&self, kind: NotificationKind) -> Result<Vec<ScheduledNotification>>;
}

/// Trait for the platform-level tracking indicator.
///
/// Surfaces "what's running" outside the process. Implementations vary by
/// platform capability; all calls are best-effort from the coordinator's
/// point of view.
#[async_trait]
pub trait TrackingAdapter: Send + Sync {
    /// One-time platform setup (channels, permissions)
    async fn init(&self) -> Result<()>;

    /// Show the running state for an activity
    async fn start_tracking(&self, payload: TrackingPayload) -> Result<()>;

    /// Show the paused state, retaining the last known activity when given
    async fn pause_tracking(&self, payload: Option<TrackingPayload>) -> Result<()>;

    /// Clear the indicator entirely
    async fn stop_tracking(&self) -> Result<()>;

    /// Whether the platform indicator currently shows a running state
    async fn is_running(&self) -> Result<bool>;
}

/// Trait for haptic acknowledgement of lifecycle transitions
#[async_trait]
pub trait HapticsPort: Send + Sync {
    /// Emit a short selection tick; failures are ignored by callers
    async fn selection_tick(&self) -> Result<()>;
}

/// Clock abstraction so tests can drive time deterministically
pub trait Clock: Send + Sync {
    /// Current time, unix milliseconds
    fn now_ms(&self) -> i64;
}
