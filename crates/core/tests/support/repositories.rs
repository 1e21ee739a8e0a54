//! Mock repository implementations for testing
//!
//! In-memory mocks for all repository ports, enabling deterministic unit
//! tests without database dependencies. Each mock can be switched into a
//! failing mode to exercise the abort-without-mutating policy.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use goaltimer_core::tracking::ports::{
    ActivityRepository, GoalRepository, NoteRepository, SessionRepository,
};
use goaltimer_domain::{
    Activity, ActivityInput, ActivityUpdate, DailyGoal, GoalTimerError, Note,
    Result as DomainResult, Session,
};
use parking_lot::Mutex;
use uuid::Uuid;

use super::collaborators::ManualClock;

fn storage_error() -> GoalTimerError {
    GoalTimerError::Storage("mock repository failure".into())
}

/// In-memory mock for `ActivityRepository`.
pub struct MockActivityRepository {
    items: Mutex<Vec<Activity>>,
    clock: Arc<ManualClock>,
    fail: AtomicBool,
}

impl MockActivityRepository {
    pub fn new(clock: Arc<ManualClock>) -> Self {
        Self { items: Mutex::new(Vec::new()), clock, fail: AtomicBool::new(false) }
    }

    /// Seed an activity without going through the coordinator.
    pub fn with_activity(&self, activity: Activity) {
        self.items.lock().push(activity);
    }

    pub fn set_failing(&self, failing: bool) {
        self.fail.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> DomainResult<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(storage_error());
        }
        Ok(())
    }
}

#[async_trait]
impl ActivityRepository for MockActivityRepository {
    async fn list(&self) -> DomainResult<Vec<Activity>> {
        self.check()?;
        Ok(self.items.lock().clone())
    }

    async fn create(&self, input: ActivityInput) -> DomainResult<Activity> {
        self.check()?;
        let activity = Activity::new(input, self.clock.now());
        self.items.lock().push(activity.clone());
        Ok(activity)
    }

    async fn update(&self, id: &str, updates: ActivityUpdate) -> DomainResult<Activity> {
        self.check()?;
        let mut items = self.items.lock();
        let activity = items
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| GoalTimerError::NotFound(format!("activity {id}")))?;
        activity.apply(updates);
        Ok(activity.clone())
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        self.check()?;
        self.items.lock().retain(|a| a.id != id);
        Ok(())
    }
}

/// In-memory mock for `GoalRepository`.
pub struct MockGoalRepository {
    items: Mutex<Vec<DailyGoal>>,
    fail: AtomicBool,
}

impl MockGoalRepository {
    pub fn new() -> Self {
        Self { items: Mutex::new(Vec::new()), fail: AtomicBool::new(false) }
    }

    pub fn with_goal(&self, goal: DailyGoal) {
        self.items.lock().push(goal);
    }

    pub fn set_failing(&self, failing: bool) {
        self.fail.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> DomainResult<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(storage_error());
        }
        Ok(())
    }
}

#[async_trait]
impl GoalRepository for MockGoalRepository {
    async fn list(&self) -> DomainResult<Vec<DailyGoal>> {
        self.check()?;
        Ok(self.items.lock().clone())
    }

    async fn get_by_date(&self, date: &str) -> DomainResult<Vec<DailyGoal>> {
        self.check()?;
        Ok(self.items.lock().iter().filter(|g| g.date == date).cloned().collect())
    }

    async fn set_goal(
        &self,
        activity_id: &str,
        date: &str,
        goal_minutes: u32,
    ) -> DomainResult<DailyGoal> {
        self.check()?;
        let mut items = self.items.lock();
        if let Some(existing) =
            items.iter_mut().find(|g| g.activity_id == activity_id && g.date == date)
        {
            existing.goal_minutes = goal_minutes;
            return Ok(existing.clone());
        }
        let goal = DailyGoal {
            id: Uuid::new_v4().to_string(),
            date: date.into(),
            activity_id: activity_id.into(),
            goal_minutes,
        };
        items.push(goal.clone());
        Ok(goal)
    }

    async fn delete_goal(&self, activity_id: &str, date: &str) -> DomainResult<()> {
        self.check()?;
        self.items.lock().retain(|g| !(g.activity_id == activity_id && g.date == date));
        Ok(())
    }
}

/// In-memory mock for `SessionRepository`.
pub struct MockSessionRepository {
    items: Mutex<Vec<Session>>,
    fail: AtomicBool,
}

impl MockSessionRepository {
    pub fn new() -> Self {
        Self { items: Mutex::new(Vec::new()), fail: AtomicBool::new(false) }
    }

    /// Seed a session without going through the coordinator (e.g. a
    /// still-open session from a previous process).
    pub fn with_session(&self, session: Session) {
        self.items.lock().push(session);
    }

    pub fn set_failing(&self, failing: bool) {
        self.fail.store(failing, Ordering::SeqCst);
    }

    /// Direct snapshot of stored sessions for assertions.
    pub fn stored(&self) -> Vec<Session> {
        self.items.lock().clone()
    }

    fn check(&self) -> DomainResult<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(storage_error());
        }
        Ok(())
    }
}

#[async_trait]
impl SessionRepository for MockSessionRepository {
    async fn list(&self) -> DomainResult<Vec<Session>> {
        self.check()?;
        Ok(self.items.lock().clone())
    }

    async fn get_running_session(&self) -> DomainResult<Option<Session>> {
        self.check()?;
        Ok(self.items.lock().iter().find(|s| s.is_open()).cloned())
    }

    async fn create_session(
        &self,
        activity_id: &str,
        start_ts: i64,
        date: &str,
    ) -> DomainResult<Session> {
        self.check()?;
        let session = Session {
            id: Uuid::new_v4().to_string(),
            activity_id: activity_id.into(),
            start_ts,
            end_ts: None,
            date: date.into(),
        };
        self.items.lock().push(session.clone());
        Ok(session)
    }

    async fn end_session(&self, session_id: &str, end_ts: i64) -> DomainResult<()> {
        self.check()?;
        let mut items = self.items.lock();
        if let Some(session) = items.iter_mut().find(|s| s.id == session_id) {
            session.end_ts = Some(end_ts);
        }
        Ok(())
    }

    async fn delete_by_activity(&self, activity_id: &str) -> DomainResult<()> {
        self.check()?;
        self.items.lock().retain(|s| s.activity_id != activity_id);
        Ok(())
    }
}

/// In-memory mock for `NoteRepository`.
pub struct MockNoteRepository {
    items: Mutex<Vec<Note>>,
    fail: AtomicBool,
}

impl MockNoteRepository {
    pub fn new() -> Self {
        Self { items: Mutex::new(Vec::new()), fail: AtomicBool::new(false) }
    }

    pub fn set_failing(&self, failing: bool) {
        self.fail.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> DomainResult<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(storage_error());
        }
        Ok(())
    }
}

#[async_trait]
impl NoteRepository for MockNoteRepository {
    async fn list(&self) -> DomainResult<Vec<Note>> {
        self.check()?;
        Ok(self.items.lock().clone())
    }

    async fn get_by_date(&self, date: &str) -> DomainResult<Vec<Note>> {
        self.check()?;
        Ok(self.items.lock().iter().filter(|n| n.date == date).cloned().collect())
    }

    async fn upsert_note(
        &self,
        activity_id: &str,
        date: &str,
        text: &str,
        updated_at: i64,
    ) -> DomainResult<Note> {
        self.check()?;
        let mut items = self.items.lock();
        if let Some(existing) =
            items.iter_mut().find(|n| n.activity_id == activity_id && n.date == date)
        {
            existing.text = text.into();
            existing.updated_at = updated_at;
            return Ok(existing.clone());
        }
        let note = Note {
            id: Uuid::new_v4().to_string(),
            date: date.into(),
            activity_id: activity_id.into(),
            text: text.into(),
            updated_at,
        };
        items.push(note.clone());
        Ok(note)
    }

    async fn delete_note(&self, activity_id: &str, date: &str) -> DomainResult<()> {
        self.check()?;
        self.items.lock().retain(|n| !(n.activity_id == activity_id && n.date == date));
        Ok(())
    }
}
