//! Mock collaborators: clock, notification scheduler, tracking adapter,
//! haptics
//!
//! All best-effort ports record their calls so tests can assert on the
//! side-effect stream, and can be switched into a failing mode to verify
//! that failures never block a state transition.

use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use goaltimer_core::tracking::ports::{
    Clock, HapticsPort, NotificationKind, NotificationRequest, NotificationScheduler,
    ScheduledNotification, TrackingAdapter,
};
use goaltimer_domain::{GoalTimerError, Result as DomainResult, TrackingPayload};
use parking_lot::Mutex;

fn collaborator_error() -> GoalTimerError {
    GoalTimerError::Internal("mock collaborator failure".into())
}

/// Deterministic clock driven by tests.
pub struct ManualClock {
    now_ms: AtomicI64,
}

impl ManualClock {
    pub fn new(now_ms: i64) -> Self {
        Self { now_ms: AtomicI64::new(now_ms) }
    }

    pub fn now(&self) -> i64 {
        self.now_ms.load(Ordering::SeqCst)
    }

    pub fn set(&self, now_ms: i64) {
        self.now_ms.store(now_ms, Ordering::SeqCst);
    }

    pub fn advance(&self, delta_ms: i64) {
        self.now_ms.fetch_add(delta_ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        self.now()
    }
}

/// A notification recorded by the mock scheduler.
#[derive(Debug, Clone)]
pub struct RecordedNotification {
    pub handle: String,
    pub kind: NotificationKind,
    pub title: String,
    pub delay: Duration,
}

/// Recording mock for `NotificationScheduler`.
pub struct RecordingNotificationScheduler {
    pending: Mutex<Vec<RecordedNotification>>,
    next_handle: AtomicU64,
    fail: AtomicBool,
}

impl RecordingNotificationScheduler {
    pub fn new() -> Self {
        Self {
            pending: Mutex::new(Vec::new()),
            next_handle: AtomicU64::new(1),
            fail: AtomicBool::new(false),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.fail.store(failing, Ordering::SeqCst);
    }

    /// Pending notifications of one kind, oldest first.
    pub fn pending_of(&self, kind: NotificationKind) -> Vec<RecordedNotification> {
        self.pending.lock().iter().filter(|n| n.kind == kind).cloned().collect()
    }

    /// Seed a pending notification as if scheduled by a previous process
    /// (its handle unknown to the current one).
    pub fn seed_pending(&self, kind: NotificationKind, title: &str) -> String {
        let handle = format!("stale-{}", self.next_handle.fetch_add(1, Ordering::SeqCst));
        self.pending.lock().push(RecordedNotification {
            handle: handle.clone(),
            kind,
            title: title.into(),
            delay: Duration::from_secs(60),
        });
        handle
    }
}

#[async_trait]
impl NotificationScheduler for RecordingNotificationScheduler {
    async fn schedule(
        &self,
        request: NotificationRequest,
        delay: Duration,
    ) -> DomainResult<String> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(collaborator_error());
        }
        let handle = format!("n-{}", self.next_handle.fetch_add(1, Ordering::SeqCst));
        self.pending.lock().push(RecordedNotification {
            handle: handle.clone(),
            kind: request.kind,
            title: request.title,
            delay,
        });
        Ok(handle)
    }

    async fn cancel(&self, handle: &str) -> DomainResult<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(collaborator_error());
        }
        self.pending.lock().retain(|n| n.handle != handle);
        Ok(())
    }

    async fn pending(&self, kind: NotificationKind) -> DomainResult<Vec<ScheduledNotification>> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(collaborator_error());
        }
        Ok(self
            .pending
            .lock()
            .iter()
            .filter(|n| n.kind == kind)
            .map(|n| ScheduledNotification { handle: n.handle.clone(), kind: n.kind, fire_at_ms: 0 })
            .collect())
    }
}

/// Events observed by the mock tracking adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdapterEvent {
    Init,
    Start(TrackingPayload),
    Pause(Option<TrackingPayload>),
    Stop,
}

/// Recording mock for `TrackingAdapter`.
pub struct RecordingTrackingAdapter {
    events: Mutex<Vec<AdapterEvent>>,
    running: AtomicBool,
    fail: AtomicBool,
}

impl RecordingTrackingAdapter {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            running: AtomicBool::new(false),
            fail: AtomicBool::new(false),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.fail.store(failing, Ordering::SeqCst);
    }

    pub fn events(&self) -> Vec<AdapterEvent> {
        self.events.lock().clone()
    }

    pub fn last_event(&self) -> Option<AdapterEvent> {
        self.events.lock().last().cloned()
    }

    fn record(&self, event: AdapterEvent) -> DomainResult<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(collaborator_error());
        }
        self.events.lock().push(event);
        Ok(())
    }
}

#[async_trait]
impl TrackingAdapter for RecordingTrackingAdapter {
    async fn init(&self) -> DomainResult<()> {
        self.record(AdapterEvent::Init)
    }

    async fn start_tracking(&self, payload: TrackingPayload) -> DomainResult<()> {
        self.record(AdapterEvent::Start(payload))?;
        self.running.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn pause_tracking(&self, payload: Option<TrackingPayload>) -> DomainResult<()> {
        self.record(AdapterEvent::Pause(payload))?;
        self.running.store(false, Ordering::SeqCst);
        Ok(())
    }

    async fn stop_tracking(&self) -> DomainResult<()> {
        self.record(AdapterEvent::Stop)?;
        self.running.store(false, Ordering::SeqCst);
        Ok(())
    }

    async fn is_running(&self) -> DomainResult<bool> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(collaborator_error());
        }
        Ok(self.running.load(Ordering::SeqCst))
    }
}

/// Counting mock for `HapticsPort`.
pub struct RecordingHaptics {
    ticks: AtomicUsize,
    fail: AtomicBool,
}

impl RecordingHaptics {
    pub fn new() -> Self {
        Self { ticks: AtomicUsize::new(0), fail: AtomicBool::new(false) }
    }

    pub fn set_failing(&self, failing: bool) {
        self.fail.store(failing, Ordering::SeqCst);
    }

    pub fn tick_count(&self) -> usize {
        self.ticks.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HapticsPort for RecordingHaptics {
    async fn selection_tick(&self) -> DomainResult<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(collaborator_error());
        }
        self.ticks.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
