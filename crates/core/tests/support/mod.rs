//! Shared test harness for coordinator integration tests
//!
//! Wires the coordinator to in-memory mocks for every port, with a manual
//! clock so tests drive time deterministically.

pub mod collaborators;
pub mod repositories;

use std::sync::Arc;

use goaltimer_core::sync::NoopSyncService;
use goaltimer_core::{CoordinatorDeps, TrackingCoordinator};
use goaltimer_domain::days::{day_bounds, day_key};
use goaltimer_domain::{Activity, ActivityInput};

use collaborators::{
    ManualClock, RecordingHaptics, RecordingNotificationScheduler, RecordingTrackingAdapter,
};
use repositories::{
    MockActivityRepository, MockGoalRepository, MockNoteRepository, MockSessionRepository,
};

/// Day used by most tests; any calendar date works since timestamps are
/// always derived from its local bounds.
pub const DAY: &str = "2024-06-01";

pub struct TestHarness {
    pub coordinator: TrackingCoordinator,
    pub clock: Arc<ManualClock>,
    pub notifier: Arc<RecordingNotificationScheduler>,
    pub adapter: Arc<RecordingTrackingAdapter>,
    pub haptics: Arc<RecordingHaptics>,
    pub activity_repo: Arc<MockActivityRepository>,
    pub goal_repo: Arc<MockGoalRepository>,
    pub session_repo: Arc<MockSessionRepository>,
    pub note_repo: Arc<MockNoteRepository>,
}

impl TestHarness {
    /// Harness with the clock at 09:00 local on [`DAY`].
    pub fn new() -> Self {
        let (day_start, _) = day_bounds(DAY);
        Self::at(day_start + 9 * 3_600_000)
    }

    /// Harness with the clock at an arbitrary instant.
    pub fn at(now_ms: i64) -> Self {
        let clock = Arc::new(ManualClock::new(now_ms));
        let notifier = Arc::new(RecordingNotificationScheduler::new());
        let adapter = Arc::new(RecordingTrackingAdapter::new());
        let haptics = Arc::new(RecordingHaptics::new());
        let activity_repo = Arc::new(MockActivityRepository::new(clock.clone()));
        let goal_repo = Arc::new(MockGoalRepository::new());
        let session_repo = Arc::new(MockSessionRepository::new());
        let note_repo = Arc::new(MockNoteRepository::new());

        let coordinator = TrackingCoordinator::new(CoordinatorDeps {
            activities: activity_repo.clone(),
            goals: goal_repo.clone(),
            sessions: session_repo.clone(),
            notes: note_repo.clone(),
            notifier: notifier.clone(),
            adapter: adapter.clone(),
            haptics: haptics.clone(),
            sync: Arc::new(NoopSyncService),
            clock: clock.clone(),
        });

        Self {
            coordinator,
            clock,
            notifier,
            adapter,
            haptics,
            activity_repo,
            goal_repo,
            session_repo,
            note_repo,
        }
    }

    /// Create an activity through the coordinator.
    pub async fn create_activity(&self, name: &str) -> Activity {
        self.coordinator
            .create_activity(ActivityInput {
                name: name.into(),
                color: None,
                default_goal_minutes: None,
            })
            .await
            .expect("activity created")
    }

    /// The day key at the harness clock's current time.
    pub fn today(&self) -> String {
        day_key(self.clock.now())
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
