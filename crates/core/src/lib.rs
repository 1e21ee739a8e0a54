//! # GoalTimer Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port/adapter interfaces (traits)
//! - The daily aggregation engine and memoized summary cache
//! - The session lifecycle coordinator
//! - The break/reminder scheduler and external action bridge
//! - Streak and per-activity statistics
//!
//! ## Architecture Principles
//! - Only depends on `goaltimer-domain`
//! - No database or platform code
//! - All external dependencies via traits
//! - Pure, testable business logic

pub mod export;
pub mod stats;
pub mod summary;
pub mod sync;
pub mod tracking;

// Re-export specific items to avoid ambiguity
pub use stats::{activity_stats, overall_stats};
pub use summary::aggregation::{build_daily_summary, session_ms_for_day};
pub use summary::cache::SummaryCache;
pub use sync::{NoopSyncService, SyncService};
pub use tracking::actions::parse_tracking_action;
pub use tracking::coordinator::{CoordinatorDeps, TrackingCoordinator};
pub use tracking::ports::{
    ActivityRepository, Clock, GoalRepository, HapticsPort, NotificationKind,
    NotificationRequest, NotificationScheduler, NoteRepository, ScheduledNotification,
    SessionRepository, TrackingAdapter,
};
pub use tracking::reminders::ReminderScheduler;
