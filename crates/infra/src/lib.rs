//! # GoalTimer Infra
//!
//! Infrastructure adapters behind the core ports:
//! - SQLite-backed repositories and the database manager
//! - Tokio-timer notification scheduler
//! - Platform tracking adapters (capability-selected)
//! - The periodic tick loop
//! - Tracing bootstrap

pub mod clock;
pub mod database;
pub mod notifications;
pub mod observability;
pub mod platform;
pub mod scheduling;

pub use clock::SystemClock;
pub use database::{
    DbManager, SqliteActivityRepository, SqliteGoalRepository, SqliteNoteRepository,
    SqliteSessionRepository,
};
pub use notifications::{DeliveredNotification, TokioNotificationScheduler};
pub use observability::init_tracing;
pub use platform::{
    detect_tracking_adapter, NoopHaptics, NoopTrackingAdapter, NotificationTrackingAdapter,
};
pub use scheduling::{CoordinatorTick, TickJob, TickLoop, TickLoopConfig};
