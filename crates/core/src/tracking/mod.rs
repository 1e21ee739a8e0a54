//! Session lifecycle tracking
//!
//! The coordinator is the single authoritative owner of "what is running
//! now"; the reminder scheduler and external action bridge hang off it.

pub mod actions;
pub mod coordinator;
pub mod ports;
pub mod reminders;

pub use coordinator::{CoordinatorDeps, TrackingCoordinator};
pub use reminders::ReminderScheduler;
