//! Break and work-reminder scheduling
//!
//! At most one pending break-end notification and one pending hourly
//! reminder exist at any time, each tracked by a handle. Scheduling always
//! cancels the prior notification of the same kind first. Every notifier
//! failure is logged and swallowed: notifications are layered on top of
//! the source-of-truth session data, never essential to it.

use std::sync::Arc;
use std::time::Duration;

use goaltimer_domain::constants::WORK_REMINDER_AFTER_MS;
use goaltimer_domain::Session;
use tracing::warn;

use super::ports::{NotificationKind, NotificationRequest, NotificationScheduler};

/// Owns the two pending reminder handles.
pub struct ReminderScheduler {
    notifier: Arc<dyn NotificationScheduler>,
    break_handle: Option<String>,
    work_handle: Option<String>,
}

impl ReminderScheduler {
    pub fn new(notifier: Arc<dyn NotificationScheduler>) -> Self {
        Self { notifier, break_handle: None, work_handle: None }
    }

    /// Arm the break-end notification `minutes` out. A zero duration is a
    /// no-op.
    pub async fn schedule_break_end(&mut self, minutes: u32) {
        if minutes == 0 {
            return;
        }
        self.cancel_break_end().await;
        let request = NotificationRequest {
            kind: NotificationKind::BreakEnd,
            title: "Break over".into(),
            body: "Time to get back to it.".into(),
        };
        let delay = Duration::from_secs(u64::from(minutes) * 60);
        match self.notifier.schedule(request, delay).await {
            Ok(handle) => self.break_handle = Some(handle),
            Err(err) => warn!(error = %err, "failed to schedule break-end notification"),
        }
    }

    /// Cancel the pending break-end notification. Without a stored handle
    /// (fresh process), sweeps everything carrying the break-end tag.
    pub async fn cancel_break_end(&mut self) {
        if let Some(handle) = self.break_handle.take() {
            if let Err(err) = self.notifier.cancel(&handle).await {
                warn!(error = %err, "failed to cancel break-end notification");
            }
            return;
        }
        self.sweep(NotificationKind::BreakEnd).await;
    }

    /// Arm the hourly "still working" reminder relative to the *session's*
    /// start, so resuming near the hour mark reminds soon rather than a
    /// full hour later. Nothing is scheduled once the hour has elapsed.
    pub async fn schedule_work_reminder(&mut self, session: &Session, now_ms: i64) {
        self.cancel_work_reminder().await;
        let remaining_ms = WORK_REMINDER_AFTER_MS - (now_ms - session.start_ts);
        if remaining_ms <= 0 {
            return;
        }
        let request = NotificationRequest {
            kind: NotificationKind::WorkReminder,
            title: "Time for a short break?".into(),
            body: "You have been focused for an hour. Consider taking a quick breather.".into(),
        };
        let delay = Duration::from_millis(u64::try_from(remaining_ms).unwrap_or_default());
        match self.notifier.schedule(request, delay).await {
            Ok(handle) => self.work_handle = Some(handle),
            Err(err) => warn!(error = %err, "failed to schedule work reminder"),
        }
    }

    /// Cancel the pending work reminder, sweeping by tag when no handle is
    /// held.
    pub async fn cancel_work_reminder(&mut self) {
        if let Some(handle) = self.work_handle.take() {
            if let Err(err) = self.notifier.cancel(&handle).await {
                warn!(error = %err, "failed to cancel work reminder");
            }
            return;
        }
        self.sweep(NotificationKind::WorkReminder).await;
    }

    /// True while a work reminder is armed.
    pub fn has_work_reminder(&self) -> bool {
        self.work_handle.is_some()
    }

    /// True while a break-end notification is armed.
    pub fn has_break_end(&self) -> bool {
        self.break_handle.is_some()
    }

    async fn sweep(&self, kind: NotificationKind) {
        let pending = match self.notifier.pending(kind).await {
            Ok(pending) => pending,
            Err(err) => {
                warn!(error = %err, ?kind, "failed to list pending notifications");
                return;
            }
        };
        for item in pending {
            if let Err(err) = self.notifier.cancel(&item.handle).await {
                warn!(error = %err, handle = %item.handle, "failed to cancel swept notification");
            }
        }
    }
}
