//! Platform tracking adapters
//!
//! One `TrackingAdapter` interface, variant implementations selected at
//! startup by capability detection: with a notification scheduler available
//! the indicator is a replaceable "currently tracking" notification;
//! without one the adapter is a no-op that only tracks its own state.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use goaltimer_core::{
    HapticsPort, NotificationKind, NotificationRequest, NotificationScheduler, TrackingAdapter,
};
use goaltimer_domain::days::format_clock_time;
use goaltimer_domain::{Result, TrackingPayload};
use parking_lot::Mutex;
use tracing::{debug, info};

/// Pick the richest tracking adapter the platform supports.
pub fn detect_tracking_adapter(
    notifier: Option<Arc<dyn NotificationScheduler>>,
) -> Arc<dyn TrackingAdapter> {
    match notifier {
        Some(notifier) => {
            info!("using notification-backed tracking adapter");
            Arc::new(NotificationTrackingAdapter::new(notifier))
        }
        None => {
            info!("no notification capability; tracking indicator disabled");
            Arc::new(NoopTrackingAdapter::new())
        }
    }
}

/// Tracking indicator approximated with a replaceable notification.
///
/// The platform cannot run a true foreground service, so the indicator is
/// refreshed on key events rather than per second.
pub struct NotificationTrackingAdapter {
    notifier: Arc<dyn NotificationScheduler>,
    current_handle: Mutex<Option<String>>,
    running: AtomicBool,
}

impl NotificationTrackingAdapter {
    pub fn new(notifier: Arc<dyn NotificationScheduler>) -> Self {
        Self { notifier, current_handle: Mutex::new(None), running: AtomicBool::new(false) }
    }

    async fn replace_indicator(&self, body: String) -> Result<()> {
        self.dismiss_indicator().await;
        let handle = self
            .notifier
            .schedule(
                NotificationRequest {
                    kind: NotificationKind::Tracking,
                    title: "GoalTimer".into(),
                    body,
                },
                Duration::ZERO,
            )
            .await?;
        *self.current_handle.lock() = Some(handle);
        Ok(())
    }

    async fn dismiss_indicator(&self) {
        let handle = self.current_handle.lock().take();
        if let Some(handle) = handle {
            if let Err(err) = self.notifier.cancel(&handle).await {
                debug!(error = %err, "failed to dismiss tracking indicator");
            }
        }
    }
}

#[async_trait]
impl TrackingAdapter for NotificationTrackingAdapter {
    async fn init(&self) -> Result<()> {
        Ok(())
    }

    async fn start_tracking(&self, payload: TrackingPayload) -> Result<()> {
        let body = format!(
            "Tracking: {} • Started {}",
            payload.activity_name,
            format_clock_time(payload.start_ts)
        );
        self.replace_indicator(body).await?;
        self.running.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn pause_tracking(&self, payload: Option<TrackingPayload>) -> Result<()> {
        self.running.store(false, Ordering::SeqCst);
        match payload {
            Some(payload) => {
                let body = format!(
                    "Paused: {} • Started {}",
                    payload.activity_name,
                    format_clock_time(payload.start_ts)
                );
                self.replace_indicator(body).await
            }
            None => {
                self.dismiss_indicator().await;
                Ok(())
            }
        }
    }

    async fn stop_tracking(&self) -> Result<()> {
        self.running.store(false, Ordering::SeqCst);
        self.dismiss_indicator().await;
        Ok(())
    }

    async fn is_running(&self) -> Result<bool> {
        Ok(self.running.load(Ordering::SeqCst))
    }
}

/// Fallback adapter for platforms without any indicator surface.
pub struct NoopTrackingAdapter {
    running: AtomicBool,
}

impl NoopTrackingAdapter {
    pub fn new() -> Self {
        Self { running: AtomicBool::new(false) }
    }
}

impl Default for NoopTrackingAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TrackingAdapter for NoopTrackingAdapter {
    async fn init(&self) -> Result<()> {
        Ok(())
    }

    async fn start_tracking(&self, payload: TrackingPayload) -> Result<()> {
        debug!(activity = %payload.activity_name, "tracking started (no indicator)");
        self.running.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn pause_tracking(&self, _payload: Option<TrackingPayload>) -> Result<()> {
        self.running.store(false, Ordering::SeqCst);
        Ok(())
    }

    async fn stop_tracking(&self) -> Result<()> {
        self.running.store(false, Ordering::SeqCst);
        Ok(())
    }

    async fn is_running(&self) -> Result<bool> {
        Ok(self.running.load(Ordering::SeqCst))
    }
}

/// Haptic feedback has no analogue off-device; the port stays satisfied.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHaptics;

#[async_trait]
impl HapticsPort for NoopHaptics {
    async fn selection_tick(&self) -> Result<()> {
        Ok(())
    }
}
