//! Tokio-timer implementation of the `NotificationScheduler` port
//!
//! Each pending notification is a spawned task waiting on its delay behind
//! a cancellation token. Delivery goes over an mpsc channel that the
//! embedding shell (UI, system notifier) drains; the engine itself never
//! consumes deliveries.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use goaltimer_core::{NotificationKind, NotificationRequest, NotificationScheduler,
    ScheduledNotification};
use goaltimer_domain::Result;
use parking_lot::Mutex;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio_util::sync::CancellationToken;
use tracing::debug;
use uuid::Uuid;

/// A notification whose delay elapsed.
#[derive(Debug, Clone)]
pub struct DeliveredNotification {
    pub kind: NotificationKind,
    pub title: String,
    pub body: String,
}

struct PendingEntry {
    kind: NotificationKind,
    fire_at_ms: i64,
    cancel: CancellationToken,
}

/// In-process notification scheduler backed by tokio timers.
pub struct TokioNotificationScheduler {
    pending: Arc<Mutex<HashMap<String, PendingEntry>>>,
    delivery_tx: UnboundedSender<DeliveredNotification>,
}

impl TokioNotificationScheduler {
    /// Create the scheduler and the receiving end of its delivery channel.
    pub fn new() -> (Self, UnboundedReceiver<DeliveredNotification>) {
        let (delivery_tx, delivery_rx) = mpsc::unbounded_channel();
        (Self { pending: Arc::new(Mutex::new(HashMap::new())), delivery_tx }, delivery_rx)
    }

    /// Number of pending notifications, all kinds.
    pub fn pending_count(&self) -> usize {
        self.pending.lock().len()
    }
}

#[async_trait]
impl NotificationScheduler for TokioNotificationScheduler {
    async fn schedule(&self, request: NotificationRequest, delay: Duration) -> Result<String> {
        let handle = Uuid::new_v4().to_string();
        let cancel = CancellationToken::new();
        let fire_at_ms = Utc::now().timestamp_millis()
            + i64::try_from(delay.as_millis()).unwrap_or(i64::MAX);

        self.pending.lock().insert(
            handle.clone(),
            PendingEntry { kind: request.kind, fire_at_ms, cancel: cancel.clone() },
        );

        let pending = self.pending.clone();
        let delivery_tx = self.delivery_tx.clone();
        let task_handle = handle.clone();
        tokio::spawn(async move {
            tokio::select! {
                () = cancel.cancelled() => {
                    debug!(handle = %task_handle, "notification cancelled");
                }
                () = tokio::time::sleep(delay) => {
                    pending.lock().remove(&task_handle);
                    let delivered = DeliveredNotification {
                        kind: request.kind,
                        title: request.title,
                        body: request.body,
                    };
                    if delivery_tx.send(delivered).is_err() {
                        debug!(handle = %task_handle, "delivery channel closed");
                    }
                }
            }
        });

        Ok(handle)
    }

    async fn cancel(&self, handle: &str) -> Result<()> {
        // Unknown handles (already fired, or from a previous process) are a
        // no-op
        if let Some(entry) = self.pending.lock().remove(handle) {
            entry.cancel.cancel();
        }
        Ok(())
    }

    async fn pending(&self, kind: NotificationKind) -> Result<Vec<ScheduledNotification>> {
        Ok(self
            .pending
            .lock()
            .iter()
            .filter(|(_, entry)| entry.kind == kind)
            .map(|(handle, entry)| ScheduledNotification {
                handle: handle.clone(),
                kind: entry.kind,
                fire_at_ms: entry.fire_at_ms,
            })
            .collect())
    }
}
