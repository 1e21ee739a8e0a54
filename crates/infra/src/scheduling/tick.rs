//! Periodic tick loop driving the coordinator's clock
//!
//! Runs a user-supplied job on a cadence that adapts to engine state:
//! fine-grained while a session or break is live, coarse otherwise. The
//! cadence is purely a resource policy; the summary cache's live-overlap
//! bypass keeps results correct at any tick rate. Join handles are tracked
//! and cancellation is explicit.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use goaltimer_core::TrackingCoordinator;
use goaltimer_domain::constants::{ACTIVE_TICK_INTERVAL_MS, IDLE_TICK_INTERVAL_MS};
use goaltimer_domain::{GoalTimerError, Result};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Trait representing one tick of work.
#[async_trait]
pub trait TickJob: Send + Sync {
    /// Run the tick; returns true while the fine-grained cadence is needed.
    async fn tick(&self) -> bool;
}

/// Tick adapter over the coordinator: refresh "now", report engagement.
pub struct CoordinatorTick {
    coordinator: Arc<TrackingCoordinator>,
}

impl CoordinatorTick {
    pub fn new(coordinator: Arc<TrackingCoordinator>) -> Self {
        Self { coordinator }
    }
}

#[async_trait]
impl TickJob for CoordinatorTick {
    async fn tick(&self) -> bool {
        self.coordinator.refresh_now().await;
        self.coordinator.is_engaged().await
    }
}

/// Configuration for the tick loop.
#[derive(Debug, Clone)]
pub struct TickLoopConfig {
    /// Cadence while a session or break is live
    pub active_interval: Duration,
    /// Cadence while idle
    pub idle_interval: Duration,
}

impl Default for TickLoopConfig {
    fn default() -> Self {
        Self {
            active_interval: Duration::from_millis(ACTIVE_TICK_INTERVAL_MS),
            idle_interval: Duration::from_millis(IDLE_TICK_INTERVAL_MS),
        }
    }
}

/// Tick loop with explicit lifecycle management.
pub struct TickLoop {
    config: TickLoopConfig,
    job: Arc<dyn TickJob>,
    handle: Option<JoinHandle<()>>,
    cancellation: CancellationToken,
}

impl TickLoop {
    /// Create a loop with the default cadence.
    pub fn new(job: Arc<dyn TickJob>) -> Self {
        Self::with_config(TickLoopConfig::default(), job)
    }

    /// Create a loop with a custom cadence.
    pub fn with_config(config: TickLoopConfig, job: Arc<dyn TickJob>) -> Self {
        Self { config, job, handle: None, cancellation: CancellationToken::new() }
    }

    /// Start ticking. Fails when already running.
    pub fn start(&mut self) -> Result<()> {
        if self.is_running() {
            return Err(GoalTimerError::Internal("tick loop already running".into()));
        }
        self.cancellation = CancellationToken::new();
        let cancel = self.cancellation.clone();
        let job = self.job.clone();
        let config = self.config.clone();

        self.handle = Some(tokio::spawn(async move {
            loop {
                let engaged = job.tick().await;
                let interval =
                    if engaged { config.active_interval } else { config.idle_interval };
                tokio::select! {
                    () = cancel.cancelled() => {
                        debug!("tick loop cancelled");
                        break;
                    }
                    () = tokio::time::sleep(interval) => {}
                }
            }
        }));
        info!("tick loop started");
        Ok(())
    }

    /// Stop ticking and wait for the task to finish.
    pub async fn stop(&mut self) {
        self.cancellation.cancel();
        if let Some(handle) = self.handle.take() {
            if let Err(err) = handle.await {
                warn!(error = %err, "tick loop task join failed");
            }
        }
        info!("tick loop stopped");
    }

    /// True while the tick task is active.
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().map_or(false, |handle| !handle.is_finished())
    }
}

impl Drop for TickLoop {
    fn drop(&mut self) {
        if self.is_running() {
            warn!("TickLoop dropped while running; cancelling task");
            self.cancellation.cancel();
        }
    }
}
