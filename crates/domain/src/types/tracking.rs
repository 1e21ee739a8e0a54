//! Tracking adapter and external command vocabulary

use serde::{Deserialize, Serialize};

/// Display payload handed to the platform tracking adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingPayload {
    pub activity_id: String,
    pub activity_name: String,
    /// Session start, unix milliseconds
    pub start_ts: i64,
}

/// Externally-delivered tracking command (deep-link style).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackingAction {
    Pause,
    Stop,
}
