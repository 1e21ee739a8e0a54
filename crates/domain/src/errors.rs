//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for GoalTimer
#[derive(Error, Debug, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum GoalTimerError {
    /// Referencing an entity id that does not exist is a contract violation
    /// and is surfaced loudly, never silently ignored.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A repository call failed. The in-flight lifecycle operation aborts
    /// without mutating in-memory state; the UI sees a generic
    /// "could not save" condition.
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for GoalTimer operations
pub type Result<T> = std::result::Result<T, GoalTimerError>;
