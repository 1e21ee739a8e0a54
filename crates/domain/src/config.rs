//! Configuration structures

use serde::{Deserialize, Serialize};

/// Configuration for the application
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the SQLite database file
    pub database_path: String,
    /// Log level filter passed to the tracing subscriber
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self { database_path: "goaltimer.db".into(), log_level: "info".into() }
    }
}
