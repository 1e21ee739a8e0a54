//! Database manager: connection ownership and additive migrations
//!
//! A single SQLite connection behind a lock: the engine is a single
//! process and every lifecycle operation is serialized upstream, so a pool
//! would buy nothing. Schema evolution is additive only, versioned through
//! `PRAGMA user_version`.

use std::path::Path;

use goaltimer_domain::{GoalTimerError, Result};
use parking_lot::Mutex;
use rusqlite::Connection;
use tracing::info;

const SCHEMA_VERSION: i64 = 1;

const SCHEMA_V1: &str = "
    CREATE TABLE IF NOT EXISTS activities (
        id TEXT PRIMARY KEY NOT NULL,
        name TEXT NOT NULL,
        color TEXT,
        createdAt INTEGER NOT NULL,
        defaultGoalMinutes INTEGER
    );
    CREATE TABLE IF NOT EXISTS daily_goals (
        id TEXT PRIMARY KEY NOT NULL,
        date TEXT NOT NULL,
        activityId TEXT NOT NULL,
        goalMinutes INTEGER NOT NULL,
        FOREIGN KEY (activityId) REFERENCES activities(id) ON DELETE CASCADE
    );
    CREATE TABLE IF NOT EXISTS sessions (
        id TEXT PRIMARY KEY NOT NULL,
        activityId TEXT NOT NULL,
        startTs INTEGER NOT NULL,
        endTs INTEGER,
        date TEXT NOT NULL,
        FOREIGN KEY (activityId) REFERENCES activities(id) ON DELETE CASCADE
    );
    CREATE TABLE IF NOT EXISTS notes (
        id TEXT PRIMARY KEY NOT NULL,
        date TEXT NOT NULL,
        activityId TEXT NOT NULL,
        text TEXT NOT NULL,
        updatedAt INTEGER NOT NULL,
        FOREIGN KEY (activityId) REFERENCES activities(id) ON DELETE CASCADE
    );
    CREATE UNIQUE INDEX IF NOT EXISTS idx_daily_goals_date_activity
        ON daily_goals(date, activityId);
    CREATE INDEX IF NOT EXISTS idx_sessions_activity ON sessions(activityId);
    CREATE INDEX IF NOT EXISTS idx_sessions_date ON sessions(date);
    CREATE UNIQUE INDEX IF NOT EXISTS idx_notes_date_activity
        ON notes(date, activityId);
";

/// Owns the SQLite connection shared by every repository.
pub struct DbManager {
    conn: Mutex<Connection>,
}

impl DbManager {
    /// Open (or create) the database at `path`.
    pub fn new(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .map_err(|err| map_sqlite_error("db.open", &err))?;
        Self::from_connection(conn)
    }

    /// Private in-memory database, used by tests.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|err| map_sqlite_error("db.open_in_memory", &err))?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", true)
            .map_err(|err| map_sqlite_error("db.foreign_keys", &err))?;
        Ok(Self { conn: Mutex::new(conn) })
    }

    /// Apply pending migrations. Safe to call on every startup.
    pub fn run_migrations(&self) -> Result<()> {
        let conn = self.conn.lock();
        let current: i64 = conn
            .pragma_query_value(None, "user_version", |row| row.get(0))
            .map_err(|err| map_sqlite_error("db.user_version", &err))?;
        if current < SCHEMA_VERSION {
            conn.execute_batch(SCHEMA_V1)
                .map_err(|err| map_sqlite_error("db.migrate_v1", &err))?;
            conn.pragma_update(None, "user_version", SCHEMA_VERSION)
                .map_err(|err| map_sqlite_error("db.set_user_version", &err))?;
            info!(from = current, to = SCHEMA_VERSION, "database migrated");
        }
        Ok(())
    }

    /// Run a closure against the connection, mapping errors into the
    /// domain taxonomy tagged with `operation`.
    pub(crate) fn with_conn<T>(
        &self,
        operation: &str,
        f: impl FnOnce(&Connection) -> rusqlite::Result<T>,
    ) -> Result<T> {
        let conn = self.conn.lock();
        f(&conn).map_err(|err| map_sqlite_error(operation, &err))
    }
}

fn map_sqlite_error(operation: &str, err: &rusqlite::Error) -> GoalTimerError {
    GoalTimerError::Storage(format!("{operation}: {err}"))
}
