//! SQLite-backed implementation of the `SessionRepository` port.
//!
//! The open-session query (`endTs IS NULL`) is the durable-recovery path:
//! a process restart rediscovers the running session from here.

use std::sync::Arc;

use async_trait::async_trait;
use goaltimer_core::SessionRepository as SessionRepositoryPort;
use goaltimer_domain::{Result, Session};
use rusqlite::{OptionalExtension, Row};
use uuid::Uuid;

use super::manager::DbManager;

const SESSION_LIST_QUERY: &str =
    "SELECT id, activityId, startTs, endTs, date FROM sessions ORDER BY startTs ASC";

const SESSION_RUNNING_QUERY: &str =
    "SELECT id, activityId, startTs, endTs, date FROM sessions WHERE endTs IS NULL LIMIT 1";

const SESSION_INSERT_SQL: &str = "INSERT INTO sessions (id, activityId, startTs, endTs, date)
     VALUES (?1, ?2, ?3, NULL, ?4)";

const SESSION_END_SQL: &str = "UPDATE sessions SET endTs = ?1 WHERE id = ?2";

const SESSION_DELETE_BY_ACTIVITY_SQL: &str = "DELETE FROM sessions WHERE activityId = ?1";

/// SQLite repository for sessions.
pub struct SqliteSessionRepository {
    db: Arc<DbManager>,
}

impl SqliteSessionRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SessionRepositoryPort for SqliteSessionRepository {
    async fn list(&self) -> Result<Vec<Session>> {
        self.db.with_conn("session.list", |conn| {
            let mut stmt = conn.prepare(SESSION_LIST_QUERY)?;
            let rows = stmt.query_map([], map_session_row)?;
            rows.collect()
        })
    }

    async fn get_running_session(&self) -> Result<Option<Session>> {
        self.db.with_conn("session.running", |conn| {
            conn.query_row(SESSION_RUNNING_QUERY, [], map_session_row).optional()
        })
    }

    async fn create_session(
        &self,
        activity_id: &str,
        start_ts: i64,
        date: &str,
    ) -> Result<Session> {
        let session = Session {
            id: Uuid::new_v4().to_string(),
            activity_id: activity_id.into(),
            start_ts,
            end_ts: None,
            date: date.into(),
        };
        self.db.with_conn("session.create", |conn| {
            conn.execute(
                SESSION_INSERT_SQL,
                (&session.id, &session.activity_id, session.start_ts, &session.date),
            )
        })?;
        Ok(session)
    }

    async fn end_session(&self, session_id: &str, end_ts: i64) -> Result<()> {
        self.db.with_conn("session.end", |conn| {
            conn.execute(SESSION_END_SQL, (end_ts, session_id))
        })?;
        Ok(())
    }

    async fn delete_by_activity(&self, activity_id: &str) -> Result<()> {
        self.db.with_conn("session.delete_by_activity", |conn| {
            conn.execute(SESSION_DELETE_BY_ACTIVITY_SQL, [activity_id])
        })?;
        Ok(())
    }
}

fn map_session_row(row: &Row<'_>) -> rusqlite::Result<Session> {
    Ok(Session {
        id: row.get(0)?,
        activity_id: row.get(1)?,
        start_ts: row.get(2)?,
        end_ts: row.get(3)?,
        date: row.get(4)?,
    })
}
