//! SQLite-backed implementation of the `GoalRepository` port.

use std::sync::Arc;

use async_trait::async_trait;
use goaltimer_core::GoalRepository as GoalRepositoryPort;
use goaltimer_domain::{DailyGoal, Result};
use rusqlite::{OptionalExtension, Row};
use uuid::Uuid;

use super::manager::DbManager;

const GOAL_LIST_QUERY: &str =
    "SELECT id, date, activityId, goalMinutes FROM daily_goals ORDER BY date ASC";

const GOAL_BY_DATE_QUERY: &str =
    "SELECT id, date, activityId, goalMinutes FROM daily_goals WHERE date = ?1";

const GOAL_ID_QUERY: &str =
    "SELECT id FROM daily_goals WHERE date = ?1 AND activityId = ?2";

const GOAL_UPSERT_SQL: &str = "INSERT INTO daily_goals (id, date, activityId, goalMinutes)
     VALUES (?1, ?2, ?3, ?4)
     ON CONFLICT(date, activityId) DO UPDATE SET goalMinutes = excluded.goalMinutes";

const GOAL_DELETE_SQL: &str = "DELETE FROM daily_goals WHERE date = ?1 AND activityId = ?2";

/// SQLite repository for daily goals.
pub struct SqliteGoalRepository {
    db: Arc<DbManager>,
}

impl SqliteGoalRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl GoalRepositoryPort for SqliteGoalRepository {
    async fn list(&self) -> Result<Vec<DailyGoal>> {
        self.db.with_conn("goal.list", |conn| {
            let mut stmt = conn.prepare(GOAL_LIST_QUERY)?;
            let rows = stmt.query_map([], map_goal_row)?;
            rows.collect()
        })
    }

    async fn get_by_date(&self, date: &str) -> Result<Vec<DailyGoal>> {
        self.db.with_conn("goal.get_by_date", |conn| {
            let mut stmt = conn.prepare(GOAL_BY_DATE_QUERY)?;
            let rows = stmt.query_map([date], map_goal_row)?;
            rows.collect()
        })
    }

    async fn set_goal(
        &self,
        activity_id: &str,
        date: &str,
        goal_minutes: u32,
    ) -> Result<DailyGoal> {
        // Keep the existing row id on upsert so the unique (date, activity)
        // record keeps its identity
        let existing: Option<String> = self.db.with_conn("goal.find", |conn| {
            conn.query_row(GOAL_ID_QUERY, [date, activity_id], |row| row.get(0)).optional()
        })?;
        let id = existing.unwrap_or_else(|| Uuid::new_v4().to_string());
        self.db.with_conn("goal.set", |conn| {
            conn.execute(GOAL_UPSERT_SQL, (&id, date, activity_id, goal_minutes))
        })?;
        Ok(DailyGoal {
            id,
            date: date.into(),
            activity_id: activity_id.into(),
            goal_minutes,
        })
    }

    async fn delete_goal(&self, activity_id: &str, date: &str) -> Result<()> {
        self.db
            .with_conn("goal.delete", |conn| conn.execute(GOAL_DELETE_SQL, [date, activity_id]))?;
        Ok(())
    }
}

fn map_goal_row(row: &Row<'_>) -> rusqlite::Result<DailyGoal> {
    let minutes: i64 = row.get(3)?;
    Ok(DailyGoal {
        id: row.get(0)?,
        date: row.get(1)?,
        activity_id: row.get(2)?,
        goal_minutes: u32::try_from(minutes).unwrap_or(0),
    })
}
