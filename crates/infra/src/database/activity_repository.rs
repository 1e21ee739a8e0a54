//! SQLite-backed implementation of the `ActivityRepository` port.

use std::sync::Arc;

use async_trait::async_trait;
use goaltimer_core::{ActivityRepository as ActivityRepositoryPort, Clock};
use goaltimer_domain::{Activity, ActivityInput, ActivityUpdate, GoalTimerError, Result};
use rusqlite::{OptionalExtension, Row};

use super::manager::DbManager;

const ACTIVITY_LIST_QUERY: &str =
    "SELECT id, name, color, createdAt, defaultGoalMinutes FROM activities ORDER BY createdAt ASC";

const ACTIVITY_BY_ID_QUERY: &str =
    "SELECT id, name, color, createdAt, defaultGoalMinutes FROM activities WHERE id = ?1 LIMIT 1";

const ACTIVITY_INSERT_SQL: &str = "INSERT INTO activities (id, name, color, createdAt, defaultGoalMinutes)
     VALUES (?1, ?2, ?3, ?4, ?5)";

const ACTIVITY_UPDATE_SQL: &str =
    "UPDATE activities SET name = ?1, color = ?2, defaultGoalMinutes = ?3 WHERE id = ?4";

const ACTIVITY_DELETE_SQL: &str = "DELETE FROM activities WHERE id = ?1";

/// SQLite repository for activities.
pub struct SqliteActivityRepository {
    db: Arc<DbManager>,
    clock: Arc<dyn Clock>,
}

impl SqliteActivityRepository {
    pub fn new(db: Arc<DbManager>, clock: Arc<dyn Clock>) -> Self {
        Self { db, clock }
    }

    fn get_by_id(&self, id: &str) -> Result<Activity> {
        self.db
            .with_conn("activity.get", |conn| {
                conn.query_row(ACTIVITY_BY_ID_QUERY, [id], map_activity_row).optional()
            })?
            .ok_or_else(|| GoalTimerError::NotFound(format!("activity {id}")))
    }
}

#[async_trait]
impl ActivityRepositoryPort for SqliteActivityRepository {
    async fn list(&self) -> Result<Vec<Activity>> {
        self.db.with_conn("activity.list", |conn| {
            let mut stmt = conn.prepare(ACTIVITY_LIST_QUERY)?;
            let rows = stmt.query_map([], map_activity_row)?;
            rows.collect()
        })
    }

    async fn create(&self, input: ActivityInput) -> Result<Activity> {
        let activity = Activity::new(input, self.clock.now_ms());
        self.db.with_conn("activity.create", |conn| {
            conn.execute(
                ACTIVITY_INSERT_SQL,
                (
                    &activity.id,
                    &activity.name,
                    &activity.color,
                    activity.created_at,
                    activity.default_goal_minutes,
                ),
            )
        })?;
        Ok(activity)
    }

    async fn update(&self, id: &str, updates: ActivityUpdate) -> Result<Activity> {
        let mut activity = self.get_by_id(id)?;
        activity.apply(updates);
        self.db.with_conn("activity.update", |conn| {
            conn.execute(
                ACTIVITY_UPDATE_SQL,
                (&activity.name, &activity.color, activity.default_goal_minutes, id),
            )
        })?;
        Ok(activity)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.db.with_conn("activity.delete", |conn| conn.execute(ACTIVITY_DELETE_SQL, [id]))?;
        Ok(())
    }
}

fn map_activity_row(row: &Row<'_>) -> rusqlite::Result<Activity> {
    let default_goal: Option<i64> = row.get(4)?;
    Ok(Activity {
        id: row.get(0)?,
        name: row.get(1)?,
        color: row.get(2)?,
        created_at: row.get(3)?,
        default_goal_minutes: default_goal.and_then(|v| u32::try_from(v).ok()),
    })
}
