//! SQLite-backed implementation of the `NoteRepository` port.

use std::sync::Arc;

use async_trait::async_trait;
use goaltimer_core::NoteRepository as NoteRepositoryPort;
use goaltimer_domain::{Note, Result};
use rusqlite::{OptionalExtension, Row};
use uuid::Uuid;

use super::manager::DbManager;

const NOTE_LIST_QUERY: &str =
    "SELECT id, date, activityId, text, updatedAt FROM notes ORDER BY updatedAt DESC";

const NOTE_BY_DATE_QUERY: &str =
    "SELECT id, date, activityId, text, updatedAt FROM notes WHERE date = ?1";

const NOTE_ID_QUERY: &str = "SELECT id FROM notes WHERE date = ?1 AND activityId = ?2";

const NOTE_UPSERT_SQL: &str = "INSERT INTO notes (id, date, activityId, text, updatedAt)
     VALUES (?1, ?2, ?3, ?4, ?5)
     ON CONFLICT(date, activityId) DO UPDATE SET text = excluded.text,
         updatedAt = excluded.updatedAt";

const NOTE_DELETE_SQL: &str = "DELETE FROM notes WHERE date = ?1 AND activityId = ?2";

/// SQLite repository for notes.
pub struct SqliteNoteRepository {
    db: Arc<DbManager>,
}

impl SqliteNoteRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl NoteRepositoryPort for SqliteNoteRepository {
    async fn list(&self) -> Result<Vec<Note>> {
        self.db.with_conn("note.list", |conn| {
            let mut stmt = conn.prepare(NOTE_LIST_QUERY)?;
            let rows = stmt.query_map([], map_note_row)?;
            rows.collect()
        })
    }

    async fn get_by_date(&self, date: &str) -> Result<Vec<Note>> {
        self.db.with_conn("note.get_by_date", |conn| {
            let mut stmt = conn.prepare(NOTE_BY_DATE_QUERY)?;
            let rows = stmt.query_map([date], map_note_row)?;
            rows.collect()
        })
    }

    async fn upsert_note(
        &self,
        activity_id: &str,
        date: &str,
        text: &str,
        updated_at: i64,
    ) -> Result<Note> {
        let existing: Option<String> = self.db.with_conn("note.find", |conn| {
            conn.query_row(NOTE_ID_QUERY, [date, activity_id], |row| row.get(0)).optional()
        })?;
        let id = existing.unwrap_or_else(|| Uuid::new_v4().to_string());
        self.db.with_conn("note.upsert", |conn| {
            conn.execute(NOTE_UPSERT_SQL, (&id, date, activity_id, text, updated_at))
        })?;
        Ok(Note {
            id,
            date: date.into(),
            activity_id: activity_id.into(),
            text: text.into(),
            updated_at,
        })
    }

    async fn delete_note(&self, activity_id: &str, date: &str) -> Result<()> {
        self.db
            .with_conn("note.delete", |conn| conn.execute(NOTE_DELETE_SQL, [date, activity_id]))?;
        Ok(())
    }
}

fn map_note_row(row: &Row<'_>) -> rusqlite::Result<Note> {
    Ok(Note {
        id: row.get(0)?,
        date: row.get(1)?,
        activity_id: row.get(2)?,
        text: row.get(3)?,
        updated_at: row.get(4)?,
    })
}
