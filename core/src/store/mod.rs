//! SQLite persistence layer.
//!
//! RULE: Only the store talks to the database.
//! The service calls store methods; it never executes SQL directly.

use crate::{error::DeskResult, event::{DeskEvent, EventLogEntry}};
use rusqlite::{params, Connection};

mod record;
mod user;

pub struct DeskStore {
    conn: Connection,
}

impl DeskStore {
    /// Open (or create) the desk database at `path`.
    pub fn open(path: &str) -> DeskResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI,
        )?;
        // WAL mode only for real files (:memory: ignores it).
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> DeskResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> DeskResult<()> {
        self.conn
            .execute_batch(include_str!("../../../migrations/001_foundation.sql"))?;
        Ok(())
    }

    // ── Event log ──────────────────────────────────────────────

    pub fn append_event(&self, event: &DeskEvent, created_at: &str) -> DeskResult<()> {
        self.conn.execute(
            "INSERT INTO event_log (event_type, payload, created_at) VALUES (?1, ?2, ?3)",
            params![event.type_name(), serde_json::to_string(event)?, created_at],
        )?;
        Ok(())
    }

    /// Most recent `limit` events, oldest first.
    pub fn recent_events(&self, limit: usize) -> DeskResult<Vec<EventLogEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, event_type, payload, created_at FROM (
                 SELECT id, event_type, payload, created_at FROM event_log
                 ORDER BY id DESC LIMIT ?1
             ) ORDER BY id ASC",
        )?;
        let entries = stmt
            .query_map(params![limit as i64], |row| {
                Ok(EventLogEntry {
                    id:         Some(row.get(0)?),
                    event_type: row.get(1)?,
                    payload:    row.get(2)?,
                    created_at: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    pub fn event_count(&self, event_type: &str) -> DeskResult<i64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM event_log WHERE event_type = ?1",
            params![event_type],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}
