//! Shared handle to the local track database
//!
//! One connection for the whole process, handed out to any module that
//! declares a need for it. Locking is this handle's own concern; callers
//! just issue queries.

use crate::Result;
use rusqlite::{Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

pub struct Database {
    conn: Mutex<Connection>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackRecord {
    pub artist: String,
    pub title: String,
    pub difficulty: String,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        Self::init(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS tracks (
                id INTEGER PRIMARY KEY,
                artist TEXT NOT NULL,
                title TEXT NOT NULL,
                difficulty TEXT NOT NULL DEFAULT ''
            )",
            [],
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn insert_track(&self, artist: &str, title: &str, difficulty: &str) -> Result<()> {
        self.lock().execute(
            "INSERT INTO tracks (artist, title, difficulty) VALUES (?1, ?2, ?3)",
            rusqlite::params![artist, title, difficulty],
        )?;
        Ok(())
    }

    /// Find the track whose "Artist - Title" string occurs in `raw`.
    /// The longest match wins, so "Artist - Title (extended)" does not lose
    /// to a shorter entry that happens to be a prefix.
    pub fn match_raw(&self, raw: &str) -> Result<Option<TrackRecord>> {
        let conn = self.lock();
        let mut stmt = conn.prepare(
            "SELECT artist, title, difficulty FROM tracks
             WHERE instr(?1, artist || ' - ' || title) > 0
             ORDER BY length(artist || title) DESC
             LIMIT 1",
        )?;
        let row = stmt
            .query_row([raw], |row| {
                Ok(TrackRecord {
                    artist: row.get(0)?,
                    title: row.get(1)?,
                    difficulty: row.get(2)?,
                })
            })
            .optional()?;
        Ok(row)
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
