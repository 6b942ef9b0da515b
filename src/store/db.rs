//! SQLite database connection and schema for the tracker
//!
//! Manages the `~/.rankup/tracker.db` database holding progression
//! snapshots and the session ledger.

use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use rusqlite::Connection;

/// Database wrapper shared by the SQLite stores
#[derive(Clone)]
pub struct TrackerDb {
    conn: Arc<Mutex<Connection>>,
}

impl TrackerDb {
    /// Open or create the tracker database at a specific path
    pub fn open(path: &Path) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create data dir: {}", parent.display()))?;
        }

        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open tracker db: {}", path.display()))?;

        // WAL keeps readers (status, history) from blocking a writer
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;

        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.init_schema()?;
        Ok(db)
    }

    /// Get a reference to the connection (for queries)
    pub fn conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().expect("Tracker DB lock poisoned")
    }

    /// Initialize the database schema
    fn init_schema(&self) -> Result<()> {
        let conn = self.conn();
        conn.execute_batch(SCHEMA_SQL)?;
        Ok(())
    }
}

/// SQL schema for the tracker database
const SCHEMA_SQL: &str = r#"
-- Progression snapshot (one row per user)
CREATE TABLE IF NOT EXISTS profiles (
    user_id TEXT PRIMARY KEY,
    total_xp INTEGER NOT NULL DEFAULT 0,
    in_placements INTEGER NOT NULL DEFAULT 1,
    placement_scores TEXT NOT NULL DEFAULT '[]',
    tier_index INTEGER NOT NULL DEFAULT 0,
    lp INTEGER NOT NULL DEFAULT 0,
    updated_at INTEGER NOT NULL
);

-- Session ledger (one row per completed session, append-only)
CREATE TABLE IF NOT EXISTS history (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id TEXT NOT NULL,
    date TEXT NOT NULL,
    weekday TEXT NOT NULL,
    started_clock TEXT NOT NULL,
    ended_clock TEXT NOT NULL,
    hours_worked REAL NOT NULL,
    tasks_completed INTEGER NOT NULL,
    xp INTEGER NOT NULL,
    hours_per_task REAL NOT NULL,
    lp_change INTEGER,
    lp_after INTEGER,
    recorded_at INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_history_user ON history(user_id, id);

-- Schema version
CREATE TABLE IF NOT EXISTS schema_version (version INTEGER PRIMARY KEY);
INSERT OR IGNORE INTO schema_version VALUES (1);
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_open_and_init() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test_tracker.db");
        let db = TrackerDb::open(&db_path).unwrap();

        // Verify tables exist
        let conn = db.conn();
        let mut stmt = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table'")
            .unwrap();
        let tables: Vec<String> = stmt
            .query_map([], |row| row.get(0))
            .unwrap()
            .filter_map(|r| r.ok())
            .collect();

        assert!(tables.contains(&"profiles".to_string()));
        assert!(tables.contains(&"history".to_string()));
        assert!(tables.contains(&"schema_version".to_string()));
    }

    #[test]
    fn test_reopen_is_idempotent() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test_tracker.db");
        drop(TrackerDb::open(&db_path).unwrap());
        // A second open must not trip over the existing schema
        TrackerDb::open(&db_path).unwrap();
    }
}
