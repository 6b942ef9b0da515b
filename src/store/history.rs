//! SQLite-backed history store
//!
//! One row per completed session, append-only. Dates and clocks are stored
//! as ISO text so the rows stay readable in any SQLite browser.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime, Utc};
use rusqlite::params;

use super::{HistoryStore, TrackerDb};
use crate::domain::HistoryEntry;

#[derive(Clone)]
pub struct SqliteHistoryStore {
    db: TrackerDb,
}

impl SqliteHistoryStore {
    pub fn new(db: TrackerDb) -> Self {
        Self { db }
    }
}

#[async_trait]
impl HistoryStore for SqliteHistoryStore {
    async fn append(&self, user_id: &str, entry: &HistoryEntry) -> Result<()> {
        let conn = self.db.conn();
        conn.execute(
            r#"
            INSERT INTO history
                (user_id, date, weekday, started_clock, ended_clock, hours_worked,
                 tasks_completed, xp, hours_per_task, lp_change, lp_after, recorded_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            "#,
            params![
                user_id,
                entry.date.to_string(),
                entry.weekday,
                entry.started_clock.to_string(),
                entry.ended_clock.to_string(),
                entry.hours_worked,
                entry.tasks_completed,
                entry.xp,
                entry.hours_per_task,
                entry.lp_change,
                entry.lp_after,
                Utc::now().timestamp_millis(),
            ],
        )
        .context("Failed to append history row")?;
        Ok(())
    }

    async fn list(&self, user_id: &str) -> Result<Vec<HistoryEntry>> {
        let conn = self.db.conn();
        let mut stmt = conn.prepare(
            "SELECT date, weekday, started_clock, ended_clock, hours_worked,
                    tasks_completed, xp, hours_per_task, lp_change, lp_after
             FROM history WHERE user_id = ?1 ORDER BY id ASC",
        )?;
        let rows: Vec<HistoryRow> = stmt
            .query_map([user_id], |row| {
                Ok(HistoryRow {
                    date: row.get(0)?,
                    weekday: row.get(1)?,
                    started_clock: row.get(2)?,
                    ended_clock: row.get(3)?,
                    hours_worked: row.get(4)?,
                    tasks_completed: row.get(5)?,
                    xp: row.get(6)?,
                    hours_per_task: row.get(7)?,
                    lp_change: row.get(8)?,
                    lp_after: row.get(9)?,
                })
            })?
            .collect::<rusqlite::Result<_>>()
            .context("Failed to read history rows")?;

        rows.into_iter().map(HistoryRow::try_into_entry).collect()
    }

    async fn clear(&self, user_id: &str) -> Result<()> {
        let conn = self.db.conn();
        conn.execute("DELETE FROM history WHERE user_id = ?1", [user_id])
            .context("Failed to clear history")?;
        Ok(())
    }
}

/// Raw text row before the date and clock columns are parsed
struct HistoryRow {
    date: String,
    weekday: String,
    started_clock: String,
    ended_clock: String,
    hours_worked: f64,
    tasks_completed: u32,
    xp: u32,
    hours_per_task: f64,
    lp_change: Option<i32>,
    lp_after: Option<u32>,
}

impl HistoryRow {
    fn try_into_entry(self) -> Result<HistoryEntry> {
        Ok(HistoryEntry {
            date: self
                .date
                .parse::<NaiveDate>()
                .with_context(|| format!("Corrupt date in history row: {}", self.date))?,
            weekday: self.weekday,
            started_clock: self
                .started_clock
                .parse::<NaiveTime>()
                .with_context(|| format!("Corrupt start clock in history row: {}", self.started_clock))?,
            ended_clock: self
                .ended_clock
                .parse::<NaiveTime>()
                .with_context(|| format!("Corrupt end clock in history row: {}", self.ended_clock))?,
            hours_worked: self.hours_worked,
            tasks_completed: self.tasks_completed,
            xp: self.xp,
            hours_per_task: self.hours_per_task,
            lp_change: self.lp_change,
            lp_after: self.lp_after,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn test_store() -> (tempfile::TempDir, SqliteHistoryStore) {
        let dir = tempdir().unwrap();
        let db = TrackerDb::open(&dir.path().join("tracker.db")).unwrap();
        (dir, SqliteHistoryStore::new(db))
    }

    fn entry(xp: u32, lp_change: Option<i32>) -> HistoryEntry {
        HistoryEntry {
            date: NaiveDate::from_ymd_opt(2026, 8, 24).unwrap(),
            weekday: "Monday".to_string(),
            started_clock: NaiveTime::from_hms_opt(7, 0, 0).unwrap(),
            ended_clock: NaiveTime::from_hms_opt(11, 0, 0).unwrap(),
            hours_worked: 1.0,
            tasks_completed: 4,
            xp,
            hours_per_task: 0.25,
            lp_change,
            lp_after: lp_change.map(|_| 45),
        }
    }

    #[tokio::test]
    async fn test_append_and_list_in_insertion_order() {
        let (_dir, store) = test_store();
        store.append("ada", &entry(1152, None)).await.unwrap();
        store.append("ada", &entry(960, Some(20))).await.unwrap();

        let entries = store.list("ada").await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], entry(1152, None));
        assert_eq!(entries[1], entry(960, Some(20)));
    }

    #[tokio::test]
    async fn test_clear_only_touches_one_user() {
        let (_dir, store) = test_store();
        store.append("ada", &entry(500, None)).await.unwrap();
        store.append("bob", &entry(600, None)).await.unwrap();

        store.clear("ada").await.unwrap();
        assert!(store.list("ada").await.unwrap().is_empty());
        assert_eq!(store.list("bob").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_placement_rows_keep_null_lp() {
        let (_dir, store) = test_store();
        store.append("ada", &entry(700, None)).await.unwrap();
        let entries = store.list("ada").await.unwrap();
        assert_eq!(entries[0].lp_change, None);
        assert_eq!(entries[0].lp_after, None);
    }
}
