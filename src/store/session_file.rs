//! Session scratch file
//!
//! The CLI is a short-lived process, so the live session (checklist, start
//! instant, pause bookkeeping) is carried between invocations in a TOML
//! file next to the database. An exclusive advisory lock is held for the
//! whole command: a second invocation racing the first is rejected up
//! front, not queued.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use fs2::FileExt;

use crate::domain::Session;

const SESSION_FILE: &str = "session.toml";
const LOCK_FILE: &str = "session.lock";

pub struct SessionFile {
    path: PathBuf,
    /// Held for the lifetime of the command; dropping releases the lock
    _lock_file: File,
}

impl SessionFile {
    /// Open the scratch file for this data dir, taking the exclusive lock.
    /// Fails immediately when another invocation already holds it.
    pub fn acquire(data_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(data_dir)
            .with_context(|| format!("Failed to create data dir: {}", data_dir.display()))?;

        let lock_path = data_dir.join(LOCK_FILE);
        let lock_file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .with_context(|| format!("Failed to create lock file: {}", lock_path.display()))?;

        if lock_file.try_lock_exclusive().is_err() {
            bail!("another rankup command is already running; try again in a moment");
        }

        Ok(Self {
            path: data_dir.join(SESSION_FILE),
            _lock_file: lock_file,
        })
    }

    /// Load the carried session, or a fresh one when no file exists yet.
    pub fn load(&self) -> Result<Session> {
        Self::read_session(&self.path)
    }

    /// Atomically write the session back (temp file + rename).
    pub fn save(&self, session: &Session) -> Result<()> {
        let content =
            toml::to_string_pretty(session).with_context(|| "Failed to serialize session")?;

        let temp_path = self.path.with_extension("toml.tmp");
        let mut temp_file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)
            .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;

        temp_file
            .write_all(content.as_bytes())
            .with_context(|| "Failed to write session content")?;

        temp_file
            .sync_all()
            .with_context(|| "Failed to sync session file")?;

        std::fs::rename(&temp_path, &self.path)
            .with_context(|| format!("Failed to rename session file: {}", self.path.display()))?;

        Ok(())
    }

    /// Read the session without taking the lock. Display-only callers (the
    /// live status watch) use this so they never block a real command.
    pub fn peek(data_dir: &Path) -> Result<Session> {
        Self::read_session(&data_dir.join(SESSION_FILE))
    }

    fn read_session(path: &Path) -> Result<Session> {
        if !path.exists() {
            return Ok(Session::new());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read session file: {}", path.display()))?;
        let session = toml::from_str(&content)
            .with_context(|| format!("Failed to parse session file: {}", path.display()))?;
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use tempfile::tempdir;

    #[test]
    fn test_fresh_dir_yields_idle_session() {
        let dir = tempdir().unwrap();
        let file = SessionFile::acquire(dir.path()).unwrap();
        let session = file.load().unwrap();
        assert!(session.tasks().is_empty());
        assert!(session.started_at().is_none());
    }

    #[test]
    fn test_save_and_reload_running_session() {
        let dir = tempdir().unwrap();
        let start = Utc.with_ymd_and_hms(2026, 8, 24, 9, 0, 0).unwrap();

        {
            let file = SessionFile::acquire(dir.path()).unwrap();
            let mut session = file.load().unwrap();
            session.tasks_mut().add("write report").unwrap();
            session.tasks_mut().add("review queue").unwrap();
            session.start(start).unwrap();
            session.pause(start + chrono::TimeDelta::minutes(30)).unwrap();
            file.save(&session).unwrap();
        }

        let file = SessionFile::acquire(dir.path()).unwrap();
        let session = file.load().unwrap();
        assert_eq!(session.tasks().len(), 2);
        assert_eq!(session.started_at(), Some(start));
        assert_eq!(
            session.elapsed(start + chrono::TimeDelta::hours(2)),
            chrono::TimeDelta::minutes(30)
        );
    }

    #[test]
    fn test_second_acquire_is_rejected_while_held() {
        let dir = tempdir().unwrap();
        let held = SessionFile::acquire(dir.path()).unwrap();
        assert!(SessionFile::acquire(dir.path()).is_err());
        drop(held);
        assert!(SessionFile::acquire(dir.path()).is_ok());
    }

    #[test]
    fn test_peek_reads_without_locking() {
        let dir = tempdir().unwrap();
        let held = SessionFile::acquire(dir.path()).unwrap();
        let mut session = held.load().unwrap();
        session.tasks_mut().add("task").unwrap();
        held.save(&session).unwrap();

        // Lock still held by `held`, peek works anyway
        let peeked = SessionFile::peek(dir.path()).unwrap();
        assert_eq!(peeked.tasks().len(), 1);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join(SESSION_FILE), "not toml {{{{").unwrap();
        let file = SessionFile::acquire(dir.path()).unwrap();
        assert!(file.load().is_err());
    }
}
