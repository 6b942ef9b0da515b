//! CLI command implementations
//!
//! One module per command group, each exposing an async `*_command`
//! function that `main` dispatches to. Commands that mutate state open a
//! [`Tracker`], which holds the exclusive session lock for the whole
//! invocation; read-only commands (status, history, export) go straight to
//! the stores and the scratch-file peek so they never block a real command.

pub mod export;
pub mod history;
pub mod init;
pub mod reset;
pub mod session;
pub mod status;
pub mod task;

use std::sync::Arc;

use anyhow::Result;
use chrono::Local;

use rankup::config::Config;
use rankup::engine::{ProgressionEngine, StoreFailure};
use rankup::store::{SessionFile, SqliteHistoryStore, SqliteProfileStore, TrackerDb};

const TRACKER_DB: &str = "tracker.db";

/// A mutating command's view of the world: the engine loaded from the
/// SQLite stores with the live session rehydrated from the scratch file.
/// Holding this holds the exclusive session lock; a second invocation is
/// rejected up front.
pub struct Tracker {
    pub config: Config,
    pub engine: ProgressionEngine,
    session_file: SessionFile,
}

impl Tracker {
    pub async fn open(config: Config) -> Result<Self> {
        let data_dir = config.data_dir();
        let session_file = SessionFile::acquire(&data_dir)?;
        let db = TrackerDb::open(&data_dir.join(TRACKER_DB))?;
        let mut engine = ProgressionEngine::load(
            &config.user,
            Arc::new(SqliteProfileStore::new(db.clone())),
            Arc::new(SqliteHistoryStore::new(db)),
            *Local::now().offset(),
        )
        .await?;
        engine.restore_session(session_file.load()?);
        Ok(Self {
            config,
            engine,
            session_file,
        })
    }

    /// Write the live session back to the scratch file for the next
    /// invocation.
    pub fn persist_session(&self) -> Result<()> {
        self.session_file.save(self.engine.session())
    }
}

/// History store for the read-only commands; no session lock involved.
pub fn open_history_store(config: &Config) -> Result<SqliteHistoryStore> {
    let db = TrackerDb::open(&config.data_dir().join(TRACKER_DB))?;
    Ok(SqliteHistoryStore::new(db))
}

/// Profile store for the read-only commands.
pub fn open_profile_store(config: &Config) -> Result<SqliteProfileStore> {
    let db = TrackerDb::open(&config.data_dir().join(TRACKER_DB))?;
    Ok(SqliteProfileStore::new(db))
}

/// Surface post-commit persistence failures without failing the command.
pub fn warn_store_failures(failures: &[StoreFailure]) {
    for failure in failures {
        eprintln!(
            "warning: failed to persist to the {}: {:#}",
            failure.target, failure.error
        );
    }
}
