//! Durable stores for progression snapshots and the session ledger
//!
//! The engine only ever sees the two traits here. SQLite implementations
//! back the CLI; the in-memory pair backs tests and ephemeral runs. The
//! session scratch file that carries a live session between short-lived
//! CLI invocations also lives in this module.

mod db;
mod history;
mod memory;
mod profile;
mod session_file;

pub use db::TrackerDb;
pub use history::SqliteHistoryStore;
pub use memory::{MemoryHistoryStore, MemoryProfileStore};
pub use profile::SqliteProfileStore;
pub use session_file::SessionFile;

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::{HistoryEntry, ProgressionSnapshot};

/// Durable home of one progression snapshot per user
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Load a user's snapshot. `Ok(None)` means the user has no record yet
    /// and the caller starts from a fresh one; it is not an error.
    async fn load(&self, user_id: &str) -> Result<Option<ProgressionSnapshot>>;

    /// Write the full snapshot, replacing whatever was stored.
    async fn save(&self, user_id: &str, snapshot: &ProgressionSnapshot) -> Result<()>;
}

/// Append-only home of the session ledger
#[async_trait]
pub trait HistoryStore: Send + Sync {
    async fn append(&self, user_id: &str, entry: &HistoryEntry) -> Result<()>;

    /// Every entry for the user, oldest first.
    async fn list(&self, user_id: &str) -> Result<Vec<HistoryEntry>>;

    /// Drop every entry for the user. Only a full reset calls this.
    async fn clear(&self, user_id: &str) -> Result<()>;
}
