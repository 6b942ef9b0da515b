//! Progression engine
//!
//! Owns one user's live session, progression snapshot, and history ledger,
//! and wires the scorer and the ladder together when a session completes.
//! The durable stores are injected as traits; every transition commits in
//! memory first and is then pushed to the stores, so a failed write never
//! rolls back what the user already did. Store failures come back on the
//! report instead.
//!
//! ```ignore
//! let tz = *Local::now().offset();
//! let mut engine = ProgressionEngine::load("ada", profiles, history, tz).await?;
//! engine.add_task("write the report")?;
//! engine.start_session(Utc::now())?;
//! engine.toggle_task(0)?;
//! let report = engine.stop_session(Utc::now()).await?;
//! println!("+{} XP", report.entry.xp);
//! ```

use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, FixedOffset, TimeDelta, Utc};
use tracing::{info, warn};

use crate::domain::{
    CompletedSession, EngineError, HistoryEntry, HistoryLedger, HistoryPage, LedgerAverages,
    ProgressionSnapshot, RankOutcome, Session, Task, compute_xp,
};
use crate::store::{HistoryStore, ProfileStore};

/// Which durable store a failed write was aimed at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreTarget {
    Profile,
    History,
}

impl std::fmt::Display for StoreTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreTarget::Profile => write!(f, "profile store"),
            StoreTarget::History => write!(f, "history store"),
        }
    }
}

/// A persistence failure observed after a committed transition
#[derive(Debug)]
pub struct StoreFailure {
    pub target: StoreTarget,
    pub error: anyhow::Error,
}

/// Everything the presentation layer needs after a completed session
#[derive(Debug)]
pub struct CompletionReport {
    pub entry: HistoryEntry,
    pub outcome: RankOutcome,
    /// Snapshot after the session was folded in
    pub snapshot: ProgressionSnapshot,
    /// Failures persisting the already-committed transition; never fatal
    pub store_errors: Vec<StoreFailure>,
}

pub struct ProgressionEngine {
    user_id: String,
    session: Session,
    snapshot: ProgressionSnapshot,
    ledger: HistoryLedger,
    /// Zone the user's wall clock lives in; time-of-day bonuses and ledger
    /// clocks are judged against it, never against the ambient host zone
    tz: FixedOffset,
    profile_store: Arc<dyn ProfileStore>,
    history_store: Arc<dyn HistoryStore>,
}

impl ProgressionEngine {
    /// Load a user's engine from the stores. A user with no stored profile
    /// starts fresh placements; that is the normal first run, not an error.
    /// `tz` is the offset sessions are scored and logged in: the CLI passes
    /// the local offset, tests pass a fixed one.
    pub async fn load(
        user_id: &str,
        profile_store: Arc<dyn ProfileStore>,
        history_store: Arc<dyn HistoryStore>,
        tz: FixedOffset,
    ) -> Result<Self> {
        let snapshot = match profile_store.load(user_id).await? {
            Some(snapshot) => snapshot,
            None => {
                info!("No stored profile for '{}', starting placements", user_id);
                ProgressionSnapshot::fresh()
            }
        };
        let ledger = HistoryLedger::from_entries(history_store.list(user_id).await?);
        Ok(Self {
            user_id: user_id.to_string(),
            session: Session::new(),
            snapshot,
            ledger,
            tz,
            profile_store,
            history_store,
        })
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Replace the live session, e.g. with one carried over from a scratch
    /// file by a previous invocation.
    pub fn restore_session(&mut self, session: Session) {
        self.session = session;
    }

    pub fn snapshot(&self) -> &ProgressionSnapshot {
        &self.snapshot
    }

    pub fn ledger(&self) -> &HistoryLedger {
        &self.ledger
    }

    pub fn history_page(&self, index: usize, page_size: usize) -> HistoryPage {
        self.ledger.page(index, page_size)
    }

    pub fn history_aggregate(&self) -> LedgerAverages {
        self.ledger.aggregate()
    }

    /// Worked time of the live session at `now`
    pub fn elapsed(&self, now: DateTime<Utc>) -> TimeDelta {
        self.session.elapsed(now)
    }

    // --- checklist ---

    pub fn add_task(&mut self, title: &str) -> Result<(), EngineError> {
        self.session.tasks_mut().add(title)
    }

    pub fn edit_task(&mut self, index: usize, title: &str) -> Result<(), EngineError> {
        self.session.tasks_mut().edit(index, title)
    }

    pub fn remove_task(&mut self, index: usize) -> Result<Task, EngineError> {
        self.session.tasks_mut().remove(index)
    }

    pub fn move_task_up(&mut self, index: usize) -> Result<(), EngineError> {
        self.session.tasks_mut().move_up(index)
    }

    pub fn move_task_down(&mut self, index: usize) -> Result<(), EngineError> {
        self.session.tasks_mut().move_down(index)
    }

    /// Toggle a task between open and done, returning the new flag.
    pub fn toggle_task(&mut self, index: usize) -> Result<bool, EngineError> {
        self.session.tasks_mut().toggle_done(index)
    }

    // --- session lifecycle ---

    pub fn start_session(&mut self, now: DateTime<Utc>) -> Result<(), EngineError> {
        self.session.start(now)?;
        info!("Session started with {} task(s)", self.session.tasks().len());
        Ok(())
    }

    pub fn pause_session(&mut self, now: DateTime<Utc>) -> Result<(), EngineError> {
        self.session.pause(now)
    }

    pub fn resume_session(&mut self, now: DateTime<Utc>) -> Result<(), EngineError> {
        self.session.resume(now)
    }

    /// Stop the session and run the completion pipeline: score the
    /// pause-free window, fold the XP into the ladder, append the ledger
    /// entry, reset the session, then persist.
    pub async fn stop_session(
        &mut self,
        now: DateTime<Utc>,
    ) -> Result<CompletionReport, EngineError> {
        let completed = self.session.stop(now)?;
        Ok(self.complete(completed).await)
    }

    async fn complete(&mut self, completed: CompletedSession) -> CompletionReport {
        // Score against the user's wall clock; the window end is shifted
        // earlier by the paused time.
        let start_local = completed.started_at.with_timezone(&self.tz);
        let xp_end_local = completed.xp_end().with_timezone(&self.tz);
        let xp = compute_xp(&start_local, &xp_end_local);

        let outcome = self.snapshot.record_session(xp);
        let entry = HistoryEntry::from_completed(&completed, &self.tz, xp, &outcome);
        self.ledger.append(entry.clone());
        self.session = Session::new();
        info!(
            "Session complete: {} task(s), {:.2}h worked, +{} XP",
            entry.tasks_completed, entry.hours_worked, xp
        );

        let mut store_errors = Vec::new();
        store_errors.extend(self.save_profile().await);
        if let Err(error) = self.history_store.append(&self.user_id, &entry).await {
            warn!("Failed to append history for '{}': {:#}", self.user_id, error);
            store_errors.push(StoreFailure {
                target: StoreTarget::History,
                error,
            });
        }

        CompletionReport {
            entry,
            outcome,
            snapshot: self.snapshot.clone(),
            store_errors,
        }
    }

    /// Wipe everything back to a fresh account: placements restart, the
    /// ledger empties, the live session is discarded.
    pub async fn reset(&mut self) -> Vec<StoreFailure> {
        self.session = Session::new();
        self.snapshot = ProgressionSnapshot::fresh();
        self.ledger = HistoryLedger::new();
        info!("Progression reset for '{}'", self.user_id);

        let mut store_errors = Vec::new();
        store_errors.extend(self.save_profile().await);
        if let Err(error) = self.history_store.clear(&self.user_id).await {
            warn!("Failed to clear history for '{}': {:#}", self.user_id, error);
            store_errors.push(StoreFailure {
                target: StoreTarget::History,
                error,
            });
        }
        store_errors
    }

    async fn save_profile(&self) -> Option<StoreFailure> {
        match self.profile_store.save(&self.user_id, &self.snapshot).await {
            Ok(()) => None,
            Err(error) => {
                warn!("Failed to save profile for '{}': {:#}", self.user_id, error);
                Some(StoreFailure {
                    target: StoreTarget::Profile,
                    error,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SessionStatus;
    use crate::store::{MemoryHistoryStore, MemoryProfileStore};
    use anyhow::bail;
    use async_trait::async_trait;
    use chrono::TimeZone;

    fn at(hour: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 24, hour, min, 0).unwrap()
    }

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    async fn engine_in(tz: FixedOffset) -> ProgressionEngine {
        ProgressionEngine::load(
            "test",
            Arc::new(MemoryProfileStore::new()),
            Arc::new(MemoryHistoryStore::new()),
            tz,
        )
        .await
        .unwrap()
    }

    async fn memory_engine() -> ProgressionEngine {
        engine_in(utc()).await
    }

    struct FailingHistoryStore;

    #[async_trait]
    impl HistoryStore for FailingHistoryStore {
        async fn append(&self, _user_id: &str, _entry: &HistoryEntry) -> Result<()> {
            bail!("disk unavailable")
        }

        async fn list(&self, _user_id: &str) -> Result<Vec<HistoryEntry>> {
            Ok(Vec::new())
        }

        async fn clear(&self, _user_id: &str) -> Result<()> {
            bail!("disk unavailable")
        }
    }

    #[tokio::test]
    async fn test_lifecycle_guards_surface_engine_errors() {
        let mut engine = memory_engine().await;
        assert_eq!(engine.start_session(at(9, 0)), Err(EngineError::EmptyChecklist));

        engine.add_task("only task").unwrap();
        engine.start_session(at(9, 0)).unwrap();
        assert!(matches!(
            engine.stop_session(at(10, 0)).await,
            Err(EngineError::IncompleteTasks { remaining: 1 })
        ));
        // The rejection left the session running
        assert_eq!(engine.session().status(), SessionStatus::Running);
    }

    #[tokio::test]
    async fn test_completion_resets_the_session() {
        let mut engine = memory_engine().await;
        engine.add_task("only task").unwrap();
        engine.start_session(at(9, 0)).unwrap();
        engine.toggle_task(0).unwrap();

        let report = engine.stop_session(at(10, 0)).await.unwrap();
        assert!(report.store_errors.is_empty());
        assert_eq!(report.entry.tasks_completed, 1);
        assert_eq!(engine.session().status(), SessionStatus::Idle);
        assert!(engine.session().tasks().is_empty());
        assert_eq!(engine.ledger().len(), 1);
    }

    #[tokio::test]
    async fn test_store_failure_is_reported_not_fatal() {
        let mut engine = ProgressionEngine::load(
            "test",
            Arc::new(MemoryProfileStore::new()),
            Arc::new(FailingHistoryStore),
            utc(),
        )
        .await
        .unwrap();

        engine.add_task("only task").unwrap();
        engine.start_session(at(9, 0)).unwrap();
        engine.toggle_task(0).unwrap();
        let report = engine.stop_session(at(10, 0)).await.unwrap();

        assert_eq!(report.store_errors.len(), 1);
        assert_eq!(report.store_errors[0].target, StoreTarget::History);
        // The in-memory transition still committed
        assert_eq!(engine.ledger().len(), 1);
        assert_eq!(engine.snapshot().placement().games_played(), 1);

        // And the engine keeps working afterwards
        engine.add_task("next task").unwrap();
        engine.start_session(at(11, 0)).unwrap();
    }

    #[tokio::test]
    async fn test_scoring_follows_the_injected_offset_not_the_host_zone() {
        // The same UTC day seen from two zones: 13:00-14:00 UTC is an
        // afternoon hour at +0 (no bonuses, 960) but 07:00-08:00 at -6,
        // which turns both bonuses on (1152).
        let mut plain = engine_in(utc()).await;
        plain.add_task("only task").unwrap();
        plain.start_session(at(13, 0)).unwrap();
        plain.toggle_task(0).unwrap();
        let report = plain.stop_session(at(14, 0)).await.unwrap();
        assert_eq!(report.entry.xp, 960);
        assert_eq!(report.entry.started_clock.to_string(), "13:00:00");

        let mut west = engine_in(FixedOffset::west_opt(6 * 3600).unwrap()).await;
        west.add_task("only task").unwrap();
        west.start_session(at(13, 0)).unwrap();
        west.toggle_task(0).unwrap();
        let report = west.stop_session(at(14, 0)).await.unwrap();
        assert_eq!(report.entry.xp, 1152);
        // The ledger clocks follow the same offset as the scorer
        assert_eq!(report.entry.started_clock.to_string(), "07:00:00");
    }

    #[tokio::test]
    async fn test_engine_views_expose_elapsed_and_history() {
        let mut engine = memory_engine().await;
        engine.add_task("only task").unwrap();
        engine.start_session(at(13, 0)).unwrap();
        assert_eq!(engine.elapsed(at(13, 45)), TimeDelta::minutes(45));
        engine.toggle_task(0).unwrap();
        engine.stop_session(at(15, 0)).await.unwrap();

        engine.add_task("only task").unwrap();
        engine.start_session(at(16, 0)).unwrap();
        engine.toggle_task(0).unwrap();
        engine.stop_session(at(17, 0)).await.unwrap();

        // Newest first, one entry per page
        let page = engine.history_page(0, 1);
        assert_eq!(page.page_count, 2);
        assert_eq!(page.entries[0].xp, 960); // The one-hour day

        let averages = engine.history_aggregate();
        assert!((averages.avg_hours - 1.5).abs() < 1e-9);
        assert!((averages.avg_tasks - 1.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_reset_clears_memory_and_stores() {
        let profiles = Arc::new(MemoryProfileStore::new());
        let history = Arc::new(MemoryHistoryStore::new());
        let mut engine = ProgressionEngine::load("test", profiles.clone(), history.clone(), utc())
            .await
            .unwrap();

        engine.add_task("only task").unwrap();
        engine.start_session(at(9, 0)).unwrap();
        engine.toggle_task(0).unwrap();
        engine.stop_session(at(10, 0)).await.unwrap();

        let failures = engine.reset().await;
        assert!(failures.is_empty());
        assert_eq!(engine.snapshot(), &ProgressionSnapshot::fresh());
        assert!(engine.ledger().is_empty());
        assert!(history.list("test").await.unwrap().is_empty());
        let stored = profiles.load("test").await.unwrap().unwrap();
        assert_eq!(stored, ProgressionSnapshot::fresh());

        // Resetting an already-fresh account is a no-op, not an error
        assert!(engine.reset().await.is_empty());
    }
}
