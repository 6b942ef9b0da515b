//! Session state machine
//!
//! One session covers one tracked stretch of work: Idle until started,
//! Running or Paused while the clock is live, and a transient Completed the
//! moment a fully-checked list is stopped. All transitions take `now`
//! explicitly so the machine runs against any clock in tests; wall-clock
//! bookkeeping (start instant, accumulated pauses) lives here and nowhere
//! else.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use super::error::EngineError;
use super::task::TaskChecklist;

/// Lifecycle state of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    /// Nothing started yet
    Idle,
    /// The clock is live
    Running,
    /// The clock is held; the open pause interval is not yet folded in
    Paused,
    /// Stopped with every task done; replaced by a fresh session right after
    Completed,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Idle => "idle",
            SessionStatus::Running => "running",
            SessionStatus::Paused => "paused",
            SessionStatus::Completed => "completed",
        }
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The day's mutable work record: checklist plus clock bookkeeping
///
/// Scalar fields come first so the TOML scratch file keeps the task array
/// at the bottom.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    status: SessionStatus,
    #[serde(default)]
    started_at: Option<DateTime<Utc>>,
    /// Closed pause intervals already folded in, in milliseconds
    #[serde(default)]
    paused_ms: i64,
    #[serde(default)]
    pause_started_at: Option<DateTime<Utc>>,
    tasks: TaskChecklist,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            status: SessionStatus::Idle,
            started_at: None,
            paused_ms: 0,
            pause_started_at: None,
            tasks: TaskChecklist::new(),
        }
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn tasks(&self) -> &TaskChecklist {
        &self.tasks
    }

    pub fn tasks_mut(&mut self) -> &mut TaskChecklist {
        &mut self.tasks
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// Worked time so far: wall clock minus pauses, the open one included.
    /// Zero until the session starts; frozen while paused.
    pub fn elapsed(&self, now: DateTime<Utc>) -> TimeDelta {
        let Some(started) = self.started_at else {
            return TimeDelta::zero();
        };
        let live_end = match (self.status, self.pause_started_at) {
            (SessionStatus::Paused, Some(pause_started)) => pause_started,
            _ => now,
        };
        live_end.signed_duration_since(started) - TimeDelta::milliseconds(self.paused_ms)
    }

    /// Begin the day. Requires Idle and a non-empty checklist.
    pub fn start(&mut self, now: DateTime<Utc>) -> Result<(), EngineError> {
        if self.status != SessionStatus::Idle {
            return Err(EngineError::InvalidTransition {
                action: "start",
                status: self.status,
            });
        }
        if self.tasks.is_empty() {
            return Err(EngineError::EmptyChecklist);
        }
        self.started_at = Some(now);
        self.paused_ms = 0;
        self.pause_started_at = None;
        self.status = SessionStatus::Running;
        Ok(())
    }

    /// Hold the clock. Requires Running.
    pub fn pause(&mut self, now: DateTime<Utc>) -> Result<(), EngineError> {
        if self.status != SessionStatus::Running {
            return Err(EngineError::InvalidTransition {
                action: "pause",
                status: self.status,
            });
        }
        self.pause_started_at = Some(now);
        self.status = SessionStatus::Paused;
        Ok(())
    }

    /// Release the clock, folding the open pause interval into the total.
    pub fn resume(&mut self, now: DateTime<Utc>) -> Result<(), EngineError> {
        if self.status != SessionStatus::Paused {
            return Err(EngineError::InvalidTransition {
                action: "resume",
                status: self.status,
            });
        }
        self.fold_open_pause(now);
        self.status = SessionStatus::Running;
        Ok(())
    }

    /// End the day. Valid from Running or Paused once every task is done;
    /// a pause still open at this point is folded in first.
    pub fn stop(&mut self, now: DateTime<Utc>) -> Result<CompletedSession, EngineError> {
        if !matches!(self.status, SessionStatus::Running | SessionStatus::Paused) {
            return Err(EngineError::InvalidTransition {
                action: "stop",
                status: self.status,
            });
        }
        if !self.tasks.all_complete() {
            return Err(EngineError::IncompleteTasks {
                remaining: self.tasks.open_count(),
            });
        }
        // A session past Idle always has a start instant; a scratch file
        // that lost it is not in a stoppable state.
        let Some(started_at) = self.started_at else {
            return Err(EngineError::InvalidTransition {
                action: "stop",
                status: self.status,
            });
        };
        self.fold_open_pause(now);
        let completed = CompletedSession {
            started_at,
            ended_at: now,
            paused: TimeDelta::milliseconds(self.paused_ms),
            tasks_completed: self.tasks.len() as u32,
        };
        self.status = SessionStatus::Completed;
        Ok(completed)
    }

    fn fold_open_pause(&mut self, now: DateTime<Utc>) {
        if let Some(pause_started) = self.pause_started_at.take() {
            self.paused_ms += now.signed_duration_since(pause_started).num_milliseconds();
        }
    }
}

/// Immutable facts harvested from a stopped session
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedSession {
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    /// Total paused time across the session
    pub paused: TimeDelta,
    pub tasks_completed: u32,
}

impl CompletedSession {
    /// Wall time minus pauses
    pub fn worked(&self) -> TimeDelta {
        self.ended_at.signed_duration_since(self.started_at) - self.paused
    }

    /// End instant shifted earlier by the paused time; together with
    /// `started_at` this is the pause-free window the scorer sees.
    pub fn xp_end(&self) -> DateTime<Utc> {
        self.ended_at - self.paused
    }
}
