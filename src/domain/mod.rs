//! Core domain types for RankUp

mod error;
mod history;
mod progression;
mod session;
mod task;
mod tier;
mod xp;

pub use error::EngineError;
pub use history::{HistoryEntry, HistoryLedger, HistoryPage, LedgerAverages};
pub use progression::{
    PLACEMENT_GAMES, PlacementRecord, ProgressionPhase, ProgressionSnapshot, RankOutcome,
    RankState, TierAssignment, TierMovement,
};
pub use session::{CompletedSession, Session, SessionStatus};
pub use task::{Task, TaskChecklist};
pub use tier::{RankTier, TIERS};
pub use xp::{XpCurve, compute_xp};
