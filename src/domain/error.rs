//! Engine error types
//!
//! Every rejected operation maps to one of these variants. None of them are
//! fatal: a rejected call leaves the session and progression untouched, and
//! the caller decides how to surface the message.

use thiserror::Error;

use super::session::SessionStatus;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// A lifecycle call arrived in a state that does not permit it.
    #[error("cannot {action} while the session is {status}")]
    InvalidTransition {
        action: &'static str,
        status: SessionStatus,
    },

    /// Starting a session requires at least one task on the checklist.
    #[error("the checklist is empty; add a task before starting")]
    EmptyChecklist,

    /// Stopping requires every task to be checked off.
    #[error("{remaining} task(s) still open; finish the checklist before stopping")]
    IncompleteTasks { remaining: usize },

    /// Task titles must contain at least one non-whitespace character.
    #[error("task title cannot be empty")]
    BlankTitle,

    /// No task exists at the given position.
    #[error("no task at position {0}")]
    TaskIndex(usize),
}
