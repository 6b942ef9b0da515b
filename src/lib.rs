//! RankUp - gamified daily work tracker
//!
//! Finish a daily checklist, earn XP for how fast you worked, and climb a
//! competitive ranked ladder. Ten placement sessions seed a starting tier
//! from their average score; after that every completed day is a win or a
//! loss against the tier's baseline XP and moves League Points, promoting
//! or demoting one tier at a time.
//!
//! The heart of the crate is [`engine::ProgressionEngine`]: it owns the
//! session state machine, the XP scorer, the placement/LP ladder, and the
//! history ledger, and persists through the traits in [`store`]. The CLI
//! in `main.rs` is a thin layer over it.

pub mod config;
pub mod domain;
pub mod engine;
pub mod store;

pub use domain::*;
