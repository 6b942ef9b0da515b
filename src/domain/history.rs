//! Session history ledger
//!
//! Append-only record of completed sessions, paged newest-first for display
//! and averaged across its full length for the summary footer. Entries
//! store the local wall-clock view of the day (date, weekday, start and end
//! clocks) because that is what the user remembers, not UTC instants.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone};
use serde::{Deserialize, Serialize};

use super::progression::RankOutcome;
use super::session::CompletedSession;
use super::xp::XpCurve;

/// One completed session, immutable once written
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub date: NaiveDate,
    pub weekday: String,
    /// Wall clock when work began (pauses do not shift this)
    pub started_clock: NaiveTime,
    /// Wall clock when the session stopped
    pub ended_clock: NaiveTime,
    /// Credited hours, clamped to the same window the scorer uses
    pub hours_worked: f64,
    pub tasks_completed: u32,
    pub xp: u32,
    pub hours_per_task: f64,
    /// None for sessions that were still placement games
    pub lp_change: Option<i32>,
    pub lp_after: Option<u32>,
}

impl HistoryEntry {
    /// Build an entry from a finished session, projected into `tz` for the
    /// user-facing date and clock fields.
    pub fn from_completed<Tz: TimeZone>(
        completed: &CompletedSession,
        tz: &Tz,
        xp: u32,
        outcome: &RankOutcome,
    ) -> Self {
        let start = completed.started_at.with_timezone(tz);
        let end = completed.ended_at.with_timezone(tz);
        let hours_worked =
            XpCurve::clamp_hours(completed.worked().num_milliseconds() as f64 / 3_600_000.0);
        let tasks_completed = completed.tasks_completed;
        Self {
            date: start.date_naive(),
            weekday: start.date_naive().format("%A").to_string(),
            started_clock: start.time(),
            ended_clock: end.time(),
            hours_worked,
            tasks_completed,
            xp,
            hours_per_task: hours_worked / f64::from(tasks_completed.max(1)),
            lp_change: outcome.lp_change(),
            lp_after: outcome.lp_after(),
        }
    }
}

/// One display page of the ledger, newest entries first
#[derive(Debug, Clone, Serialize)]
pub struct HistoryPage {
    /// The page actually returned (requests past the end clamp back)
    pub index: usize,
    pub page_count: usize,
    pub entries: Vec<HistoryEntry>,
}

/// Averages over the entire ledger, regardless of pagination
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct LedgerAverages {
    pub avg_hours: f64,
    pub avg_tasks: f64,
    pub avg_hours_per_task: f64,
}

/// Append-only, insertion-ordered record of completed sessions
#[derive(Debug, Clone, Default)]
pub struct HistoryLedger {
    entries: Vec<HistoryEntry>,
}

impl HistoryLedger {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Rebuild from stored entries, oldest first.
    pub fn from_entries(entries: Vec<HistoryEntry>) -> Self {
        Self { entries }
    }

    pub fn append(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Most recently appended entry
    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn page_count(&self, page_size: usize) -> usize {
        self.entries.len().div_ceil(page_size.max(1))
    }

    /// Slice out one page, newest first. An index past the last page clamps
    /// to the last page; an empty ledger yields an empty page 0.
    pub fn page(&self, index: usize, page_size: usize) -> HistoryPage {
        let page_size = page_size.max(1);
        let page_count = self.page_count(page_size);
        let index = if page_count == 0 {
            0
        } else {
            index.min(page_count - 1)
        };
        let entries: Vec<HistoryEntry> = self
            .entries
            .iter()
            .rev()
            .skip(index * page_size)
            .take(page_size)
            .cloned()
            .collect();
        HistoryPage {
            index,
            page_count,
            entries,
        }
    }

    /// Mean hours, tasks, and hours-per-task across every entry.
    pub fn aggregate(&self) -> LedgerAverages {
        if self.entries.is_empty() {
            return LedgerAverages::default();
        }
        let count = self.entries.len() as f64;
        LedgerAverages {
            avg_hours: self.entries.iter().map(|e| e.hours_worked).sum::<f64>() / count,
            avg_tasks: self
                .entries
                .iter()
                .map(|e| f64::from(e.tasks_completed))
                .sum::<f64>()
                / count,
            avg_hours_per_task: self
                .entries
                .iter()
                .map(|e| e.hours_per_task)
                .sum::<f64>()
                / count,
        }
    }
}
