//! Shared fixtures for the integration suite

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};

use rankup::domain::HistoryEntry;
use rankup::engine::{CompletionReport, ProgressionEngine};

/// Fixed instant inside August 2026; tests never read the real clock.
pub fn at(day: u32, hour: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 8, day, hour, min, 0).unwrap()
}

/// Run one complete day against the engine: one task, started and stopped
/// at the given whole hours. Afternoon hours keep the time-of-day bonuses
/// out of the score.
pub async fn run_day(
    engine: &mut ProgressionEngine,
    day: u32,
    start_hour: u32,
    end_hour: u32,
) -> CompletionReport {
    engine.add_task("daily work").unwrap();
    engine.start_session(at(day, start_hour, 0)).unwrap();
    engine.toggle_task(0).unwrap();
    engine.stop_session(at(day, end_hour, 0)).await.unwrap()
}

/// A plausible ledger entry for store round-trips.
pub fn sample_entry(xp: u32, lp_change: Option<i32>) -> HistoryEntry {
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
        lp_after: lp_change.map(|change| (45 + change).max(0) as u32),
    }
}
