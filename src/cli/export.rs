//! Export command implementation
//!
//! Renders the full ledger as delimited rows, oldest first, to stdout or a
//! file. Presentation-side only: the rows come straight from the history
//! store, the engine is never involved.

use std::path::Path;

use anyhow::{Context, Result};

use rankup::config::Config;
use rankup::domain::HistoryEntry;
use rankup::store::HistoryStore;

use super::open_history_store;

const CSV_HEADER: &str =
    "date,weekday,start,end,hours,tasks,xp,hours_per_task,lp_change,lp_after";

pub async fn export_command(config: Config, output: Option<&Path>) -> Result<()> {
    let entries = open_history_store(&config)?.list(&config.user).await?;
    let csv = render_csv(&entries);

    match output {
        Some(path) => {
            std::fs::write(path, csv)
                .with_context(|| format!("Failed to write export file: {}", path.display()))?;
            println!("Exported {} session(s) to {}", entries.len(), path.display());
        }
        None => print!("{csv}"),
    }
    Ok(())
}

fn render_csv(entries: &[HistoryEntry]) -> String {
    let mut out = String::from(CSV_HEADER);
    out.push('\n');
    for entry in entries {
        out.push_str(&csv_row(entry));
        out.push('\n');
    }
    out
}

fn csv_row(entry: &HistoryEntry) -> String {
    // Placement rows leave the LP columns empty
    let lp_change = entry.lp_change.map_or_else(String::new, |v| v.to_string());
    let lp_after = entry.lp_after.map_or_else(String::new, |v| v.to_string());
    format!(
        "{},{},{},{},{:.2},{},{},{:.3},{lp_change},{lp_after}",
        entry.date,
        entry.weekday,
        entry.started_clock.format("%H:%M:%S"),
        entry.ended_clock.format("%H:%M:%S"),
        entry.hours_worked,
        entry.tasks_completed,
        entry.xp,
        entry.hours_per_task
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    fn entry(lp_change: Option<i32>, lp_after: Option<u32>) -> HistoryEntry {
        HistoryEntry {
            date: NaiveDate::from_ymd_opt(2026, 8, 24).unwrap(),
            weekday: "Monday".to_string(),
            started_clock: NaiveTime::from_hms_opt(7, 0, 0).unwrap(),
            ended_clock: NaiveTime::from_hms_opt(11, 0, 0).unwrap(),
            hours_worked: 1.0,
            tasks_completed: 4,
            xp: 1152,
            hours_per_task: 0.25,
            lp_change,
            lp_after,
        }
    }

    #[test]
    fn test_placement_row_has_empty_lp_columns() {
        let row = csv_row(&entry(None, None));
        assert_eq!(row, "2026-08-24,Monday,07:00:00,11:00:00,1.00,4,1152,0.250,,");
    }

    #[test]
    fn test_ranked_row_fills_lp_columns() {
        let row = csv_row(&entry(Some(-20), Some(35)));
        assert!(row.ends_with(",-20,35"));
    }

    #[test]
    fn test_render_includes_header_and_all_rows() {
        let csv = render_csv(&[entry(None, None), entry(Some(10), Some(10))]);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], CSV_HEADER);
    }
}
