//! History command implementation
//!
//! Pages through the completed-session ledger newest-first and prints the
//! whole-ledger averages underneath. Read-only; rebuilds the ledger from
//! the history store without taking the session lock.

use anyhow::Result;
use serde_json::json;

use rankup::config::Config;
use rankup::domain::{HistoryEntry, HistoryLedger};
use rankup::store::HistoryStore;

use super::open_history_store;

pub async fn history_command(config: Config, page: Option<usize>, json: bool) -> Result<()> {
    let entries = open_history_store(&config)?.list(&config.user).await?;
    let ledger = HistoryLedger::from_entries(entries);
    let page_size = config.page_size();

    // CLI pages are 1-based like task positions
    let requested = page.unwrap_or(1).saturating_sub(1);
    let page = ledger.page(requested, page_size);
    let averages = ledger.aggregate();

    if json {
        let payload = json!({
            "page": page.index + 1,
            "page_count": page.page_count,
            "entries": page.entries,
            "averages": averages,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    if ledger.is_empty() {
        println!("No completed sessions yet.");
        return Ok(());
    }

    println!(
        "History page {}/{} ({} session(s) total):\n",
        page.index + 1,
        page.page_count,
        ledger.len()
    );
    for entry in &page.entries {
        print_entry(entry);
    }
    println!(
        "Averages: {:.2}h worked, {:.1} tasks, {:.2}h per task",
        averages.avg_hours, averages.avg_tasks, averages.avg_hours_per_task
    );
    Ok(())
}

fn print_entry(entry: &HistoryEntry) {
    let lp = match entry.lp_change {
        Some(change) => format!(
            "{change:+} LP -> {}",
            entry.lp_after.map_or_else(String::new, |lp| lp.to_string())
        ),
        None => "placement".to_string(),
    };
    println!(
        "  {} {:<9} {} - {}  {:>5.2}h  {:>2} task(s)  {:>4} XP  {lp}",
        entry.date,
        entry.weekday,
        entry.started_clock.format("%H:%M"),
        entry.ended_clock.format("%H:%M"),
        entry.hours_worked,
        entry.tasks_completed,
        entry.xp
    );
}
