//! Status command implementation
//!
//! Read-only: the session comes from the scratch-file peek and the standing
//! from the profile store, so status never contends with a mutating command
//! for the session lock. `--watch` re-reads once a second while the clock
//! runs.

use std::io::Write;
use std::time::Duration;

use anyhow::Result;
use chrono::{TimeDelta, Utc};
use serde_json::json;

use rankup::config::Config;
use rankup::domain::{ProgressionSnapshot, Session, SessionStatus};
use rankup::store::{ProfileStore, SessionFile};

use super::{open_profile_store, task::print_checklist};

pub async fn status_command(config: Config, watch: bool, json: bool) -> Result<()> {
    let data_dir = config.data_dir();
    let session = SessionFile::peek(&data_dir)?;
    let snapshot = open_profile_store(&config)?
        .load(&config.user)
        .await?
        .unwrap_or_else(ProgressionSnapshot::fresh);

    if json {
        print_json(&config.user, &session, &snapshot)?;
        return Ok(());
    }

    print_standing(&config.user, &snapshot);
    println!();
    println!(
        "Session: {} (elapsed {})",
        session.status(),
        format_elapsed(session.elapsed(Utc::now()))
    );
    print_checklist(&session);

    if watch && session.status() == SessionStatus::Running {
        watch_elapsed(&data_dir).await?;
    }
    Ok(())
}

fn print_standing(user: &str, snapshot: &ProgressionSnapshot) {
    println!("User: {user} ({} XP lifetime)", snapshot.total_xp);
    match snapshot.rank() {
        None => {
            let placement = snapshot.placement();
            println!(
                "Placements: {}/10 games (average {:.0} XP)",
                placement.games_played(),
                placement.average()
            );
        }
        Some(rank) => println!("Rank: {rank}"),
    }
}

fn print_json(user: &str, session: &Session, snapshot: &ProgressionSnapshot) -> Result<()> {
    let rank = snapshot.rank();
    let payload = json!({
        "user": user,
        "total_xp": snapshot.total_xp,
        "phase": if snapshot.in_placements() { "placement" } else { "ranked" },
        "placement": {
            "games_played": snapshot.placement().games_played(),
            "scores": snapshot.placement().scores(),
        },
        "rank": rank.map(|r| json!({
            "tier": r.tier,
            "tier_name": r.tier_info().name,
            "lp": r.lp,
        })),
        "session": session,
        "elapsed_seconds": session.elapsed(Utc::now()).num_seconds(),
    });
    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}

/// Re-read the scratch file once a second and repaint the elapsed readout
/// until the session leaves Running. Display only; no state is touched.
async fn watch_elapsed(data_dir: &std::path::Path) -> Result<()> {
    let mut interval = tokio::time::interval(Duration::from_secs(1));
    loop {
        interval.tick().await;
        let session = SessionFile::peek(data_dir)?;
        if session.status() != SessionStatus::Running {
            println!("\nSession is now {}.", session.status());
            return Ok(());
        }
        print!("\r  elapsed {} ", format_elapsed(session.elapsed(Utc::now())));
        std::io::stdout().flush()?;
    }
}

pub fn format_elapsed(elapsed: TimeDelta) -> String {
    let total = elapsed.num_seconds().max(0);
    format!("{}:{:02}:{:02}", total / 3600, (total % 3600) / 60, total % 60)
}
