//! Session lifecycle commands
//!
//! start / pause / resume mutate the clock; stop runs the full completion
//! pipeline and prints the day's summary. Rejected transitions print the
//! engine's message and leave everything untouched.

use anyhow::Result;
use chrono::Utc;

use rankup::config::Config;
use rankup::domain::{RankOutcome, TierMovement};
use rankup::engine::CompletionReport;

use super::{Tracker, warn_store_failures};

pub async fn start_command(config: Config) -> Result<()> {
    let mut tracker = Tracker::open(config).await?;
    match tracker.engine.start_session(Utc::now()) {
        Ok(()) => {
            tracker.persist_session()?;
            println!(
                "Clock started with {} task(s). Finish them all, then run: rankup stop",
                tracker.engine.session().tasks().len()
            );
        }
        Err(error) => println!("{error}"),
    }
    Ok(())
}

pub async fn pause_command(config: Config) -> Result<()> {
    let mut tracker = Tracker::open(config).await?;
    match tracker.engine.pause_session(Utc::now()) {
        Ok(()) => {
            tracker.persist_session()?;
            println!("Clock paused. Resume with: rankup resume");
        }
        Err(error) => println!("{error}"),
    }
    Ok(())
}

pub async fn resume_command(config: Config) -> Result<()> {
    let mut tracker = Tracker::open(config).await?;
    match tracker.engine.resume_session(Utc::now()) {
        Ok(()) => {
            tracker.persist_session()?;
            println!("Clock running again.");
        }
        Err(error) => println!("{error}"),
    }
    Ok(())
}

pub async fn stop_command(config: Config) -> Result<()> {
    let mut tracker = Tracker::open(config).await?;
    match tracker.engine.stop_session(Utc::now()).await {
        Ok(report) => {
            // The engine already swapped in a fresh Idle session
            tracker.persist_session()?;
            print_completion(&report);
            warn_store_failures(&report.store_errors);
        }
        Err(error) => println!("{error}"),
    }
    Ok(())
}

fn print_completion(report: &CompletionReport) {
    let entry = &report.entry;
    println!(
        "Day complete: {} task(s) in {:.2}h -> +{} XP",
        entry.tasks_completed, entry.hours_worked, entry.xp
    );

    match &report.outcome {
        RankOutcome::Placement {
            games_played,
            assigned: None,
        } => {
            println!(
                "Placement game {games_played}/10 recorded ({} to go).",
                report.snapshot.placement().remaining()
            );
        }
        RankOutcome::Placement {
            assigned: Some(assignment),
            ..
        } => {
            println!(
                "Placements complete! Average {:.0} XP seeds you into {}.",
                assignment.average,
                assignment.tier_name()
            );
        }
        RankOutcome::Ranked {
            lp_change,
            movement,
            ..
        } => {
            if let Some(rank) = report.snapshot.rank() {
                println!("{lp_change:+} LP -> {rank}");
                match movement {
                    TierMovement::Promoted => println!("Promoted to {}!", rank.tier_info().name),
                    TierMovement::Demoted => println!("Demoted to {}.", rank.tier_info().name),
                    TierMovement::Held => {}
                }
            }
        }
    }
}
