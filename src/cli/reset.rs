//! Reset command implementation

use anyhow::Result;

use rankup::config::Config;

use super::{Tracker, warn_store_failures};

/// Wipe progression, history, and the live session back to a fresh
/// account. Destructive, so it runs only with an explicit `--yes`.
pub async fn reset_command(config: Config, yes: bool) -> Result<()> {
    if !yes {
        println!(
            "This wipes the rank, placement record, and full history for '{}'.",
            config.user
        );
        println!("Run again with --yes to confirm.");
        return Ok(());
    }

    let mut tracker = Tracker::open(config).await?;
    let failures = tracker.engine.reset().await;
    tracker.persist_session()?;
    warn_store_failures(&failures);
    println!(
        "Progression reset for '{}'. Placements start over.",
        tracker.engine.user_id()
    );
    Ok(())
}
