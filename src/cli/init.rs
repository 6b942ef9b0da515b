//! Init command implementation

use std::path::Path;

use anyhow::Result;
use tracing::info;

use rankup::config::Config;

/// Write the commented default config file, at `path` when `--config` was
/// given, otherwise at the global location (~/.rankup/config.toml).
pub async fn init_command(path: Option<&Path>, force: bool) -> Result<()> {
    let target = path
        .map(Path::to_path_buf)
        .unwrap_or_else(Config::global_config_path);

    Config::write_default(&target, force)?;
    info!("Wrote default config to {}", target.display());
    println!("Created config file: {}", target.display());
    println!("Edit it to set your user name, then add tasks with: rankup task add <title>");
    Ok(())
}
