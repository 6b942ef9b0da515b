use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use rankup::config::Config;

mod cli;

use cli::task::TaskAction;

#[derive(Parser)]
#[command(name = "rankup")]
#[command(about = "Finish the daily checklist, earn XP, climb the ranked ladder")]
#[command(version)]
struct Cli {
    /// Path to the config file (defaults to ~/.rankup/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Act as this user (overrides the configured name)
    #[arg(short, long, global = true)]
    user: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the day's checklist
    Task {
        #[command(subcommand)]
        action: TaskAction,
    },

    /// Start the session clock
    Start,

    /// Hold the clock without ending the day
    Pause,

    /// Release a paused clock
    Resume,

    /// Finish the day: score the session and move the ladder
    Stop,

    /// Show the live session and current standing
    Status {
        /// Keep repainting the elapsed time while the clock runs
        #[arg(long)]
        watch: bool,

        /// Emit machine-readable JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Page through completed sessions
    History {
        /// Page number, newest first (default 1)
        #[arg(long)]
        page: Option<usize>,

        /// Emit machine-readable JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Export the full ledger as CSV
    Export {
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Wipe progression and history back to a fresh account
    Reset {
        /// Confirm the wipe
        #[arg(long)]
        yes: bool,
    },

    /// Write a default config file
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    // Init runs before config loading: it may be creating the very file
    // the other commands read.
    if let Commands::Init { force } = cli.command {
        return cli::init::init_command(cli.config.as_deref(), force).await;
    }

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(user) = cli.user {
        config.user = user;
    }

    match cli.command {
        Commands::Task { action } => cli::task::task_command(config, action).await?,
        Commands::Start => cli::session::start_command(config).await?,
        Commands::Pause => cli::session::pause_command(config).await?,
        Commands::Resume => cli::session::resume_command(config).await?,
        Commands::Stop => cli::session::stop_command(config).await?,
        Commands::Status { watch, json } => cli::status::status_command(config, watch, json).await?,
        Commands::History { page, json } => {
            cli::history::history_command(config, page, json).await?
        }
        Commands::Export { output } => {
            cli::export::export_command(config, output.as_deref()).await?
        }
        Commands::Reset { yes } => cli::reset::reset_command(config, yes).await?,
        Commands::Init { .. } => unreachable!("handled before config loading"),
    }

    Ok(())
}
