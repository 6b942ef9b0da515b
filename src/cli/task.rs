//! Checklist commands
//!
//! Task positions are 1-based on the command line and 0-based in the
//! library; the translation happens here and nowhere else.

use anyhow::Result;
use clap::Subcommand;

use rankup::config::Config;
use rankup::domain::{EngineError, Session};
use rankup::engine::ProgressionEngine;

use super::Tracker;

#[derive(Subcommand)]
pub enum TaskAction {
    /// Add a task to the end of the checklist
    Add {
        /// Task title (words are joined with spaces)
        #[arg(required = true)]
        title: Vec<String>,
    },
    /// Replace the title of task N
    Edit {
        n: usize,
        #[arg(required = true)]
        title: Vec<String>,
    },
    /// Remove task N
    Rm { n: usize },
    /// Move task N up one position
    Up { n: usize },
    /// Move task N down one position
    Down { n: usize },
    /// Toggle task N between open and done
    Done { n: usize },
    /// Show the checklist
    List,
}

pub async fn task_command(config: Config, action: TaskAction) -> Result<()> {
    let mut tracker = Tracker::open(config).await?;

    if let TaskAction::List = action {
        print_checklist(tracker.engine.session());
        return Ok(());
    }

    match apply(&mut tracker.engine, action) {
        Ok(()) => {
            tracker.persist_session()?;
            print_checklist(tracker.engine.session());
        }
        Err(error) => println!("{error}"),
    }
    Ok(())
}

fn apply(engine: &mut ProgressionEngine, action: TaskAction) -> Result<(), EngineError> {
    match action {
        TaskAction::Add { title } => engine.add_task(&title.join(" ")),
        TaskAction::Edit { n, title } => engine.edit_task(zero_based(n)?, &title.join(" ")),
        TaskAction::Rm { n } => {
            let removed = engine.remove_task(zero_based(n)?)?;
            println!("Removed: {}", removed.title);
            Ok(())
        }
        TaskAction::Up { n } => engine.move_task_up(zero_based(n)?),
        TaskAction::Down { n } => engine.move_task_down(zero_based(n)?),
        TaskAction::Done { n } => engine.toggle_task(zero_based(n)?).map(|_| ()),
        TaskAction::List => Ok(()),
    }
}

/// CLI position to library index; positions start at 1.
fn zero_based(n: usize) -> Result<usize, EngineError> {
    n.checked_sub(1).ok_or(EngineError::TaskIndex(0))
}

pub fn print_checklist(session: &Session) {
    let tasks = session.tasks().tasks();
    if tasks.is_empty() {
        println!("Checklist is empty. Add a task with: rankup task add <title>");
        return;
    }
    println!("Checklist ({} open):", session.tasks().open_count());
    for (i, task) in tasks.iter().enumerate() {
        let mark = if task.done { "x" } else { " " };
        println!("  {:>2}. [{mark}] {}", i + 1, task.title);
    }
}
