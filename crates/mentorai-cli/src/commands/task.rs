//! Task management commands for CLI.

use clap::Subcommand;
use mentorai_core::{EnergyLevel, Task};

use super::{open_board, parse_now, save_board, CliResult};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Add a pending task
    Add {
        /// Task title
        title: String,
        /// Estimated minutes
        #[arg(long, default_value = "25")]
        duration: i32,
        /// Priority 1-5 (default: 3)
        #[arg(long, default_value = "3")]
        priority: i32,
        /// Energy needed: low, med or high
        #[arg(long, default_value = "med")]
        energy: String,
        /// Deadline (YYYY-MM-DD or RFC 3339)
        #[arg(long)]
        deadline: Option<String>,
        /// Comma-separated tags
        #[arg(long)]
        tags: Option<String>,
    },
    /// List today's tasks
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Mark a task done
    Done {
        /// Task ID
        id: String,
    },
    /// Skip a task
    Skip {
        /// Task ID
        id: String,
    },
    /// Undo the last done/skip
    Undo,
    /// Remove a task
    Remove {
        /// Task ID
        id: String,
    },
    /// Replace today's list with the starter tasks
    Mock,
}

pub fn run(action: TaskAction) -> CliResult {
    let now = parse_now(None)?;
    let (store, mut board) = open_board(now)?;

    match action {
        TaskAction::Add {
            title,
            duration,
            priority,
            energy,
            deadline,
            tags,
        } => {
            let energy = EnergyLevel::parse(&energy)
                .ok_or_else(|| format!("invalid energy '{energy}': expected low, med or high"))?;
            let mut task = Task::new(title, duration).priority(priority).energy(energy);
            if let Some(deadline) = deadline {
                task = task.deadline(deadline);
            }
            if let Some(tags) = tags {
                task = task.tags(tags.split(',').map(str::trim).filter(|s| !s.is_empty()));
            }
            let task = board.add_task(task)?;
            println!("Task added: {} ({})", task.title, task.id);
        }
        TaskAction::List { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(board.tasks())?);
            } else {
                println!("{}", board.brief());
                println!("«{}»", board.quote());
                for task in board.tasks() {
                    println!(
                        "[{}] {} ({} min, p{}, {}) {}",
                        task.status, task.title, task.duration, task.priority, task.energy, task.id
                    );
                }
            }
        }
        TaskAction::Done { id } => {
            let task = board.mark_done(&id, now.date())?;
            println!("Done: {}", task.title);
        }
        TaskAction::Skip { id } => {
            let task = board.skip(&id, now.date())?;
            println!("Skipped: {}", task.title);
        }
        TaskAction::Undo => match board.undo_last() {
            Some(task) => println!("Restored: {}", task.title),
            None => println!("Nothing to undo"),
        },
        TaskAction::Remove { id } => {
            let task = board.remove_task(&id)?;
            println!("Removed: {}", task.title);
        }
        TaskAction::Mock => {
            board.replan_mock(now, &mut rand::thread_rng());
            println!("{}", board.brief());
        }
    }

    save_board(&store, &board)?;
    Ok(())
}
