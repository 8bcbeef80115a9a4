//! Subcommand implementations and the state plumbing they share.

pub mod chat;
pub mod config;
pub mod intent;
pub mod plan;
pub mod profile;
pub mod task;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime};
use mentorai_core::planner::ReplanOutput;
use mentorai_core::{Config, ProfileStore, StateStore, Task, TaskBoard, UserPrefs};

pub type CliResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

/// Resolve `--now`: `HH:MM` (today), RFC 3339, or `YYYY-MM-DDTHH:MM[:SS]`.
pub fn parse_now(value: Option<&str>) -> CliResult<NaiveDateTime> {
    let today = Local::now().naive_local();
    let Some(value) = value.map(str::trim) else {
        return Ok(today);
    };

    if let Ok(time) = NaiveTime::parse_from_str(value, "%H:%M") {
        return Ok(today.date().and_time(time));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.naive_local());
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(dt);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN));
    }
    Err(format!("invalid --now '{value}': expected HH:MM or an RFC 3339 timestamp").into())
}

/// Today's board, loaded and rolled over if the day changed.
pub fn open_board(now: NaiveDateTime) -> CliResult<(StateStore, TaskBoard)> {
    let store = StateStore::open()?;
    let raw = store.load_raw()?;
    tracing::debug!(path = %store.path().display(), found = raw.is_some(), "state loaded");
    let board = TaskBoard::hydrate(raw.as_ref(), now, &mut rand::thread_rng());
    Ok((store, board))
}

pub fn save_board(store: &StateStore, board: &TaskBoard) -> CliResult {
    store.save(board.state())?;
    Ok(())
}

/// Profile preferences when a profile exists, config defaults otherwise.
pub fn current_prefs(config: &Config) -> CliResult<UserPrefs> {
    Ok(match ProfileStore::open()?.load()? {
        Some(profile) => profile.to_prefs(),
        None => config.default_prefs(),
    })
}

/// Print a plan as one line per task.
pub fn print_plan(plan: &ReplanOutput, tasks: &[Task]) {
    if plan.order.is_empty() {
        println!("No pending tasks");
        return;
    }
    for id in &plan.order {
        let Some(task) = tasks.iter().find(|t| &t.id == id) else {
            continue;
        };
        let slot = plan
            .slot(id)
            .map(|(start, end)| format!("{start}-{end}"))
            .unwrap_or_else(|| "  --:--    ".to_string());
        println!("{slot}  {} ({} min) [{}]", task.title, task.duration, task.id);
    }
}
