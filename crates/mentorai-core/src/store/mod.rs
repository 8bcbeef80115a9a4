//! The app's task state blob and the board operations over it.

mod board;

pub use board::{mock_daily_tasks, TaskBoard};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::ValidationError;
use crate::task::{compute_brief, Task, TaskStatus};

/// Per-day counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    #[serde(default)]
    pub completed: u32,
    #[serde(default)]
    pub skipped: u32,
    /// Minutes of finished work
    #[serde(default)]
    pub total_time_done: i64,
}

impl HistoryEntry {
    /// Counters for the done and skipped tasks of a list.
    pub fn aggregate(tasks: &[Task]) -> Self {
        tasks.iter().fold(Self::default(), |mut acc, t| {
            match t.status {
                TaskStatus::Done => {
                    acc.completed += 1;
                    acc.total_time_done += i64::from(t.duration.max(0));
                }
                TaskStatus::Skipped => acc.skipped += 1,
                TaskStatus::Todo => {}
            }
            acc
        })
    }
}

/// Kind of the last undoable action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Done,
    Skip,
}

/// Last done/skip, kept so it can be undone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastAction {
    #[serde(rename = "type")]
    pub kind: ActionKind,
    /// Day key the history counter was bumped on
    pub day: String,
    pub task: Task,
}

/// Persisted application state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub tasks: Vec<Task>,
    pub brief: String,
    pub motivational_quote: String,
    pub history: BTreeMap<String, HistoryEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_day_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_action: Option<LastAction>,
}

impl AppState {
    /// Coerce a stored blob into a full record.
    ///
    /// Missing or mistyped fields fall back to empty values, tasks that do
    /// not deserialize are dropped, and the legacy `dateKey` field is read
    /// when `lastDayKey` is absent.
    ///
    /// # Errors
    /// Fails only when the blob is not a JSON object.
    pub fn sanitize(value: &serde_json::Value) -> Result<Self, ValidationError> {
        let obj = value.as_object().ok_or_else(|| ValidationError::InvalidValue {
            field: "state".into(),
            message: "expected a JSON object".into(),
        })?;

        let tasks: Vec<Task> = obj
            .get("tasks")
            .and_then(|v| v.as_array())
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| match serde_json::from_value::<Task>(item.clone()) {
                        Ok(task) => Some(task),
                        Err(e) => {
                            tracing::warn!(error = %e, "dropping malformed stored task");
                            None
                        }
                    })
                    .collect()
            })
            .unwrap_or_default();

        let brief = obj
            .get("brief")
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| compute_brief(&tasks));

        let motivational_quote = obj
            .get("motivationalQuote")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();

        let history = obj
            .get("history")
            .and_then(|v| v.as_object())
            .map(|days| {
                days.iter()
                    .filter_map(|(day, entry)| {
                        serde_json::from_value::<HistoryEntry>(entry.clone())
                            .ok()
                            .map(|e| (day.clone(), e))
                    })
                    .collect()
            })
            .unwrap_or_default();

        let last_day_key = ["lastDayKey", "dateKey"]
            .iter()
            .find_map(|key| obj.get(*key).and_then(|v| v.as_str()))
            .map(str::to_string);

        let last_action = obj
            .get("lastAction")
            .and_then(|v| serde_json::from_value::<LastAction>(v.clone()).ok());

        Ok(Self {
            tasks,
            brief,
            motivational_quote,
            history,
            last_day_key,
            last_action,
        })
    }
}
