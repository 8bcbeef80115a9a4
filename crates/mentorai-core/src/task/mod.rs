//! Task types for the daily brief.
//!
//! A task starts as `todo` and leaves that state through an explicit user
//! action (done or skipped). The planner only reads tasks; status changes
//! happen here, driven by the caller's task board.
//!
//!   TODO ───────> DONE
//!    │  ^          │
//!    │  └── undo ──┤
//!    v             │
//!   SKIPPED ───────┘ (undo back to TODO)

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lowest accepted priority.
pub const MIN_PRIORITY: i32 = 1;
/// Highest accepted priority (most urgent).
pub const MAX_PRIORITY: i32 = 5;
/// Priority used when none is given.
pub const DEFAULT_PRIORITY: i32 = 3;

/// Task status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Pending, eligible for replanning
    #[default]
    Todo,
    /// Completed by the user
    Done,
    /// Dismissed for today
    Skipped,
}

impl TaskStatus {
    /// Check if a transition is valid.
    pub fn can_transition_to(&self, to: &TaskStatus) -> bool {
        match self {
            TaskStatus::Todo => matches!(to, TaskStatus::Done | TaskStatus::Skipped),
            TaskStatus::Done | TaskStatus::Skipped => matches!(to, TaskStatus::Todo),
        }
    }

    /// Parse from the lowercase wire name.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "todo" => Some(TaskStatus::Todo),
            "done" => Some(TaskStatus::Done),
            "skipped" | "skip" => Some(TaskStatus::Skipped),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::Done => "done",
            TaskStatus::Skipped => "skipped",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Energy a task demands.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum EnergyLevel {
    #[serde(rename = "low")]
    Low,
    #[default]
    #[serde(rename = "med", alias = "medium")]
    Medium,
    #[serde(rename = "high")]
    High,
}

impl EnergyLevel {
    /// Parse from a wire name (`low`, `med`/`medium`, `high`).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "low" => Some(EnergyLevel::Low),
            "med" | "medium" => Some(EnergyLevel::Medium),
            "high" => Some(EnergyLevel::High),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EnergyLevel::Low => "low",
            EnergyLevel::Medium => "med",
            EnergyLevel::High => "high",
        }
    }
}

impl fmt::Display for EnergyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One unit of work in the daily brief.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Opaque unique identifier
    pub id: String,
    /// Display text, also searched for focus-tag matches
    pub title: String,
    /// Expected duration in minutes
    pub duration: i32,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub energy: EnergyLevel,
    /// 1-5, higher is more urgent
    #[serde(default = "default_priority")]
    pub priority: i32,
    /// Calendar date (`YYYY-MM-DD`) or timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

fn default_priority() -> i32 {
    DEFAULT_PRIORITY
}

impl Task {
    /// Create a new `todo` task with a generated id.
    pub fn new(title: impl Into<String>, duration: i32) -> Self {
        Self::with_id(format!("t-{}", uuid::Uuid::new_v4()), title, duration)
    }

    /// Create a new `todo` task with an explicit id.
    pub fn with_id(id: impl Into<String>, title: impl Into<String>, duration: i32) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            duration,
            status: TaskStatus::Todo,
            energy: EnergyLevel::Medium,
            priority: DEFAULT_PRIORITY,
            deadline: None,
            tags: Vec::new(),
        }
    }

    pub fn energy(mut self, energy: EnergyLevel) -> Self {
        self.energy = energy;
        self
    }

    /// Set the priority, clamped into 1-5.
    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = priority.clamp(MIN_PRIORITY, MAX_PRIORITY);
        self
    }

    pub fn deadline(mut self, deadline: impl Into<String>) -> Self {
        self.deadline = Some(deadline.into());
        self
    }

    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Whether the task takes part in replanning.
    pub fn is_eligible(&self) -> bool {
        self.status == TaskStatus::Todo
    }

    /// Duration used for scheduling math: never below one minute.
    pub fn scheduled_minutes(&self) -> u32 {
        self.duration.max(1) as u32
    }

    /// Whether the task matches a focus tag: equal tag or title substring,
    /// both case-insensitive.
    pub fn matches_focus(&self, focus_tag: &str) -> bool {
        let focus = focus_tag.to_lowercase();
        self.tags.iter().any(|t| t.to_lowercase() == focus)
            || self.title.to_lowercase().contains(&focus)
    }

    /// Transition to a new status.
    pub fn transition_to(&mut self, new_status: TaskStatus) -> Result<(), TaskTransitionError> {
        if !self.status.can_transition_to(&new_status) {
            return Err(TaskTransitionError {
                task_id: self.id.clone(),
                from: self.status,
                to: new_status,
            });
        }
        self.status = new_status;
        Ok(())
    }
}

/// Error returned when a status change is not allowed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskTransitionError {
    pub task_id: String,
    pub from: TaskStatus,
    pub to: TaskStatus,
}

impl fmt::Display for TaskTransitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid status transition for {}: {} → {}",
            self.task_id, self.from, self.to
        )
    }
}

impl std::error::Error for TaskTransitionError {}

/// One-line summary of the pending work, e.g. `Tienes 3 tareas (~60 min)`.
pub fn compute_brief(tasks: &[Task]) -> String {
    let todo: Vec<&Task> = tasks.iter().filter(|t| t.is_eligible()).collect();
    let total: i64 = todo.iter().map(|t| i64::from(t.duration.max(0))).sum();
    format!("Tienes {} tareas (~{} min)", todo.len(), total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_transitions() {
        assert!(TaskStatus::Todo.can_transition_to(&TaskStatus::Done));
        assert!(TaskStatus::Todo.can_transition_to(&TaskStatus::Skipped));
        assert!(!TaskStatus::Todo.can_transition_to(&TaskStatus::Todo));
        assert!(TaskStatus::Done.can_transition_to(&TaskStatus::Todo));
        assert!(!TaskStatus::Done.can_transition_to(&TaskStatus::Skipped));
        assert!(!TaskStatus::Skipped.can_transition_to(&TaskStatus::Done));
    }

    #[test]
    fn task_creation_defaults() {
        let task = Task::new("Revisar agenda", 5);
        assert!(task.id.starts_with("t-"));
        assert_eq!(task.status, TaskStatus::Todo);
        assert_eq!(task.energy, EnergyLevel::Medium);
        assert_eq!(task.priority, DEFAULT_PRIORITY);
        assert!(task.is_eligible());
    }

    #[test]
    fn transition_rejects_done_to_skipped() {
        let mut task = Task::with_id("a", "A", 10);
        task.transition_to(TaskStatus::Done).unwrap();
        let err = task.transition_to(TaskStatus::Skipped).unwrap_err();
        assert_eq!(err.from, TaskStatus::Done);
        assert_eq!(task.status, TaskStatus::Done);
    }

    #[test]
    fn scheduled_minutes_is_at_least_one() {
        assert_eq!(Task::with_id("a", "A", 0).scheduled_minutes(), 1);
        assert_eq!(Task::with_id("a", "A", -5).scheduled_minutes(), 1);
        assert_eq!(Task::with_id("a", "A", 25).scheduled_minutes(), 25);
    }

    #[test]
    fn focus_match_checks_tags_and_title() {
        let task = Task::with_id("a", "Llamar a clientes de Ventas", 15).tags(["CRM"]);
        assert!(task.matches_focus("ventas"));
        assert!(task.matches_focus("crm"));
        assert!(!task.matches_focus("cardio"));
    }

    #[test]
    fn wire_format_uses_short_energy_names() {
        let task = Task::with_id("a", "A", 10).energy(EnergyLevel::Medium);
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["energy"], "med");
        assert_eq!(json["status"], "todo");
        assert!(json.get("deadline").is_none());

        let parsed: Task =
            serde_json::from_str(r#"{"id":"b","title":"B","duration":5,"energy":"medium"}"#).unwrap();
        assert_eq!(parsed.energy, EnergyLevel::Medium);
        assert_eq!(parsed.priority, DEFAULT_PRIORITY);
        assert_eq!(parsed.status, TaskStatus::Todo);
    }

    #[test]
    fn brief_counts_only_pending_tasks() {
        let mut done = Task::with_id("b", "B", 30);
        done.status = TaskStatus::Done;
        let tasks = vec![Task::with_id("a", "A", 15), done, Task::with_id("c", "C", 45)];
        assert_eq!(compute_brief(&tasks), "Tienes 2 tareas (~60 min)");
    }
}
