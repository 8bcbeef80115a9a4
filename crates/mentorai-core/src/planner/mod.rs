//! Daily replanning heuristic.
//!
//! Given today's tasks and the user's scheduling preferences (plus an
//! optional time budget and focus tag), produce a priority ordering of the
//! pending tasks and, best-effort, `HH:MM` slots inside the planning
//! windows.
//!
//! The planner is a pure function of its input and the injected `now`: it
//! never reads the system clock, never touches storage and never changes a
//! task's status. Malformed `HH:MM` strings degrade to midnight instead of
//! failing.

pub mod ranking;
pub mod windows;

pub use ranking::{RankContext, RankedTask};
pub use windows::{clamp_to_windows, heavy_window, planning_windows, TimeWindow};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::clock::{format_minutes, minute_of_day, parse_minutes_lenient};
use crate::prefs::UserPrefs;
use crate::task::Task;

/// `(start, end)` as `HH:MM` strings.
pub type TimeSlot = (String, String);

/// Replanner request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplanInput {
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub user_prefs: UserPrefs,
    /// Minutes available
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_budget: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focus_tag: Option<String>,
}

impl ReplanInput {
    pub fn new(tasks: Vec<Task>, user_prefs: UserPrefs) -> Self {
        Self {
            tasks,
            user_prefs,
            time_budget: None,
            focus_tag: None,
        }
    }

    pub fn with_time_budget(mut self, minutes: Option<u32>) -> Self {
        self.time_budget = minutes;
        self
    }

    pub fn with_focus_tag(mut self, tag: Option<String>) -> Self {
        self.focus_tag = tag;
        self
    }
}

/// Replanner response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplanOutput {
    /// Every eligible task id, in priority order
    pub order: Vec<String>,
    /// Present only when at least one task got a slot
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slots: Option<BTreeMap<String, TimeSlot>>,
}

impl ReplanOutput {
    pub fn slot(&self, task_id: &str) -> Option<&TimeSlot> {
        self.slots.as_ref()?.get(task_id)
    }
}

/// Tunable constants of the heuristic, in minutes since midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Start of the default high-energy window
    pub heavy_start: u32,
    /// End of the default high-energy window
    pub heavy_end: u32,
    /// Earliest start of the fallback planning window
    pub default_day_start: u32,
    /// Latest end of the fallback planning window
    pub default_day_end: u32,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            heavy_start: 10 * 60,
            heavy_end: 12 * 60,
            default_day_start: 9 * 60,
            default_day_end: 18 * 60,
        }
    }
}

/// Heuristic replanner.
#[derive(Debug, Clone, Default)]
pub struct Replanner {
    config: PlannerConfig,
}

impl Replanner {
    /// Create a replanner with the default constants.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom constants.
    pub fn with_config(config: PlannerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Order the pending tasks and assign best-effort slots.
    pub fn replan(&self, input: &ReplanInput, now: NaiveDateTime) -> ReplanOutput {
        // 1. Planning windows and the heavy window inside them
        let windows = planning_windows(&input.user_prefs, &self.config);
        let heavy = heavy_window(&windows, &self.config);
        let now_minute = minute_of_day(now);

        // 2. Rank pending tasks
        let ctx = RankContext {
            now,
            focus_tag: input
                .focus_tag
                .as_deref()
                .map(|t| t.trim().to_lowercase())
                .filter(|t| !t.is_empty()),
            budget_active: input.time_budget.is_some_and(|b| b > 0),
            in_heavy_window: heavy.contains(now_minute),
        };
        let sorted = ranking::rank(input.tasks.iter().filter(|t| t.is_eligible()), &ctx);

        // 3. Slot assignment
        let wake = parse_minutes_lenient(input.user_prefs.wake_or_default());
        let slots = assign_slots(&sorted, &windows, now_minute.max(wake), input.time_budget);

        tracing::debug!(
            eligible = sorted.len(),
            windows = windows.len(),
            heavy = %heavy,
            slotted = slots.len(),
            "replanned"
        );

        ReplanOutput {
            order: sorted.iter().map(|t| t.id.clone()).collect(),
            slots: (!slots.is_empty()).then_some(slots),
        }
    }
}

/// Replan with the default constants.
pub fn replan_heuristic(input: &ReplanInput, now: NaiveDateTime) -> ReplanOutput {
    Replanner::new().replan(input, now)
}

/// Walk the sorted tasks, consuming window time and budget from a cursor.
fn assign_slots(
    sorted: &[&Task],
    windows: &[TimeWindow],
    start_minute: u32,
    time_budget: Option<u32>,
) -> BTreeMap<String, TimeSlot> {
    let mut slots = BTreeMap::new();
    let mut budget_remaining = time_budget;
    let mut cursor = clamp_to_windows(start_minute, windows);
    let mut window_idx = windows.iter().position(|w| w.contains(cursor)).unwrap_or(0);

    for task in sorted {
        if budget_remaining == Some(0) {
            break;
        }
        let mut duration = task.scheduled_minutes();
        if let Some(remaining) = budget_remaining {
            duration = duration.min(remaining);
        }

        while let Some(window) = windows.get(window_idx) {
            cursor = cursor.max(window.start);
            if cursor >= window.end {
                window_idx += 1;
                continue;
            }
            let used = (window.end - cursor).min(duration);
            slots.insert(
                task.id.clone(),
                (format_minutes(cursor), format_minutes(cursor + used)),
            );
            cursor += used;
            if let Some(remaining) = budget_remaining.as_mut() {
                *remaining -= used;
            }
            break;
        }
    }

    slots
}
