//! Task ordering for a replan.
//!
//! Tiers, first difference wins:
//!
//! | # | Tier            | Direction                                   |
//! |---|-----------------|---------------------------------------------|
//! | 1 | Deadline        | fewer days left first, undated last         |
//! | 2 | Priority        | higher first                                |
//! | 3 | Focus tag       | matching first (only with a focus tag)      |
//! | 4 | Budget          | shorter first (only with a time budget)     |
//! | 5 | Energy fit      | `high` first inside the heavy window, last outside |
//! | 6 | Tie-break       | shorter first, then title                   |

use chrono::NaiveDateTime;
use std::cmp::Ordering;

use crate::clock::days_until;
use crate::task::{EnergyLevel, Task};

/// Per-replan inputs to the comparator.
#[derive(Debug, Clone)]
pub struct RankContext {
    pub now: NaiveDateTime,
    /// Lower-cased, non-empty focus tag
    pub focus_tag: Option<String>,
    pub budget_active: bool,
    pub in_heavy_window: bool,
}

/// A task with its sort keys computed once.
#[derive(Debug, Clone)]
pub struct RankedTask<'a> {
    pub task: &'a Task,
    pub days_until: Option<i64>,
    pub focus_match: bool,
    pub energy_score: i8,
}

impl<'a> RankedTask<'a> {
    pub fn new(task: &'a Task, ctx: &RankContext) -> Self {
        let energy_score = match task.energy {
            EnergyLevel::High if ctx.in_heavy_window => -1,
            EnergyLevel::High => 1,
            EnergyLevel::Medium | EnergyLevel::Low => 0,
        };
        Self {
            task,
            days_until: days_until(task.deadline.as_deref(), ctx.now),
            focus_match: ctx
                .focus_tag
                .as_deref()
                .is_some_and(|tag| task.matches_focus(tag)),
            energy_score,
        }
    }
}

/// Undated deadlines sort after every dated one.
fn compare_deadlines(a: Option<i64>, b: Option<i64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Total order over ranked tasks.
pub fn compare(a: &RankedTask<'_>, b: &RankedTask<'_>, ctx: &RankContext) -> Ordering {
    compare_deadlines(a.days_until, b.days_until)
        .then_with(|| b.task.priority.cmp(&a.task.priority))
        .then_with(|| {
            if ctx.focus_tag.is_some() {
                b.focus_match.cmp(&a.focus_match)
            } else {
                Ordering::Equal
            }
        })
        .then_with(|| {
            if ctx.budget_active {
                a.task.duration.cmp(&b.task.duration)
            } else {
                Ordering::Equal
            }
        })
        .then_with(|| a.energy_score.cmp(&b.energy_score))
        .then_with(|| a.task.duration.cmp(&b.task.duration))
        .then_with(|| a.task.title.cmp(&b.task.title))
}

/// Stable sort of the given tasks.
pub fn rank<'a>(tasks: impl IntoIterator<Item = &'a Task>, ctx: &RankContext) -> Vec<&'a Task> {
    let mut ranked: Vec<RankedTask<'a>> = tasks.into_iter().map(|t| RankedTask::new(t, ctx)).collect();
    ranked.sort_by(|a, b| compare(a, b, ctx));
    ranked.into_iter().map(|r| r.task).collect()
}
