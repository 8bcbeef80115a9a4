//! [`TaskBoard`]: task list operations and the daily rollover.

use chrono::{NaiveDate, NaiveDateTime};
use rand::Rng;

use super::{ActionKind, AppState, HistoryEntry, LastAction};
use crate::clock::day_key;
use crate::error::{CoreError, Result, StorageError, ValidationError};
use crate::motivation::{quote_for_day, random_quote_different};
use crate::planner::ReplanOutput;
use crate::task::{compute_brief, Task, TaskStatus};

/// The starter tasks a fresh day begins with.
pub fn mock_daily_tasks(now: NaiveDateTime) -> Vec<Task> {
    let stamp = now.and_utc().timestamp_millis();
    [
        ("Revisar agenda del día", 5),
        ("Plan de enfoque (Deep work)", 45),
        ("Chequeo de correos prioritarios", 15),
        ("Bloque de movimiento/descanso", 10),
    ]
    .into_iter()
    .enumerate()
    .map(|(i, (title, duration))| Task::with_id(format!("t-{stamp}-{}", i + 1), title, duration))
    .collect()
}

/// Task list operations over [`AppState`].
///
/// Every mutation recomputes the brief. Persisting is left to the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskBoard {
    state: AppState,
}

impl TaskBoard {
    pub fn from_state(state: AppState) -> Self {
        Self { state }
    }

    /// Build today's board from whatever was stored.
    ///
    /// A blob from an earlier day is folded into that day's history and the
    /// day restarts with the starter tasks. On the same day the last action
    /// stays undoable.
    pub fn hydrate<R: Rng + ?Sized>(
        stored: Option<&serde_json::Value>,
        now: NaiveDateTime,
        rng: &mut R,
    ) -> Self {
        let today = day_key(now.date());

        let stored = stored.and_then(|value| match AppState::sanitize(value) {
            Ok(state) => Some(state),
            Err(e) => {
                tracing::warn!(error = %e, "discarding stored state");
                None
            }
        });

        let Some(mut state) = stored else {
            return Self::from_state(AppState {
                brief: compute_brief(&[]),
                motivational_quote: quote_for_day(&today).to_string(),
                last_day_key: Some(today),
                ..Default::default()
            });
        };

        match state.last_day_key.take() {
            Some(previous) if previous != today => {
                // Live counters already cover the day; blobs without them
                // only carry task statuses.
                let finished = *state
                    .history
                    .entry(previous.clone())
                    .or_insert_with(|| HistoryEntry::aggregate(&state.tasks));
                tracing::debug!(%previous, %today, ?finished, "day rollover");

                let mut board = Self::from_state(AppState {
                    motivational_quote: quote_for_day(&today).to_string(),
                    history: state.history,
                    last_day_key: Some(today),
                    ..Default::default()
                });
                board.replan_mock(now, rng);
                board
            }
            previous => {
                if previous.is_none() || state.motivational_quote.is_empty() {
                    state.motivational_quote = quote_for_day(&today).to_string();
                }
                if state.last_action.as_ref().is_some_and(|a| a.day != today) {
                    state.last_action = None;
                }
                state.last_day_key = Some(today);
                Self::from_state(state)
            }
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn into_state(self) -> AppState {
        self.state
    }

    pub fn tasks(&self) -> &[Task] {
        &self.state.tasks
    }

    pub fn brief(&self) -> &str {
        &self.state.brief
    }

    pub fn quote(&self) -> &str {
        &self.state.motivational_quote
    }

    pub fn history(&self, day: NaiveDate) -> HistoryEntry {
        self.state
            .history
            .get(&day_key(day))
            .copied()
            .unwrap_or_default()
    }

    fn recalc_brief(&mut self) {
        self.state.brief = compute_brief(&self.state.tasks);
    }

    fn position(&self, id: &str) -> Result<usize> {
        self.state
            .tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| StorageError::TaskNotFound(id.to_string()).into())
    }

    /// Append a task as `todo`.
    pub fn add_task(&mut self, mut task: Task) -> Result<&Task> {
        if task.title.trim().is_empty() {
            return Err(ValidationError::InvalidValue {
                field: "title".into(),
                message: "must not be empty".into(),
            }
            .into());
        }
        if self.state.tasks.iter().any(|t| t.id == task.id) {
            return Err(CoreError::Custom(format!("Task already exists: {}", task.id)));
        }
        task.status = TaskStatus::Todo;
        self.state.tasks.push(task);
        self.recalc_brief();
        let index = self.state.tasks.len() - 1;
        Ok(&self.state.tasks[index])
    }

    fn finish(&mut self, id: &str, kind: ActionKind, today: NaiveDate) -> Result<&Task> {
        let index = self.position(id)?;
        let target = match kind {
            ActionKind::Done => TaskStatus::Done,
            ActionKind::Skip => TaskStatus::Skipped,
        };
        let task = &mut self.state.tasks[index];
        task.transition_to(target)?;

        let day = day_key(today);
        let entry = self.state.history.entry(day.clone()).or_default();
        match kind {
            ActionKind::Done => {
                entry.completed += 1;
                entry.total_time_done += i64::from(task.duration.max(0));
            }
            ActionKind::Skip => entry.skipped += 1,
        }
        self.state.last_action = Some(LastAction {
            kind,
            day,
            task: task.clone(),
        });
        self.recalc_brief();
        Ok(&self.state.tasks[index])
    }

    /// Mark a task done and count it in today's history.
    pub fn mark_done(&mut self, id: &str, today: NaiveDate) -> Result<&Task> {
        self.finish(id, ActionKind::Done, today)
    }

    /// Skip a task and count it in today's history.
    pub fn skip(&mut self, id: &str, today: NaiveDate) -> Result<&Task> {
        self.finish(id, ActionKind::Skip, today)
    }

    /// Revert the last done/skip, including its history counter.
    ///
    /// Returns the restored task, or `None` when there is nothing to undo.
    pub fn undo_last(&mut self) -> Option<&Task> {
        let action = self.state.last_action.take()?;
        let index = self.state.tasks.iter().position(|t| t.id == action.task.id)?;
        let task = &mut self.state.tasks[index];
        if task.transition_to(TaskStatus::Todo).is_err() {
            return None;
        }

        if let Some(entry) = self.state.history.get_mut(&action.day) {
            match action.kind {
                ActionKind::Done => {
                    entry.completed = entry.completed.saturating_sub(1);
                    entry.total_time_done =
                        (entry.total_time_done - i64::from(task.duration.max(0))).max(0);
                }
                ActionKind::Skip => entry.skipped = entry.skipped.saturating_sub(1),
            }
        }
        self.recalc_brief();
        Some(&self.state.tasks[index])
    }

    pub fn remove_task(&mut self, id: &str) -> Result<Task> {
        let index = self.position(id)?;
        let removed = self.state.tasks.remove(index);
        if self
            .state
            .last_action
            .as_ref()
            .is_some_and(|a| a.task.id == removed.id)
        {
            self.state.last_action = None;
        }
        self.recalc_brief();
        Ok(removed)
    }

    /// Replace the list with the starter tasks and draw a new quote.
    pub fn replan_mock<R: Rng + ?Sized>(&mut self, now: NaiveDateTime, rng: &mut R) {
        self.state.tasks = mock_daily_tasks(now);
        self.state.last_action = None;
        let previous = Some(self.state.motivational_quote.as_str()).filter(|q| !q.is_empty());
        self.state.motivational_quote = random_quote_different(previous, rng).to_string();
        self.recalc_brief();
    }

    /// Reorder `todo` tasks to follow a replan; other tasks keep their
    /// relative order after them.
    pub fn apply_plan(&mut self, plan: &ReplanOutput) {
        let mut rest = std::mem::take(&mut self.state.tasks);
        let mut ordered = Vec::with_capacity(rest.len());
        for id in &plan.order {
            if let Some(pos) = rest.iter().position(|t| &t.id == id && t.is_eligible()) {
                ordered.push(rest.remove(pos));
            }
        }
        let (todo, finished): (Vec<Task>, Vec<Task>) = rest.into_iter().partition(Task::is_eligible);
        ordered.extend(todo);
        ordered.extend(finished);
        self.state.tasks = ordered;
        self.recalc_brief();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::json;

    fn at(ts: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M").unwrap()
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    fn today() -> NaiveDate {
        at("2024-05-10 08:00").date()
    }

    fn board_with(tasks: Vec<Task>) -> TaskBoard {
        let mut board = TaskBoard::hydrate(None, at("2024-05-10 08:00"), &mut rng());
        for task in tasks {
            board.add_task(task).unwrap();
        }
        board
    }

    #[test]
    fn hydrate_without_blob_starts_empty() {
        let board = TaskBoard::hydrate(None, at("2024-05-10 08:00"), &mut rng());
        assert!(board.tasks().is_empty());
        assert_eq!(board.brief(), "Tienes 0 tareas (~0 min)");
        assert_eq!(board.quote(), quote_for_day("2024-05-10"));
        assert_eq!(board.state().last_day_key.as_deref(), Some("2024-05-10"));
    }

    #[test]
    fn hydrate_same_day_keeps_tasks_and_quote() {
        let blob = json!({
            "tasks": [{"id": "a", "title": "Leer", "duration": 20, "status": "todo"}],
            "brief": "Tienes 1 tareas (~20 min)",
            "motivationalQuote": "Cita guardada",
            "history": {},
            "lastDayKey": "2024-05-10"
        });
        let board = TaskBoard::hydrate(Some(&blob), at("2024-05-10 21:00"), &mut rng());
        assert_eq!(board.tasks().len(), 1);
        assert_eq!(board.quote(), "Cita guardada");
    }

    #[test]
    fn hydrate_same_day_keeps_todays_undo() {
        let mut board = board_with(vec![Task::with_id("a", "Leer", 20)]);
        board.mark_done("a", today()).unwrap();
        let blob = serde_json::to_value(board.state()).unwrap();

        let mut board = TaskBoard::hydrate(Some(&blob), at("2024-05-10 08:05"), &mut rng());
        assert_eq!(board.undo_last().map(|t| t.id.as_str()), Some("a"));
        assert_eq!(board.history(today()).completed, 0);
    }

    #[test]
    fn hydrate_drops_undo_from_another_day() {
        let blob = json!({
            "tasks": [{"id": "a", "title": "Leer", "duration": 20, "status": "done"}],
            "lastDayKey": "2024-05-10",
            "lastAction": {
                "type": "done",
                "day": "2024-05-09",
                "task": {"id": "a", "title": "Leer", "duration": 20, "status": "done"}
            }
        });
        let mut board = TaskBoard::hydrate(Some(&blob), at("2024-05-10 08:05"), &mut rng());
        assert!(board.undo_last().is_none());
    }

    #[test]
    fn hydrate_next_day_rolls_history_and_restarts() {
        let blob = json!({
            "tasks": [
                {"id": "a", "title": "Leer", "duration": 20, "status": "done"},
                {"id": "b", "title": "Correr", "duration": 30, "status": "skipped"},
                {"id": "c", "title": "Correo", "duration": 10, "status": "todo"}
            ],
            "motivationalQuote": "Ayer",
            "history": {"2024-05-08": {"completed": 3, "skipped": 0, "totalTimeDone": 90}},
            "lastDayKey": "2024-05-09"
        });
        let board = TaskBoard::hydrate(Some(&blob), at("2024-05-10 07:00"), &mut rng());

        let yesterday = board.history(at("2024-05-09 00:00").date());
        assert_eq!(yesterday.completed, 1);
        assert_eq!(yesterday.skipped, 1);
        assert_eq!(yesterday.total_time_done, 20);
        assert_eq!(board.history(at("2024-05-08 00:00").date()).completed, 3);

        assert_eq!(board.tasks().len(), 4);
        assert!(board.tasks().iter().all(Task::is_eligible));
        assert_eq!(board.brief(), "Tienes 4 tareas (~75 min)");
        assert_ne!(board.quote(), quote_for_day("2024-05-10"));
        assert_eq!(board.state().last_day_key.as_deref(), Some("2024-05-10"));
    }

    #[test]
    fn rollover_keeps_live_counters() {
        let blob = json!({
            "tasks": [{"id": "a", "title": "Leer", "duration": 20, "status": "done"}],
            "history": {"2024-05-09": {"completed": 1, "skipped": 0, "totalTimeDone": 20}},
            "lastDayKey": "2024-05-09"
        });
        let board = TaskBoard::hydrate(Some(&blob), at("2024-05-10 07:00"), &mut rng());
        let yesterday = board.history(at("2024-05-09 00:00").date());
        assert_eq!((yesterday.completed, yesterday.total_time_done), (1, 20));
    }

    #[test]
    fn invalid_blob_is_treated_as_missing() {
        let board = TaskBoard::hydrate(Some(&json!([1])), at("2024-05-10 08:00"), &mut rng());
        assert!(board.tasks().is_empty());
    }

    #[test]
    fn done_and_skip_update_history() {
        let mut board = board_with(vec![Task::with_id("a", "Leer", 20), Task::with_id("b", "Correr", 30)]);
        board.mark_done("a", today()).unwrap();
        board.skip("b", today()).unwrap();

        let entry = board.history(today());
        assert_eq!((entry.completed, entry.skipped, entry.total_time_done), (1, 1, 20));
        assert_eq!(board.brief(), "Tienes 0 tareas (~0 min)");
    }

    #[test]
    fn done_twice_is_rejected() {
        let mut board = board_with(vec![Task::with_id("a", "Leer", 20)]);
        board.mark_done("a", today()).unwrap();
        assert!(matches!(board.mark_done("a", today()), Err(CoreError::Transition(_))));
        assert_eq!(board.history(today()).completed, 1);
    }

    #[test]
    fn unknown_task_is_not_found() {
        let mut board = board_with(vec![]);
        assert!(matches!(
            board.skip("nope", today()),
            Err(CoreError::Storage(StorageError::TaskNotFound(_)))
        ));
        assert!(board.remove_task("nope").is_err());
    }

    #[test]
    fn undo_restores_task_and_counters() {
        let mut board = board_with(vec![Task::with_id("a", "Leer", 20)]);
        board.mark_done("a", today()).unwrap();

        let restored = board.undo_last().unwrap();
        assert_eq!(restored.status, TaskStatus::Todo);
        assert_eq!(board.history(today()), HistoryEntry::default());
        assert_eq!(board.brief(), "Tienes 1 tareas (~20 min)");
        assert!(board.undo_last().is_none());
    }

    #[test]
    fn add_task_validates() {
        let mut board = board_with(vec![Task::with_id("a", "Leer", 20)]);
        assert!(board.add_task(Task::with_id("a", "Otra", 5)).is_err());
        assert!(board.add_task(Task::new("  ", 5)).is_err());
    }

    #[test]
    fn remove_task_clears_matching_undo() {
        let mut board = board_with(vec![Task::with_id("a", "Leer", 20)]);
        board.skip("a", today()).unwrap();
        board.remove_task("a").unwrap();
        assert!(board.undo_last().is_none());
        assert!(board.tasks().is_empty());
    }

    #[test]
    fn replan_mock_uses_starter_tasks() {
        let mut board = board_with(vec![Task::with_id("a", "Leer", 20)]);
        let before = board.quote().to_string();
        board.replan_mock(at("2024-05-10 09:00"), &mut rng());

        let titles: Vec<&str> = board.tasks().iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles[0], "Revisar agenda del día");
        assert_eq!(titles.len(), 4);
        assert!(board.tasks()[0].id.starts_with("t-"));
        assert!(board.tasks()[3].id.ends_with("-4"));
        assert_ne!(board.quote(), before);
    }

    #[test]
    fn apply_plan_reorders_todo_only() {
        let mut board = board_with(vec![
            Task::with_id("a", "A", 10),
            Task::with_id("b", "B", 10),
            Task::with_id("c", "C", 10),
        ]);
        board.mark_done("a", today()).unwrap();

        let plan = ReplanOutput {
            order: vec!["c".into(), "b".into()],
            slots: None,
        };
        board.apply_plan(&plan);
        let ids: Vec<&str> = board.tasks().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["c", "b", "a"]);
    }
}
