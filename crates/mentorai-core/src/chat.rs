//! Chat assistant stub and the manual replan action.
//!
//! The chat path runs a message through the intent extractor and, when it
//! carries a time budget or a focus tag, forwards both into the replanner.
//! The manual path replans with task metadata and preferences only.
//! Neither touches the caller's task collection; applying the returned
//! plan is the caller's job.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::clock::{add_minutes, format_minutes, minute_of_day};
use crate::intent::{IntentExtractor, ParsedIntent};
use crate::planner::{ReplanInput, ReplanOutput, Replanner};
use crate::prefs::UserPrefs;
use crate::task::{compute_brief, Task};

/// What the assistant answers to one message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
    pub intent: ParsedIntent,
    /// Present when the message asked for a replan
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan: Option<ReplanOutput>,
    /// End of the requested mute period
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mute_until: Option<NaiveDateTime>,
    pub message: String,
}

/// Intent extraction wired to the replanner.
#[derive(Debug, Clone, Default)]
pub struct ChatHandler {
    extractor: IntentExtractor,
    replanner: Replanner,
}

impl ChatHandler {
    pub fn new(extractor: IntentExtractor, replanner: Replanner) -> Self {
        Self {
            extractor,
            replanner,
        }
    }

    /// Handle one user message against the current tasks.
    pub fn handle(
        &self,
        text: &str,
        tasks: &[Task],
        prefs: &UserPrefs,
        now: NaiveDateTime,
    ) -> ChatReply {
        let intent = self.extractor.parse(text);

        let plan = intent.wants_replan().then(|| {
            let input = ReplanInput::new(tasks.to_vec(), prefs.clone())
                .with_time_budget(intent.time_budget)
                .with_focus_tag(intent.focus_tag.clone());
            self.replanner.replan(&input, now)
        });
        let mute_until = intent.mute_mins.map(|mins| add_minutes(now, mins));

        let mut lines = Vec::new();
        if let Some(plan) = &plan {
            lines.push(describe_plan(&intent, plan, tasks));
        }
        if let Some(until) = mute_until {
            lines.push(format!(
                "Notificaciones en silencio hasta las {}.",
                format_minutes(minute_of_day(until))
            ));
        }
        if lines.is_empty() {
            lines.push(format!(
                "{}. Prueba con «tengo 20 min» o «solo cardio».",
                compute_brief(tasks)
            ));
        }

        tracing::debug!(?intent, replanned = plan.is_some(), "chat message handled");

        ChatReply {
            intent,
            plan,
            mute_until,
            message: lines.join(" "),
        }
    }
}

/// The pull-to-refresh replan: no budget, no focus tag.
pub fn replan_now(tasks: &[Task], prefs: &UserPrefs, now: NaiveDateTime) -> ReplanOutput {
    Replanner::new().replan(&ReplanInput::new(tasks.to_vec(), prefs.clone()), now)
}

fn describe_plan(intent: &ParsedIntent, plan: &ReplanOutput, tasks: &[Task]) -> String {
    let mut text = format!("Plan ajustado: {} tareas", plan.order.len());
    if let Some(budget) = intent.time_budget {
        text.push_str(&format!(" para {budget} min"));
    }
    if let Some(tag) = &intent.focus_tag {
        text.push_str(&format!(", foco en «{tag}»"));
    }
    text.push('.');

    let first = plan
        .order
        .first()
        .and_then(|id| tasks.iter().find(|t| &t.id == id));
    if let Some(task) = first {
        match plan.slot(&task.id) {
            Some((start, _)) => text.push_str(&format!(" Empieza por «{}» a las {start}.", task.title)),
            None => text.push_str(&format!(" Empieza por «{}».", task.title)),
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefs::HourRange;

    fn at(time: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(&format!("2024-05-10 {time}"), "%Y-%m-%d %H:%M").unwrap()
    }

    fn tasks() -> Vec<Task> {
        vec![
            Task::with_id("mail", "Correos", 15).priority(3),
            Task::with_id("sales", "Llamadas", 30).priority(3).tags(["ventas"]),
            Task::with_id("deep", "Deep work", 60).priority(3),
        ]
    }

    fn prefs() -> UserPrefs {
        UserPrefs::new("07:00", "23:00").with_preferred_hours(vec![HourRange::new("09:00", "12:00")])
    }

    #[test]
    fn budget_and_focus_are_forwarded() {
        let reply = ChatHandler::default().handle("tengo 20 min, enfoque ventas", &tasks(), &prefs(), at("08:00"));
        let plan = reply.plan.expect("plan");
        assert_eq!(plan.order[0], "sales");
        assert_eq!(plan.slot("sales"), Some(&("09:00".to_string(), "09:20".to_string())));
        assert!(plan.slot("mail").is_none());
        assert!(reply.message.contains("20 min"));
        assert!(reply.message.contains("Llamadas"));
    }

    #[test]
    fn mute_only_does_not_replan() {
        let reply = ChatHandler::default().handle("silencio 30", &tasks(), &prefs(), at("08:00"));
        assert!(reply.plan.is_none());
        assert_eq!(reply.mute_until, Some(at("08:30")));
        assert!(reply.message.contains("08:30"));
    }

    #[test]
    fn small_talk_returns_the_brief() {
        let reply = ChatHandler::default().handle("hola", &tasks(), &prefs(), at("08:00"));
        assert!(reply.intent.is_empty());
        assert!(reply.message.starts_with("Tienes 3 tareas (~105 min)"));
    }

    #[test]
    fn manual_replan_has_no_intent() {
        let out = replan_now(&tasks(), &prefs(), at("08:00"));
        // Same priority, no energy differences: shortest first
        assert_eq!(out.order, ["mail", "sales", "deep"]);
        assert_eq!(out.slot("deep"), Some(&("09:45".to_string(), "10:45".to_string())));
    }
}
