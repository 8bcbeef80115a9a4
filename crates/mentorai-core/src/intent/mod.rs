//! Free-text intent extraction for the chat assistant.
//!
//! This is not language understanding: a handful of regular expressions,
//! built from an [`IntentVocabulary`], pick out three things from a
//! message:
//!
//! - a mute duration ("silencio 30", "mute for 15 min")
//! - a time budget ("tengo 20 min", "me quedan 25 minutos")
//! - a focus tag ("solo cardio", "enfoque ventas")
//!
//! Extraction never fails; anything unrecognised is simply absent.

mod vocabulary;

pub use vocabulary::{IntentVocabulary, Locale};

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Structured result of parsing one message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedIntent {
    /// Minutes the user has available
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_budget: Option<u32>,
    /// Lower-cased focus label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focus_tag: Option<String>,
    /// Minutes to mute notifications
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mute_mins: Option<u32>,
}

impl ParsedIntent {
    pub fn is_empty(&self) -> bool {
        self.time_budget.is_none() && self.focus_tag.is_none() && self.mute_mins.is_none()
    }

    /// Whether the message asks for a replan (budget or focus present).
    pub fn wants_replan(&self) -> bool {
        self.time_budget.is_some() || self.focus_tag.is_some()
    }
}

/// Characters allowed in a focus tag.
const FOCUS_TOKEN: &str = r"[a-z0-9_\-áéíóúñü]{2,}";

/// One to three ASCII digits.
const NUMBER: &str = r"([0-9]{1,3})";

/// End of an ASCII word: accented letters count as a boundary.
const WORD_END: &str = r"(?-i:[^0-9A-Za-z_]|$)";

/// Compiled intent patterns for one vocabulary.
#[derive(Debug, Clone)]
pub struct IntentExtractor {
    mute: Option<Regex>,
    mute_keyword: Option<Regex>,
    contextual_budget: Option<Regex>,
    bare_budget: Option<Regex>,
    focus: Option<Regex>,
}

static DEFAULT_EXTRACTOR: LazyLock<IntentExtractor> = LazyLock::new(|| {
    IntentExtractor::new(&IntentVocabulary::spanish()).expect("built-in vocabulary compiles")
});

/// Parse a message with the built-in Spanish vocabulary.
pub fn parse_intent(raw_text: &str) -> ParsedIntent {
    DEFAULT_EXTRACTOR.parse(raw_text)
}

impl IntentExtractor {
    /// Compile the patterns for a vocabulary.
    ///
    /// Phrases are escaped, so the only failure left is the regex size
    /// limit. An empty keyword list disables the patterns that need it.
    pub fn new(vocab: &IntentVocabulary) -> Result<Self, regex::Error> {
        for (field, phrases) in vocab.fields() {
            if phrases.is_empty() {
                tracing::debug!(field, "empty keyword list");
            }
        }

        let mute = alternation(&vocab.mute);
        let connectors = alternation(&vocab.mute_connectors);
        let budget = alternation(&vocab.time_budget);
        let units = alternation(&vocab.minute_units);
        let focus = alternation(&vocab.focus);

        let mute_pattern = mute.as_ref().map(|m| {
            let connector = connectors
                .as_ref()
                .map(|c| format!(r"(?:(?:{c})\s*)?"))
                .unwrap_or_default();
            let unit = units
                .as_ref()
                .map(|u| format!(r"(?:\s*(?:{u}))?"))
                .unwrap_or_default();
            format!(r"(?:{m})\s*{connector}{NUMBER}{unit}{WORD_END}")
        });
        let contextual_pattern = match (&budget, &units) {
            (Some(b), Some(u)) => Some(format!(r"(?:{b})\s*{NUMBER}\s*(?:{u}){WORD_END}")),
            _ => None,
        };
        let bare_pattern = units.as_ref().map(|u| format!(r"{NUMBER}\s*(?:{u}){WORD_END}"));
        let focus_pattern = focus.as_ref().map(|f| format!(r"(?:{f})\s+({FOCUS_TOKEN})"));

        Ok(Self {
            mute: compile(mute_pattern)?,
            mute_keyword: compile(mute.map(|m| format!("(?:{m})")))?,
            contextual_budget: compile(contextual_pattern)?,
            bare_budget: compile(bare_pattern)?,
            focus: compile(focus_pattern)?,
        })
    }

    /// Compile the built-in vocabulary for a locale.
    pub fn for_locale(locale: Locale) -> Result<Self, regex::Error> {
        Self::new(&IntentVocabulary::for_locale(locale))
    }

    /// Parse a raw message into an intent.
    pub fn parse(&self, raw_text: &str) -> ParsedIntent {
        let text = raw_text.trim().to_lowercase();
        if text.is_empty() {
            return ParsedIntent::default();
        }

        let intent = ParsedIntent {
            time_budget: self.extract_time_budget(&text),
            focus_tag: self.extract_focus(&text),
            mute_mins: self.extract_mute(&text),
        };
        tracing::debug!(?intent, "parsed intent");
        intent
    }

    fn extract_mute(&self, text: &str) -> Option<u32> {
        extract_number(self.mute.as_ref()?, text)
    }

    fn extract_time_budget(&self, text: &str) -> Option<u32> {
        if let Some(minutes) = self
            .contextual_budget
            .as_ref()
            .and_then(|re| extract_number(re, text))
        {
            return Some(minutes);
        }
        // A mute command's duration is not a budget.
        if self.mute_keyword.as_ref().is_some_and(|re| re.is_match(text)) {
            return None;
        }
        extract_number(self.bare_budget.as_ref()?, text)
    }

    fn extract_focus(&self, text: &str) -> Option<String> {
        let caps = self.focus.as_ref()?.captures(text)?;
        let tag = caps.get(1)?.as_str().trim().to_lowercase();
        (!tag.is_empty()).then_some(tag)
    }
}

impl Default for IntentExtractor {
    fn default() -> Self {
        DEFAULT_EXTRACTOR.clone()
    }
}

/// First capture group as a positive whole number.
fn extract_number(re: &Regex, text: &str) -> Option<u32> {
    let caps = re.captures(text)?;
    let n = caps.get(1)?.as_str().parse::<u32>().ok()?;
    (n > 0).then_some(n)
}

/// Escaped `a|b|c` alternation, longest phrase first, or `None` when empty.
fn alternation(phrases: &[String]) -> Option<String> {
    let mut escaped: Vec<String> = phrases
        .iter()
        .map(|p| {
            p.split_whitespace()
                .map(|w| regex::escape(&w.to_lowercase()))
                .collect::<Vec<_>>()
                .join(r"\s+")
        })
        .filter(|p| !p.is_empty())
        .collect();
    if escaped.is_empty() {
        return None;
    }
    escaped.sort_by_key(|p| std::cmp::Reverse(p.len()));
    escaped.dedup();
    Some(escaped.join("|"))
}

fn compile(pattern: Option<String>) -> Result<Option<Regex>, regex::Error> {
    pattern
        .map(|p| RegexBuilder::new(&p).case_insensitive(true).build())
        .transpose()
}
