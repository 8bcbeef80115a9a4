//! Keyword lists driving the intent patterns.
//!
//! Each list maps a set of phrases onto one semantic field of
//! [`ParsedIntent`](super::ParsedIntent). Localizing the extractor means
//! supplying another vocabulary, not editing patterns.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Built-in vocabulary selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// Spanish, the app's default
    #[default]
    Es,
    /// English
    En,
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locale::Es => write!(f, "es"),
            Locale::En => write!(f, "en"),
        }
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "es" | "spanish" | "español" => Ok(Locale::Es),
            "en" | "english" => Ok(Locale::En),
            other => Err(format!("unsupported locale: {other}")),
        }
    }
}

/// Phrase lists per intent field.
///
/// Multi-word phrases match any run of whitespace between their words.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct IntentVocabulary {
    /// Words meaning "mute/silence"
    #[serde(default)]
    pub mute: Vec<String>,
    /// Optional connector between a mute word and its number ("por", "for")
    #[serde(default)]
    pub mute_connectors: Vec<String>,
    /// Phrases meaning "I have / I have left / I only have"
    #[serde(default)]
    pub time_budget: Vec<String>,
    /// Minute unit words
    #[serde(default)]
    pub minute_units: Vec<String>,
    /// Words meaning "only / just / focus on"
    #[serde(default)]
    pub focus: Vec<String>,
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

impl IntentVocabulary {
    /// Built-in vocabulary for a locale.
    pub fn for_locale(locale: Locale) -> Self {
        match locale {
            Locale::Es => Self::spanish(),
            Locale::En => Self::english(),
        }
    }

    pub fn spanish() -> Self {
        Self {
            mute: words(&["silencio", "silenciar", "mute", "mutear", "callar"]),
            mute_connectors: words(&["por"]),
            time_budget: words(&[
                "tengo",
                "me quedan",
                "dispongo de",
                "solo",
                "sólo",
                "cuento con",
                "quedan",
                "queda",
            ]),
            minute_units: words(&["min", "mins", "minutos", "m"]),
            focus: words(&["solo", "sólo", "únicamente", "unicamente", "enfoque", "enfocar", "foco"]),
        }
    }

    pub fn english() -> Self {
        Self {
            mute: words(&["mute", "silence", "quiet", "snooze"]),
            mute_connectors: words(&["for"]),
            time_budget: words(&[
                "i have",
                "i only have",
                "i have only",
                "i've got",
                "i got",
                "only have",
                "only",
                "just",
            ]),
            minute_units: words(&["min", "mins", "minute", "minutes", "m"]),
            focus: words(&["only", "just", "focus on", "focus"]),
        }
    }

    /// Append another vocabulary's phrases, skipping duplicates.
    pub fn extend(&mut self, other: &IntentVocabulary) {
        merge(&mut self.mute, &other.mute);
        merge(&mut self.mute_connectors, &other.mute_connectors);
        merge(&mut self.time_budget, &other.time_budget);
        merge(&mut self.minute_units, &other.minute_units);
        merge(&mut self.focus, &other.focus);
    }

    /// Enumerate `(field, phrases)` pairs.
    pub fn fields(&self) -> [(&'static str, &[String]); 5] {
        [
            ("mute", self.mute.as_slice()),
            ("mute_connectors", self.mute_connectors.as_slice()),
            ("time_budget", self.time_budget.as_slice()),
            ("minute_units", self.minute_units.as_slice()),
            ("focus", self.focus.as_slice()),
        ]
    }
}

fn merge(into: &mut Vec<String>, extra: &[String]) {
    for phrase in extra {
        let phrase = phrase.trim().to_lowercase();
        if !phrase.is_empty() && !into.contains(&phrase) {
            into.push(phrase);
        }
    }
}
