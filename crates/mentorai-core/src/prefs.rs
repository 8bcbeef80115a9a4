//! Scheduling preferences read by the planner.

use serde::{Deserialize, Serialize};

use crate::clock::parse_minutes_strict;
use crate::error::ValidationError;

/// Wake time used when none is configured.
pub const DEFAULT_WAKE: &str = "07:00";
/// Sleep time used when none is configured.
pub const DEFAULT_SLEEP: &str = "23:30";

/// A same-day `HH:MM` window as the user entered it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourRange {
    pub start: String,
    pub end: String,
}

impl HourRange {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    /// Strictly validate both ends and their order.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let start = parse_minutes_strict(&self.start)?;
        let end = parse_minutes_strict(&self.end)?;
        if end <= start {
            return Err(ValidationError::InvalidWindow {
                start: self.start.clone(),
                end: self.end.clone(),
            });
        }
        Ok(())
    }
}

/// Scheduling preferences, owned by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPrefs {
    #[serde(default = "default_wake")]
    pub wake: String,
    #[serde(default = "default_sleep")]
    pub sleep: String,
    /// Fallback windows
    #[serde(default)]
    pub preferred_hours: Vec<HourRange>,
    /// Take precedence over `preferred_hours` when non-empty
    #[serde(default)]
    pub focus_blocks: Vec<HourRange>,
}

fn default_wake() -> String {
    DEFAULT_WAKE.to_string()
}

fn default_sleep() -> String {
    DEFAULT_SLEEP.to_string()
}

impl Default for UserPrefs {
    fn default() -> Self {
        Self {
            wake: default_wake(),
            sleep: default_sleep(),
            preferred_hours: Vec::new(),
            focus_blocks: Vec::new(),
        }
    }
}

impl UserPrefs {
    pub fn new(wake: impl Into<String>, sleep: impl Into<String>) -> Self {
        Self {
            wake: wake.into(),
            sleep: sleep.into(),
            ..Self::default()
        }
    }

    pub fn with_preferred_hours(mut self, hours: Vec<HourRange>) -> Self {
        self.preferred_hours = hours;
        self
    }

    pub fn with_focus_blocks(mut self, blocks: Vec<HourRange>) -> Self {
        self.focus_blocks = blocks;
        self
    }

    /// The windows the planner should use, before conversion: focus blocks
    /// when present, otherwise preferred hours (possibly empty).
    pub fn configured_windows(&self) -> &[HourRange] {
        if self.focus_blocks.is_empty() {
            &self.preferred_hours
        } else {
            &self.focus_blocks
        }
    }

    /// Wake time, falling back to the default when blank.
    pub fn wake_or_default(&self) -> &str {
        if self.wake.trim().is_empty() {
            DEFAULT_WAKE
        } else {
            &self.wake
        }
    }

    /// Sleep time, falling back to the default when blank.
    pub fn sleep_or_default(&self) -> &str {
        if self.sleep.trim().is_empty() {
            DEFAULT_SLEEP
        } else {
            &self.sleep
        }
    }
}
