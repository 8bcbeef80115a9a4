//! Planning windows and the heavy (high-energy) window.

use serde::{Deserialize, Serialize};

use super::PlannerConfig;
use crate::clock::{format_minutes, parse_minutes_lenient};
use crate::prefs::UserPrefs;

/// A half-open `[start, end)` interval in minutes since midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: u32,
    pub end: u32,
}

impl TimeWindow {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Same-day windows only: `end` must come after `start`.
    pub fn is_valid(&self) -> bool {
        self.end > self.start
    }

    pub fn contains(&self, minute: u32) -> bool {
        minute >= self.start && minute < self.end
    }

    pub fn len_minutes(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    /// Overlap with another window, if non-empty.
    pub fn intersect(&self, other: &TimeWindow) -> Option<TimeWindow> {
        let clipped = TimeWindow::new(self.start.max(other.start), self.end.min(other.end));
        clipped.is_valid().then_some(clipped)
    }
}

impl std::fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", format_minutes(self.start), format_minutes(self.end))
    }
}

/// The single window used when nothing usable is configured:
/// `[max(wake, day_start), min(sleep, day_end)]`.
pub fn default_window(prefs: &UserPrefs, config: &PlannerConfig) -> TimeWindow {
    let wake = parse_minutes_lenient(prefs.wake_or_default());
    let sleep = parse_minutes_lenient(prefs.sleep_or_default());
    TimeWindow::new(
        wake.max(config.default_day_start),
        sleep.min(config.default_day_end),
    )
}

/// Valid planning windows sorted by start.
///
/// Focus blocks win over preferred hours; with neither, or when every
/// configured window is invalid, the default window is used (which may
/// itself be invalid, leaving nothing to schedule into).
pub fn planning_windows(prefs: &UserPrefs, config: &PlannerConfig) -> Vec<TimeWindow> {
    let configured = prefs.configured_windows();
    let mut windows: Vec<TimeWindow> = configured
        .iter()
        .map(|r| TimeWindow::new(parse_minutes_lenient(&r.start), parse_minutes_lenient(&r.end)))
        .filter(TimeWindow::is_valid)
        .collect();

    if windows.is_empty() {
        if !configured.is_empty() {
            tracing::debug!(
                configured = configured.len(),
                "no valid planning window configured, using the default window"
            );
        }
        windows.extend(Some(default_window(prefs, config)).filter(TimeWindow::is_valid));
    }

    windows.sort_by_key(|w| w.start);
    windows
}

/// The heavy window clipped to the first planning window it overlaps, or
/// the configured default when none does.
pub fn heavy_window(windows: &[TimeWindow], config: &PlannerConfig) -> TimeWindow {
    let heavy = TimeWindow::new(config.heavy_start, config.heavy_end);
    windows
        .iter()
        .find_map(|w| w.intersect(&heavy))
        .unwrap_or(heavy)
}

/// Snap a minute into the windows: before a window's start snaps to that
/// start, inside a window stays, past every window falls back to the first
/// window's start.
pub fn clamp_to_windows(minute: u32, windows: &[TimeWindow]) -> u32 {
    for w in windows {
        if minute <= w.start {
            return w.start;
        }
        if w.contains(minute) {
            return minute;
        }
    }
    windows.first().map(|w| w.start).unwrap_or(minute)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefs::HourRange;

    fn config() -> PlannerConfig {
        PlannerConfig::default()
    }

    #[test]
    fn invalid_windows_are_dropped_and_sorted() {
        let prefs = UserPrefs::default().with_preferred_hours(vec![
            HourRange::new("15:00", "18:00"),
            HourRange::new("12:00", "11:00"),
            HourRange::new("08:30", "12:30"),
        ]);
        let windows = planning_windows(&prefs, &config());
        assert_eq!(
            windows,
            vec![TimeWindow::new(510, 750), TimeWindow::new(900, 1080)]
        );
    }

    #[test]
    fn all_invalid_falls_back_to_default() {
        let prefs = UserPrefs::new("07:00", "23:30")
            .with_focus_blocks(vec![HourRange::new("10:00", "10:00")]);
        assert_eq!(planning_windows(&prefs, &config()), vec![TimeWindow::new(540, 1080)]);
    }

    #[test]
    fn default_window_respects_wake_and_sleep() {
        let prefs = UserPrefs::new("10:15", "16:45");
        assert_eq!(planning_windows(&prefs, &config()), vec![TimeWindow::new(615, 1005)]);

        let prefs = UserPrefs::new("19:00", "23:00");
        assert!(planning_windows(&prefs, &config()).is_empty());
    }

    #[test]
    fn heavy_window_is_clipped_to_first_overlap() {
        let windows = vec![TimeWindow::new(480, 540), TimeWindow::new(630, 900)];
        assert_eq!(heavy_window(&windows, &config()), TimeWindow::new(630, 720));

        let windows = vec![TimeWindow::new(900, 1000)];
        assert_eq!(heavy_window(&windows, &config()), TimeWindow::new(600, 720));
    }

    #[test]
    fn clamp_behaviour() {
        let windows = vec![TimeWindow::new(540, 720), TimeWindow::new(900, 1080)];
        assert_eq!(clamp_to_windows(420, &windows), 540);
        assert_eq!(clamp_to_windows(600, &windows), 600);
        assert_eq!(clamp_to_windows(780, &windows), 900);
        assert_eq!(clamp_to_windows(1200, &windows), 540);
        assert_eq!(clamp_to_windows(1200, &[]), 1200);
    }

    #[test]
    fn window_display() {
        assert_eq!(TimeWindow::new(540, 1080).to_string(), "09:00-18:00");
    }
}
