//! TOML-based application configuration.
//!
//! Stores:
//! - Intent vocabulary selection and extra keywords
//! - Planner constants (heavy window, fallback day bounds)
//! - Wake/sleep defaults used before a profile exists
//!
//! Configuration is stored at `~/.config/mentorai/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::clock::parse_minutes_strict;
use crate::error::{ConfigError, CoreError, Result};
use crate::intent::{IntentExtractor, IntentVocabulary, Locale};
use crate::planner::PlannerConfig;
use crate::prefs::UserPrefs;

/// Intent extractor configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct IntentConfig {
    #[serde(default)]
    pub locale: Locale,
    /// Keywords merged into the built-in vocabulary
    #[serde(default)]
    pub extra: IntentVocabulary,
}

/// Planner configuration, as `HH:MM` strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannerSettings {
    #[serde(default = "default_wake")]
    pub default_wake: String,
    #[serde(default = "default_sleep")]
    pub default_sleep: String,
    #[serde(default = "default_heavy_start")]
    pub heavy_start: String,
    #[serde(default = "default_heavy_end")]
    pub heavy_end: String,
    #[serde(default = "default_day_start")]
    pub day_start: String,
    #[serde(default = "default_day_end")]
    pub day_end: String,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/mentorai/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub intent: IntentConfig,
    #[serde(default)]
    pub planner: PlannerSettings,
}

// Default functions
fn default_wake() -> String {
    crate::prefs::DEFAULT_WAKE.into()
}
fn default_sleep() -> String {
    crate::prefs::DEFAULT_SLEEP.into()
}
fn default_heavy_start() -> String {
    "10:00".into()
}
fn default_heavy_end() -> String {
    "12:00".into()
}
fn default_day_start() -> String {
    "09:00".into()
}
fn default_day_end() -> String {
    "18:00".into()
}

impl Default for PlannerSettings {
    fn default() -> Self {
        Self {
            default_wake: default_wake(),
            default_sleep: default_sleep(),
            heavy_start: default_heavy_start(),
            heavy_end: default_heavy_end(),
            day_start: default_day_start(),
            day_end: default_day_end(),
        }
    }
}

impl PlannerSettings {
    /// Convert to planner constants, rejecting malformed or inverted times.
    pub fn to_planner_config(&self) -> Result<PlannerConfig, ConfigError> {
        let minutes = |key: &str, value: &str| {
            parse_minutes_strict(value).map_err(|e| ConfigError::InvalidValue {
                key: format!("planner.{key}"),
                message: e.to_string(),
            })
        };
        let config = PlannerConfig {
            heavy_start: minutes("heavy_start", &self.heavy_start)?,
            heavy_end: minutes("heavy_end", &self.heavy_end)?,
            default_day_start: minutes("day_start", &self.day_start)?,
            default_day_end: minutes("day_end", &self.day_end)?,
        };
        if config.heavy_end <= config.heavy_start {
            return Err(ConfigError::InvalidValue {
                key: "planner.heavy_end".into(),
                message: "must be later than planner.heavy_start".into(),
            });
        }
        Ok(config)
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() || key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Array(_) => {
                        // Accept a JSON array or a comma-separated list
                        serde_json::from_str(value).unwrap_or_else(|_| {
                            serde_json::Value::Array(
                                value
                                    .split(',')
                                    .map(str::trim)
                                    .filter(|s| !s.is_empty())
                                    .map(|s| serde_json::Value::String(s.to_string()))
                                    .collect(),
                            )
                        })
                    }
                    serde_json::Value::Object(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    /// Default location of the config file.
    pub fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk, writing the defaults if the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| {
                CoreError::Config(ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(err) => Err(CoreError::Config(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: err.to_string(),
            })),
        }
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "using default configuration");
            Self::default()
        })
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    /// Persist to an explicit path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let save_failed = |message: String| {
            CoreError::Config(ConfigError::SaveFailed {
                path: path.to_path_buf(),
                message,
            })
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key, in memory only.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not fit the
    /// field's type.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        updated.planner.to_planner_config()?;
        *self = updated;
        Ok(())
    }

    /// Built-in vocabulary for the configured locale plus the extra keywords.
    pub fn vocabulary(&self) -> IntentVocabulary {
        let mut vocab = IntentVocabulary::for_locale(self.intent.locale);
        vocab.extend(&self.intent.extra);
        vocab
    }

    /// Compile the configured intent extractor.
    pub fn intent_extractor(&self) -> Result<IntentExtractor> {
        IntentExtractor::new(&self.vocabulary()).map_err(|e| {
            CoreError::Config(ConfigError::InvalidValue {
                key: "intent.extra".into(),
                message: e.to_string(),
            })
        })
    }

    /// Planner constants, falling back to the defaults when invalid.
    pub fn planner_config(&self) -> PlannerConfig {
        self.planner.to_planner_config().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "invalid planner settings, using defaults");
            PlannerConfig::default()
        })
    }

    /// Preferences used before any profile has been saved.
    pub fn default_prefs(&self) -> UserPrefs {
        UserPrefs::new(&self.planner.default_wake, &self.planner.default_sleep)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
        assert_eq!(parsed.intent.locale, Locale::Es);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let parsed: Config = toml::from_str("[intent]\nlocale = \"en\"\n").unwrap();
        assert_eq!(parsed.intent.locale, Locale::En);
        assert_eq!(parsed.planner.heavy_start, "10:00");
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("intent.locale").as_deref(), Some("es"));
        assert_eq!(cfg.get("planner.day_end").as_deref(), Some("18:00"));
        assert!(cfg.get("planner.missing_key").is_none());
    }

    #[test]
    fn set_updates_strings_and_lists() {
        let mut cfg = Config::default();
        cfg.set("intent.locale", "en").unwrap();
        assert_eq!(cfg.intent.locale, Locale::En);

        cfg.set("intent.extra.focus", "solamente, nomás").unwrap();
        assert_eq!(cfg.intent.extra.focus, ["solamente", "nomás"]);
        assert!(cfg.vocabulary().focus.contains(&"nomás".to_string()));

        cfg.set("intent.extra.mute", r#"["shh", "calla"]"#).unwrap();
        assert_eq!(cfg.intent.extra.mute, ["shh", "calla"]);
    }

    #[test]
    fn set_replaces_whole_sections_from_json() {
        let mut cfg = Config::default();
        cfg.set("intent.extra", r#"{"focus": ["sólo"]}"#).unwrap();
        assert_eq!(cfg.intent.extra.focus, ["sólo"]);
        assert!(cfg.intent.extra.mute.is_empty());

        assert!(matches!(
            cfg.set("intent.extra", "focus=sólo"),
            Err(CoreError::Config(ConfigError::InvalidValue { .. }))
        ));
    }

    #[test]
    fn set_rejects_unknown_keys_and_bad_values() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set("planner.nope", "1"),
            Err(CoreError::Config(ConfigError::UnknownKey(_)))
        ));
        assert!(cfg.set("intent.locale", "klingon").is_err());
        assert!(cfg.set("planner.heavy_start", "noon").is_err());
        assert!(cfg.set("planner.heavy_end", "09:00").is_err());
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn planner_config_conversion() {
        let mut cfg = Config::default();
        assert_eq!(cfg.planner_config(), PlannerConfig::default());
        cfg.planner.heavy_start = "bad".into();
        assert_eq!(cfg.planner_config(), PlannerConfig::default());
    }

    #[test]
    fn load_from_writes_defaults_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg, Config::default());
        assert!(path.exists());

        let mut cfg = cfg;
        cfg.set("planner.default_wake", "06:30").unwrap();
        cfg.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap().planner.default_wake, "06:30");
    }

    #[test]
    fn load_from_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "intent = 3").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(CoreError::Config(ConfigError::LoadFailed { .. }))
        ));
    }
}
