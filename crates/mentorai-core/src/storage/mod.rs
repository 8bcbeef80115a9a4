//! On-disk persistence: configuration, the app state blob and the profile.

mod config;

pub use config::{Config, IntentConfig, PlannerSettings};

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::error::{Result, StorageError};
use crate::profile::UserProfile;
use crate::store::AppState;

/// Returns `~/.config/mentorai[-dev]/` based on MENTORAI_ENV.
///
/// Set MENTORAI_ENV=dev to use development data directory. MENTORAI_HOME
/// replaces the directory outright.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("MENTORAI_HOME") {
        Some(home) if !home.is_empty() => PathBuf::from(home),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("MENTORAI_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("mentorai-dev")
            } else {
                base_dir.join("mentorai")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| StorageError::DataDirUnavailable(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}

/// Read a JSON blob, `None` when the file does not exist.
fn read_json(path: &Path) -> Result<Option<serde_json::Value>> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(StorageError::ReadFailed {
                path: path.to_path_buf(),
                source,
            }
            .into())
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring corrupt blob");
            Ok(None)
        }
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let content = serde_json::to_string_pretty(value)?;
    std::fs::write(path, content).map_err(|source| StorageError::WriteFailed {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

/// The task state blob, `state.json`.
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn open() -> Result<Self> {
        Ok(Self::at(data_dir()?.join("state.json")))
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Raw stored blob; sanitizing is the board's job.
    pub fn load_raw(&self) -> Result<Option<serde_json::Value>> {
        read_json(&self.path)
    }

    pub fn save(&self, state: &AppState) -> Result<()> {
        write_json(&self.path, state)
    }
}

/// The user profile, `profile.json`.
#[derive(Debug, Clone)]
pub struct ProfileStore {
    path: PathBuf,
}

impl ProfileStore {
    pub fn open() -> Result<Self> {
        Ok(Self::at(data_dir()?.join("profile.json")))
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Stored profile, or `None` when missing or rejected by validation.
    pub fn load(&self) -> Result<Option<UserProfile>> {
        let Some(value) = read_json(&self.path)? else {
            return Ok(None);
        };
        match UserProfile::sanitize(&value) {
            Ok(profile) => Ok(Some(profile)),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "stored profile rejected");
                Ok(None)
            }
        }
    }

    pub fn save(&self, profile: &UserProfile) -> Result<()> {
        write_json(&self.path, profile)
    }
}
