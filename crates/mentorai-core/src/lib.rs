//! # MentorAI Core Library
//!
//! Planning logic for the MentorAI daily coach. The mobile app and the
//! `mentorai` CLI are thin layers over this crate.
//!
//! ## Architecture
//!
//! - **Intent extraction**: turns a short chat message into a time budget,
//!   a focus tag and a mute duration
//! - **Replanner**: orders today's pending tasks and assigns clock slots
//!   inside the user's preferred windows
//! - **Store**: the persisted task board with its daily history
//! - **Storage**: JSON state blobs and TOML configuration on disk
//!
//! ## Key Components
//!
//! - [`IntentExtractor`]: keyword-driven intent parser
//! - [`Replanner`]: the daily replan heuristic
//! - [`TaskBoard`]: task list operations and day rollover
//! - [`Config`]: Application configuration management
//!
//! The planner and the extractor are pure: they take `now` as an argument
//! and never fail.

pub mod chat;
pub mod clock;
pub mod error;
pub mod intent;
pub mod motivation;
pub mod planner;
pub mod prefs;
pub mod profile;
pub mod storage;
pub mod store;
pub mod task;

pub use chat::{replan_now, ChatHandler, ChatReply};
pub use error::{ConfigError, CoreError, Result, StorageError, ValidationError};
pub use intent::{parse_intent, IntentExtractor, IntentVocabulary, Locale, ParsedIntent};
pub use planner::{replan_heuristic, PlannerConfig, ReplanInput, ReplanOutput, Replanner, TimeSlot};
pub use prefs::{HourRange, UserPrefs};
pub use profile::{Persona, PersonaDef, UserProfile};
pub use storage::{Config, ProfileStore, StateStore};
pub use store::{AppState, HistoryEntry, TaskBoard};
pub use task::{EnergyLevel, Task, TaskStatus};
