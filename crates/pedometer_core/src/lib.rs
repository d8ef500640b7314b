//! Core of the pedometer: data model, JSON store, daily rollover, step engine
//! and weekly reporting.
//!
//! The crate has no async runtime dependency. Everything here is driven by a
//! single caller (see `pedometer_app`) which serializes sensor ticks, timer
//! ticks and user actions onto one execution context.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

pub mod activity;
pub mod clock;
pub mod config;
pub mod engine;
pub mod report;
pub mod rollover;
pub mod sensor;
pub mod store;

pub use clock::{Clock, LocalClock, ManualClock};
pub use engine::{EngineState, PedometerEngine, StepSource, TickOutcome};
pub use report::WeeklyStats;
pub use store::Store;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("state file {path} is corrupt: {source}")]
    StateCorrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("validation error: {0}")]
    Validation(String),
    #[error("sensor unavailable: {0}")]
    SensorUnavailable(String),
    #[error("failed to persist {path}: {source}")]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("configuration error: {0}")]
    Config(String),
}

pub type TrackerResult<T> = Result<T, TrackerError>;

#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    #[default]
    Male,
    #[serde(other)]
    Other,
}

impl std::str::FromStr for Gender {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" | "m" => Ok(Gender::Male),
            "other" | "female" | "f" => Ok(Gender::Other),
            other => Err(TrackerError::Validation(format!("unknown gender '{other}'"))),
        }
    }
}

/// The single user's profile. Field names match the persisted document.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct UserProfile {
    pub name: String,
    pub age: u32,
    #[serde(rename = "weight")]
    pub weight_kg: u32,
    #[serde(rename = "height")]
    pub height_cm: u32,
    pub gender: Gender,
    #[serde(rename = "step_length")]
    pub step_length_m: f64,
    #[serde(rename = "daily_goal")]
    pub daily_goal_steps: u64,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            name: "User".to_string(),
            age: 25,
            weight_kg: 70,
            height_cm: 170,
            gender: Gender::Male,
            step_length_m: 0.78,
            daily_goal_steps: 10_000,
        }
    }
}

/// One day of activity. The record for today is mutable; archived ones are not.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub steps: u64,
    #[serde(rename = "distance")]
    pub distance_km: f64,
    pub calories: u64,
    #[serde(rename = "duration")]
    pub duration_secs: u64,
    pub goal_achieved: bool,
}

impl DailyRecord {
    /// A zeroed record for `date`.
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            steps: 0,
            distance_km: 0.0,
            calories: 0,
            duration_secs: 0,
            goal_achieved: false,
        }
    }
}

/// The persisted document: profile, today's running totals and the
/// append-only history (oldest first).
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct TrackerState {
    pub user: UserProfile,
    pub today: DailyRecord,
    #[serde(default)]
    pub history: Vec<DailyRecord>,
}

impl TrackerState {
    pub fn fresh(today: NaiveDate) -> Self {
        Self {
            user: UserProfile::default(),
            today: DailyRecord::empty(today),
            history: Vec::new(),
        }
    }
}

/// Values written into today's record on every step update.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TodayUpdate {
    pub steps: u64,
    pub distance_km: f64,
    pub calories: u64,
    pub duration_secs: u64,
}

/// A validated profile edit. `gender` is only applied when present.
#[derive(Clone, Debug, PartialEq)]
pub struct ProfileUpdate {
    pub name: String,
    pub age: u32,
    pub weight_kg: u32,
    pub height_cm: u32,
    pub daily_goal_steps: u64,
    pub gender: Option<Gender>,
}
