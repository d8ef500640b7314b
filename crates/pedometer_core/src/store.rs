//! JSON-file backed store for the profile, today's totals and history.
//!
//! The whole document is rewritten on every save. Writes go to a temporary
//! file in the same directory which is then renamed over the target, so a
//! failed write leaves the previous file intact.

use crate::activity::step_length_m;
use crate::clock::{self, Clock};
use crate::report::{self, WeeklyStats};
use crate::rollover;
use crate::{
    DailyRecord, ProfileUpdate, TodayUpdate, TrackerError, TrackerResult, TrackerState,
    UserProfile,
};
use chrono::NaiveDate;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::NamedTempFile;
use tracing::{debug, info};

pub struct Store {
    path: PathBuf,
    state: TrackerState,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("path", &self.path)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl Store {
    /// Load the document at `path`, or create and persist a default one if
    /// the file does not exist.
    ///
    /// Fails with [`TrackerError::StateCorrupt`] when the file exists but is
    /// not a valid document; the file is left untouched in that case.
    pub fn load(path: impl Into<PathBuf>, clock: Arc<dyn Clock>) -> TrackerResult<Self> {
        let path = path.into();
        let mut store = if path.exists() {
            let text = std::fs::read_to_string(&path).map_err(|source| {
                TrackerError::Persistence {
                    path: path.clone(),
                    source,
                }
            })?;
            let state: TrackerState =
                serde_json::from_str(&text).map_err(|source| TrackerError::StateCorrupt {
                    path: path.clone(),
                    source,
                })?;
            debug!(path = %path.display(), history = state.history.len(), "loaded state");
            Self { path, state, clock }
        } else {
            let state = TrackerState::fresh(clock.today());
            let store = Self { path, state, clock };
            info!(path = %store.path.display(), "no state file; creating defaults");
            store.save()?;
            store
        };
        rollover::check_new_day(&mut store)?;
        Ok(store)
    }

    /// Serialize the full document (pretty, field order preserved) and
    /// atomically replace the backing file.
    pub fn save(&self) -> TrackerResult<()> {
        let persist_err = |source: std::io::Error| TrackerError::Persistence {
            path: self.path.clone(),
            source,
        };
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        let mut tmp = NamedTempFile::new_in(dir).map_err(persist_err)?;
        serde_json::to_writer_pretty(&mut tmp, &self.state)
            .map_err(|e| persist_err(std::io::Error::other(e)))?;
        tmp.flush().map_err(persist_err)?;
        tmp.as_file().sync_all().map_err(persist_err)?;
        tmp.persist(&self.path).map_err(|e| persist_err(e.error))?;
        metrics::counter!("pedometer_store_writes_total").increment(1);
        Ok(())
    }

    /// Canonical `YYYY-MM-DD` key for the current day.
    pub fn today_key(&self) -> String {
        clock::today_key(self.clock.as_ref())
    }

    pub(crate) fn clock_today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn state(&self) -> &TrackerState {
        &self.state
    }

    pub(crate) fn state_mut(&mut self) -> &mut TrackerState {
        &mut self.state
    }

    pub fn user(&self) -> &UserProfile {
        &self.state.user
    }

    pub fn today(&self) -> &DailyRecord {
        &self.state.today
    }

    pub fn history(&self) -> &[DailyRecord] {
        &self.state.history
    }

    /// See [`rollover::check_new_day`].
    pub fn check_new_day(&mut self) -> TrackerResult<bool> {
        rollover::check_new_day(self)
    }

    /// Write today's running totals. The goal flag is raised once the goal is
    /// reached and never cleared within the day.
    pub fn update_today(&mut self, update: TodayUpdate) -> TrackerResult<()> {
        rollover::check_new_day(self)?;
        let goal = self.state.user.daily_goal_steps;
        let today = &mut self.state.today;
        today.steps = update.steps;
        today.distance_km = update.distance_km;
        today.calories = update.calories;
        today.duration_secs = update.duration_secs;
        if update.steps >= goal {
            today.goal_achieved = true;
        }
        self.save()
    }

    /// Apply a profile edit. Step length is recomputed when height or gender
    /// change.
    pub fn update_profile(&mut self, update: ProfileUpdate) -> TrackerResult<()> {
        update.validate()?;
        rollover::check_new_day(self)?;
        let user = &mut self.state.user;
        let gender = update.gender.unwrap_or(user.gender);
        let body_changed = user.height_cm != update.height_cm || user.gender != gender;

        user.name = update.name;
        user.age = update.age;
        user.weight_kg = update.weight_kg;
        user.height_cm = update.height_cm;
        user.daily_goal_steps = update.daily_goal_steps;
        user.gender = gender;
        if body_changed {
            user.step_length_m = step_length_m(user.height_cm, user.gender);
        }
        info!(
            height = user.height_cm,
            step_length = user.step_length_m,
            goal = user.daily_goal_steps,
            "profile updated"
        );
        self.save()
    }

    pub fn weekly_stats(&self) -> WeeklyStats {
        report::weekly_stats(&self.state)
    }
}

impl ProfileUpdate {
    pub fn validate(&self) -> TrackerResult<()> {
        if self.daily_goal_steps == 0 {
            return Err(TrackerError::Validation(
                "daily goal must be at least one step".into(),
            ));
        }
        Ok(())
    }
}
