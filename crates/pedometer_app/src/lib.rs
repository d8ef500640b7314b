//! Application layer of the pedometer.
//!
//! [`PedometerApp`] owns the store, the step engine and the notifier and
//! exposes the operations the UI triggers (toggle workout, reset, save
//! profile, navigate) plus the two scheduler hooks ([`PedometerApp::poll_steps`]
//! and [`PedometerApp::tick_timer`]). [`session::run_session`] is the loop that
//! drives those hooks from tokio intervals and user actions.

use pedometer_core::activity::{self, DerivedMetrics};
use pedometer_core::{PedometerEngine, StepSource, Store, TickOutcome, TodayUpdate};
use tracing::{info, warn};

pub mod actions;
pub mod console;
pub mod error;
pub mod logging;
pub mod notify;
pub mod session;
pub mod sources;
mod test_utils;
pub mod views;

pub use actions::{ProfileEdits, ProfileForm, UserAction};
pub use error::{AppError, AppResult};
pub use notify::{LogNotifier, Notification, Notifier, NotifyOutcome};
pub use views::{HomeView, ProfileView, Screen, ScreenView, StatsView};

/// What a step event produced.
#[derive(Clone, Debug, PartialEq)]
pub struct StepUpdate {
    pub home: HomeView,
    /// Present only on the event that reached the daily goal.
    pub goal_notification: Option<NotifyOutcome>,
}

pub struct PedometerApp<S, N> {
    store: Store,
    engine: PedometerEngine<S>,
    notifier: N,
    screen: Screen,
    timer_secs: u64,
}

impl<S: StepSource, N: Notifier> PedometerApp<S, N> {
    /// Build the app around a loaded store. Counting and the timer resume from
    /// today's stored totals.
    pub fn new(store: Store, source: S, notifier: N) -> Self {
        let today = store.today();
        let timer_secs = today.duration_secs;
        let engine = PedometerEngine::new(source).resume_from(today.steps);
        Self {
            store,
            engine,
            notifier,
            screen: Screen::Home,
            timer_secs,
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn engine(&self) -> &PedometerEngine<S> {
        &self.engine
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn is_active(&self) -> bool {
        self.engine.is_active()
    }

    pub fn timer_secs(&self) -> u64 {
        self.timer_secs
    }

    pub fn start_workout(&mut self) -> AppResult<()> {
        if !self.engine.is_active() {
            self.roll_day_if_needed()?;
            self.engine.start();
            info!(steps = self.engine.step_count(), "workout started");
        }
        Ok(())
    }

    /// Stop counting and persist the elapsed duration.
    pub fn stop_workout(&mut self) -> AppResult<()> {
        if self.engine.is_active() {
            self.engine.stop();
            info!(
                steps = self.engine.step_count(),
                duration_secs = self.timer_secs,
                "workout stopped"
            );
            self.write_today()?;
        }
        Ok(())
    }

    pub fn toggle_workout(&mut self) -> AppResult<()> {
        if self.engine.is_active() {
            self.stop_workout()
        } else {
            self.start_workout()
        }
    }

    /// Poll the step source once. Returns `None` when no new steps arrived
    /// (including while idle or when the sensor is unavailable).
    pub async fn poll_steps(&mut self) -> AppResult<Option<StepUpdate>> {
        match self.engine.tick() {
            TickOutcome::Stepped { .. } => self.record_steps().await.map(Some),
            TickOutcome::Idle | TickOutcome::NoStep | TickOutcome::Degraded => Ok(None),
        }
    }

    /// One second of elapsed workout time. No-op while idle.
    pub fn tick_timer(&mut self) -> bool {
        if self.engine.is_active() {
            self.timer_secs += 1;
            true
        } else {
            false
        }
    }

    /// Zero today's counters. History and the goal flag are left alone.
    pub fn reset_data(&mut self) -> AppResult<()> {
        self.roll_day_if_needed()?;
        self.engine.reset();
        self.timer_secs = 0;
        info!("today's data reset");
        self.write_today()
    }

    /// Validate and store a profile edit. On a validation error nothing is
    /// changed.
    pub fn save_profile(&mut self, form: &ProfileForm) -> AppResult<ProfileView> {
        let update = form.parse()?;
        self.store.update_profile(update)?;
        Ok(self.profile_view())
    }

    /// Switch screens and return the freshly computed view.
    pub fn navigate(&mut self, screen: Screen) -> AppResult<ScreenView> {
        self.roll_day_if_needed()?;
        self.screen = screen;
        Ok(self.current_view())
    }

    /// Apply one user action and return the view to show afterwards.
    pub fn handle(&mut self, action: UserAction) -> AppResult<ScreenView> {
        match action {
            UserAction::ToggleWorkout => self.toggle_workout()?,
            UserAction::StartWorkout => self.start_workout()?,
            UserAction::StopWorkout => self.stop_workout()?,
            UserAction::ResetData => self.reset_data()?,
            UserAction::Navigate(screen) => return self.navigate(screen),
            UserAction::SaveProfile(form) => {
                self.screen = Screen::Profile;
                return self.save_profile(&form).map(ScreenView::Profile);
            }
            UserAction::EditProfile(edits) => {
                self.screen = Screen::Profile;
                let form = edits.apply_to(self.store.user());
                return self.save_profile(&form).map(ScreenView::Profile);
            }
            UserAction::Quit => {}
        }
        Ok(self.current_view())
    }

    pub fn current_view(&self) -> ScreenView {
        match self.screen {
            Screen::Home => ScreenView::Home(self.home_view()),
            Screen::Statistics => ScreenView::Statistics(StatsView::new(self.store.weekly_stats())),
            Screen::Profile => ScreenView::Profile(self.profile_view()),
        }
    }

    pub fn home_view(&self) -> HomeView {
        let steps = self.engine.step_count();
        let user = self.store.user();
        let derived = DerivedMetrics::compute(steps, user);
        HomeView {
            steps,
            distance_km: derived.distance_km,
            calories: derived.calories,
            progress_percent: activity::progress_percent(steps, user.daily_goal_steps),
            timer_text: activity::format_duration(self.timer_secs),
            is_active: self.engine.is_active(),
            goal_achieved: self.store.today().goal_achieved,
        }
    }

    pub fn profile_view(&self) -> ProfileView {
        ProfileView::from(self.store.user())
    }

    async fn record_steps(&mut self) -> AppResult<StepUpdate> {
        self.roll_day_if_needed()?;
        let steps = self.engine.step_count();
        let goal_due = activity::should_notify_goal(
            steps,
            self.store.user().daily_goal_steps,
            self.store.today().goal_achieved,
        );
        let written = self.write_today();

        let goal_notification = if goal_due {
            Some(self.deliver_goal_notification(steps).await)
        } else {
            None
        };
        written?;

        Ok(StepUpdate {
            home: self.home_view(),
            goal_notification,
        })
    }

    async fn deliver_goal_notification(&self, steps: u64) -> NotifyOutcome {
        info!(steps, "daily goal reached");
        match self.notifier.notify(&Notification::goal_reached(steps)).await {
            Ok(()) => NotifyOutcome::Delivered,
            Err(e) => {
                warn!(error = %e, "goal notification failed");
                NotifyOutcome::Failed(e.to_string())
            }
        }
    }

    /// Run the day rollover. Steps and seconds counted but not yet written
    /// belong to the new day, so the engine and timer are rebased onto them.
    fn roll_day_if_needed(&mut self) -> AppResult<bool> {
        let persisted = self.store.today();
        let (persisted_steps, persisted_secs) = (persisted.steps, persisted.duration_secs);
        if !self.store.check_new_day()? {
            return Ok(false);
        }
        let carried = self.engine.step_count().saturating_sub(persisted_steps);
        let carried_secs = self.timer_secs.saturating_sub(persisted_secs);
        self.engine.rebase(carried);
        self.timer_secs = carried_secs;
        info!(carried, carried_secs, "day changed during session");
        Ok(true)
    }

    fn write_today(&mut self) -> AppResult<()> {
        self.roll_day_if_needed()?;
        let steps = self.engine.step_count();
        let derived = DerivedMetrics::compute(steps, self.store.user());
        self.store.update_today(TodayUpdate {
            steps,
            distance_km: derived.distance_km,
            calories: derived.calories,
            duration_secs: self.timer_secs,
        })?;
        Ok(())
    }
}
