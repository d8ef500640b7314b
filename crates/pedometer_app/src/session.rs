//! The driving loop.
//!
//! Sensor polling, the one-second workout timer and user actions are all
//! serialized onto the task running [`run_session`]; the app is never shared
//! across tasks. Computed views are published on a `watch` channel for the UI.

use std::time::Duration;

use pedometer_core::StepSource;
use pedometer_core::config::{SourceMode, TIMER_INTERVAL};
use tokio::sync::{mpsc, watch};
use tokio::time::{Interval, MissedTickBehavior, interval};
use tracing::{debug, error, info, warn};

use crate::views::ScreenView;
use crate::{AppError, Notifier, PedometerApp, Screen, UserAction};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionTiming {
    pub poll: Duration,
    pub timer: Duration,
}

impl SessionTiming {
    pub fn for_source(mode: SourceMode) -> Self {
        Self {
            poll: mode.poll_interval(),
            timer: TIMER_INTERVAL,
        }
    }
}

fn ticker(period: Duration) -> Interval {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    ticker
}

fn publish(views: &watch::Sender<ScreenView>, view: ScreenView) {
    views.send_if_modified(|current| {
        if *current == view {
            false
        } else {
            *current = view;
            true
        }
    });
}

fn report(views: &watch::Sender<ScreenView>, app_view: ScreenView, err: &AppError) {
    if err.is_validation() {
        warn!(error = %err, "rejected user input");
        if let ScreenView::Profile(mut profile) = app_view {
            profile.error = Some(err.to_string());
            publish(views, ScreenView::Profile(profile));
            return;
        }
    } else {
        error!(error = %err, "operation failed");
    }
    publish(views, app_view);
}

/// Run until `Quit` arrives or the action channel closes. An active workout
/// is stopped (and persisted) on the way out. Returns the app so the caller
/// can inspect the final state.
pub async fn run_session<S, N>(
    mut app: PedometerApp<S, N>,
    mut actions: mpsc::Receiver<UserAction>,
    views: watch::Sender<ScreenView>,
    timing: SessionTiming,
) -> PedometerApp<S, N>
where
    S: StepSource,
    N: Notifier,
{
    let mut poll = ticker(timing.poll);
    let mut timer = ticker(timing.timer);
    publish(&views, app.current_view());
    info!(?timing, "session started");

    loop {
        tokio::select! {
            action = actions.recv() => {
                let Some(action) = action else { break };
                if action == UserAction::Quit {
                    break;
                }
                let was_active = app.is_active();
                debug!(?action, "user action");
                match app.handle(action) {
                    Ok(view) => publish(&views, view),
                    Err(e) => report(&views, app.current_view(), &e),
                }
                if !was_active && app.is_active() {
                    poll.reset();
                    timer.reset();
                }
            }
            _ = poll.tick(), if app.is_active() => {
                match app.poll_steps().await {
                    Ok(Some(_)) => publish(&views, app.current_view()),
                    Ok(None) => {}
                    Err(e) => report(&views, app.current_view(), &e),
                }
            }
            _ = timer.tick(), if app.is_active() => {
                if app.tick_timer() && app.screen() == Screen::Home {
                    publish(&views, app.current_view());
                }
            }
        }
    }

    if let Err(e) = app.stop_workout() {
        error!(error = %e, "failed to persist final state");
    }
    publish(&views, app.current_view());
    info!(
        steps = app.store().today().steps,
        duration_secs = app.store().today().duration_secs,
        "session ended"
    );
    app
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LogNotifier;
    use crate::test_utils::{ScriptedSource, test_store};

    #[tokio::test(start_paused = true)]
    async fn workout_counts_steps_and_time_until_quit() {
        let (_dir, store, _clock) = test_store();
        let app = PedometerApp::new(store, ScriptedSource::new([2, 1, 3]), LogNotifier);
        let (tx, rx) = mpsc::channel(8);
        let (view_tx, view_rx) = watch::channel(app.current_view());

        tokio::spawn(async move {
            tx.send(UserAction::StartWorkout).await.unwrap();
            tokio::time::sleep(Duration::from_millis(10_500)).await;
            tx.send(UserAction::Quit).await.unwrap();
        });

        let timing = SessionTiming {
            poll: Duration::from_secs(2),
            timer: Duration::from_secs(1),
        };
        let app = run_session(app, rx, view_tx, timing).await;

        assert!(!app.is_active());
        assert_eq!(app.store().today().steps, 6);
        assert_eq!(app.store().today().duration_secs, 10);
        let ScreenView::Home(home) = view_rx.borrow().clone() else {
            panic!("expected home view");
        };
        assert_eq!(home.steps, 6);
        assert!(!home.is_active);
    }

    #[tokio::test(start_paused = true)]
    async fn validation_errors_are_published_on_profile_view() {
        let (_dir, store, _clock) = test_store();
        let app = PedometerApp::new(store, ScriptedSource::new([]), LogNotifier);
        let mut form = crate::ProfileForm::from(app.store().user());
        form.goal = "lots".into();
        let (tx, rx) = mpsc::channel(8);
        let (view_tx, view_rx) = watch::channel(app.current_view());
        tx.send(UserAction::SaveProfile(form)).await.unwrap();
        drop(tx);

        let app = run_session(app, rx, view_tx, SessionTiming::for_source(SourceMode::Simulated)).await;
        let ScreenView::Profile(profile) = view_rx.borrow().clone() else {
            panic!("expected profile view");
        };
        assert!(profile.error.unwrap().contains("daily goal"));
        assert_eq!(app.store().user().daily_goal_steps, 10_000);
    }
}
