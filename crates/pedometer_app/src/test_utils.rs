//! Shared fixtures for unit tests: a scripted step source, notifiers that
//! record or fail, and a store in a temporary directory.
#![cfg(test)]

use async_trait::async_trait;
use chrono::NaiveDate;
use pedometer_core::{ManualClock, StepSource, Store, TrackerResult};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::{AppError, AppResult, Notification, Notifier};

/// Returns the scripted increments in order, then zero forever.
pub struct ScriptedSource {
    steps: VecDeque<u32>,
}

impl ScriptedSource {
    pub fn new(steps: impl IntoIterator<Item = u32>) -> Self {
        Self {
            steps: steps.into_iter().collect(),
        }
    }
}

impl StepSource for ScriptedSource {
    fn poll_steps(&mut self) -> TrackerResult<u32> {
        Ok(self.steps.pop_front().unwrap_or(0))
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, notification: &Notification) -> AppResult<()> {
        self.sent.lock().unwrap().push(notification.clone());
        Ok(())
    }
}

pub struct FailingNotifier;

#[async_trait]
impl Notifier for FailingNotifier {
    async fn notify(&self, _notification: &Notification) -> AppResult<()> {
        Err(AppError::Notification("notification service offline".into()))
    }
}

/// A fresh store on 2026-10-19 backed by a temp dir. Keep the `TempDir`
/// alive for the duration of the test.
pub fn test_store() -> (tempfile::TempDir, Store, ManualClock) {
    let dir = tempfile::tempdir().unwrap();
    let clock = ManualClock::new(NaiveDate::from_ymd_opt(2026, 10, 19).unwrap());
    let store = Store::load(dir.path().join("pedometer_data.json"), Arc::new(clock.clone())).unwrap();
    (dir, store, clock)
}
