//! Calendar source for "today".

use chrono::{Datelike, Local, NaiveDate};
use std::sync::Arc;
use std::sync::atomic::{AtomicI32, Ordering};

/// Format used for the persisted `date` field and for [`today_key`].
pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Canonical date string for "now" according to `clock`.
pub fn today_key(clock: &dyn Clock) -> String {
    clock.today().format(DATE_KEY_FORMAT).to_string()
}

/// Local wall clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A settable clock. Clones share the same date, so a test can keep a handle
/// and move time forward under a store that owns another clone.
#[derive(Clone, Debug)]
pub struct ManualClock {
    days_from_ce: Arc<AtomicI32>,
}

impl ManualClock {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            days_from_ce: Arc::new(AtomicI32::new(date.num_days_from_ce())),
        }
    }

    pub fn set(&self, date: NaiveDate) {
        self.days_from_ce
            .store(date.num_days_from_ce(), Ordering::SeqCst);
    }

    pub fn advance_days(&self, days: i32) {
        self.days_from_ce.fetch_add(days, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn today(&self) -> NaiveDate {
        let days = self.days_from_ce.load(Ordering::SeqCst);
        NaiveDate::from_num_days_from_ce_opt(days).unwrap_or(NaiveDate::MIN)
    }
}
