//! Daily rollover: archive yesterday, start today from zero.

use crate::store::Store;
use crate::{DailyRecord, TrackerResult};
use tracing::info;

/// Archive the current record and start a fresh one if the calendar day has
/// changed since it was created. Returns whether a rollover happened.
///
/// Must run before anything reads or writes today's fields. Calling it again
/// on the same day is a no-op. If the archived document cannot be saved the
/// in-memory state is put back, so a later call retries the same rollover.
pub fn check_new_day(store: &mut Store) -> TrackerResult<bool> {
    let today = store.clock_today();
    if store.state().today.date == today {
        return Ok(false);
    }

    let state = store.state_mut();
    let finished = std::mem::replace(&mut state.today, DailyRecord::empty(today));
    info!(
        archived = %finished.date,
        steps = finished.steps,
        today = %today,
        "new day; archiving previous record"
    );
    state.history.push(finished);

    if let Err(e) = store.save() {
        let state = store.state_mut();
        if let Some(finished) = state.history.pop() {
            state.today = finished;
        }
        return Err(e);
    }
    metrics::counter!("pedometer_rollovers_total").increment(1);
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ManualClock;
    use chrono::NaiveDate;
    use std::sync::Arc;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 5, d).unwrap()
    }

    #[test]
    fn same_day_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let clock = ManualClock::new(day(1));
        let mut store = Store::load(dir.path().join("s.json"), Arc::new(clock)).unwrap();
        assert!(!check_new_day(&mut store).unwrap());
        assert!(store.history().is_empty());
    }

    #[test]
    fn rollover_archives_and_resets() {
        let dir = tempfile::tempdir().unwrap();
        let clock = ManualClock::new(day(1));
        let mut store = Store::load(dir.path().join("s.json"), Arc::new(clock.clone())).unwrap();
        store.state_mut().today.steps = 4_200;
        store.state_mut().today.goal_achieved = true;

        clock.advance_days(1);
        assert!(check_new_day(&mut store).unwrap());
        assert!(!check_new_day(&mut store).unwrap());

        assert_eq!(store.history().len(), 1);
        assert_eq!(store.history()[0].date, day(1));
        assert_eq!(store.history()[0].steps, 4_200);
        assert!(store.history()[0].goal_achieved);
        assert_eq!(store.today(), &DailyRecord::empty(day(2)));
    }

    #[test]
    fn failed_save_leaves_day_unrolled() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("s.json");
        let clock = ManualClock::new(day(1));
        let mut store = Store::load(&path, Arc::new(clock.clone())).unwrap();
        store.state_mut().today.steps = 300;

        clock.advance_days(1);
        std::fs::remove_file(&path).unwrap();
        std::fs::create_dir(&path).unwrap();
        assert!(matches!(
            check_new_day(&mut store),
            Err(crate::TrackerError::Persistence { .. })
        ));
        assert!(store.history().is_empty());
        assert_eq!(store.today().date, day(1));
        assert_eq!(store.today().steps, 300);

        std::fs::remove_dir(&path).unwrap();
        assert!(check_new_day(&mut store).unwrap());
        assert_eq!(store.history().len(), 1);
        assert_eq!(store.history()[0].steps, 300);
        assert_eq!(store.today(), &DailyRecord::empty(day(2)));
    }
}
