//! Rolling seven-day summary.

use crate::activity::round2;
use crate::{DailyRecord, TrackerState};
use serde::Serialize;

/// How many archived days join today in the weekly window.
pub const HISTORY_DAYS_IN_WEEK: usize = 6;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct WeeklyStats {
    pub total_steps: u64,
    pub total_distance: f64,
    pub total_calories: u64,
    pub days_active: u32,
    pub avg_steps: u64,
}

/// Totals over today plus the six most recent archived days. Days with zero
/// steps do not count as active; the average divides by at least one.
pub fn weekly_stats(state: &TrackerState) -> WeeklyStats {
    let window = std::iter::once(&state.today).chain(
        state
            .history
            .iter()
            .rev()
            .take(HISTORY_DAYS_IN_WEEK),
    );

    let mut stats = WeeklyStats::default();
    let mut distance = 0.0;
    for day in window {
        accumulate(&mut stats, &mut distance, day);
    }
    stats.total_distance = round2(distance);
    stats.avg_steps = stats.total_steps / u64::from(stats.days_active.max(1));
    stats
}

fn accumulate(stats: &mut WeeklyStats, distance: &mut f64, day: &DailyRecord) {
    stats.total_steps += day.steps;
    stats.total_calories += day.calories;
    *distance += day.distance_km;
    if day.steps > 0 {
        stats.days_active += 1;
    }
}
