//! Metrics derived from the step count and the profile.
//!
//! None of these values is a source of truth; they are recomputed from
//! `steps` on every step event.

use crate::{Gender, UserProfile};

const MALE_STEP_FACTOR: f64 = 0.415;
const OTHER_STEP_FACTOR: f64 = 0.413;
const CALORIES_PER_STEP_KG: f64 = 0.04;

/// Round to two decimals, the precision used for distances.
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Step length in meters from height and gender.
pub fn step_length_m(height_cm: u32, gender: Gender) -> f64 {
    let factor = match gender {
        Gender::Male => MALE_STEP_FACTOR,
        Gender::Other => OTHER_STEP_FACTOR,
    };
    height_cm as f64 * factor / 100.0
}

/// `round(steps * step_length / 1000, 2)`
pub fn distance_km(steps: u64, step_length_m: f64) -> f64 {
    round2(steps as f64 * step_length_m / 1000.0)
}

/// `floor(steps * 0.04 * weight / 100)`
pub fn calories(steps: u64, weight_kg: u32) -> u64 {
    (steps as f64 * CALORIES_PER_STEP_KG * weight_kg as f64 / 100.0).floor() as u64
}

/// Share of the daily goal reached, capped at 100.
pub fn progress_percent(steps: u64, goal: u64) -> f64 {
    if goal == 0 {
        return 100.0;
    }
    (steps as f64 * 100.0 / goal as f64).min(100.0)
}

/// True exactly when the goal has just been reached and not yet celebrated
/// today.
pub fn should_notify_goal(steps: u64, goal: u64, already_achieved: bool) -> bool {
    !already_achieved && steps >= goal
}

/// Elapsed seconds as `HH:MM:SS`.
pub fn format_duration(total_secs: u64) -> String {
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

/// `12345` -> `"12,345"`
pub fn format_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Distance and calories for `steps` under `profile`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DerivedMetrics {
    pub distance_km: f64,
    pub calories: u64,
}

impl DerivedMetrics {
    pub fn compute(steps: u64, profile: &UserProfile) -> Self {
        Self {
            distance_km: distance_km(steps, profile.step_length_m),
            calories: calories(steps, profile.weight_kg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn step_length_by_gender() {
        assert!(approx(step_length_m(180, Gender::Male), 0.747));
        assert!(approx(step_length_m(180, Gender::Other), 0.7434));
    }

    #[test]
    fn distance_and_calories_follow_formulas() {
        for steps in [0u64, 1, 7, 999, 10_000, 123_457] {
            let expected_distance = ((steps as f64 * 0.78 / 1000.0) * 100.0).round() / 100.0;
            assert!(approx(distance_km(steps, 0.78), expected_distance));
            let expected_calories = (steps as f64 * 0.04 * 70.0 / 100.0).floor() as u64;
            assert_eq!(calories(steps, 70), expected_calories);
        }
        assert!(approx(distance_km(10_000, 0.78), 7.8));
        assert_eq!(calories(10_000, 70), 280);
        assert_eq!(calories(35, 70), 0);
    }

    #[test]
    fn progress_caps_at_hundred() {
        assert!(approx(progress_percent(2_500, 10_000), 25.0));
        assert!(approx(progress_percent(20_000, 10_000), 100.0));
    }

    #[test]
    fn goal_predicate_fires_once() {
        assert!(!should_notify_goal(9_999, 10_000, false));
        assert!(should_notify_goal(10_000, 10_000, false));
        assert!(!should_notify_goal(12_000, 10_000, true));
    }

    #[test]
    fn duration_text() {
        assert_eq!(format_duration(0), "00:00:00");
        assert_eq!(format_duration(3_725), "01:02:05");
    }

    #[test]
    fn thousands_separator() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(1_000), "1,000");
        assert_eq!(format_thousands(1_234_567), "1,234,567");
    }
}
