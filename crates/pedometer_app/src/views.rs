use pedometer_core::activity::format_thousands;
use pedometer_core::{Gender, UserProfile, WeeklyStats};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    #[default]
    Home,
    Statistics,
    Profile,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HomeView {
    pub steps: u64,
    pub distance_km: f64,
    pub calories: u64,
    pub progress_percent: f64,
    pub timer_text: String,
    pub is_active: bool,
    pub goal_achieved: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StatsView {
    #[serde(flatten)]
    pub stats: WeeklyStats,
    pub lines: Vec<String>,
}

impl StatsView {
    pub fn new(stats: WeeklyStats) -> Self {
        let lines = vec![
            format!("Total steps: {}", format_thousands(stats.total_steps)),
            format!("Total distance: {} km", stats.total_distance),
            format!("Total calories: {} kcal", stats.total_calories),
            format!("Active days: {}/7", stats.days_active),
            format!("Average: {} steps/day", format_thousands(stats.avg_steps)),
        ];
        Self { stats, lines }
    }
}

/// Profile fields as the edit form shows them.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProfileView {
    pub name: String,
    pub age: String,
    pub weight: String,
    pub height: String,
    pub goal: String,
    pub gender: Gender,
    pub step_length_m: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&UserProfile> for ProfileView {
    fn from(user: &UserProfile) -> Self {
        Self {
            name: user.name.clone(),
            age: user.age.to_string(),
            weight: user.weight_kg.to_string(),
            height: user.height_cm.to_string(),
            goal: user.daily_goal_steps.to_string(),
            gender: user.gender,
            step_length_m: user.step_length_m,
            error: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "screen", rename_all = "snake_case")]
pub enum ScreenView {
    Home(HomeView),
    Statistics(StatsView),
    Profile(ProfileView),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_lines_are_formatted() {
        let view = StatsView::new(WeeklyStats {
            total_steps: 43_210,
            total_distance: 33.7,
            total_calories: 1_209,
            days_active: 5,
            avg_steps: 8_642,
        });
        assert_eq!(view.lines[0], "Total steps: 43,210");
        assert_eq!(view.lines[1], "Total distance: 33.7 km");
        assert_eq!(view.lines[3], "Active days: 5/7");
        assert_eq!(view.lines[4], "Average: 8,642 steps/day");
    }

    #[test]
    fn screen_view_is_tagged() {
        let v = serde_json::to_value(ScreenView::Profile(ProfileView::from(
            &UserProfile::default(),
        )))
        .unwrap();
        assert_eq!(v["screen"], "profile");
        assert_eq!(v["height"], "170");
        assert!(v.get("error").is_none());
    }
}
