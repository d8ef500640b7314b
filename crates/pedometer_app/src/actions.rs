//! User actions coming from the UI, and the profile edit form.

use pedometer_core::{Gender, ProfileUpdate, UserProfile};

use crate::views::Screen;
use crate::{AppError, AppResult};

#[derive(Clone, Debug, PartialEq)]
pub enum UserAction {
    ToggleWorkout,
    StartWorkout,
    StopWorkout,
    ResetData,
    Navigate(Screen),
    SaveProfile(ProfileForm),
    /// Partial edit; fields not named keep their stored value.
    EditProfile(ProfileEdits),
    Quit,
}

impl UserAction {
    /// Parse one line of the console front end.
    ///
    /// `save` takes whitespace separated `key=value` pairs for `name`, `age`,
    /// `weight`, `height`, `goal` and `gender`; omitted keys keep the stored
    /// value.
    pub fn parse_command(line: &str) -> AppResult<Self> {
        let mut words = line.split_whitespace();
        let Some(cmd) = words.next() else {
            return Err(AppError::Validation("empty command".into()));
        };
        let action = match cmd.to_ascii_lowercase().as_str() {
            "toggle" => UserAction::ToggleWorkout,
            "start" => UserAction::StartWorkout,
            "stop" => UserAction::StopWorkout,
            "reset" => UserAction::ResetData,
            "home" => UserAction::Navigate(Screen::Home),
            "stats" | "statistics" => UserAction::Navigate(Screen::Statistics),
            "profile" => UserAction::Navigate(Screen::Profile),
            "quit" | "exit" => UserAction::Quit,
            "save" => {
                let mut edits = ProfileEdits::default();
                for pair in words {
                    let Some((key, value)) = pair.split_once('=') else {
                        return Err(AppError::Validation(format!(
                            "expected key=value, got '{pair}'"
                        )));
                    };
                    edits.push(key, value)?;
                }
                UserAction::EditProfile(edits)
            }
            other => {
                return Err(AppError::Validation(format!("unknown command '{other}'")));
            }
        };
        Ok(action)
    }
}

/// Raw text of the profile edit fields.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProfileForm {
    pub name: String,
    pub age: String,
    pub weight: String,
    pub height: String,
    pub goal: String,
    pub gender: Option<String>,
}

impl From<&UserProfile> for ProfileForm {
    fn from(user: &UserProfile) -> Self {
        Self {
            name: user.name.clone(),
            age: user.age.to_string(),
            weight: user.weight_kg.to_string(),
            height: user.height_cm.to_string(),
            goal: user.daily_goal_steps.to_string(),
            gender: None,
        }
    }
}

const PROFILE_FIELDS: [&str; 6] = ["name", "age", "weight", "height", "goal", "gender"];

/// Named field values to lay over the stored profile.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProfileEdits(Vec<(String, String)>);

impl ProfileEdits {
    pub fn push(&mut self, key: &str, value: &str) -> AppResult<()> {
        if !PROFILE_FIELDS.contains(&key) {
            return Err(AppError::Validation(format!("unknown profile field '{key}'")));
        }
        self.0.push((key.to_string(), value.to_string()));
        Ok(())
    }

    /// The form for `user` with these edits applied. `_` in a name stands
    /// for a space.
    pub fn apply_to(&self, user: &UserProfile) -> ProfileForm {
        let mut form = ProfileForm::from(user);
        for (key, value) in &self.0 {
            let value = value.clone();
            match key.as_str() {
                "name" => form.name = value.replace('_', " "),
                "age" => form.age = value,
                "weight" => form.weight = value,
                "height" => form.height = value,
                "goal" => form.goal = value,
                _ => form.gender = Some(value),
            }
        }
        form
    }
}

impl ProfileForm {
    /// Validate the text fields into a typed edit.
    pub fn parse(&self) -> AppResult<ProfileUpdate> {
        let gender = match self.gender.as_deref() {
            None => None,
            Some(g) => Some(
                g.parse::<Gender>()
                    .map_err(|e| AppError::Validation(e.to_string()))?,
            ),
        };
        Ok(ProfileUpdate {
            name: self.name.trim().to_string(),
            age: parse_number(&self.age, "age")?,
            weight_kg: parse_number(&self.weight, "weight")?,
            height_cm: parse_number(&self.height, "height")?,
            daily_goal_steps: parse_number(&self.goal, "daily goal")?,
            gender,
        })
    }
}

fn parse_number<T: std::str::FromStr>(raw: &str, field: &str) -> AppResult<T> {
    raw.trim()
        .parse::<T>()
        .map_err(|_| AppError::Validation(format!("{field} must be a whole number, got '{raw}'")))
}
