use serde::{Deserialize, Serialize};

use crate::nutrition::types::NutritionGoals;

/// `?user_id=` on every endpoint; the app has one implicit user.
#[derive(Debug, Deserialize)]
pub struct UserQuery {
    #[serde(default = "default_user_id")]
    pub user_id: i64,
}

pub fn default_user_id() -> i64 {
    1
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Profile {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub age: Option<i64>,
    pub gender: Option<String>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub activity_level: Option<String>,
}

/// Partial profile update. Missing or empty fields keep their stored value.
#[derive(Debug, Default, Deserialize)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub age: Option<i64>,
    pub gender: Option<String>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub activity_level: Option<String>,
}

impl ProfileUpdate {
    /// Drops blank strings and zero numbers so they count as "not provided".
    pub fn normalized(self) -> Self {
        fn text(v: Option<String>) -> Option<String> {
            v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
        }
        Self {
            name: text(self.name),
            email: text(self.email),
            age: self.age.filter(|v| *v != 0),
            gender: text(self.gender),
            weight: self.weight.filter(|v| *v != 0.0),
            height: self.height.filter(|v| *v != 0.0),
            activity_level: text(self.activity_level),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Settings {
    pub gemini_api_keys: Vec<String>,
    pub ai_temperature: f64,
    pub ai_top_p: f64,
    pub theme: String,
    pub units: String,
    pub notifications_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            gemini_api_keys: Vec::new(),
            ai_temperature: 0.5,
            ai_top_p: 0.9,
            theme: "dark".into(),
            units: "metric".into(),
            notifications_enabled: true,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SettingsUpdate {
    pub gemini_api_keys: Option<Vec<String>>,
    pub ai_temperature: Option<f64>,
    pub ai_top_p: Option<f64>,
    pub theme: Option<String>,
    pub units: Option<String>,
    pub notifications_enabled: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Goals {
    #[serde(flatten)]
    pub goals: NutritionGoals,
    pub updated_at: String,
}
