use sqlx::FromRow;
use tracing::warn;

use super::dto::{Goals, Profile, Settings};
use crate::nutrition::types::{ClientProfile, NutritionGoals};

#[derive(Debug, FromRow)]
pub struct ProfileRow {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub age: Option<i64>,
    pub gender: Option<String>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub activity_level: Option<String>,
}

#[derive(Debug, FromRow)]
pub struct SettingsRow {
    pub gemini_api_keys: String,
    pub ai_temperature: f64,
    pub ai_top_p: f64,
    pub theme: String,
    pub units: String,
    pub notifications_enabled: bool,
}

#[derive(Debug, FromRow)]
pub struct GoalsRow {
    pub goal_description: Option<String>,
    pub daily_calories: Option<i64>,
    pub daily_protein: Option<i64>,
    pub daily_carbs: Option<i64>,
    pub daily_fat: Option<i64>,
    pub updated_at: String,
}

impl From<ProfileRow> for Profile {
    fn from(r: ProfileRow) -> Self {
        Self {
            id: r.id,
            name: r.name,
            email: r.email,
            age: r.age,
            gender: r.gender,
            weight: r.weight,
            height: r.height,
            activity_level: r.activity_level,
        }
    }
}

impl From<&Profile> for ClientProfile {
    fn from(p: &Profile) -> Self {
        Self {
            age: p.age,
            gender: p.gender.clone(),
            weight: p.weight,
            activity_level: p.activity_level.clone(),
        }
    }
}

impl From<SettingsRow> for Settings {
    fn from(r: SettingsRow) -> Self {
        let gemini_api_keys = serde_json::from_str(&r.gemini_api_keys).unwrap_or_else(|e| {
            warn!(error = %e, "stored API key list is not a JSON array; ignoring");
            Vec::new()
        });
        Self {
            gemini_api_keys,
            ai_temperature: r.ai_temperature,
            ai_top_p: r.ai_top_p,
            theme: r.theme,
            units: r.units,
            notifications_enabled: r.notifications_enabled,
        }
    }
}

impl From<GoalsRow> for Goals {
    fn from(r: GoalsRow) -> Self {
        Self {
            goals: NutritionGoals {
                goal_description: r.goal_description,
                daily_calories: r.daily_calories,
                daily_protein: r.daily_protein,
                daily_carbs: r.daily_carbs,
                daily_fat: r.daily_fat,
            },
            updated_at: r.updated_at,
        }
    }
}
