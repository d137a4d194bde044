use serde::{Deserialize, Serialize};

use crate::nutrition::types::NutritionRecord;
use crate::users::dto::default_user_id;

#[derive(Debug, Deserialize)]
pub struct AnalyzeMealRequest {
    #[serde(default)]
    pub description: Option<String>,
    /// ISO-8601 timestamp of when the meal was eaten.
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default = "default_user_id")]
    pub user_id: i64,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeMealResponse {
    pub success: bool,
    pub meal_id: i64,
    pub nutrition_data: NutritionRecord,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    #[serde(default = "default_days")]
    pub days: i64,
    #[serde(default = "default_user_id")]
    pub user_id: i64,
}
fn default_days() -> i64 {
    30
}
