use sqlx::FromRow;
use time::Date;
use tracing::warn;

use crate::nutrition::aggregate::MealEntry;

#[derive(Debug, FromRow)]
pub struct MealEntryRow {
    pub id: i64,
    pub food_item: String,
    pub consumption_time: Option<String>,
    pub date_logged: Date,
    pub serving_size: String,
    pub calories: i64,
    pub protein: String,
    pub total_carbohydrates: String,
    pub fiber: String,
    pub sugars: String,
    pub total_fat: String,
    pub saturated_fat: String,
    pub vitamins: String,
}

impl From<MealEntryRow> for MealEntry {
    fn from(r: MealEntryRow) -> Self {
        let vitamins = serde_json::from_str(&r.vitamins).unwrap_or_else(|e| {
            warn!(meal_id = r.id, error = %e, "unreadable vitamins column");
            Vec::new()
        });
        Self {
            id: r.id,
            food_item: r.food_item,
            consumption_time: r.consumption_time,
            logged_on: r.date_logged,
            serving_size: r.serving_size,
            calories: r.calories,
            protein: r.protein,
            carbohydrates: r.total_carbohydrates,
            fiber: r.fiber,
            sugars: r.sugars,
            fat: r.total_fat,
            saturated_fat: r.saturated_fat,
            vitamins,
        }
    }
}
