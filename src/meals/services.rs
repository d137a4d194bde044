use time::{Date, OffsetDateTime};
use tracing::info;

use super::repo;
use crate::error::{ApiError, ApiResult};
use crate::nutrition::aggregate::{self, DailySummary, DayHistory, RecentNutritionSummary};
use crate::nutrition::types::{MealDescription, NutritionRecord};
use crate::state::AppState;
use crate::users::dto::Settings;

pub fn today() -> Date {
    OffsetDateTime::now_utc().date()
}

/// Analyses a free-text meal with the user's keys and stores the result under today's date.
pub async fn log_meal(
    state: &AppState,
    user_id: i64,
    description: &str,
    time: Option<String>,
) -> ApiResult<(i64, NutritionRecord)> {
    let description = description.trim();
    if description.is_empty() {
        return Err(ApiError::BadRequest("Meal description is required".into()));
    }

    let settings = Settings::find(&state.db, user_id).await?;
    let temperature = settings.as_ref().map_or(0.5, |s| s.ai_temperature) as f32;
    let keys = settings.map(|s| s.gemini_api_keys).unwrap_or_default();

    let meal = MealDescription {
        description: description.to_string(),
        consumption_time: time.clone(),
        temperature,
    };
    let mut record = state
        .analyzer
        .analyze_meal(state.credentials(keys), &meal)
        .await?;
    if record.consumption_time.is_none() {
        record.consumption_time = time;
    }

    let meal_id = repo::store_meal(&state.db, user_id, &record, today()).await?;
    info!(meal_id, user_id, food_item = %record.food_item, "meal stored");
    Ok((meal_id, record))
}

pub async fn daily_summary(state: &AppState, user_id: i64, date: Date) -> ApiResult<DailySummary> {
    let entries = repo::list_entries(&state.db, user_id, date, date).await?;
    Ok(aggregate::daily_summary(date, &entries))
}

pub async fn history(state: &AppState, user_id: i64, days: i64) -> ApiResult<Vec<DayHistory>> {
    let today = today();
    let from = aggregate::window_start(today, days);
    let entries = repo::list_entries(&state.db, user_id, from, today).await?;
    Ok(aggregate::history(&entries, days, today))
}

pub async fn recent_summary(
    state: &AppState,
    user_id: i64,
    days: i64,
) -> ApiResult<RecentNutritionSummary> {
    let today = today();
    let from = aggregate::window_start(today, days);
    let entries = repo::list_entries(&state.db, user_id, from, today).await?;
    Ok(aggregate::recent_summary(&entries, days, today))
}

pub async fn delete_meal(state: &AppState, meal_id: i64, user_id: i64) -> ApiResult<bool> {
    let deleted = repo::delete_meal(&state.db, meal_id, user_id).await?;
    info!(meal_id, user_id, deleted, "delete meal");
    Ok(deleted)
}
