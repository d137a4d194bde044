use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, instrument};

use super::repo;
use crate::{
    error::ApiResult,
    meals::services::recent_summary,
    nutrition::types::{ClientProfile, Recommendation},
    state::AppState,
    users::dto::{default_user_id, Goals, Profile, Settings, UserQuery},
};

const RECENT_DAYS: i64 = 7;

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    #[serde(default = "default_user_id")]
    pub user_id: i64,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/ai-recommendations", get(get_recommendations).post(generate))
}

#[instrument(skip(state))]
pub async fn get_recommendations(
    State(state): State<AppState>,
    Query(q): Query<UserQuery>,
) -> ApiResult<Json<Value>> {
    let body = match repo::get_stored_recommendations(&state.db, q.user_id).await? {
        Some(stored) => serde_json::to_value(stored).map_err(anyhow::Error::from)?,
        None => json!({ "recommendations": [], "message": "No recommendations found" }),
    };
    Ok(Json(body))
}

#[instrument(skip(state, payload))]
pub async fn generate(
    State(state): State<AppState>,
    payload: Option<Json<GenerateRequest>>,
) -> ApiResult<Json<Recommendation>> {
    let user_id = payload.map_or_else(default_user_id, |Json(p)| p.user_id);

    let summary = recent_summary(&state, user_id, RECENT_DAYS).await?;
    let profile = Profile::find(&state.db, user_id)
        .await?
        .map(|p| ClientProfile::from(&p))
        .unwrap_or_default();
    let goals = Goals::find(&state.db, user_id).await?.map(|g| g.goals);

    let settings = Settings::find(&state.db, user_id).await?;
    let temperature = settings.as_ref().map_or(0.7, |s| s.ai_temperature) as f32;
    let keys = settings.map(|s| s.gemini_api_keys).unwrap_or_default();

    let rec = state
        .analyzer
        .generate_recommendations(
            state.credentials(keys),
            &summary,
            &profile,
            goals.as_ref(),
            temperature,
        )
        .await?;

    repo::store_recommendations(&state.db, user_id, &rec).await?;
    info!(user_id, "recommendations stored");
    Ok(Json(rec))
}
