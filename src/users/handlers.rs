use anyhow::Context;
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tracing::{info, instrument};

use super::dto::{Goals, Profile, ProfileUpdate, Settings, SettingsUpdate, SuccessResponse, UserQuery};
use crate::{error::ApiResult, nutrition::types::NutritionGoals, state::AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/user/profile", get(get_profile).post(update_profile))
        .route("/user/goals", get(get_goals).post(update_goals))
        .route("/settings", get(get_settings).post(update_settings))
}

fn or_empty<T: serde::Serialize>(value: Option<T>) -> ApiResult<Json<Value>> {
    let body = match value {
        Some(v) => serde_json::to_value(v).context("encode response")?,
        None => json!({}),
    };
    Ok(Json(body))
}

#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    Query(q): Query<UserQuery>,
) -> ApiResult<Json<Value>> {
    or_empty(Profile::find(&state.db, q.user_id).await?)
}

#[instrument(skip(state, payload))]
pub async fn update_profile(
    State(state): State<AppState>,
    Query(q): Query<UserQuery>,
    Json(payload): Json<ProfileUpdate>,
) -> ApiResult<Json<SuccessResponse>> {
    Profile::upsert(&state.db, q.user_id, payload).await?;
    info!(user_id = q.user_id, "profile updated");
    Ok(Json(SuccessResponse { success: true }))
}

#[instrument(skip(state))]
pub async fn get_goals(
    State(state): State<AppState>,
    Query(q): Query<UserQuery>,
) -> ApiResult<Json<Value>> {
    or_empty(Goals::find(&state.db, q.user_id).await?)
}

#[instrument(skip(state, payload))]
pub async fn update_goals(
    State(state): State<AppState>,
    Query(q): Query<UserQuery>,
    Json(payload): Json<NutritionGoals>,
) -> ApiResult<Json<SuccessResponse>> {
    Goals::replace(&state.db, q.user_id, &payload).await?;
    info!(user_id = q.user_id, "goals updated");
    Ok(Json(SuccessResponse { success: true }))
}

#[instrument(skip(state))]
pub async fn get_settings(
    State(state): State<AppState>,
    Query(q): Query<UserQuery>,
) -> ApiResult<Json<Settings>> {
    let settings = Settings::find(&state.db, q.user_id).await?.unwrap_or_default();
    Ok(Json(settings))
}

#[instrument(skip(state, payload))]
pub async fn update_settings(
    State(state): State<AppState>,
    Query(q): Query<UserQuery>,
    Json(payload): Json<SettingsUpdate>,
) -> ApiResult<Json<SuccessResponse>> {
    let key_count = payload.gemini_api_keys.as_ref().map(Vec::len);
    Settings::upsert(&state.db, q.user_id, payload).await?;
    info!(user_id = q.user_id, ?key_count, "settings updated");
    Ok(Json(SuccessResponse { success: true }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    use crate::{app::build_app, nutrition::fake::ScriptedTransport, state::AppState};

    async fn call(app: axum::Router, req: Request<Body>) -> (StatusCode, serde_json::Value) {
        let res = app.oneshot(req).await.unwrap();
        let status = res.status();
        let body = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    fn post(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn settings_roundtrip_over_http() {
        let state = AppState::fake(Arc::new(ScriptedTransport::new())).await;

        let (status, body) = call(
            build_app(state.clone()),
            post("/api/settings", serde_json::json!({"ai_temperature": 0.8, "gemini_api_keys": ["a"]})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);

        let (_, body) = call(
            build_app(state),
            Request::get("/api/settings").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(body["ai_temperature"], 0.8);
        assert_eq!(body["gemini_api_keys"][0], "a");
        assert_eq!(body["theme"], "dark");
    }

    #[tokio::test]
    async fn goals_are_empty_object_until_set() {
        let state = AppState::fake(Arc::new(ScriptedTransport::new())).await;

        let (_, body) = call(
            build_app(state.clone()),
            Request::get("/api/user/goals").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(body, serde_json::json!({}));

        call(
            build_app(state.clone()),
            post("/api/user/goals", serde_json::json!({"goal_description": "Build muscle", "daily_protein": 150})),
        )
        .await;

        let (_, body) = call(
            build_app(state),
            Request::get("/api/user/goals").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(body["goal_description"], "Build muscle");
        assert_eq!(body["daily_protein"], 150);
        assert!(body["daily_calories"].is_null());
    }

    #[tokio::test]
    async fn profile_for_unknown_user_is_empty() {
        let state = AppState::fake(Arc::new(ScriptedTransport::new())).await;
        let (status, body) = call(
            build_app(state),
            Request::get("/api/user/profile?user_id=42").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!({}));
    }
}
