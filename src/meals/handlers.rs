use axum::{
    extract::{Path, Query, State},
    routing::{delete, get, post},
    Json, Router,
};
use time::{macros::format_description, Date};
use tracing::{instrument, warn};

use super::dto::{AnalyzeMealRequest, AnalyzeMealResponse, HistoryQuery};
use super::services;
use crate::{
    error::{ApiError, ApiResult},
    nutrition::aggregate::{DailySummary, DayHistory},
    state::AppState,
    users::dto::{SuccessResponse, UserQuery},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/analyze-meal", post(analyze_meal))
        .route("/daily-summary/:date", get(daily_summary))
        .route("/history", get(history))
        .route("/delete-meal/:meal_id", delete(delete_meal))
}

#[instrument(skip(state, payload))]
pub async fn analyze_meal(
    State(state): State<AppState>,
    Json(payload): Json<AnalyzeMealRequest>,
) -> ApiResult<Json<AnalyzeMealResponse>> {
    let description = payload.description.unwrap_or_default();
    let (meal_id, nutrition_data) =
        services::log_meal(&state, payload.user_id, &description, payload.time).await?;
    Ok(Json(AnalyzeMealResponse {
        success: true,
        meal_id,
        nutrition_data,
    }))
}

#[instrument(skip(state))]
pub async fn daily_summary(
    State(state): State<AppState>,
    Path(date): Path<String>,
    Query(q): Query<UserQuery>,
) -> ApiResult<Json<DailySummary>> {
    let date = Date::parse(&date, format_description!("[year]-[month]-[day]")).map_err(|e| {
        warn!(%date, error = %e, "bad date");
        ApiError::BadRequest(format!("Invalid date '{date}', expected YYYY-MM-DD"))
    })?;
    Ok(Json(services::daily_summary(&state, q.user_id, date).await?))
}

#[instrument(skip(state))]
pub async fn history(
    State(state): State<AppState>,
    Query(q): Query<HistoryQuery>,
) -> ApiResult<Json<Vec<DayHistory>>> {
    Ok(Json(services::history(&state, q.user_id, q.days).await?))
}

#[instrument(skip(state))]
pub async fn delete_meal(
    State(state): State<AppState>,
    Path(meal_id): Path<i64>,
    Query(q): Query<UserQuery>,
) -> ApiResult<Json<SuccessResponse>> {
    let success = services::delete_meal(&state, meal_id, q.user_id).await?;
    Ok(Json(SuccessResponse { success }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{Request, StatusCode},
        Router,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::{
        app::build_app,
        nutrition::fake::{ScriptedTransport, OATMEAL_JSON},
        state::AppState,
    };

    async fn call(app: Router, req: Request<Body>) -> (StatusCode, Value) {
        let res = app.oneshot(req).await.unwrap();
        let status = res.status();
        let body = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    fn post(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).unwrap()
    }

    async fn with_keys(transport: ScriptedTransport, keys: Value) -> (AppState, Arc<ScriptedTransport>) {
        let transport = Arc::new(transport);
        let state = AppState::fake(transport.clone()).await;
        let (status, _) = call(
            build_app(state.clone()),
            post("/api/settings", json!({ "gemini_api_keys": keys })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        (state, transport)
    }

    #[tokio::test]
    async fn analyze_stores_meal_and_shows_up_today() {
        let (state, transport) =
            with_keys(ScriptedTransport::new().ok("k1", OATMEAL_JSON), json!(["k1"])).await;

        let (status, body) = call(
            build_app(state.clone()),
            post(
                "/api/analyze-meal",
                json!({"description": "I had a bowl of oatmeal with banana", "time": "2025-01-15T08:00:00"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["nutrition_data"]["food_item"], "Oatmeal with banana");
        assert_eq!(body["nutrition_data"]["nutritional_values"]["calories"], 350);
        assert_eq!(transport.calls(), vec!["k1"]);
        let meal_id = body["meal_id"].as_i64().unwrap();

        let today = crate::meals::services::today();
        let (_, summary) = call(build_app(state.clone()), get(&format!("/api/daily-summary/{today}"))).await;
        assert_eq!(summary["meal_count"], 1);
        assert_eq!(summary["total_calories"], 350);
        assert_eq!(summary["foods"], json!(["Oatmeal with banana"]));
        assert_eq!(summary["meals"][0]["id"], meal_id);
        assert_eq!(summary["meals"][0]["fiber"], "8g");
        assert_eq!(summary["meals"][0]["sugars"], "15g");
        assert_eq!(summary["meals"][0]["saturated_fat"], "1g");
        assert_eq!(summary["estimated_macros"]["protein_g"], 10.0);
        assert_eq!(summary["summary"], "1 meals, 350 calories");

        let (_, history) = call(build_app(state), get("/api/history?days=7")).await;
        assert_eq!(history.as_array().unwrap().len(), 1);
        assert_eq!(history[0]["date"], today.to_string());
    }

    #[tokio::test]
    async fn analyze_rotates_past_a_bad_key() {
        let (state, transport) = with_keys(
            ScriptedTransport::new()
                .fail("bad", "API key not valid")
                .ok("good", OATMEAL_JSON),
            json!(["bad", "good"]),
        )
        .await;

        let (status, body) = call(
            build_app(state),
            post("/api/analyze-meal", json!({"description": "oatmeal"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(transport.calls(), vec!["bad", "good"]);
    }

    #[tokio::test]
    async fn analyze_failure_is_400_and_nothing_stored() {
        let (state, _) =
            with_keys(ScriptedTransport::new().fail("bad", "API key not valid"), json!(["bad"])).await;

        let (status, body) = call(
            build_app(state.clone()),
            post("/api/analyze-meal", json!({"description": "oatmeal"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().contains("API key not valid"));

        let (_, history) = call(build_app(state), get("/api/history")).await;
        assert_eq!(history, json!([]));
    }

    #[tokio::test]
    async fn analyze_without_any_key_reports_it() {
        let state = AppState::fake(Arc::new(ScriptedTransport::new())).await;
        let (status, body) = call(
            build_app(state),
            post("/api/analyze-meal", json!({"description": "toast"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "No Gemini API key available");
    }

    #[tokio::test]
    async fn empty_description_is_rejected_before_any_call() {
        let (state, transport) =
            with_keys(ScriptedTransport::new().ok("k1", OATMEAL_JSON), json!(["k1"])).await;
        let (status, body) = call(
            build_app(state),
            post("/api/analyze-meal", json!({"description": "   "})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Meal description is required");
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn empty_day_summary_and_bad_date() {
        let state = AppState::fake(Arc::new(ScriptedTransport::new())).await;

        let (status, body) = call(build_app(state.clone()), get("/api/daily-summary/2020-02-29")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["date"], "2020-02-29");
        assert_eq!(body["meal_count"], 0);
        assert_eq!(body["total_calories"], 0);
        assert_eq!(body["foods"], json!([]));
        assert_eq!(body["summary"], "No meals logged");

        let (status, body) = call(build_app(state), get("/api/daily-summary/yesterday")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn history_with_enormous_day_count_still_answers() {
        let (state, _) =
            with_keys(ScriptedTransport::new().ok("k1", OATMEAL_JSON), json!(["k1"])).await;
        call(
            build_app(state.clone()),
            post("/api/analyze-meal", json!({"description": "oatmeal"})),
        )
        .await;

        let (status, body) = call(
            build_app(state.clone()),
            get(&format!("/api/history?days={}", i64::MAX)),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);

        let (status, body) = call(
            build_app(state.clone()),
            get(&format!("/api/history?days={}", i64::MIN)),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));

        let summary = crate::meals::services::recent_summary(&state, 1, i64::MAX)
            .await
            .unwrap();
        assert_eq!(summary.total_meals, 1);
    }

    #[tokio::test]
    async fn delete_meal_reports_outcome() {
        let (state, _) =
            with_keys(ScriptedTransport::new().ok("k1", OATMEAL_JSON), json!(["k1"])).await;
        let (_, body) = call(
            build_app(state.clone()),
            post("/api/analyze-meal", json!({"description": "oatmeal"})),
        )
        .await;
        let meal_id = body["meal_id"].as_i64().unwrap();

        let delete = |uri: String| Request::delete(uri).body(Body::empty()).unwrap();

        let (_, body) = call(
            build_app(state.clone()),
            delete(format!("/api/delete-meal/{meal_id}?user_id=2")),
        )
        .await;
        assert_eq!(body["success"], false);

        let (_, body) = call(build_app(state.clone()), delete(format!("/api/delete-meal/{meal_id}"))).await;
        assert_eq!(body["success"], true);

        let (_, body) = call(build_app(state), delete(format!("/api/delete-meal/{meal_id}"))).await;
        assert_eq!(body["success"], false);
    }
}
