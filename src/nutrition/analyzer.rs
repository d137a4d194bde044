use std::sync::Arc;

use futures_util::StreamExt;
use serde::de::DeserializeOwned;
use tracing::{error, info, instrument};

use super::aggregate::RecentNutritionSummary;
use super::credentials::CredentialSet;
use super::error::NutritionError;
use super::prompts::{build_analysis_prompt, build_recommendation_prompt};
use super::schema::{meal_analysis_schema, recommendation_schema};
use super::transport::{GenerationRequest, GenerationTransport};
use super::types::{ClientProfile, MealDescription, NutritionGoals, NutritionRecord, Recommendation};

/// Sends prompts to the model and turns its streamed JSON into typed records.
///
/// Holds no per-request state: the caller passes a fresh [`CredentialSet`]
/// into every call and rotation happens on that value only.
#[derive(Clone)]
pub struct NutritionAnalyzer {
    transport: Arc<dyn GenerationTransport>,
    model: String,
    thinking_budget: Option<u32>,
}

impl NutritionAnalyzer {
    pub fn new(
        transport: Arc<dyn GenerationTransport>,
        model: impl Into<String>,
        thinking_budget: Option<u32>,
    ) -> Self {
        Self {
            transport,
            model: model.into(),
            thinking_budget,
        }
    }

    #[instrument(skip_all, fields(keys = credentials.len()))]
    pub async fn analyze_meal(
        &self,
        credentials: CredentialSet,
        meal: &MealDescription,
    ) -> Result<NutritionRecord, NutritionError> {
        info!(
            description = %meal.description,
            time = ?meal.consumption_time,
            temperature = meal.temperature,
            "meal analysis request"
        );

        let prompt = build_analysis_prompt(&meal.description, meal.consumption_time.as_deref());
        info!(prompt = %prompt, "prompt sent to LLM");

        let request = GenerationRequest {
            model: self.model.clone(),
            prompt,
            temperature: meal.temperature,
            response_schema: meal_analysis_schema(),
            thinking_budget: self.thinking_budget,
        };

        let record: NutritionRecord = self
            .generate(credentials, &request)
            .await
            .map_err(|e| match e {
                NutritionError::NoCredentialAvailable => e,
                other => NutritionError::AnalysisFailed {
                    cause: other.to_string(),
                },
            })?;

        let values = &record.nutritional_values;
        info!(
            food_item = %record.food_item,
            calories = values.calories,
            protein = %values.protein,
            carbs = %values.carbohydrates.total,
            fat = %values.fat.total,
            vitamins = values.vitamins.len(),
            "parsed nutrition analysis"
        );
        Ok(record)
    }

    #[instrument(skip_all, fields(keys = credentials.len()))]
    pub async fn generate_recommendations(
        &self,
        credentials: CredentialSet,
        summary: &RecentNutritionSummary,
        profile: &ClientProfile,
        goals: Option<&NutritionGoals>,
        temperature: f32,
    ) -> Result<Recommendation, NutritionError> {
        info!(?profile, ?goals, temperature, "recommendation generation request");
        info!(
            today_meals = summary.today_meals.len(),
            previous_meals = summary.previous_meals.len(),
            days_with_data = summary.days_with_data,
            period_days = summary.period_days,
            total_calories = summary.total_calories,
            avg_daily_calories = %format!("{:.0}", summary.avg_daily_calories),
            total_meals = summary.total_meals,
            food_variety = summary.food_variety,
            "nutrition overview"
        );

        let prompt = build_recommendation_prompt(summary, profile, goals);
        info!(prompt = %prompt, "recommendation prompt sent to LLM");

        let request = GenerationRequest {
            model: self.model.clone(),
            prompt,
            temperature,
            response_schema: recommendation_schema(),
            thinking_budget: None,
        };

        let rec: Recommendation = self
            .generate(credentials, &request)
            .await
            .map_err(|e| match e {
                NutritionError::NoCredentialAvailable => e,
                other => NutritionError::RecommendationFailed {
                    cause: other.to_string(),
                },
            })?;

        info!(
            overall_assessment = %preview(&rec.overall_assessment),
            weekly_goal = %preview(&rec.weekly_goal),
            food_recommendations = rec.food_recommendations.len(),
            diet_recommendations = rec.diet_recommendations.len(),
            ingredient_recommendations = rec.ingredient_recommendations.len(),
            "parsed recommendations"
        );
        Ok(rec)
    }

    /// Tries each key at most once, rotating after every failure.
    async fn generate<T: DeserializeOwned>(
        &self,
        mut credentials: CredentialSet,
        request: &GenerationRequest,
    ) -> Result<T, NutritionError> {
        let max_attempts = credentials.len().max(1);
        let mut attempt = 0;
        loop {
            attempt += 1;
            let api_key = credentials.current()?.to_string();
            match self.attempt(&api_key, request).await {
                Ok(value) => return Ok(value),
                Err(e) => {
                    error!(error = %e, attempt, key_index = credentials.index(), "LLM call failed");
                    if attempt >= max_attempts || !credentials.rotate() {
                        return Err(e);
                    }
                    info!(key_index = credentials.index(), "retrying with rotated API key");
                }
            }
        }
    }

    async fn attempt<T: DeserializeOwned>(
        &self,
        api_key: &str,
        request: &GenerationRequest,
    ) -> Result<T, NutritionError> {
        let mut stream = self.transport.stream_generate(api_key, request).await?;
        let mut text = String::new();
        while let Some(chunk) = stream.next().await {
            text.push_str(&chunk?);
        }
        info!(raw = %text, "LLM raw response");

        let value: serde_json::Value = serde_json::from_str(&text)
            .map_err(|e| NutritionError::MalformedResponse(e.to_string()))?;
        serde_json::from_value(value).map_err(|e| NutritionError::MalformedResponse(e.to_string()))
    }
}

fn preview(text: &str) -> String {
    let mut out: String = text.chars().take(100).collect();
    if text.chars().count() > 100 {
        out.push_str("...");
    }
    out
}
