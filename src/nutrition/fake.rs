use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use futures_util::stream;

use super::error::NutritionError;
use super::transport::{GenerationRequest, GenerationTransport, TextStream};

pub const OATMEAL_JSON: &str = r#"{
  "food_item": "Oatmeal with banana",
  "consumption_time": "2025-01-15T08:00:00",
  "nutritional_values": {
    "serving_size": "1 bowl (250g)",
    "calories": 350,
    "protein": "10g",
    "carbohydrates": {"total": "60g", "fiber": "8g", "sugars": "15g"},
    "fat": {"total": "6g", "saturated": "1g"},
    "vitamins": [
      {"name": "Vitamin B6", "percent_daily_value": "20%"},
      {"name": "Potassium", "percent_daily_value": "12%"}
    ]
  }
}"#;

pub const RECOMMENDATION_JSON: &str = r#"{
  "overall_assessment": "A steady week with room for more vegetables.",
  "nutritional_analysis": {
    "calorie_analysis": "Slightly under target",
    "macronutrient_balance": "Carb heavy",
    "micronutrient_status": "Low in vitamin C",
    "deficiencies": ["vitamin C"],
    "strengths": ["fiber"]
  },
  "food_recommendations": [
    {"meal_type": "lunch", "food_name": "Lentil salad", "benefits": "Protein and fiber",
     "nutrients_provided": ["protein", "iron"], "preparation_tip": "Add lemon"}
  ],
  "diet_recommendations": [],
  "ingredient_recommendations": [],
  "next_day_plan": {
    "breakfast": {"suggestion": "Greek yogurt with berries", "focus_nutrients": ["fiber", "protein"]},
    "lunch": {"suggestion": "Lentil salad", "focus_nutrients": ["iron"]},
    "dinner": {"suggestion": "Salmon with broccoli", "focus_nutrients": ["omega-3"]},
    "snacks": ["apple"]
  },
  "weekly_goal": "Eat vegetables with two meals a day",
  "hydration_reminder": "Drink 2 litres of water"
}"#;

/// Transport that answers from a per-key script and records every call.
#[derive(Default)]
pub struct ScriptedTransport {
    script: HashMap<String, Result<String, String>>,
    calls: Mutex<Vec<String>>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ok(mut self, key: &str, body: &str) -> Self {
        self.script.insert(key.to_string(), Ok(body.to_string()));
        self
    }

    pub fn fail(mut self, key: &str, message: &str) -> Self {
        self.script.insert(key.to_string(), Err(message.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerationTransport for ScriptedTransport {
    async fn stream_generate(
        &self,
        api_key: &str,
        request: &GenerationRequest,
    ) -> Result<TextStream, NutritionError> {
        self.calls.lock().unwrap().push(api_key.to_string());
        self.requests.lock().unwrap().push(request.clone());

        match self.script.get(api_key) {
            Some(Ok(body)) => {
                // Deliver in small pieces so callers must concatenate.
                let chunks: Vec<Result<String, NutritionError>> = body
                    .as_bytes()
                    .chunks(16)
                    .map(|c| Ok(String::from_utf8_lossy(c).into_owned()))
                    .collect();
                Ok(Box::pin(stream::iter(chunks)))
            }
            Some(Err(message)) => Err(NutritionError::Transport(message.clone())),
            None => Err(NutritionError::Transport(format!("unknown key {api_key}"))),
        }
    }
}
