use serde::{Deserialize, Serialize};

/// One free-text meal the user wants analysed. Lives for a single request.
#[derive(Debug, Clone)]
pub struct MealDescription {
    pub description: String,
    pub consumption_time: Option<String>,
    pub temperature: f32,
}

/// Structured nutrition data returned by the model for one meal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionRecord {
    pub food_item: String,
    #[serde(default)]
    pub consumption_time: Option<String>,
    pub nutritional_values: NutritionalValues,
}

/// Everything except `calories` is a display string with its unit embedded ("4g", "15%").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionalValues {
    #[serde(default)]
    pub serving_size: String,
    pub calories: i64,
    #[serde(default)]
    pub protein: String,
    #[serde(default)]
    pub carbohydrates: Carbohydrates,
    #[serde(default)]
    pub fat: Fat,
    #[serde(default)]
    pub vitamins: Vec<Vitamin>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Carbohydrates {
    pub total: String,
    pub fiber: String,
    pub sugars: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Fat {
    pub total: String,
    pub saturated: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vitamin {
    pub name: String,
    pub percent_daily_value: String,
}

/// AI-generated dietary advice. All leaves are text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Recommendation {
    pub overall_assessment: String,
    pub nutritional_analysis: NutritionalAnalysis,
    pub food_recommendations: Vec<FoodRecommendation>,
    pub diet_recommendations: Vec<DietRecommendation>,
    pub ingredient_recommendations: Vec<IngredientRecommendation>,
    pub next_day_plan: NextDayPlan,
    pub weekly_goal: String,
    pub hydration_reminder: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NutritionalAnalysis {
    pub calorie_analysis: String,
    pub macronutrient_balance: String,
    pub micronutrient_status: String,
    pub deficiencies: Vec<String>,
    pub strengths: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FoodRecommendation {
    pub meal_type: String,
    pub food_name: String,
    pub benefits: String,
    pub nutrients_provided: Vec<String>,
    pub preparation_tip: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DietRecommendation {
    pub category: String,
    pub recommendation: String,
    pub rationale: String,
    pub implementation: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngredientRecommendation {
    pub ingredient: String,
    pub nutrient_focus: String,
    pub health_benefits: String,
    pub usage_suggestions: Vec<String>,
    pub daily_amount: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NextDayPlan {
    pub breakfast: PlannedMeal,
    pub lunch: PlannedMeal,
    pub dinner: PlannedMeal,
    pub snacks: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannedMeal {
    pub suggestion: String,
    pub focus_nutrients: Vec<String>,
}

/// Client details rendered into the recommendation prompt. Absent fields print as "Not specified".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientProfile {
    pub age: Option<i64>,
    pub gender: Option<String>,
    pub weight: Option<f64>,
    pub activity_level: Option<String>,
}

/// Nutrition targets. Absent fields print as "Not set by user".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NutritionGoals {
    pub goal_description: Option<String>,
    pub daily_calories: Option<i64>,
    pub daily_protein: Option<i64>,
    pub daily_carbs: Option<i64>,
    pub daily_fat: Option<i64>,
}
