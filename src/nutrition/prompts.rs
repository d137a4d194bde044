use std::fmt::Display;

use super::aggregate::{MealSnapshot, RecentNutritionSummary};
use super::types::{ClientProfile, NutritionGoals};

const NOT_SPECIFIED: &str = "Not specified";
const NOT_SET: &str = "Not set by user";

pub fn build_analysis_prompt(description: &str, consumption_time: Option<&str>) -> String {
    let time_context = consumption_time
        .filter(|t| !t.trim().is_empty())
        .map(|t| format!(" consumed at {t}"))
        .unwrap_or_default();

    format!(
        r#"You are Chun, an expert nutritionist and registered dietitian with over 15 years of experience in food analysis and nutritional assessment. You have extensive knowledge of food composition databases, portion sizes, and nutritional values across different cuisines and cooking methods.

Your task is to analyze the following meal description and provide accurate, detailed nutritional information:

Meal Description: "{description}"{time_context}

Please analyze this meal with the precision of a professional nutritionist, considering:
- Standard serving sizes and portions
- Cooking methods that may affect nutritional content
- Common ingredients and their nutritional profiles
- Regional variations in food preparation

Provide comprehensive nutritional analysis including macronutrients, micronutrients, and key vitamins/minerals."#
    )
}

fn or_default<T: Display>(value: Option<T>, fallback: &str) -> String {
    value.map_or_else(|| fallback.to_string(), |v| v.to_string())
}

fn with_unit<T: Display>(value: Option<T>, unit: &str, fallback: &str) -> String {
    value.map_or_else(|| fallback.to_string(), |v| format!("{v}{unit}"))
}

fn push_meal(out: &mut String, meal: &MealSnapshot) {
    let time = meal.consumption_time.as_deref().unwrap_or("unspecified time");
    out.push_str(&format!("- {} at {}\n", meal.food_item, time));
    out.push_str(&format!(
        "  Calories: {}, Protein: {}, Carbs: {}, Fat: {}\n",
        meal.calories, meal.protein, meal.carbohydrates, meal.fat
    ));
    if !meal.vitamins.is_empty() {
        let vitamins = meal
            .vitamins
            .iter()
            .map(|v| format!("{}: {}", v.name, v.percent_daily_value))
            .collect::<Vec<_>>()
            .join(", ");
        out.push_str(&format!("  Key vitamins/minerals: {vitamins}\n"));
    }
}

fn today_section(meals: &[MealSnapshot]) -> String {
    if meals.is_empty() {
        return "TODAY'S MEALS: No meals logged today\n\n".to_string();
    }
    let mut out = String::from("TODAY'S MEALS:\n");
    for meal in meals {
        push_meal(&mut out, meal);
        out.push('\n');
    }
    out
}

/// Meals arrive sorted by date, newest first; each date gets its own header.
fn previous_section(meals: &[MealSnapshot]) -> String {
    if meals.is_empty() {
        return "PREVIOUS WEEK'S MEALS: No previous meals found\n".to_string();
    }
    let mut out = String::from("PREVIOUS WEEK'S MEALS:\n");
    let mut current_date: Option<&str> = None;
    for meal in meals {
        if current_date != Some(meal.date.as_str()) {
            current_date = Some(meal.date.as_str());
            out.push_str(&format!("\n{}:\n", meal.date));
        }
        push_meal(&mut out, meal);
    }
    out
}

pub fn build_recommendation_prompt(
    summary: &RecentNutritionSummary,
    profile: &ClientProfile,
    goals: Option<&NutritionGoals>,
) -> String {
    let goals = goals.cloned().unwrap_or_default();
    let days = summary.days_with_data;
    let period = summary.period_days;

    let age = or_default(profile.age, NOT_SPECIFIED);
    let gender = or_default(profile.gender.as_deref(), NOT_SPECIFIED);
    let weight = with_unit(profile.weight, "kg", NOT_SPECIFIED);
    let activity = or_default(profile.activity_level.as_deref(), NOT_SPECIFIED);

    let goal_description = or_default(goals.goal_description.as_deref(), NOT_SET);
    let daily_calories = or_default(goals.daily_calories, NOT_SET);
    let daily_protein = with_unit(goals.daily_protein, "g", NOT_SET);
    let daily_carbs = with_unit(goals.daily_carbs, "g", NOT_SET);
    let daily_fat = with_unit(goals.daily_fat, "g", NOT_SET);

    let total_calories = summary.total_calories;
    let avg_daily_calories = summary.avg_daily_calories;
    let total_meals = summary.total_meals;
    let food_variety = summary.food_variety;

    let today_meals = today_section(&summary.today_meals);
    let previous_meals = previous_section(&summary.previous_meals);

    format!(
        r#"You are Chun, a certified nutritionist and wellness coach with expertise in personalized nutrition planning, metabolic health, and sustainable dietary habits. You have helped thousands of clients achieve their health goals through evidence-based nutrition guidance.

Your client has been tracking their nutrition, and you need to provide personalized recommendations based on their profile and detailed eating patterns.

CLIENT PROFILE:
- Age: {age}
- Gender: {gender}
- Weight: {weight}
- Activity Level: {activity}

CLIENT NUTRITION GOALS:
- Goal Description: {goal_description}
- Daily Calorie Target: {daily_calories}
- Daily Protein Target: {daily_protein}
- Daily Carbs Target: {daily_carbs}
- Daily Fat Target: {daily_fat}

NUTRITION ANALYSIS DATA:
- Data availability: {days} days with logged meals out of past {period} days
- Total calories logged: {total_calories} calories across all logged days
- Average daily calories: {avg_daily_calories:.0} calories (calculated from {days} days with data)
- Total meals logged: {total_meals}
- Food variety: {food_variety} different foods

{today_meals}

{previous_meals}

COMPREHENSIVE NUTRITION ANALYSIS TASK:

IMPORTANT: The user has logged meals for {days} out of the past {period} days. Base your analysis on the ACTUAL data available, not assumptions about missing days. Do not treat days without logged meals as zero intake. If data is limited, acknowledge this in your assessment and focus on patterns from available data.

As their expert nutritionist, provide a detailed analysis covering:

1. **OVERALL ASSESSMENT**: Summarize their current nutritional status, eating patterns, and overall health trajectory. IMPORTANT: Acknowledge the data completeness ({days} days of data) and base conclusions only on available information.

2. **NUTRITIONAL ANALYSIS**: Break down their nutrition into:
   - Calorie analysis (adequacy, distribution, timing) - base this on the {days} days with actual data
   - Macronutrient balance (protein, carbs, fats ratios and quality) from logged meals
   - Micronutrient status (vitamins, minerals from their actual intake)
   - Identify specific deficiencies and nutritional strengths from available data

3. **FOOD RECOMMENDATIONS**: Suggest 4-6 specific foods for different meals:
   - Include meal type (breakfast/lunch/dinner/snack)
   - Explain health benefits and nutrients provided
   - Give practical preparation tips

4. **DIET RECOMMENDATIONS**: Provide 3-4 dietary pattern suggestions:
   - Focus on meal timing, portion control, food combinations
   - Address their specific nutritional gaps
   - Include practical implementation strategies

5. **INGREDIENT RECOMMENDATIONS**: Suggest 4-5 key ingredients to address deficiencies:
   - Specify which nutrients they provide
   - Explain health benefits
   - Give usage suggestions and daily amounts

6. **NEXT DAY MEAL PLAN**: Create a detailed plan for tomorrow:
   - Specific breakfast, lunch, dinner suggestions
   - Focus nutrients for each meal
   - Healthy snack options

7. **WEEKLY GOAL**: One achievable goal for the week
8. **HYDRATION REMINDER**: Personalized hydration advice

Make all recommendations:
- Specific to their actual nutritional data and deficiencies
- Culturally appropriate and practical
- Evidence-based and health-focused
- Encouraging and sustainable
- Focused on nutrient density and variety"#
    )
}
