use std::collections::{BTreeMap, HashSet};

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use time::{Date, Duration};

use super::types::Vitamin;

/// A stored meal joined with its nutrition row.
#[derive(Debug, Clone, PartialEq)]
pub struct MealEntry {
    pub id: i64,
    pub food_item: String,
    pub consumption_time: Option<String>,
    pub logged_on: Date,
    pub serving_size: String,
    pub calories: i64,
    pub protein: String,
    pub carbohydrates: String,
    pub fiber: String,
    pub sugars: String,
    pub fat: String,
    pub saturated_fat: String,
    pub vitamins: Vec<Vitamin>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MealDetail {
    pub id: i64,
    pub food_item: String,
    pub calories: i64,
    pub time: Option<String>,
    pub serving_size: String,
    pub protein: String,
    pub carbohydrates: String,
    pub fiber: String,
    pub sugars: String,
    pub fat: String,
    pub saturated_fat: String,
    pub vitamins: Vec<Vitamin>,
}

/// Sums of the numeric prefixes of the macro display strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MacroTotals {
    pub protein_g: f64,
    pub carbohydrates_g: f64,
    pub fat_g: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DailySummary {
    pub date: String,
    pub meal_count: usize,
    pub total_calories: i64,
    pub foods: Vec<String>,
    pub meals: Vec<MealDetail>,
    pub estimated_macros: MacroTotals,
    pub summary: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DayHistory {
    pub date: String,
    pub meal_count: usize,
    pub total_calories: i64,
    pub foods: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MealSnapshot {
    pub food_item: String,
    pub consumption_time: Option<String>,
    pub calories: i64,
    pub protein: String,
    pub carbohydrates: String,
    pub fat: String,
    pub vitamins: Vec<Vitamin>,
    pub date: String,
}

/// Input to the recommendation prompt; recomputed on every request.
#[derive(Debug, Clone, Serialize)]
pub struct RecentNutritionSummary {
    pub period_days: i64,
    pub days_with_data: usize,
    pub avg_daily_calories: f64,
    pub total_calories: i64,
    pub total_meals: usize,
    pub food_variety: usize,
    pub unique_foods: Vec<String>,
    pub today_meals: Vec<MealSnapshot>,
    pub previous_meals: Vec<MealSnapshot>,
}

pub const NO_MEALS_LOGGED: &str = "No meals logged";

/// Leading number of a display string such as "4.5g" or "12 g". Zero when absent.
pub fn numeric_prefix(value: &str) -> f64 {
    lazy_static! {
        static ref LEADING_NUMBER: Regex = Regex::new(r"^\s*(\d+(?:[.,]\d+)?)").unwrap();
    }
    LEADING_NUMBER
        .captures(value)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().replace(',', ".").parse::<f64>().ok())
        .unwrap_or(0.0)
}

fn newest_first(entries: &mut [&MealEntry]) {
    // None sorts below Some, so meals without a time end up last.
    entries.sort_by(|a, b| {
        b.consumption_time
            .cmp(&a.consumption_time)
            .then(b.id.cmp(&a.id))
    });
}

/// Longest look-back honoured; anything larger is treated as this many days.
pub const MAX_WINDOW_DAYS: i64 = 36_500;

/// First date of a window reaching `days_back` days before `today`.
pub fn window_start(today: Date, days_back: i64) -> Date {
    today
        .checked_sub(Duration::days(days_back.clamp(0, MAX_WINDOW_DAYS)))
        .unwrap_or(Date::MIN)
}

fn snapshot(entry: &MealEntry) -> MealSnapshot {
    MealSnapshot {
        food_item: entry.food_item.clone(),
        consumption_time: entry.consumption_time.clone(),
        calories: entry.calories,
        protein: entry.protein.clone(),
        carbohydrates: entry.carbohydrates.clone(),
        fat: entry.fat.clone(),
        vitamins: entry.vitamins.clone(),
        date: entry.logged_on.to_string(),
    }
}

/// Totals for one calendar date. Entries logged on other dates are ignored.
pub fn daily_summary(date: Date, entries: &[MealEntry]) -> DailySummary {
    let mut day: Vec<&MealEntry> = entries.iter().filter(|e| e.logged_on == date).collect();
    newest_first(&mut day);

    let meal_count = day.len();
    let total_calories: i64 = day.iter().map(|e| e.calories).sum();
    let estimated_macros = day.iter().fold(MacroTotals::default(), |mut acc, e| {
        acc.protein_g += numeric_prefix(&e.protein);
        acc.carbohydrates_g += numeric_prefix(&e.carbohydrates);
        acc.fat_g += numeric_prefix(&e.fat);
        acc
    });
    let summary = if meal_count == 0 {
        NO_MEALS_LOGGED.to_string()
    } else {
        format!("{meal_count} meals, {total_calories} calories")
    };

    DailySummary {
        date: date.to_string(),
        meal_count,
        total_calories,
        foods: day.iter().map(|e| e.food_item.clone()).collect(),
        meals: day
            .iter()
            .map(|e| MealDetail {
                id: e.id,
                food_item: e.food_item.clone(),
                calories: e.calories,
                time: e.consumption_time.clone(),
                serving_size: e.serving_size.clone(),
                protein: e.protein.clone(),
                carbohydrates: e.carbohydrates.clone(),
                fiber: e.fiber.clone(),
                sugars: e.sugars.clone(),
                fat: e.fat.clone(),
                saturated_fat: e.saturated_fat.clone(),
                vitamins: e.vitamins.clone(),
            })
            .collect(),
        estimated_macros,
        summary,
    }
}

/// One aggregate per date with meals inside the `days`-day window ending today, newest date first.
pub fn history(entries: &[MealEntry], days: i64, today: Date) -> Vec<DayHistory> {
    if days <= 0 {
        return Vec::new();
    }
    let start = window_start(today, days - 1);

    let mut by_date: BTreeMap<Date, Vec<&MealEntry>> = BTreeMap::new();
    for entry in entries
        .iter()
        .filter(|e| e.logged_on >= start && e.logged_on <= today)
    {
        by_date.entry(entry.logged_on).or_default().push(entry);
    }

    by_date
        .into_iter()
        .rev()
        .map(|(date, mut meals)| {
            newest_first(&mut meals);
            DayHistory {
                date: date.to_string(),
                meal_count: meals.len(),
                total_calories: meals.iter().map(|e| e.calories).sum(),
                foods: meals.iter().map(|e| e.food_item.clone()).collect(),
            }
        })
        .collect()
}

/// Splits the window `[today - days, today]` into today's meals and the previous days' meals.
pub fn recent_summary(entries: &[MealEntry], days: i64, today: Date) -> RecentNutritionSummary {
    let start = window_start(today, days);

    let mut today_meals: Vec<&MealEntry> =
        entries.iter().filter(|e| e.logged_on == today).collect();
    newest_first(&mut today_meals);

    let mut previous: Vec<&MealEntry> = entries
        .iter()
        .filter(|e| e.logged_on >= start && e.logged_on < today)
        .collect();
    newest_first(&mut previous);
    // stable sort keeps newest-consumption order inside each date
    previous.sort_by(|a, b| b.logged_on.cmp(&a.logged_on));

    let window: Vec<&MealEntry> = today_meals.iter().chain(previous.iter()).copied().collect();

    let days_with_data = window
        .iter()
        .map(|e| e.logged_on)
        .collect::<HashSet<_>>()
        .len();
    let total_calories: i64 = window.iter().map(|e| e.calories).sum();
    let avg_daily_calories = if days_with_data > 0 {
        total_calories as f64 / days_with_data as f64
    } else {
        0.0
    };

    let mut seen = HashSet::new();
    let unique_foods: Vec<String> = window
        .iter()
        .filter(|e| seen.insert(e.food_item.as_str()))
        .map(|e| e.food_item.clone())
        .collect();

    RecentNutritionSummary {
        period_days: days,
        days_with_data,
        avg_daily_calories,
        total_calories,
        total_meals: window.len(),
        food_variety: unique_foods.len(),
        unique_foods,
        today_meals: today_meals.into_iter().map(snapshot).collect(),
        previous_meals: previous.into_iter().map(snapshot).collect(),
    }
}
