use serde_json::json;

/// Response schema for meal analysis. Only `calories` is numeric; every other
/// amount is a string carrying its unit.
pub fn meal_analysis_schema() -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "description": "Schema for extracting nutritional information from a text query about food consumption.",
        "properties": {
            "food_item": {
                "type": "STRING",
                "description": "The specific food or dish identified from the user's query (e.g., 'apple pie', 'banana')."
            },
            "consumption_time": {
                "type": "STRING",
                "format": "date-time",
                "description": "The ISO 8601 formatted date and time of consumption. This should be null if no time was mentioned in the query."
            },
            "nutritional_values": {
                "type": "OBJECT",
                "description": "A detailed breakdown of the nutritional information for the identified food item per standard serving.",
                "properties": {
                    "serving_size": {
                        "type": "STRING",
                        "description": "The standard serving size for which the nutritional values are provided (e.g., '1 slice (125g)', '1 medium banana')."
                    },
                    "calories": {
                        "type": "INTEGER",
                        "description": "Total energy in kilocalories (kcal)."
                    },
                    "protein": {
                        "type": "STRING",
                        "description": "Total protein content, including the unit (e.g., '4g')."
                    },
                    "carbohydrates": {
                        "type": "OBJECT",
                        "description": "Breakdown of carbohydrate content.",
                        "properties": {
                            "total": { "type": "STRING", "description": "Total carbohydrates, including the unit (e.g., '58g')." },
                            "fiber": { "type": "STRING", "description": "Dietary fiber, including the unit (e.g., '2g')." },
                            "sugars": { "type": "STRING", "description": "Total sugars, including the unit (e.g., '25g')." }
                        }
                    },
                    "fat": {
                        "type": "OBJECT",
                        "description": "Breakdown of fat content.",
                        "properties": {
                            "total": { "type": "STRING", "description": "Total fat, including the unit (e.g., '19g')." },
                            "saturated": { "type": "STRING", "description": "Saturated fat, including the unit (e.g., '9g')." }
                        }
                    },
                    "vitamins": {
                        "type": "ARRAY",
                        "description": "A list of significant vitamins and minerals and their percentage of the recommended daily value (%DV).",
                        "items": {
                            "type": "OBJECT",
                            "properties": {
                                "name": {
                                    "type": "STRING",
                                    "description": "Name of the vitamin or mineral (e.g., 'Vitamin A', 'Iron')."
                                },
                                "percent_daily_value": {
                                    "type": "STRING",
                                    "description": "The percentage of the recommended daily value, formatted as a string (e.g., '15%')."
                                }
                            }
                        }
                    }
                }
            }
        }
    })
}

fn string_list() -> serde_json::Value {
    json!({ "type": "ARRAY", "items": { "type": "STRING" } })
}

fn planned_meal() -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "suggestion": { "type": "STRING" },
            "focus_nutrients": string_list()
        }
    })
}

/// Response schema for personalised recommendations. All leaves are strings.
pub fn recommendation_schema() -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "overall_assessment": { "type": "STRING" },
            "nutritional_analysis": {
                "type": "OBJECT",
                "properties": {
                    "calorie_analysis": { "type": "STRING" },
                    "macronutrient_balance": { "type": "STRING" },
                    "micronutrient_status": { "type": "STRING" },
                    "deficiencies": string_list(),
                    "strengths": string_list()
                }
            },
            "food_recommendations": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "meal_type": { "type": "STRING" },
                        "food_name": { "type": "STRING" },
                        "benefits": { "type": "STRING" },
                        "nutrients_provided": string_list(),
                        "preparation_tip": { "type": "STRING" }
                    }
                }
            },
            "diet_recommendations": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "category": { "type": "STRING" },
                        "recommendation": { "type": "STRING" },
                        "rationale": { "type": "STRING" },
                        "implementation": { "type": "STRING" }
                    }
                }
            },
            "ingredient_recommendations": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "ingredient": { "type": "STRING" },
                        "nutrient_focus": { "type": "STRING" },
                        "health_benefits": { "type": "STRING" },
                        "usage_suggestions": string_list(),
                        "daily_amount": { "type": "STRING" }
                    }
                }
            },
            "next_day_plan": {
                "type": "OBJECT",
                "properties": {
                    "breakfast": planned_meal(),
                    "lunch": planned_meal(),
                    "dinner": planned_meal(),
                    "snacks": string_list()
                }
            },
            "weekly_goal": { "type": "STRING" },
            "hydration_reminder": { "type": "STRING" }
        }
    })
}
