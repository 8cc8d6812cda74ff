use serde_json::Value;

use crate::meal::{FlexNumber, Ingredient, MealPlan, NutritionalInfo};
use crate::recovery_parser::MealCandidate;

/// Used for protein/carbs/fat when no number can be read at all.
pub const DEFAULT_MACRO_PERCENTAGE: f64 = 25.0;
pub const DEFAULT_CALORIES: &str = "0 kcal";

fn text_field(candidate: &Value, key: &str) -> Option<String> {
    match candidate.get(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn number_field(candidate: &Value, key: &str) -> Option<f64> {
    candidate.get(key).and_then(FlexNumber::from_json).and_then(|n| n.as_f64())
}

/// Coerces one macro value into `[0, 100]`. Values above 100 are assumed to
/// be grams and divided by `rescale_divisor`, then capped.
pub fn normalize_percentage(value: Option<&Value>, rescale_divisor: f64) -> f64 {
    let mut percentage = value
        .and_then(FlexNumber::from_json)
        .and_then(|n| n.as_f64())
        .unwrap_or(DEFAULT_MACRO_PERCENTAGE);

    if percentage > 100.0 && rescale_divisor > 0.0 {
        percentage /= rescale_divisor;
    }
    percentage.clamp(0.0, 100.0)
}

fn normalize_calories(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
        Some(Value::Number(n)) => format!("{} kcal", n),
        _ => DEFAULT_CALORIES.to_string(),
    }
}

pub fn normalize_nutrition(value: Option<&Value>, rescale_divisor: f64) -> NutritionalInfo {
    let field = |key: &str| value.and_then(|info| info.get(key));
    NutritionalInfo {
        calories: normalize_calories(field("calories")),
        protein: normalize_percentage(field("protein"), rescale_divisor),
        carbs: normalize_percentage(field("carbs"), rescale_divisor),
        fat: normalize_percentage(field("fat"), rescale_divisor),
    }
}

fn normalize_ingredient(value: &Value) -> Option<Ingredient> {
    match value {
        Value::String(name) if !name.trim().is_empty() => Some(Ingredient {
            name: name.trim().to_string(),
            amount: String::new(),
            cost: 0.0,
        }),
        Value::Object(_) => {
            let name = text_field(value, "name")?;
            Some(Ingredient {
                name,
                amount: text_field(value, "amount").unwrap_or_default(),
                cost: number_field(value, "cost").unwrap_or(0.0).max(0.0),
            })
        }
        _ => None,
    }
}

fn normalize_instructions(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(steps)) => steps
            .iter()
            .filter_map(|step| match step {
                Value::String(s) => Some(s.trim().to_string()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .filter(|step| !step.is_empty())
            .collect(),
        Some(Value::String(s)) => s
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

/// Builds a typed meal from one recovered candidate. Ingredient and
/// instruction text is carried over untouched.
pub fn normalize_meal(candidate: &MealCandidate, rescale_divisor: f64) -> MealPlan {
    let ingredients: Vec<Ingredient> = match candidate.get("ingredients") {
        Some(Value::Array(items)) => items.iter().filter_map(normalize_ingredient).collect(),
        _ => Vec::new(),
    };

    let total_cost = number_field(candidate, "total_cost")
        .map(|cost| cost.max(0.0))
        .unwrap_or_else(|| ingredients.iter().map(|i| i.cost).sum());

    MealPlan {
        name: text_field(candidate, "name").unwrap_or_else(|| "Untitled meal".to_string()),
        description: text_field(candidate, "description").unwrap_or_default(),
        instructions: normalize_instructions(candidate.get("instructions")),
        total_cost,
        nutritional_info: normalize_nutrition(candidate.get("nutritional_info"), rescale_divisor),
        ingredients,
    }
}

pub fn normalize_candidates(candidates: &[MealCandidate], rescale_divisor: f64) -> Vec<MealPlan> {
    candidates
        .iter()
        .map(|candidate| normalize_meal(candidate, rescale_divisor))
        .collect()
}
