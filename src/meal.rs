use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use thiserror::Error;

/// Number of meal suggestions returned for every request, real or fallback.
pub const MEAL_PLAN_COUNT: usize = 3;

static NUMERIC_TOKEN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\d+(?:\.\d+)?").ok());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MealCategory {
    Breakfast,
    Lunch,
    Supper,
}

impl MealCategory {
    pub const ALL: [MealCategory; 3] =
        [MealCategory::Breakfast, MealCategory::Lunch, MealCategory::Supper];

    pub fn as_str(&self) -> &'static str {
        match self {
            MealCategory::Breakfast => "Breakfast",
            MealCategory::Lunch => "Lunch",
            MealCategory::Supper => "Supper",
        }
    }
}

impl fmt::Display for MealCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq)]
#[error("unknown meal category '{0}', expected Breakfast, Lunch or Supper")]
pub struct UnknownCategory(pub String);

impl FromStr for MealCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "breakfast" => Ok(MealCategory::Breakfast),
            "lunch" => Ok(MealCategory::Lunch),
            "supper" | "dinner" => Ok(MealCategory::Supper),
            _ => Err(UnknownCategory(s.to_string())),
        }
    }
}

/// Already-validated input for one generation request.
#[derive(Debug, Clone, PartialEq)]
pub struct MealRequest {
    pub category: MealCategory,
    pub budget: f64,
    pub preferences: String,
}

impl MealRequest {
    pub fn new(category: MealCategory, budget: f64, preferences: Option<&str>) -> Self {
        Self {
            category,
            budget,
            preferences: preferences.map(str::trim).unwrap_or_default().to_string(),
        }
    }

    pub fn has_preferences(&self) -> bool {
        !self.preferences.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub amount: String,
    pub cost: f64,
}

/// Protein, carbs and fat are percentages in `[0, 100]`, not grams.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionalInfo {
    pub calories: String,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealPlan {
    pub name: String,
    pub description: String,
    pub ingredients: Vec<Ingredient>,
    pub instructions: Vec<String>,
    pub total_cost: f64,
    pub nutritional_info: NutritionalInfo,
}

impl MealPlan {
    /// Lowercased free text of the meal, used for keyword scans.
    pub fn searchable_text(&self) -> String {
        let mut text = String::with_capacity(256);
        text.push_str(&self.name);
        text.push('\n');
        text.push_str(&self.description);
        for ingredient in &self.ingredients {
            text.push('\n');
            text.push_str(&ingredient.name);
            text.push(' ');
            text.push_str(&ingredient.amount);
        }
        for step in &self.instructions {
            text.push('\n');
            text.push_str(step);
        }
        text.to_lowercase()
    }
}

/// Exactly three meal plans. The array type makes any other cardinality unrepresentable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MealPlanSet([MealPlan; MEAL_PLAN_COUNT]);

impl MealPlanSet {
    pub fn new(plans: [MealPlan; MEAL_PLAN_COUNT]) -> Self {
        Self(plans)
    }

    /// Hands the vector back unchanged when it does not hold exactly three plans.
    pub fn from_vec(plans: Vec<MealPlan>) -> Result<Self, Vec<MealPlan>> {
        <[MealPlan; MEAL_PLAN_COUNT]>::try_from(plans).map(Self)
    }

    pub fn len(&self) -> usize {
        MEAL_PLAN_COUNT
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MealPlan> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[MealPlan] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<MealPlan> {
        self.0.into()
    }
}

impl<'a> IntoIterator for &'a MealPlanSet {
    type Item = &'a MealPlan;
    type IntoIter = std::slice::Iter<'a, MealPlan>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A field the model may send either as a JSON number or as text such as `"120 KES"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlexNumber {
    Number(f64),
    Text(String),
}

impl FlexNumber {
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Number(n) => n.as_f64().map(FlexNumber::Number),
            serde_json::Value::String(s) => Some(FlexNumber::Text(s.clone())),
            _ => None,
        }
    }

    /// The single coercion point for numeric-or-text fields.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FlexNumber::Number(n) if n.is_finite() => Some(*n),
            FlexNumber::Number(_) => None,
            FlexNumber::Text(text) => leading_number(text),
        }
    }
}

/// First numeric token in `text`, ignoring thousands separators.
pub fn leading_number(text: &str) -> Option<f64> {
    let pattern = NUMERIC_TOKEN.as_ref()?;
    let cleaned = text.replace(',', "");
    pattern
        .find(&cleaned)
        .and_then(|m| m.as_str().parse::<f64>().ok())
}
