//! Budget and preference checks applied to recovered meals before they are
//! handed back, plus the set-level policy that decides when to give up on them.

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::ValidationPolicy;
use crate::meal::{MealPlan, MealPlanSet, MealRequest, MEAL_PLAN_COUNT};

/// Acceptable cost as fractions of the requested budget, both ends inclusive.
pub const BUDGET_RANGE: (f64, f64) = (0.5, 1.1);

pub const MEAT_KEYWORDS: &[&str] = &[
    "chicken", "beef", "pork", "fish", "mutton", "goat", "lamb", "meat", "bacon", "sausage", "ham",
    "turkey", "tuna", "tilapia", "omena", "sardine", "salmon", "shrimp", "prawn", "liver", "mince",
    "nyama", "kuku", "samaki", "matumbo",
];

pub const DAIRY_KEYWORDS: &[&str] =
    &["milk", "butter", "cheese", "yogurt", "yoghurt", "cream", "ghee", "maziwa", "mala"];

const OTHER_ANIMAL_KEYWORDS: &[&str] = &["egg", "honey"];

/// Items a user can ask for by name; each group lists the words that count as the item.
const REQUESTABLE_ITEMS: &[(&str, &[&str])] = &[
    ("tea", &["tea", "chai"]),
    ("coffee", &["coffee"]),
    ("ginger", &["ginger", "tangawizi"]),
    ("chapati", &["chapati"]),
    ("ugali", &["ugali"]),
    ("rice", &["rice"]),
    ("beans", &["bean"]),
];

static EXCLUSION_PHRASE: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(concat!(
        r"\b(?:no|without|exclude|excluding|avoid|allergy to|allergic to)\s+",
        r"(?:(?:any|the|added|too|much)\s+)*([a-z]+)",
    ))
    .ok()
});

/// The word itself plus its singular forms ("tomatoes" -> "tomatoe", "tomato").
/// Stripped forms shorter than three letters are dropped.
fn singular_forms(word: &str) -> impl Iterator<Item = &str> {
    let stripped = [word.strip_suffix('s'), word.strip_suffix("es")];
    std::iter::once(word).chain(stripped.into_iter().flatten().filter(|form| form.len() >= 3))
}

/// Whole-word match of `word` in already-lowercased `text`, plural forms included.
pub fn mentions(text: &str, word: &str) -> bool {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .any(|token| singular_forms(token).any(|form| form == word))
}

/// Substring match for an excluded token, so "nuts" also catches "groundnuts"
/// and "onions" catches "onion".
pub fn contains_excluded(text: &str, token: &str) -> bool {
    singular_forms(token).any(|form| text.contains(form))
}

fn first_mentioned<'a>(text: &str, words: &[&'a str]) -> Option<&'a str> {
    words.iter().copied().find(|word| mentions(text, word))
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BudgetWindow {
    pub low: f64,
    pub high: f64,
}

impl BudgetWindow {
    pub fn for_budget(budget: f64) -> Self {
        Self {
            low: budget * BUDGET_RANGE.0,
            high: budget * BUDGET_RANGE.1,
        }
    }

    pub fn contains(&self, cost: f64) -> bool {
        cost >= self.low && cost <= self.high
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BudgetReport {
    pub window: BudgetWindow,
    pub costs: Vec<f64>,
    pub off_budget: usize,
}

pub fn check_budget(meals: &[MealPlan], budget: f64) -> BudgetReport {
    let window = BudgetWindow::for_budget(budget);
    let costs: Vec<f64> = meals.iter().map(|meal| meal.total_cost).collect();
    let off_budget = costs.iter().filter(|cost| !window.contains(**cost)).count();
    debug!(?costs, low = window.low, high = window.high, off_budget, "budget check");
    BudgetReport { window, costs, off_budget }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreferenceVerdict {
    pub adheres: bool,
    pub reason: String,
}

impl PreferenceVerdict {
    fn adheres() -> Self {
        Self {
            adheres: true,
            reason: String::new(),
        }
    }

    fn violation(reason: String) -> Self {
        Self { adheres: false, reason }
    }
}

fn excluded_tokens(preferences: &str) -> Vec<String> {
    match EXCLUSION_PHRASE.as_ref() {
        Some(pattern) => pattern
            .captures_iter(preferences)
            .map(|caps| caps[1].to_string())
            .collect(),
        None => Vec::new(),
    }
}

/// Checks a single meal against free-text preferences. Returns the first
/// violation found; empty preferences always adhere.
pub fn check_preferences(meal: &MealPlan, preferences: &str) -> PreferenceVerdict {
    let preferences = preferences.trim().to_lowercase();
    if preferences.is_empty() {
        return PreferenceVerdict::adheres();
    }
    let content = meal.searchable_text();
    let excluded = excluded_tokens(&preferences);

    let requested: Vec<(&str, &[&str])> = REQUESTABLE_ITEMS
        .iter()
        .copied()
        .filter(|(_, words)| first_mentioned(&preferences, words).is_some())
        .filter(|(_, words)| !words.iter().any(|w| excluded.iter().any(|e| mentions(e, w))))
        .collect();
    if !requested.is_empty()
        && !requested.iter().any(|(_, words)| first_mentioned(&content, words).is_some())
    {
        let names: Vec<&str> = requested.iter().map(|(item, _)| *item).collect();
        return PreferenceVerdict::violation(format!(
            "does not include any of the requested items: {}",
            names.join(", ")
        ));
    }

    if preferences.contains("vegetarian") {
        if let Some(found) = first_mentioned(&content, MEAT_KEYWORDS) {
            return PreferenceVerdict::violation(format!(
                "contains {}, which is not vegetarian",
                found
            ));
        }
    }

    if preferences.contains("vegan") {
        let animal = first_mentioned(&content, MEAT_KEYWORDS)
            .or_else(|| first_mentioned(&content, DAIRY_KEYWORDS))
            .or_else(|| first_mentioned(&content, OTHER_ANIMAL_KEYWORDS));
        if let Some(found) = animal {
            return PreferenceVerdict::violation(format!("contains {}, which is not vegan", found));
        }
    }

    for token in &excluded {
        let found = if singular_forms(token).any(|form| form == "meat") {
            first_mentioned(&content, MEAT_KEYWORDS).map(str::to_string)
        } else if token == "dairy" {
            first_mentioned(&content, DAIRY_KEYWORDS).map(str::to_string)
        } else {
            contains_excluded(&content, token).then(|| token.to_string())
        };
        if let Some(found) = found {
            return PreferenceVerdict::violation(format!(
                "contains {}, which the preferences exclude",
                found
            ));
        }
    }

    PreferenceVerdict::adheres()
}

/// One verdict per meal, in order.
pub fn preference_report(meals: &[MealPlan], preferences: &str) -> Vec<PreferenceVerdict> {
    meals.iter().map(|meal| check_preferences(meal, preferences)).collect()
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationViolation {
    #[error("expected {expected} meals, got {got}", expected = MEAL_PLAN_COUNT)]
    Cardinality { got: usize },
    #[error("{off_budget} meals cost outside {low:.2}..={high:.2}")]
    OffBudget { off_budget: usize, low: f64, high: f64 },
    #[error("{violations} meals violate the preferences: {}", .reasons.join("; "))]
    PreferenceMajority { violations: usize, reasons: Vec<String> },
}

/// Applies cardinality, budget and preference policy to normalized meals.
pub fn validate_meal_plans(
    meals: Vec<MealPlan>,
    request: &MealRequest,
    policy: &ValidationPolicy,
) -> Result<MealPlanSet, ValidationViolation> {
    let got = meals.len();
    let set = MealPlanSet::from_vec(meals).map_err(|_| ValidationViolation::Cardinality { got })?;

    let budget = check_budget(set.as_slice(), request.budget);
    if budget.off_budget > policy.max_off_budget_meals {
        return Err(ValidationViolation::OffBudget {
            off_budget: budget.off_budget,
            low: budget.window.low,
            high: budget.window.high,
        });
    }

    if request.has_preferences() {
        let verdicts = preference_report(set.as_slice(), &request.preferences);
        for (meal, verdict) in set.iter().zip(&verdicts) {
            info!(
                meal = %meal.name,
                adheres = verdict.adheres,
                reason = %verdict.reason,
                "preference check"
            );
        }
        let reasons: Vec<String> = verdicts
            .into_iter()
            .filter(|verdict| !verdict.adheres)
            .map(|verdict| verdict.reason)
            .collect();
        if reasons.len() > policy.max_preference_violations {
            return Err(ValidationViolation::PreferenceMajority {
                violations: reasons.len(),
                reasons,
            });
        }
    }

    Ok(set)
}
