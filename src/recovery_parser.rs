//! Turns free-form completion text into candidate meal records.
//!
//! The model is asked for a JSON document but routinely wraps it in prose,
//! fences it in markdown, prices things as `50 KES`, leaves values unquoted or
//! uses single quotes. [`parse`] runs an ordered chain of [`Strategy`] values
//! and stops at the first one that yields at least one meal object.

use regex::{Captures, Regex};
use serde_json::{json, Map, Value};
use std::sync::LazyLock;
use tracing::{debug, info};

use crate::meal::MEAL_PLAN_COUNT;

/// One meal as recovered from the response, before normalization.
pub type MealCandidate = Value;

static MEALS_OBJECT: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r#"(?s)\{\s*["']meals["']\s*:\s*\[.*\]\s*\}"#).ok());
static BARE_ARRAY: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?s)\[\s*\{.*\}\s*\]").ok());
static CODE_FENCE: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"```[A-Za-z]*").ok());

static SINGLE_QUOTE_OPEN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"([\{\[,:]\s*)'").ok());
static SINGLE_QUOTE_CLOSE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"'(\s*[:,\}\]])").ok());
static CURRENCY_SUFFIX: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(concat!(
        r#"("(?:total_cost|cost)"\s*:\s*)(?:KES|KSh|Kshs|Ksh|Sh)?\.?\s*"#,
        r"(\d{1,3}(?:,\d{3})+(?:\.\d+)?|\d+(?:\.\d+)?)",
        r"\s*(?:KES|KSh|Kshs|Ksh|/=|/-)?",
    ))
    .ok()
});
static UNQUOTED_VALUE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r#"("[A-Za-z_]+"\s*:\s*)([^"\s\[\{,\}\]][^,\}\]\n]*)"#).ok());
static TRAILING_COMMA: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r",(\s*[\}\]])").ok());

static NAME_FIELD: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r#""name"\s*:\s*"((?:[^"\\]|\\.)*)""#).ok());
static DESCRIPTION_FIELD: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r#""description"\s*:\s*"((?:[^"\\]|\\.)*)""#).ok());
static TOTAL_COST_FIELD: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r#""total_cost"\s*:\s*"?([^",\}\n]+)"#).ok());
static INGREDIENTS_BLOCK: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r#"(?s)"ingredients"\s*:\s*\[(.*?)(?:\]|\z)"#).ok());
static INSTRUCTIONS_BLOCK: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r#"(?s)"instructions"\s*:\s*\[(.*?)\]"#).ok());
static NUTRITION_BLOCK: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r#"(?s)"nutritional_info"\s*:\s*(\{[^{}]*\})"#).ok());
static OBJECT_FRAGMENT: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"\{[^{}]*\}").ok());
static QUOTED_STRING: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r#""((?:[^"\\]|\\.)*)""#).ok());

const PLACEHOLDER_DESCRIPTION: &str = "A simple, affordable home-cooked meal assembled from the \
    details that could be recovered for this suggestion. Adjust the quantities to taste and to \
    the ingredients available in your kitchen today.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// The whole text is a JSON document.
    DirectDecode,
    /// An embedded `{"meals": [...]}` object, repaired.
    MealsObject,
    /// An embedded `[{...}, ...]` array, repaired.
    BareArray,
    /// Prose and markdown fences removed, remainder repaired.
    WrapperStripped,
    /// Individual fields scraped from the text and reassembled.
    FieldReconstruction,
}

impl Strategy {
    pub const CASCADE: [Strategy; 5] = [
        Strategy::DirectDecode,
        Strategy::MealsObject,
        Strategy::BareArray,
        Strategy::WrapperStripped,
        Strategy::FieldReconstruction,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::DirectDecode => "direct_decode",
            Strategy::MealsObject => "meals_object",
            Strategy::BareArray => "bare_array",
            Strategy::WrapperStripped => "wrapper_stripped",
            Strategy::FieldReconstruction => "field_reconstruction",
        }
    }

    pub fn apply(&self, text: &str) -> Option<Vec<MealCandidate>> {
        match self {
            Strategy::DirectDecode => direct_decode(text),
            Strategy::MealsObject => extract_meals_object(text),
            Strategy::BareArray => extract_bare_array(text),
            Strategy::WrapperStripped => strip_wrapper(text),
            Strategy::FieldReconstruction => reconstruct_fields(text),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParseOutcome {
    pub candidates: Vec<MealCandidate>,
    pub strategy: Strategy,
}

/// `None` means every strategy failed and the response is unusable.
pub fn parse(text: &str) -> Option<ParseOutcome> {
    for strategy in Strategy::CASCADE {
        match strategy.apply(text) {
            Some(candidates) => {
                info!(
                    strategy = strategy.as_str(),
                    candidates = candidates.len(),
                    "recovered meal candidates"
                );
                return Some(ParseOutcome { candidates, strategy });
            }
            None => debug!(strategy = strategy.as_str(), "strategy yielded no candidates"),
        }
    }
    None
}

/// Meal objects from a bare array or from an object's `meals` array.
fn meals_from_value(value: Value) -> Option<Vec<MealCandidate>> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("meals") {
            Some(Value::Array(items)) => items,
            _ => return None,
        },
        _ => return None,
    };
    let meals: Vec<MealCandidate> = items.into_iter().filter(Value::is_object).collect();
    (!meals.is_empty()).then_some(meals)
}

fn decode(fragment: &str) -> Option<Value> {
    serde_json::from_str::<Value>(fragment).ok()
}

/// Decodes `fragment` as-is, and only if that fails, after syntax repair.
fn decode_candidates(fragment: &str) -> Option<Vec<MealCandidate>> {
    if let Some(meals) = decode(fragment).and_then(meals_from_value) {
        return Some(meals);
    }
    decode(&repair_json(fragment)).and_then(meals_from_value)
}

fn replace_all(pattern: &LazyLock<Option<Regex>>, text: &str, replacement: &str) -> String {
    match pattern.as_ref() {
        Some(re) => re.replace_all(text, replacement).into_owned(),
        None => text.to_string(),
    }
}

fn normalize_quotes(text: &str) -> String {
    if !text.contains('"') {
        return text.replace('\'', "\"");
    }
    let opened = replace_all(&SINGLE_QUOTE_OPEN, text, "${1}\"");
    replace_all(&SINGLE_QUOTE_CLOSE, &opened, "\"${1}")
}

fn is_json_scalar(raw: &str) -> bool {
    matches!(decode(raw), Some(Value::Number(_) | Value::Bool(_) | Value::Null))
}

fn quote_bare_values(text: &str) -> String {
    let Some(re) = UNQUOTED_VALUE.as_ref() else {
        return text.to_string();
    };
    re.replace_all(text, |caps: &Captures| {
        let raw = caps[2].trim_end();
        if is_json_scalar(raw) {
            caps[0].to_string()
        } else {
            format!("{}{}", &caps[1], Value::String(raw.to_string()))
        }
    })
    .into_owned()
}

/// `"cost": KES 1,200` becomes `"cost": 1200`.
fn strip_currency(text: &str) -> String {
    let Some(re) = CURRENCY_SUFFIX.as_ref() else {
        return text.to_string();
    };
    re.replace_all(text, |caps: &Captures| format!("{}{}", &caps[1], caps[2].replace(',', "")))
        .into_owned()
}

/// Targeted fixes for the syntax errors models actually make.
pub fn repair_json(fragment: &str) -> String {
    let text = normalize_quotes(fragment);
    let text = strip_currency(&text);
    let text = quote_bare_values(&text);
    replace_all(&TRAILING_COMMA, &text, "${1}")
}

fn direct_decode(text: &str) -> Option<Vec<MealCandidate>> {
    decode(text.trim()).and_then(meals_from_value)
}

fn extract_meals_object(text: &str) -> Option<Vec<MealCandidate>> {
    let found = MEALS_OBJECT.as_ref()?.find(text)?;
    decode_candidates(found.as_str())
}

fn extract_bare_array(text: &str) -> Option<Vec<MealCandidate>> {
    let found = BARE_ARRAY.as_ref()?.find(text)?;
    decode_candidates(found.as_str())
}

fn strip_wrapper(text: &str) -> Option<Vec<MealCandidate>> {
    let unfenced = replace_all(&CODE_FENCE, text, "");
    let start = unfenced.find(['{', '['])?;
    let end = unfenced.rfind(['}', ']'])?;
    if end < start {
        return None;
    }
    decode_candidates(unfenced[start..=end].trim())
}

fn unescape(raw: &str) -> String {
    serde_json::from_str::<String>(&format!("\"{}\"", raw)).unwrap_or_else(|_| raw.to_string())
}

fn scalar_or_text(raw: &str) -> Value {
    let raw = raw.trim();
    match decode(raw) {
        Some(number @ Value::Number(_)) => number,
        _ => Value::String(raw.to_string()),
    }
}

fn placeholder_ingredients() -> Value {
    json!([{ "name": "Assorted ingredients", "amount": "as needed", "cost": 0 }])
}

fn placeholder_instructions() -> Value {
    json!([
        "Prepare and wash the ingredients",
        "Cook the ingredients together until done",
        "Serve warm"
    ])
}

fn neutral_nutrition() -> Value {
    json!({ "calories": "0 kcal", "protein": 25, "carbs": 50, "fat": 25 })
}

fn ingredients_from_block(block: &str) -> Option<Value> {
    let fragments = OBJECT_FRAGMENT.as_ref()?;
    let ingredients: Vec<Value> = fragments
        .find_iter(block)
        .filter_map(|m| decode(m.as_str()).or_else(|| decode(&repair_json(m.as_str()))))
        .filter(|v| v.get("name").is_some())
        .collect();
    (!ingredients.is_empty()).then(|| Value::Array(ingredients))
}

fn instructions_from_block(block: &str) -> Option<Value> {
    let strings = QUOTED_STRING.as_ref()?;
    let steps: Vec<Value> = strings
        .captures_iter(block)
        .map(|caps| unescape(&caps[1]))
        .filter(|step| !step.trim().is_empty())
        .map(Value::String)
        .collect();
    (!steps.is_empty()).then(|| Value::Array(steps))
}

/// Last resort: scrape names, descriptions, costs, ingredient and
/// instruction blocks independently and zip them into up to three meals.
fn reconstruct_fields(raw: &str) -> Option<Vec<MealCandidate>> {
    let text = normalize_quotes(raw);

    let ingredient_blocks: Vec<(std::ops::Range<usize>, Option<Value>)> = INGREDIENTS_BLOCK
        .as_ref()?
        .captures_iter(&text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            Some((whole.range(), ingredients_from_block(&caps[1])))
        })
        .collect();
    let inside_ingredients =
        |pos: usize| ingredient_blocks.iter().any(|(span, _)| span.contains(&pos));

    let names: Vec<String> = NAME_FIELD
        .as_ref()?
        .captures_iter(&text)
        .filter(|caps| caps.get(0).is_some_and(|m| !inside_ingredients(m.start())))
        .map(|caps| unescape(&caps[1]))
        .collect();
    let descriptions: Vec<String> = DESCRIPTION_FIELD
        .as_ref()?
        .captures_iter(&text)
        .map(|caps| unescape(&caps[1]))
        .collect();
    let costs: Vec<Value> = TOTAL_COST_FIELD
        .as_ref()?
        .captures_iter(&text)
        .map(|caps| scalar_or_text(&caps[1]))
        .collect();
    let instructions: Vec<Option<Value>> = INSTRUCTIONS_BLOCK
        .as_ref()?
        .captures_iter(&text)
        .map(|caps| instructions_from_block(&caps[1]))
        .collect();
    let nutrition: Vec<Option<Value>> = NUTRITION_BLOCK
        .as_ref()?
        .captures_iter(&text)
        .map(|caps| decode(&caps[1]).or_else(|| decode(&repair_json(&caps[1]))))
        .collect();

    let count = names.len().max(descriptions.len()).min(MEAL_PLAN_COUNT);
    if count == 0 {
        return None;
    }
    debug!(
        names = names.len(),
        descriptions = descriptions.len(),
        costs = costs.len(),
        ingredient_blocks = ingredient_blocks.len(),
        instruction_blocks = instructions.len(),
        "reconstructing meals from fragments"
    );

    let meals = (0..count)
        .map(|i| {
            let mut meal = Map::new();
            meal.insert(
                "name".to_string(),
                Value::String(
                    names.get(i).cloned().unwrap_or_else(|| format!("Meal Option {}", i + 1)),
                ),
            );
            meal.insert(
                "description".to_string(),
                Value::String(
                    descriptions
                        .get(i)
                        .cloned()
                        .unwrap_or_else(|| PLACEHOLDER_DESCRIPTION.to_string()),
                ),
            );
            meal.insert(
                "ingredients".to_string(),
                ingredient_blocks
                    .get(i)
                    .and_then(|(_, ingredients)| ingredients.clone())
                    .unwrap_or_else(placeholder_ingredients),
            );
            meal.insert(
                "instructions".to_string(),
                instructions.get(i).cloned().flatten().unwrap_or_else(placeholder_instructions),
            );
            if let Some(cost) = costs.get(i) {
                meal.insert("total_cost".to_string(), cost.clone());
            }
            meal.insert(
                "nutritional_info".to_string(),
                nutrition.get(i).cloned().flatten().unwrap_or_else(neutral_nutrition),
            );
            Value::Object(meal)
        })
        .collect();

    Some(meals)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meal(name: &str, cost: f64) -> Value {
        json!({
            "name": name,
            "description": format!("{} is a filling and affordable meal.", name),
            "ingredients": [
                { "name": "Rice", "amount": "1 cup", "cost": 35.0 },
                { "name": "Beans", "amount": "1/2 cup", "cost": 20.0 }
            ],
            "instructions": ["Boil the beans", "Cook the rice", "Serve together"],
            "total_cost": cost,
            "nutritional_info": { "calories": "450 kcal", "protein": 20, "carbs": 70, "fat": 10 }
        })
    }

    fn three_meals() -> Vec<Value> {
        vec![meal("Rice and Beans", 55.0), meal("Githeri", 60.0), meal("Pilau", 90.0)]
    }

    #[test]
    fn test_every_strategy_round_trips_a_well_formed_document() {
        let array_doc = serde_json::to_string_pretty(&Value::Array(three_meals())).unwrap();
        let object_doc = serde_json::to_string_pretty(&json!({ "meals": three_meals() })).unwrap();

        for (strategy, doc) in [
            (Strategy::DirectDecode, &array_doc),
            (Strategy::DirectDecode, &object_doc),
            (Strategy::MealsObject, &object_doc),
            (Strategy::BareArray, &array_doc),
            (Strategy::WrapperStripped, &array_doc),
            (Strategy::WrapperStripped, &object_doc),
            (Strategy::FieldReconstruction, &array_doc),
            (Strategy::FieldReconstruction, &object_doc),
        ] {
            let candidates = strategy.apply(doc);
            assert_eq!(
                candidates,
                Some(three_meals()),
                "strategy {} did not round-trip",
                strategy.as_str()
            );
        }
    }

    #[test]
    fn test_direct_decode_wins_for_clean_json() {
        let doc = serde_json::to_string(&json!({ "meals": three_meals() })).unwrap();
        let outcome = parse(&doc).unwrap();
        assert_eq!(outcome.strategy, Strategy::DirectDecode);
        assert_eq!(outcome.candidates.len(), 3);
    }

    #[test]
    fn test_meals_object_with_currency_suffix() {
        let text = r#"Here are your meals:
{"meals": [{"name": "Uji", "total_cost": 45 KES,
 "ingredients": [{"name": "Millet flour", "amount": "1/2 cup", "cost": 20 KES}]}]}
Enjoy!"#;
        let outcome = parse(text).unwrap();
        assert_eq!(outcome.strategy, Strategy::MealsObject);
        assert_eq!(outcome.candidates[0]["total_cost"], json!(45));
        assert_eq!(outcome.candidates[0]["ingredients"][0]["cost"], json!(20));
    }

    #[test]
    fn test_thousands_separators_in_costs() {
        let text = r#"{"meals": [{"name": "Nyama Choma Feast", "total_cost": 1,250.50 KES,
            "ingredients": [{"name": "Goat ribs", "amount": "1 kg", "cost": KES 1,200}]}]}"#;
        let outcome = parse(text).unwrap();
        assert_eq!(outcome.strategy, Strategy::MealsObject);
        assert_eq!(outcome.candidates[0]["total_cost"], json!(1250.5));
        assert_eq!(outcome.candidates[0]["ingredients"][0]["cost"], json!(1200));
    }

    #[test]
    fn test_bare_array_with_single_quotes() {
        let text = "Sure! [{'name': 'Chapati', 'total_cost': 60}, \
                    {'name': 'Ugali', 'total_cost': 50}] Hope that helps";
        let outcome = parse(text).unwrap();
        assert_eq!(outcome.strategy, Strategy::BareArray);
        assert_eq!(outcome.candidates.len(), 2);
        assert_eq!(outcome.candidates[1]["name"], "Ugali");
    }

    #[test]
    fn test_unquoted_values_are_quoted() {
        let repaired = repair_json(r#"{"calories": 320 kcal, "protein": 20, "amount": 2 cups}"#);
        let value: Value = serde_json::from_str(&repaired).unwrap();
        assert_eq!(value["calories"], "320 kcal");
        assert_eq!(value["protein"], 20);
        assert_eq!(value["amount"], "2 cups");
    }

    #[test]
    fn test_repair_keeps_apostrophes_inside_strings() {
        let repaired = repair_json(r#"{"name": "Mama's Pilau", "total_cost": 120,}"#);
        let value: Value = serde_json::from_str(&repaired).unwrap();
        assert_eq!(value["name"], "Mama's Pilau");
    }

    #[test]
    fn test_code_fenced_document() {
        let text = format!(
            "```json\n{}\n```",
            serde_json::to_string_pretty(&Value::Array(three_meals()[..2].to_vec())).unwrap()
        );
        let outcome = parse(&text).unwrap();
        assert_eq!(outcome.candidates.len(), 2);
    }

    #[test]
    fn test_wrapper_stripping_handles_meals_not_first_key() {
        let text = "Of course!\n```json\n{\"count\": 1, \
                    \"meals\": [{\"name\": \"Toast\", \"total_cost\": 30}]}\n```";
        let candidates = Strategy::WrapperStripped.apply(text).unwrap();
        assert_eq!(candidates, vec![json!({ "name": "Toast", "total_cost": 30 })]);
    }

    #[test]
    fn test_truncated_response_is_reconstructed() {
        let text = r#"{"meals": [
            {"name": "Sweet Potato Breakfast", "description": "Boiled sweet potatoes with tea.",
             "ingredients": [{"name": "Sweet potatoes", "amount": "2 medium", "cost": 40}],
             "instructions": ["Peel", "Boil for 20 minutes"], "total_cost": 40,
             "nutritional_info": {"calories": "300 kcal", "protein": 8, "carbs": 85, "fat": 7}},
            {"name": "Mandazi and Tea", "description": "Fried dough with tea",
             "total_cost": "55 KES",
             "ingredients": [{"name": "Flour", "amount": "1 cup""#;
        let outcome = parse(text).unwrap();
        assert_eq!(outcome.strategy, Strategy::FieldReconstruction);
        assert_eq!(outcome.candidates.len(), 2);
        assert_eq!(outcome.candidates[0]["name"], "Sweet Potato Breakfast");
        assert_eq!(outcome.candidates[0]["ingredients"][0]["name"], "Sweet potatoes");
        assert_eq!(outcome.candidates[1]["name"], "Mandazi and Tea");
        assert_eq!(outcome.candidates[1]["total_cost"], "55 KES");
        assert_eq!(outcome.candidates[1]["ingredients"], placeholder_ingredients());
        assert_eq!(outcome.candidates[1]["instructions"], placeholder_instructions());
        assert_eq!(outcome.candidates[1]["nutritional_info"], neutral_nutrition());
    }

    #[test]
    fn test_reconstruction_caps_at_three_meals() {
        let text: String = (1..=5)
            .map(|i| format!("\"name\": \"Meal {}\", \"description\": \"Tasty\",", i))
            .collect();
        let candidates = Strategy::FieldReconstruction.apply(&text).unwrap();
        assert_eq!(candidates.len(), 3);
    }

    #[test]
    fn test_prose_only_is_total_failure() {
        assert_eq!(parse("I'm sorry, I can't help with meal planning today."), None);
        assert_eq!(parse(""), None);
        assert_eq!(parse("[]"), None);
    }
}
