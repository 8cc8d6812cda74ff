use crate::meal::{MealRequest, MEAL_PLAN_COUNT};

/// Lower and upper edge of the recommended spend, as fractions of the budget.
pub const RECOMMENDED_COST_RANGE: (f64, f64) = (0.5, 1.0);
/// No meal may cost more than this fraction of the budget.
pub const HARD_COST_CEILING: f64 = 1.1;

/// Realistic unit prices (KES) the model is told to price against.
pub const REFERENCE_PRICES: &[(&str, &str)] = &[
    ("Single egg", "15"),
    ("Loaf of bread", "60"),
    ("1 cup of rice", "35"),
    ("1 cup of beans", "40"),
    ("1 cup of milk", "25"),
    ("1 large tomato", "15"),
    ("1 large onion", "20"),
    ("1 bunch kale (sukuma wiki)", "30-40"),
    ("1 cup flour (maize/wheat)", "30"),
    ("Cooking oil (tablespoon)", "10"),
    ("Tea leaves (1 teaspoon)", "5"),
    ("1 banana", "10"),
];

const OUTPUT_CONTRACT: &str = r#"{
  "meals": [
    {
      "name": "Meal Name",
      "description": "At least 30 words about the meal, its ingredients and nutritional benefits",
      "ingredients": [
        {"name": "Ingredient", "amount": "specific amount", "cost": 0}
      ],
      "instructions": ["Step 1", "Step 2", "Step 3"],
      "total_cost": 0,
      "nutritional_info": {
        "calories": "value kcal",
        "protein": 0,
        "carbs": 0,
        "fat": 0
      }
    }
  ]
}"#;

/// Acceptable spend for a budget: `(recommended_low, recommended_high, hard_ceiling)`.
pub fn cost_window(budget: f64) -> (f64, f64, f64) {
    (
        budget * RECOMMENDED_COST_RANGE.0,
        budget * RECOMMENDED_COST_RANGE.1,
        budget * HARD_COST_CEILING,
    )
}

/// Renders whole amounts without decimals, everything else with two.
pub fn format_amount(amount: f64) -> String {
    let rounded = (amount * 100.0).round() / 100.0;
    if rounded.fract() == 0.0 {
        format!("{:.0}", rounded)
    } else {
        format!("{:.2}", rounded)
    }
}

fn preference_clause(preferences: &str) -> String {
    format!(
        "HIGHEST PRIORITY: The user has specified these preferences: \"{}\"\n\
         You MUST honor these preferences in ALL {} meal suggestions. \
         Do not suggest meals that conflict with them.\n\
         Honoring the preferences is more important than matching the budget exactly.\n",
        preferences, MEAL_PLAN_COUNT
    )
}

/// Builds the full instruction sent to the completion endpoint.
pub fn build_prompt(request: &MealRequest) -> String {
    let budget = format_amount(request.budget);
    let (low, high, ceiling) = cost_window(request.budget);

    let mut prompt = format!(
        "Generate EXACTLY {count} affordable meal suggestions for {category} \
         within a budget of KES {budget}.\n\n",
        count = MEAL_PLAN_COUNT,
        category = request.category,
        budget = budget,
    );

    if request.has_preferences() {
        prompt.push_str(&preference_clause(&request.preferences));
        prompt.push('\n');
    }

    prompt.push_str("IMPORTANT GUIDELINES:\n");
    prompt.push_str(&format!(
        "1. You MUST generate EXACTLY {} different meal options, no more and no less.\n\n",
        MEAL_PLAN_COUNT
    ));

    prompt.push_str("2. Use REALISTIC PRICING for Kenyan ingredients. Reference prices:\n");
    for (item, price) in REFERENCE_PRICES {
        prompt.push_str(&format!("   - {}: {} KES\n", item, price));
    }
    prompt.push('\n');

    prompt.push_str(&format!(
        "3. Each meal's total cost should be between KES {} and KES {} (50% to 100% of the budget) \
         and must never exceed KES {}.\n\n",
        format_amount(low),
        format_amount(high),
        format_amount(ceiling),
    ));

    prompt.push_str(
        "4. For each meal include: a name, a descriptive paragraph of at least 30 words, \
         ingredients with SPECIFIC AMOUNTS and costs in KES, step-by-step instructions, \
         the total cost (sum of ingredient costs), and nutritional information where \
         protein, carbs and fat are PERCENTAGES between 0 and 100 (not grams).\n\n",
    );

    prompt.push_str("Format the answer as valid JSON with exactly this structure:\n");
    prompt.push_str(OUTPUT_CONTRACT);
    prompt.push_str(&format!(
        "\n\nThe \"meals\" array MUST contain EXACTLY {} meal objects. \
         Costs and nutrition values must be plain numbers without currency or units. \
         Return ONLY the JSON object with no additional text or markdown.\n",
        MEAL_PLAN_COUNT
    ));

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meal::MealCategory;

    #[test]
    fn test_prompt_embeds_budget_window_and_category() {
        let prompt = build_prompt(&MealRequest::new(MealCategory::Lunch, 200.0, None));
        assert!(prompt.contains("for Lunch within a budget of KES 200"));
        assert!(prompt.contains("between KES 100 and KES 200"));
        assert!(prompt.contains("never exceed KES 220"));
        assert!(prompt.contains("\"meals\""));
        assert!(prompt.contains("EXACTLY 3"));
        assert!(!prompt.contains("HIGHEST PRIORITY"));
    }

    #[test]
    fn test_prompt_lists_reference_prices() {
        let prompt = build_prompt(&MealRequest::new(MealCategory::Breakfast, 80.0, None));
        for (item, _) in REFERENCE_PRICES {
            assert!(prompt.contains(item), "missing reference price for {}", item);
        }
    }

    #[test]
    fn test_preferences_outrank_budget() {
        let request = MealRequest::new(MealCategory::Supper, 150.0, Some("vegan, no onions"));
        let prompt = build_prompt(&request);
        let clause = prompt.find("HIGHEST PRIORITY").unwrap();
        let guidelines = prompt.find("IMPORTANT GUIDELINES").unwrap();
        assert!(clause < guidelines);
        assert!(prompt.contains("\"vegan, no onions\""));
        assert!(prompt.contains("more important than matching the budget"));
    }

    #[test]
    fn test_prompt_is_pure() {
        let request = MealRequest::new(MealCategory::Breakfast, 99.5, Some("tea"));
        assert_eq!(build_prompt(&request), build_prompt(&request));
        assert!(build_prompt(&request).contains("KES 99.50"));
    }
}
