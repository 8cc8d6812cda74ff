//! Sequences prompt building, the completion call, recovery, normalization and
//! validation. Any failure along the way is logged and replaced by the
//! fallback catalog, so callers always receive exactly three meals.

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::adherence::{validate_meal_plans, ValidationViolation};
use crate::api_connection::{CompletionClient, CompletionTransport, TransportError};
use crate::config::PlannerConfig;
use crate::fallback::fallback_for_request;
use crate::meal::{MealCategory, MealPlanSet, MealRequest};
use crate::normalizer::normalize_candidates;
use crate::prompt_builder::build_prompt;
use crate::recovery_parser;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("no API key configured, skipping the completion endpoint")]
    FallbackRequested,
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("no recovery strategy produced meal candidates")]
    MalformedResponse,
    #[error("meal plans rejected: {0}")]
    Validation(#[from] ValidationViolation),
}

pub struct MealPlanner {
    config: PlannerConfig,
    transport: Option<Box<dyn CompletionTransport>>,
}

impl MealPlanner {
    /// Connects to the configured endpoint when a credential is present;
    /// otherwise every request is served from the fallback catalog.
    pub fn new(config: PlannerConfig) -> Self {
        let transport = match CompletionClient::new(&config) {
            Ok(client) => Some(Box::new(client) as Box<dyn CompletionTransport>),
            Err(err) => {
                info!(error = %err, "completion endpoint disabled");
                None
            }
        };
        Self { config, transport }
    }

    pub fn offline(config: PlannerConfig) -> Self {
        Self { config, transport: None }
    }

    pub fn with_transport(
        config: PlannerConfig,
        transport: impl CompletionTransport + 'static,
    ) -> Self {
        Self {
            config,
            transport: Some(Box::new(transport)),
        }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// The real-data path only. Errors here are what `generate_meal_plans`
    /// turns into fallback results.
    pub async fn try_generate(&self, request: &MealRequest) -> Result<MealPlanSet, PipelineError> {
        let transport = self.transport.as_ref().ok_or(PipelineError::FallbackRequested)?;

        let prompt = build_prompt(request);
        debug!(
            category = %request.category,
            budget = request.budget,
            chars = prompt.len(),
            "prompt built"
        );

        let raw = transport.invoke(&prompt).await?;
        debug!(body = %raw, "raw completion");

        let outcome = recovery_parser::parse(&raw).ok_or(PipelineError::MalformedResponse)?;
        let meals =
            normalize_candidates(&outcome.candidates, self.config.nutrition_rescale_divisor);
        for meal in &meals {
            debug!(meal = %meal.name, total_cost = meal.total_cost, "normalized meal");
        }

        let set = validate_meal_plans(meals, request, &self.config.policy)?;
        info!(strategy = outcome.strategy.as_str(), "returning generated meal plans");
        Ok(set)
    }

    pub async fn generate_meal_plans(&self, request: &MealRequest) -> MealPlanSet {
        match self.try_generate(request).await {
            Ok(set) => set,
            Err(err) => {
                warn!(error = %err, category = %request.category, "using fallback meal plans");
                fallback_for_request(request)
            }
        }
    }
}

/// Entry point for callers holding only primitives. Reads configuration from
/// the environment; an invalid timeout falls back to the default rather than
/// disabling the endpoint.
pub async fn generate_meal_plans(
    category: MealCategory,
    budget: f64,
    preferences: Option<&str>,
) -> MealPlanSet {
    let request = MealRequest::new(category, budget, preferences);
    MealPlanner::new(PlannerConfig::from_env_lenient())
        .generate_meal_plans(&request)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fallback::{fallback_meal_plans, DietClass};
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    struct ScriptedTransport {
        replies: Mutex<VecDeque<Result<String, TransportError>>>,
        calls: Arc<AtomicUsize>,
    }

    impl ScriptedTransport {
        fn new(replies: Vec<Result<String, TransportError>>) -> (Self, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            let transport = Self {
                replies: Mutex::new(replies.into()),
                calls: calls.clone(),
            };
            (transport, calls)
        }

        fn replying(text: impl Into<String>) -> Self {
            Self::new(vec![Ok(text.into())]).0
        }
    }

    #[async_trait]
    impl CompletionTransport for ScriptedTransport {
        async fn invoke(&self, _prompt: &str) -> Result<String, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(TransportError::EmptyCompletion))
        }
    }

    fn meal_json(name: &str, ingredients: &[&str], cost: f64) -> Value {
        json!({
            "name": name,
            "description": format!("{} cooked simply at home.", name),
            "ingredients": ingredients
                .iter()
                .map(|i| json!({ "name": i, "amount": "1 cup", "cost": 10 }))
                .collect::<Vec<_>>(),
            "instructions": ["Prepare", "Cook", "Serve"],
            "total_cost": cost,
            "nutritional_info": { "calories": "400 kcal", "protein": 20, "carbs": 60, "fat": 20 }
        })
    }

    fn document(meals: Vec<Value>) -> String {
        json!({ "meals": meals }).to_string()
    }

    fn planner(transport: ScriptedTransport) -> MealPlanner {
        MealPlanner::with_transport(PlannerConfig::default(), transport)
    }

    fn names(set: &MealPlanSet) -> Vec<String> {
        set.iter().map(|meal| meal.name.clone()).collect()
    }

    #[tokio::test]
    async fn test_valid_response_is_returned() {
        let body = document(vec![
            meal_json("Githeri", &["maize", "beans"], 150.0),
            meal_json("Rice and Ndengu", &["rice", "green grams"], 180.0),
            meal_json("Ugali and Greens", &["maize flour", "kale"], 120.0),
        ]);
        let request = MealRequest::new(MealCategory::Lunch, 200.0, None);
        let set = planner(ScriptedTransport::replying(body)).generate_meal_plans(&request).await;
        assert_eq!(names(&set), vec!["Githeri", "Rice and Ndengu", "Ugali and Greens"]);
    }

    #[tokio::test]
    async fn test_transport_failure_falls_back() {
        let (transport, calls) = ScriptedTransport::new(vec![Err(TransportError::RateLimited {
            body: "slow down".to_string(),
        })]);
        let request = MealRequest::new(MealCategory::Supper, 300.0, Some("vegetarian"));
        let planner = planner(transport);

        assert!(matches!(
            planner.try_generate(&request).await,
            Err(PipelineError::Transport(TransportError::RateLimited { .. }))
        ));
        let set = planner.generate_meal_plans(&request).await;
        assert_eq!(set, fallback_meal_plans(MealCategory::Supper, DietClass::Vegetarian));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_malformed_text_falls_back() {
        let reply = "Sorry, I cannot help with meal planning today.";
        let planner = planner(ScriptedTransport::replying(reply));
        let request = MealRequest::new(MealCategory::Breakfast, 100.0, None);
        let result = planner.try_generate(&request).await;
        assert!(matches!(result, Err(PipelineError::MalformedResponse)));
    }

    #[tokio::test]
    async fn test_two_fenced_meals_are_rejected_on_cardinality() {
        let body = format!(
            "Here you go:\n```json\n{}\n```",
            document(vec![
                meal_json("Chai and Mandazi", &["tea leaves", "flour"], 60.0),
                meal_json("Uji", &["millet flour"], 50.0),
            ])
        );
        let request = MealRequest::new(MealCategory::Breakfast, 100.0, None);

        let result = planner(ScriptedTransport::replying(body.clone()))
            .try_generate(&request)
            .await;
        assert!(matches!(
            result,
            Err(PipelineError::Validation(ValidationViolation::Cardinality { got: 2 }))
        ));

        let set = planner(ScriptedTransport::replying(body)).generate_meal_plans(&request).await;
        assert_eq!(set.len(), 3);
        assert_eq!(set, fallback_meal_plans(MealCategory::Breakfast, DietClass::Unrestricted));
    }

    #[tokio::test]
    async fn test_all_meals_off_budget_falls_back() {
        let body = document(vec![
            meal_json("Feast One", &["rice"], 900.0),
            meal_json("Feast Two", &["rice"], 950.0),
            meal_json("Feast Three", &["rice"], 20.0),
        ]);
        let request = MealRequest::new(MealCategory::Lunch, 200.0, None);
        let result = planner(ScriptedTransport::replying(body)).try_generate(&request).await;
        assert!(matches!(
            result,
            Err(PipelineError::Validation(ValidationViolation::OffBudget { off_budget: 3, .. }))
        ));
    }

    #[tokio::test]
    async fn test_one_meal_in_budget_is_enough() {
        let body = document(vec![
            meal_json("Feast One", &["rice"], 900.0),
            meal_json("Feast Two", &["rice"], 950.0),
            meal_json("Plain Rice", &["rice"], 150.0),
        ]);
        let request = MealRequest::new(MealCategory::Lunch, 200.0, None);
        let set = planner(ScriptedTransport::replying(body)).generate_meal_plans(&request).await;
        assert_eq!(names(&set), vec!["Feast One", "Feast Two", "Plain Rice"]);
    }

    #[tokio::test]
    async fn test_preference_majority_falls_back() {
        let body = document(vec![
            meal_json("Chicken Stew", &["chicken", "tomato"], 200.0),
            meal_json("Fried Fish", &["tilapia", "oil"], 220.0),
            meal_json("Bean Stew", &["beans", "onion"], 180.0),
        ]);
        let request = MealRequest::new(MealCategory::Supper, 250.0, Some("vegetarian"));
        let result = planner(ScriptedTransport::replying(body.clone()))
            .try_generate(&request)
            .await;
        match result {
            Err(PipelineError::Validation(ValidationViolation::PreferenceMajority {
                violations,
                reasons,
            })) => {
                assert_eq!(violations, 2);
                assert!(reasons[0].contains("chicken"));
            }
            other => panic!("expected preference rejection, got {:?}", other.map(|s| names(&s))),
        }

        let set = planner(ScriptedTransport::replying(body)).generate_meal_plans(&request).await;
        assert_eq!(set, fallback_meal_plans(MealCategory::Supper, DietClass::Vegetarian));
    }

    #[tokio::test]
    async fn test_single_preference_violation_is_tolerated() {
        let body = document(vec![
            meal_json("Chicken Stew", &["chicken", "tomato"], 200.0),
            meal_json("Githeri", &["maize", "beans"], 220.0),
            meal_json("Bean Stew", &["beans", "onion"], 180.0),
        ]);
        let request = MealRequest::new(MealCategory::Supper, 250.0, Some("vegetarian"));
        let set = planner(ScriptedTransport::replying(body)).generate_meal_plans(&request).await;
        assert_eq!(names(&set)[0], "Chicken Stew");
    }

    #[tokio::test]
    async fn test_gram_nutrition_is_rescaled() {
        let mut meals = vec![
            meal_json("Githeri", &["maize", "beans"], 150.0),
            meal_json("Rice and Ndengu", &["rice"], 160.0),
            meal_json("Ugali and Greens", &["maize flour"], 170.0),
        ];
        meals[0]["nutritional_info"] =
            json!({ "calories": 520, "protein": 180, "carbs": "450g", "fat": "n/a" });
        let request = MealRequest::new(MealCategory::Lunch, 200.0, None);
        let set = planner(ScriptedTransport::replying(document(meals)))
            .generate_meal_plans(&request)
            .await;

        let info = &set.as_slice()[0].nutritional_info;
        assert_eq!(info.calories, "520 kcal");
        assert_eq!(info.protein, 60.0);
        assert_eq!(info.carbs, 100.0);
        assert_eq!(info.fat, 25.0);
    }

    #[tokio::test]
    async fn test_missing_credential_skips_network() {
        let planner = MealPlanner::new(PlannerConfig::default().with_api_key("   "));
        let request = MealRequest::new(MealCategory::Breakfast, 80.0, Some("vegan"));

        let result = planner.try_generate(&request).await;
        assert!(matches!(result, Err(PipelineError::FallbackRequested)));
        let set = planner.generate_meal_plans(&request).await;
        assert_eq!(set, fallback_meal_plans(MealCategory::Breakfast, DietClass::Vegan));
        for meal in &set {
            assert!(meal.total_cost <= 88.0);
        }
    }

    #[tokio::test]
    async fn test_every_failure_mode_yields_three_meals() {
        let replies: Vec<Result<String, TransportError>> = vec![
            Err(TransportError::EmptyCompletion),
            Err(TransportError::RateLimited { body: String::new() }),
            Ok(String::new()),
            Ok("[]".to_string()),
            Ok("{\"meals\": []}".to_string()),
            Ok("{\"meals\": [{\"name\": \"Only one\"}]}".to_string()),
            Ok("\"name\": \"Truncated".to_string()),
        ];
        for reply in replies {
            let transport = ScriptedTransport::new(vec![reply]).0;
            let planner = MealPlanner::with_transport(PlannerConfig::default(), transport);
            for category in MealCategory::ALL {
                let request = MealRequest::new(category, 150.0, Some("no onions"));
                let set = planner.generate_meal_plans(&request).await;
                assert_eq!(set.len(), 3);
            }
        }
    }
}
