pub mod adherence;
pub mod api_connection;
pub mod cli;
pub mod config;
pub mod fallback;
pub mod meal;
pub mod normalizer;
pub mod orchestrator;
pub mod prompt_builder;
pub mod recovery_parser;

pub use config::PlannerConfig;
pub use meal::{Ingredient, MealCategory, MealPlan, MealPlanSet, MealRequest, NutritionalInfo};
pub use orchestrator::{generate_meal_plans, MealPlanner, PipelineError};
