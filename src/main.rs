use anyhow::{Context, Result};
use meal_planner::adherence::preference_report;
use meal_planner::cli::parse_args;
use meal_planner::{MealPlanner, PlannerConfig};
use tracing_subscriber::EnvFilter;

fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("meal_planner=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok(); // Load .env file for the API key
    init_logging();

    let cli_args = parse_args();
    let request = cli_args.request();

    let config = PlannerConfig::from_env()
        .context("Failed to read planner configuration from the environment")?;
    let planner = if cli_args.offline {
        MealPlanner::offline(config)
    } else {
        MealPlanner::new(config)
    };

    let meals = planner.generate_meal_plans(&request).await;

    if cli_args.report && request.has_preferences() {
        let verdicts = preference_report(meals.as_slice(), &request.preferences);
        for (meal, verdict) in meals.iter().zip(verdicts) {
            let status = if verdict.adheres { "ok" } else { "violates" };
            eprintln!("{:<40} {:<8} {}", meal.name, status, verdict.reason);
        }
    }

    let json = serde_json::to_string_pretty(&meals).context("Failed to serialize meal plans")?;
    println!("{}", json);
    Ok(())
}
