use clap::Parser;

use crate::meal::{MealCategory, MealRequest};

/// Budgets accepted from the command line, in KES.
pub const BUDGET_BOUNDS: (f64, f64) = (10.0, 1000.0);

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Suggests three meals for a category and budget",
    long_about = None
)]
pub struct Cli {
    /// breakfast, lunch or supper
    #[arg(short, long)]
    pub meal_type: MealCategory,

    /// Budget per meal in KES (10 to 1000)
    #[arg(short, long, value_parser = parse_budget)]
    pub budget: f64,

    /// Free-text dietary preferences, e.g. "vegan, no onions"
    #[arg(short, long)]
    pub preferences: Option<String>,

    /// Skip the completion endpoint and use the built-in catalog
    #[arg(long)]
    pub offline: bool,

    /// Print a per-meal preference verdict to stderr
    #[arg(long)]
    pub report: bool,
}

impl Cli {
    pub fn request(&self) -> MealRequest {
        MealRequest::new(self.meal_type, self.budget, self.preferences.as_deref())
    }
}

fn parse_budget(raw: &str) -> Result<f64, String> {
    let budget: f64 = raw.trim().parse().map_err(|_| format!("'{}' is not a number", raw))?;
    let (min, max) = BUDGET_BOUNDS;
    if !(min..=max).contains(&budget) {
        return Err(format!("budget must be between {} and {} KES", min, max));
    }
    Ok(budget)
}

pub fn parse_args() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_full_command_line() {
        let cli = Cli::try_parse_from([
            "meal-planner",
            "--meal-type",
            "Dinner",
            "--budget",
            "250",
            "--preferences",
            "  vegan ",
            "--report",
        ])
        .unwrap();
        assert_eq!(cli.meal_type, MealCategory::Supper);
        assert!(cli.report);
        assert!(!cli.offline);

        let request = cli.request();
        assert_eq!(request.budget, 250.0);
        assert_eq!(request.preferences, "vegan");
    }

    #[test]
    fn test_budget_bounds_are_enforced() {
        for budget in ["9.99", "1000.5", "-20", "lots"] {
            let result = Cli::try_parse_from(["meal-planner", "-m", "lunch", "-b", budget]);
            assert!(result.is_err(), "budget {} should be rejected", budget);
        }
        let cli = Cli::try_parse_from(["meal-planner", "-m", "lunch", "-b", "10"]).unwrap();
        assert_eq!(cli.budget, 10.0);
        assert!(cli.preferences.is_none());
    }

    #[test]
    fn test_unknown_meal_type_is_rejected() {
        assert!(Cli::try_parse_from(["meal-planner", "-m", "brunch", "-b", "100"]).is_err());
    }
}
