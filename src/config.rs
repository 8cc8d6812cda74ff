use dotenv::dotenv;
use std::env;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

use crate::api_connection::retry::RetryPolicy;

pub const API_KEY_ENV_VAR: &str = "GROQ_API_KEY";
pub const ENDPOINT_ENV_VAR: &str = "MEAL_PLANNER_ENDPOINT";
pub const MODEL_ENV_VAR: &str = "MEAL_PLANNER_MODEL";
pub const TIMEOUT_ENV_VAR: &str = "MEAL_PLANNER_TIMEOUT_SECS";

pub const DEFAULT_ENDPOINT: &str = "https://api.groq.com/openai/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "llama3-8b-8192";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Divisor applied to protein/carbs/fat values above 100, which models tend
/// to send in grams rather than percent.
pub const DEFAULT_NUTRITION_RESCALE_DIVISOR: f64 = 3.0;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be a positive integer number of seconds, got '{value}'")]
    InvalidTimeout { name: &'static str, value: String },
}

/// Set-level thresholds deciding when validated output is replaced by the fallback catalog.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidationPolicy {
    /// Fallback when more meals than this fall outside the budget window.
    pub max_off_budget_meals: usize,
    /// Fallback when more meals than this violate the preferences.
    pub max_preference_violations: usize,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            max_off_budget_meals: 2,
            max_preference_violations: 1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PlannerConfig {
    pub endpoint_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub request_timeout: Duration,
    pub retry: RetryPolicy,
    pub policy: ValidationPolicy,
    pub nutrition_rescale_divisor: f64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            endpoint_url: DEFAULT_ENDPOINT.to_string(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.7,
            max_tokens: 4000,
            request_timeout: DEFAULT_TIMEOUT,
            retry: RetryPolicy::default(),
            policy: ValidationPolicy::default(),
            nutrition_rescale_divisor: DEFAULT_NUTRITION_RESCALE_DIVISOR,
        }
    }
}

impl PlannerConfig {
    /// Reads the endpoint, credential, model and timeout from the environment
    /// (and `.env`, if present). Everything else keeps its default.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();
        match Self::from_vars(|name| env::var(name).ok()) {
            (config, None) => Ok(config),
            (_, Some(err)) => Err(err),
        }
    }

    /// Like [`PlannerConfig::from_env`], but an invalid timeout is logged and
    /// the default kept, so a usable credential still reaches the endpoint.
    pub fn from_env_lenient() -> Self {
        dotenv().ok();
        let (config, err) = Self::from_vars(|name| env::var(name).ok());
        if let Some(err) = err {
            warn!(
                error = %err,
                default_secs = DEFAULT_TIMEOUT.as_secs(),
                "ignoring invalid request timeout"
            );
        }
        config
    }

    /// Builds a config from a variable lookup. An invalid timeout leaves the
    /// default in place and is returned alongside.
    fn from_vars(var: impl Fn(&str) -> Option<String>) -> (Self, Option<ConfigError>) {
        let mut config = Self::default();
        let non_blank = |name: &str| {
            var(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        config.api_key = var(API_KEY_ENV_VAR);
        if let Some(url) = non_blank(ENDPOINT_ENV_VAR) {
            config.endpoint_url = url;
        }
        if let Some(model) = non_blank(MODEL_ENV_VAR) {
            config.model = model;
        }

        let mut error = None;
        if let Some(raw) = var(TIMEOUT_ENV_VAR) {
            match raw.trim().parse::<u64>().ok().filter(|secs| *secs > 0) {
                Some(secs) => config.request_timeout = Duration::from_secs(secs),
                None => {
                    error = Some(ConfigError::InvalidTimeout {
                        name: TIMEOUT_ENV_VAR,
                        value: raw,
                    })
                }
            }
        }

        (config, error)
    }

    /// The credential, if one is configured and non-blank.
    pub fn credential(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    pub fn with_endpoint(mut self, url: impl Into<String>) -> Self {
        self.endpoint_url = url.into();
        self
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn without_api_key(mut self) -> Self {
        self.api_key = None;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_policy(mut self, policy: ValidationPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_nutrition_rescale_divisor(mut self, divisor: f64) -> Self {
        self.nutrition_rescale_divisor = divisor;
        self
    }
}
