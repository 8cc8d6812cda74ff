use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::endpoints::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage, Provider};
use super::retry::RetryPolicy;
use crate::config::{PlannerConfig, API_KEY_ENV_VAR};

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("API key not configured: {0}")]
    MissingApiKey(String),
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("rate limited by the completion endpoint: {body}")]
    RateLimited { body: String },
    #[error("API error {status}: {body}")]
    Api { status: StatusCode, body: String },
    #[error("completion response carried no content")]
    EmptyCompletion,
    #[error("could not decode completion response: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl TransportError {
    /// Network-level failures and rate limits are retried; everything else ends the attempt loop.
    pub fn is_retryable(&self) -> bool {
        matches!(self, TransportError::Network(_) | TransportError::RateLimited { .. })
    }
}

/// Sends one prompt and returns the model's raw text.
#[async_trait]
pub trait CompletionTransport: Send + Sync {
    async fn invoke(&self, prompt: &str) -> Result<String, TransportError>;
}

impl Provider {
    /// One attempt. A fresh HTTP client is built per call so that no
    /// connection outlives the attempt it was opened for.
    pub async fn call_chat_completion(
        &self,
        request: &ChatCompletionRequest,
        timeout: Duration,
    ) -> Result<ChatCompletionResponse, TransportError> {
        match self {
            Provider::Groq { endpoint, api_key, .. } => {
                let client = Client::builder().timeout(timeout).build()?;

                let response = client
                    .post(endpoint)
                    .bearer_auth(api_key)
                    .header("Content-Type", "application/json")
                    .json(request)
                    .send()
                    .await?;

                let status = response.status();
                if status.is_success() {
                    // A body cut short is a network failure, not a decode failure.
                    let body = response.text().await?;
                    return Ok(serde_json::from_str::<ChatCompletionResponse>(&body)?);
                }

                let body = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Failed to read response body".to_string());
                if status == StatusCode::TOO_MANY_REQUESTS {
                    Err(TransportError::RateLimited { body })
                } else {
                    Err(TransportError::Api { status, body })
                }
            }
        }
    }
}

/// The real transport: a provider plus the retry policy that governs it.
#[derive(Debug, Clone)]
pub struct CompletionClient {
    provider: Provider,
    retry: RetryPolicy,
    timeout: Duration,
    temperature: f32,
    max_tokens: u32,
}

impl CompletionClient {
    pub fn new(config: &PlannerConfig) -> Result<Self, TransportError> {
        let provider = Provider::groq(config)
            .ok_or_else(|| TransportError::MissingApiKey(API_KEY_ENV_VAR.to_string()))?;
        Ok(Self {
            provider,
            retry: config.retry.clone(),
            timeout: config.request_timeout,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    pub fn build_request(&self, prompt: &str) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.provider.model().to_string(),
            messages: vec![ChatMessage::user(prompt)],
            temperature: Some(self.temperature),
            max_tokens: Some(self.max_tokens),
        }
    }

    async fn attempt(&self, request: &ChatCompletionRequest) -> Result<String, TransportError> {
        let response = self.provider.call_chat_completion(request, self.timeout).await?;
        response
            .first_content()
            .map(str::to_string)
            .ok_or(TransportError::EmptyCompletion)
    }
}

#[async_trait]
impl CompletionTransport for CompletionClient {
    async fn invoke(&self, prompt: &str) -> Result<String, TransportError> {
        let request = self.build_request(prompt);
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            debug!(attempt, endpoint = self.provider.endpoint(), "sending completion request");

            match self.attempt(&request).await {
                Ok(text) => {
                    info!(attempt, chars = text.len(), "completion received");
                    return Ok(text);
                }
                Err(err) if err.is_retryable() && self.retry.should_retry(attempt) => {
                    let delay = self.retry.delay(attempt);
                    warn!(
                        attempt,
                        error = %err,
                        delay_ms = delay.as_millis() as u64,
                        "transient transport failure, backing off"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(err) => {
                    warn!(
                        attempt,
                        error = %err,
                        retryable = err.is_retryable(),
                        "giving up on completion endpoint"
                    );
                    return Err(err);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_api_key_error() {
        let result = CompletionClient::new(&PlannerConfig::default().without_api_key());
        assert!(matches!(
            result,
            Err(TransportError::MissingApiKey(ref name)) if name == API_KEY_ENV_VAR
        ));
    }

    #[test]
    fn test_retry_classification() {
        assert!(TransportError::RateLimited { body: String::new() }.is_retryable());
        assert!(!TransportError::EmptyCompletion.is_retryable());
        assert!(!TransportError::Api {
            status: StatusCode::BAD_REQUEST,
            body: String::new()
        }
        .is_retryable());
        let decode = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(!TransportError::from(decode).is_retryable());
    }

    #[test]
    fn test_build_request_uses_config_bounds() {
        let config = PlannerConfig::default().with_api_key("gsk_test");
        let client = CompletionClient::new(&config).unwrap();
        let request = client.build_request("plan my lunch");
        assert_eq!(request.model, crate::config::DEFAULT_MODEL);
        assert_eq!(request.temperature, Some(0.7));
        assert_eq!(request.max_tokens, Some(4000));
        assert_eq!(request.messages, vec![ChatMessage::user("plan my lunch")]);
    }
}
