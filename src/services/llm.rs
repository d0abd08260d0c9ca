use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Upper bound on the sleep between two attempts
const MAX_RETRY_DELAY: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("LLM returned empty content")]
    EmptyContent,

    #[error("LLM API key is not configured")]
    NotConfigured,
}

/// One message in a model conversation
#[derive(Debug, Clone, Serialize)]
pub struct LlmMessage {
    pub role: &'static str,
    pub content: String,
}

impl LlmMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user",
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant",
            content: content.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: &'a [LlmMessage],
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    input_tokens: u32,
    output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Connection settings for the model API
#[derive(Debug, Clone)]
pub struct LlmOptions {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub max_tokens: u32,
    pub max_retries: u32,
    pub timeout: Duration,
    /// Delay before the first retry; doubled on every further attempt
    pub retry_base_delay: Duration,
}

/// The single client for every model call in the service
///
/// Wraps a messages-style completion API with retry on 429/5xx.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    options: LlmOptions,
}

impl LlmClient {
    pub fn new(options: LlmOptions) -> Result<Self, LlmError> {
        let client = Client::builder().timeout(options.timeout).build()?;
        Ok(Self { client, options })
    }

    pub fn model(&self) -> &str {
        &self.options.model
    }

    /// Send a conversation and return the first text block of the reply
    pub async fn complete(&self, system: &str, messages: &[LlmMessage]) -> Result<String, LlmError> {
        if self.options.api_key.trim().is_empty() {
            return Err(LlmError::NotConfigured);
        }

        let url = format!("{}/v1/messages", self.options.base_url.trim_end_matches('/'));
        let body = MessagesRequest {
            model: &self.options.model,
            max_tokens: self.options.max_tokens,
            system,
            messages,
        };

        let mut last_error: Option<LlmError> = None;

        for attempt in 0..=self.options.max_retries {
            if attempt > 0 {
                let delay = backoff_delay(self.options.retry_base_delay, attempt);
                tracing::warn!(
                    "LLM call attempt {} failed, retrying after {}ms",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = match self
                .client
                .post(&url)
                .header("x-api-key", &self.options.api_key)
                .header("anthropic-version", ANTHROPIC_VERSION)
                .json(&body)
                .send()
                .await
            {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(LlmError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let text = response.text().await.unwrap_or_default();
                tracing::warn!("LLM API returned {}: {}", status, text);
                last_error = Some(LlmError::Api {
                    status: status.as_u16(),
                    message: text,
                });
                continue;
            }

            if !status.is_success() {
                let text = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<ApiErrorEnvelope>(&text)
                    .map(|e| e.error.message)
                    .unwrap_or(text);
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let parsed: MessagesResponse = response.json().await?;

            if let Some(usage) = &parsed.usage {
                tracing::debug!(
                    "LLM call succeeded: input_tokens={}, output_tokens={}",
                    usage.input_tokens,
                    usage.output_tokens
                );
            }

            return parsed
                .content
                .into_iter()
                .find(|b| b.block_type == "text")
                .and_then(|b| b.text)
                .filter(|t| !t.trim().is_empty())
                .ok_or(LlmError::EmptyContent);
        }

        Err(last_error.unwrap_or(LlmError::RateLimited {
            retries: self.options.max_retries,
        }))
    }
}

/// Exponential backoff before retry number `attempt` (1-based), capped at [`MAX_RETRY_DELAY`]
fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    1u32.checked_shl(attempt.saturating_sub(1))
        .and_then(|factor| base.checked_mul(factor))
        .map_or(MAX_RETRY_DELAY, |delay| delay.min(MAX_RETRY_DELAY))
}
