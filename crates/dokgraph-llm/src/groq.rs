//! Groq Provider Implementation
//!
//! Single-turn completions against an OpenAI-compatible chat completions
//! endpoint. Groq is the default target; any compatible base URL works.
//!
//! # Features
//!
//! - Async HTTP communication with bearer authentication
//! - Low-temperature, bounded-length replies
//! - Fixed per-request timeout
//! - Optional retry with exponential backoff on transport failures
//!
//! # Examples
//!
//! ```no_run
//! use dokgraph_llm::{GroqConfig, GroqProvider};
//!
//! let config = GroqConfig {
//!     api_key: Some("gsk_...".to_string()),
//!     ..GroqConfig::default()
//! };
//! let provider = GroqProvider::new(config).unwrap();
//! ```

use crate::LlmError;
use async_trait::async_trait;
use dokgraph_domain::traits::ModelProvider;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Default chat completions base URL
pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Default model
pub const DEFAULT_MODEL: &str = "qwen/qwen3-32b";

/// Default timeout for model requests (30 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "GROQ_API_KEY";

/// Connection and sampling settings for [`GroqProvider`]
///
/// The `Debug` output never shows the API key.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GroqConfig {
    /// Bearer token; read from `GROQ_API_KEY` when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Model identifier
    pub model: String,

    /// Base URL of the OpenAI-compatible API
    pub base_url: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Maximum reply length in tokens
    pub max_tokens: u32,

    /// Per-request timeout (seconds)
    pub timeout_secs: u64,

    /// Attempts per call for transport failures (1 = no retry)
    pub max_retries: u32,
}

impl Default for GroqConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            temperature: 0.1,
            max_tokens: 150,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_retries: 1,
        }
    }
}

impl std::fmt::Debug for GroqConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroqConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

impl GroqConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.model.trim().is_empty() {
            return Err("model must not be empty".to_string());
        }
        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }
        if self.max_retries == 0 {
            return Err("max_retries must be at least 1".to_string());
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err("temperature must be within [0, 2]".to_string());
        }
        Ok(())
    }
}

/// Chat completions provider
pub struct GroqProvider {
    api_key: String,
    config: GroqConfig,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

impl GroqProvider {
    /// Create a provider, falling back to `GROQ_API_KEY` for the key
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::MissingApiKey`] when no key is configured and
    /// [`LlmError::Other`] when the configuration or HTTP client is invalid.
    pub fn new(config: GroqConfig) -> Result<Self, LlmError> {
        config.validate().map_err(LlmError::Other)?;

        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var(API_KEY_ENV).ok())
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| LlmError::MissingApiKey(API_KEY_ENV.to_string()))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LlmError::Other(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            api_key,
            config,
            client,
        })
    }

    /// Model identifier in use
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Complete a prompt
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The endpoint cannot be reached or answers with a non-success status
    /// - The endpoint rate-limits the request
    /// - The body is not a chat completion
    /// - The completion has no content
    pub async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let url = format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'));
        let request_body = ChatRequest {
            model: &self.config.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let mut attempts = 0;
        let mut last_error = None;

        while attempts < self.config.max_retries {
            match self
                .client
                .post(&url)
                .bearer_auth(&self.api_key)
                .json(&request_body)
                .send()
                .await
            {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        let body = response.json::<ChatResponse>().await.map_err(|e| {
                            LlmError::InvalidResponse(format!("Failed to parse response: {}", e))
                        })?;
                        return first_content(body);
                    } else if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                        return Err(LlmError::RateLimitExceeded);
                    } else {
                        let error_text = response
                            .text()
                            .await
                            .unwrap_or_else(|_| "Unknown error".to_string());
                        last_error = Some(LlmError::Communication(format!(
                            "HTTP {}: {}",
                            status, error_text
                        )));
                    }
                }
                Err(e) => {
                    last_error = Some(LlmError::Communication(format!("Request failed: {}", e)));
                }
            }

            attempts += 1;
            if attempts < self.config.max_retries {
                let delay = Duration::from_secs(2u64.pow(attempts - 1));
                debug!(attempt = attempts, ?delay, "retrying model request");
                tokio::time::sleep(delay).await;
            }
        }

        Err(last_error
            .unwrap_or_else(|| LlmError::Communication("Max retries exceeded".to_string())))
    }
}

impl std::fmt::Debug for GroqProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroqProvider")
            .field("base_url", &self.config.base_url)
            .field("model", &self.config.model)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

#[async_trait]
impl ModelProvider for GroqProvider {
    type Error = LlmError;

    async fn infer(&self, prompt: &str) -> Result<String, Self::Error> {
        self.complete(prompt).await
    }
}

fn first_content(body: ChatResponse) -> Result<String, LlmError> {
    body.choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
        .filter(|content| !content.is_empty())
        .ok_or(LlmError::EmptyResponse)
}
