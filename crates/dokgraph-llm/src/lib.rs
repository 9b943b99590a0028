//! Dokgraph Model Provider Layer
//!
//! Pluggable text-completion providers behind the `ModelProvider` trait
//! from `dokgraph-domain`.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic mock for testing
//! - `GroqProvider`: OpenAI-compatible chat completions (Groq by default)
//!
//! # Examples
//!
//! ```
//! use dokgraph_llm::MockProvider;
//! use dokgraph_domain::traits::ModelProvider;
//!
//! let provider = MockProvider::new("Hello from the model!");
//! let rt = tokio::runtime::Runtime::new().unwrap();
//! let reply = rt.block_on(provider.infer("test prompt")).unwrap();
//! assert_eq!(reply, "Hello from the model!");
//! ```

#![warn(missing_docs)]

pub mod groq;

use async_trait::async_trait;
use dokgraph_domain::traits::ModelProvider;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use thiserror::Error;

pub use groq::{GroqConfig, GroqProvider};

/// Errors that can occur during model operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from the model endpoint
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The model answered with no content
    #[error("Model returned an empty response")]
    EmptyResponse,

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// No API key was configured
    #[error("Missing API key: set {0}")]
    MissingApiKey(String),

    /// Generic error
    #[error("Model error: {0}")]
    Other(String),
}

#[derive(Debug, Clone)]
enum MockReply {
    Text(String),
    Error,
}

/// Mock model provider for deterministic testing
///
/// Replies are chosen by the first registered fragment the prompt contains,
/// falling back to a default reply. The provider also counts calls and
/// tracks how many calls were in flight at once.
///
/// # Examples
///
/// ```
/// use dokgraph_llm::MockProvider;
/// use dokgraph_domain::traits::ModelProvider;
///
/// let mut provider = MockProvider::default();
/// provider.add_response("prompt1", "response1");
/// provider.add_error("broken");
///
/// let rt = tokio::runtime::Runtime::new().unwrap();
/// assert_eq!(rt.block_on(provider.infer("... prompt1 ...")).unwrap(), "response1");
/// assert!(rt.block_on(provider.infer("a broken prompt")).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    responses: Arc<Mutex<Vec<(String, MockReply)>>>,
    delay: Option<Duration>,
    call_count: Arc<AtomicUsize>,
    in_flight: Arc<AtomicUsize>,
    peak_in_flight: Arc<AtomicUsize>,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            responses: Arc::new(Mutex::new(Vec::new())),
            delay: None,
            call_count: Arc::new(AtomicUsize::new(0)),
            in_flight: Arc::new(AtomicUsize::new(0)),
            peak_in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Reply with `response` to any prompt containing `fragment`
    pub fn add_response(&mut self, fragment: impl Into<String>, response: impl Into<String>) {
        self.push_rule(fragment.into(), MockReply::Text(response.into()));
    }

    /// Fail any prompt containing `fragment`
    pub fn add_error(&mut self, fragment: impl Into<String>) {
        self.push_rule(fragment.into(), MockReply::Error);
    }

    /// Sleep for `delay` inside every call
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Get the number of times infer was called
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Reset the call count
    pub fn reset_call_count(&self) {
        self.call_count.store(0, Ordering::SeqCst);
    }

    /// Highest number of calls observed running at the same time
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    fn push_rule(&mut self, fragment: String, reply: MockReply) {
        if let Ok(mut responses) = self.responses.lock() {
            responses.push((fragment, reply));
        }
    }

    fn reply_for(&self, prompt: &str) -> MockReply {
        self.responses
            .lock()
            .ok()
            .and_then(|responses| {
                responses
                    .iter()
                    .find(|(fragment, _)| prompt.contains(fragment.as_str()))
                    .map(|(_, reply)| reply.clone())
            })
            .unwrap_or_else(|| MockReply::Text(self.default_response.clone()))
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

#[async_trait]
impl ModelProvider for MockProvider {
    type Error = LlmError;

    async fn infer(&self, prompt: &str) -> Result<String, Self::Error> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(running, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let reply = self.reply_for(prompt);
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match reply {
            MockReply::Text(text) => Ok(text),
            MockReply::Error => Err(LlmError::Other("Mock error".to_string())),
        }
    }
}
