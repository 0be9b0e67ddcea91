/*!
 * Completion provider implementations.
 *
 * This module contains client implementations for various LLM providers:
 * - OpenAI: OpenAI chat completions API (also used for LM Studio)
 * - Anthropic: Anthropic messages API
 * - Ollama: Local LLM server
 * - Mock: scripted responses for tests
 */

use anyhow::Result;
use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use crate::app_config::{CompletionConfig, CompletionProvider};
use crate::errors::ProviderError;

pub mod anthropic;
pub mod mock;
pub mod ollama;
pub mod openai;

/// A system instruction plus one user message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatPrompt {
    /// System instruction
    pub system: String,
    /// User message
    pub user: String,
}

impl ChatPrompt {
    /// Create a new prompt
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
        }
    }
}

/// Generation settings shared by every provider
#[derive(Debug, Clone)]
pub struct GenerationSettings {
    /// Model name
    pub model: String,
    /// Sampling temperature, provider default when unset
    pub temperature: Option<f32>,
    /// Upper bound on generated tokens, provider default when unset
    pub max_tokens: Option<u32>,
    /// Completion deadline for one request
    pub timeout: Duration,
}

impl GenerationSettings {
    /// Settings for the active provider of a completion config
    pub fn from_config(config: &CompletionConfig) -> Self {
        Self {
            model: config.get_model(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            timeout: Duration::from_secs(config.get_timeout_secs()),
        }
    }
}

/// Common trait for all completion providers
///
/// Handlers hold an `Arc<dyn Provider>`, so any implementation can be
/// injected, including the mock used in tests.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// Human-readable provider name for logs
    fn name(&self) -> &str;

    /// Complete a chat prompt and return the model's text
    ///
    /// # Arguments
    /// * `prompt` - System instruction and user message
    ///
    /// # Returns
    /// * `Result<String, ProviderError>` - The generated text or an error
    async fn complete(&self, prompt: &ChatPrompt) -> Result<String, ProviderError>;

    /// Test the connection to the provider
    ///
    /// # Returns
    /// * `Result<(), ProviderError>` - Ok if the connection is successful, or an error
    async fn test_connection(&self) -> Result<(), ProviderError>;
}

/// Build the provider selected in the configuration
pub fn from_config(config: &CompletionConfig) -> Result<Arc<dyn Provider>> {
    let settings = GenerationSettings::from_config(config);
    let endpoint = config.get_endpoint();

    let provider: Arc<dyn Provider> = match config.provider {
        CompletionProvider::OpenAI => Arc::new(openai::OpenAI::new(
            config.get_api_key(),
            endpoint,
            settings,
        )),
        CompletionProvider::LMStudio => {
            // LM Studio often doesn't require an API key; use a default if empty
            let api_key = {
                let k = config.get_api_key();
                if k.is_empty() { "lm-studio".to_string() } else { k }
            };
            Arc::new(openai::OpenAI::new(api_key, endpoint, settings).with_name("LM Studio"))
        }
        CompletionProvider::Anthropic => Arc::new(anthropic::Anthropic::new(
            config.get_api_key(),
            endpoint,
            settings,
        )),
        CompletionProvider::Ollama => Arc::new(ollama::Ollama::new(endpoint, settings)?),
    };

    Ok(provider)
}

/// Added to the completion deadline; the HTTP client outlasts the service timeout
pub const CLIENT_TIMEOUT_MARGIN: Duration = Duration::from_secs(5);

/// HTTP client timeout for a given completion deadline
pub fn client_timeout(timeout: Duration) -> Duration {
    timeout.saturating_add(CLIENT_TIMEOUT_MARGIN)
}

/// Build a reqwest client for the given completion deadline
pub(crate) fn http_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(client_timeout(timeout))
        .connect_timeout(Duration::from_secs(10))
        .build()
        .unwrap_or_default()
}

/// Turn a non-success response into a `ProviderError`
pub(crate) async fn error_from_response(provider: &str, response: reqwest::Response) -> ProviderError {
    let status = response.status();
    let error_text = response.text().await
        .unwrap_or_else(|_| "Failed to get error response text".to_string());
    log::error!("{} API error ({}): {}", provider, status, error_text);
    ProviderError::from_status(status.as_u16(), error_text)
}
