use anyhow::{Context, Result};
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use super::{error_from_response, http_client, ChatPrompt, GenerationSettings, Provider};
use crate::errors::ProviderError;

/// Default Ollama server address
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

/// Ollama client for interacting with Ollama API
#[derive(Debug)]
pub struct Ollama {
    /// Base URL of the Ollama API
    base_url: Url,
    /// HTTP client for making requests
    client: Client,
    /// Model and sampling settings
    settings: GenerationSettings,
}

/// Chat message object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message sender (system, user, assistant)
    pub role: String,
    /// Content of the message
    pub content: String,
}

/// Generation options for the Ollama API
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Temperature for generation
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    /// Maximum number of tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

/// Chat request for the Ollama API
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Model name to use for generation
    model: String,
    /// Messages of the conversation
    messages: Vec<ChatMessage>,
    /// Additional model parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<GenerationOptions>,
    /// Whether to stream the response
    stream: bool,
}

/// Chat response from the Ollama API
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Model name
    pub model: String,
    /// Response message
    pub message: ChatMessage,
    /// Whether the generation is complete
    pub done: bool,
    /// Number of prompt tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_eval_count: Option<u64>,
    /// Number of generated tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eval_count: Option<u64>,
}

impl ChatRequest {
    /// Create a new non-streaming chat request
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            messages: Vec::new(),
            options: None,
            stream: false,
        }
    }

    /// Add a message to the conversation
    pub fn add_message(mut self, role: impl Into<String>, content: impl Into<String>) -> Self {
        self.messages.push(ChatMessage {
            role: role.into(),
            content: content.into(),
        });
        self
    }

    /// Set the temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.options.get_or_insert_with(GenerationOptions::default).temperature = Some(temperature);
        self
    }

    /// Set the maximum number of tokens to generate
    pub fn num_predict(mut self, num_predict: u32) -> Self {
        self.options.get_or_insert_with(GenerationOptions::default).num_predict = Some(num_predict);
        self
    }
}

impl Ollama {
    /// Create a new Ollama client
    ///
    /// An empty endpoint selects the local default server. A host without
    /// a scheme is treated as plain http.
    pub fn new(endpoint: impl AsRef<str>, settings: GenerationSettings) -> Result<Self> {
        let base_url = Self::parse_base_url(endpoint.as_ref())?;
        Ok(Self {
            base_url,
            client: http_client(settings.timeout),
            settings,
        })
    }

    fn parse_base_url(endpoint: &str) -> Result<Url> {
        let endpoint = endpoint.trim();
        let raw = if endpoint.is_empty() {
            DEFAULT_OLLAMA_URL.to_string()
        } else if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            endpoint.to_string()
        } else {
            format!("http://{}", endpoint)
        };
        Url::parse(&raw).with_context(|| format!("Invalid Ollama endpoint: {}", raw))
    }

    /// Base URL of the server
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.as_str().trim_end_matches('/'), path)
    }

    /// Build the request for a prompt
    pub fn build_request(&self, prompt: &ChatPrompt) -> ChatRequest {
        let mut request = ChatRequest::new(&self.settings.model)
            .add_message("system", &prompt.system)
            .add_message("user", &prompt.user);
        if let Some(max_tokens) = self.settings.max_tokens {
            request = request.num_predict(max_tokens);
        }
        if let Some(temperature) = self.settings.temperature {
            request = request.temperature(temperature);
        }
        request
    }

    /// Send a chat request
    pub async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, ProviderError> {
        let response = self.client.post(self.api_url("/api/chat"))
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response("Ollama", response).await);
        }

        let chat_response = response.json::<ChatResponse>().await
            .map_err(|e| ProviderError::ParseError(format!("Ollama response: {}", e)))?;

        debug!(
            "Ollama usage: {} prompt tokens, {} generated tokens",
            chat_response.prompt_eval_count.unwrap_or(0),
            chat_response.eval_count.unwrap_or(0)
        );

        Ok(chat_response)
    }
}

#[async_trait]
impl Provider for Ollama {
    fn name(&self) -> &str {
        "Ollama"
    }

    async fn complete(&self, prompt: &ChatPrompt) -> Result<String, ProviderError> {
        let request = self.build_request(prompt);
        let response = self.chat(&request).await?;
        Ok(response.message.content)
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        let response = self.client.get(self.api_url("/api/version"))
            .send()
            .await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(error_from_response("Ollama", response).await)
        }
    }
}
