use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use url::Url;

use crate::document::{ConversionOptions, DocumentMetadata};
use crate::prompts::{BriefingPrompt, REPORT_PLACEHOLDER};

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    /// HTTP service settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Completion provider settings
    #[serde(default)]
    pub completion: CompletionConfig,

    /// Generated document settings
    #[serde(default)]
    pub document: DocumentConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Completion provider type
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CompletionProvider {
    // @provider: OpenAI
    #[default]
    OpenAI,
    // @provider: Anthropic
    Anthropic,
    // @provider: Ollama
    Ollama,
    // @provider: LM Studio (OpenAI-compatible local server)
    LMStudio,
}

impl CompletionProvider {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::OpenAI => "OpenAI",
            Self::Anthropic => "Anthropic",
            Self::Ollama => "Ollama",
            Self::LMStudio => "LM Studio",
        }
    }

    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::OpenAI => "openai".to_string(),
            Self::Anthropic => "anthropic".to_string(),
            Self::Ollama => "ollama".to_string(),
            Self::LMStudio => "lmstudio".to_string(),
        }
    }

    // @returns: Environment variable holding the API key, if the provider uses one
    pub fn api_key_env_var(&self) -> Option<&'static str> {
        match self {
            Self::OpenAI => Some("OPENAI_API_KEY"),
            Self::Anthropic => Some("ANTHROPIC_API_KEY"),
            Self::Ollama | Self::LMStudio => None,
        }
    }

    // @returns: Whether requests fail without an API key
    pub fn requires_api_key(&self) -> bool {
        matches!(self, Self::OpenAI | Self::Anthropic)
    }

    pub fn all() -> [Self; 4] {
        [Self::OpenAI, Self::Anthropic, Self::Ollama, Self::LMStudio]
    }
}

// Implement Display trait for CompletionProvider
impl std::fmt::Display for CompletionProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

// Implement FromStr trait for CompletionProvider
impl std::str::FromStr for CompletionProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(Self::OpenAI),
            "anthropic" => Ok(Self::Anthropic),
            "ollama" => Ok(Self::Ollama),
            "lmstudio" => Ok(Self::LMStudio),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Provider configuration wrapper
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    // @field: Provider type identifier
    #[serde(rename = "type")]
    pub provider_type: String,

    // @field: Model name
    #[serde(default = "String::new")]
    pub model: String,

    // @field: API key
    #[serde(default = "String::new")]
    pub api_key: String,

    // @field: Service URL
    #[serde(default = "String::new")]
    pub endpoint: String,

    // @field: Timeout seconds for one completion
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ProviderConfig {
    // @param provider_type: Provider enum
    // @returns: Provider config with defaults
    pub fn new(provider_type: CompletionProvider) -> Self {
        Self {
            provider_type: provider_type.to_lowercase_string(),
            model: default_model(&provider_type),
            api_key: String::new(),
            endpoint: default_endpoint(&provider_type),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Completion settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CompletionConfig {
    /// Provider to use
    #[serde(default)]
    pub provider: CompletionProvider,

    /// Available providers
    #[serde(default)]
    pub available_providers: Vec<ProviderConfig>,

    /// Sampling temperature; omitted from requests when unset
    #[serde(default)]
    pub temperature: Option<f32>,

    /// Upper bound on generated tokens; provider default when unset
    #[serde(default)]
    pub max_tokens: Option<u32>,

    /// System instruction sent with every request
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    /// User prompt; `{report}` is replaced with the extracted report text
    #[serde(default = "default_user_prompt_template")]
    pub user_prompt_template: String,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            provider: CompletionProvider::default(),
            available_providers: CompletionProvider::all()
                .into_iter()
                .map(ProviderConfig::new)
                .collect(),
            temperature: None,
            max_tokens: None,
            system_prompt: default_system_prompt(),
            user_prompt_template: default_user_prompt_template(),
        }
    }
}

/// HTTP service settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ServerConfig {
    /// Interface to bind
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// The only origin allowed to call the service from a browser
    #[serde(default = "default_allowed_origin")]
    pub allowed_origin: String,

    /// Directory uploads are staged in while a request runs
    #[serde(default = "default_upload_dir")]
    pub upload_dir: String,

    /// Largest accepted request body in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            allowed_origin: default_allowed_origin(),
            upload_dir: default_upload_dir(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

impl ServerConfig {
    /// Address string for binding the listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Generated document settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DocumentConfig {
    /// Creator written into the document properties
    #[serde(default = "default_creator")]
    pub creator: String,

    /// Title written into the document properties
    #[serde(default = "default_title")]
    pub title: String,

    /// Description written into the document properties
    #[serde(default = "default_description")]
    pub description: String,

    /// Attachment filename offered to the browser
    #[serde(default = "default_filename")]
    pub filename: String,

    /// Drop `****` lines instead of emitting an empty bold paragraph
    #[serde(default)]
    pub suppress_empty_headers: bool,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            creator: default_creator(),
            title: default_title(),
            description: default_description(),
            filename: default_filename(),
            suppress_empty_headers: false,
        }
    }
}

impl DocumentConfig {
    /// Metadata for generated documents
    pub fn metadata(&self) -> DocumentMetadata {
        DocumentMetadata {
            creator: self.creator.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
        }
    }

    /// Line conversion options
    pub fn conversion_options(&self) -> ConversionOptions {
        ConversionOptions {
            suppress_empty_headers: self.suppress_empty_headers,
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_timeout_secs() -> u64 {
    120 // model answers for a full briefing regularly take 30s or more
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_allowed_origin() -> String {
    "https://llbp-backend.onrender.com".to_string()
}

fn default_upload_dir() -> String {
    "uploads".to_string()
}

fn default_max_upload_bytes() -> usize {
    20 * 1024 * 1024
}

fn default_creator() -> String {
    DocumentMetadata::default().creator
}

fn default_title() -> String {
    DocumentMetadata::default().title
}

fn default_description() -> String {
    DocumentMetadata::default().description
}

fn default_filename() -> String {
    "LLBP_Briefing.docx".to_string()
}

fn default_system_prompt() -> String {
    BriefingPrompt::SYSTEM_PROMPT.to_string()
}

fn default_user_prompt_template() -> String {
    BriefingPrompt::USER_PROMPT_TEMPLATE.to_string()
}

fn default_endpoint(provider: &CompletionProvider) -> String {
    match provider {
        CompletionProvider::OpenAI => "https://api.openai.com/v1".to_string(),
        CompletionProvider::Anthropic => "https://api.anthropic.com".to_string(),
        CompletionProvider::Ollama => "http://localhost:11434".to_string(),
        // LM Studio default server (OpenAI compatible) runs on port 1234 under /v1
        CompletionProvider::LMStudio => "http://localhost:1234/v1".to_string(),
    }
}

fn default_model(provider: &CompletionProvider) -> String {
    match provider {
        CompletionProvider::OpenAI => "gpt-4".to_string(),
        CompletionProvider::Anthropic => "claude-3-5-sonnet-latest".to_string(),
        CompletionProvider::Ollama => "llama3".to_string(),
        // Placeholder; users should set to the loaded model name in LM Studio
        CompletionProvider::LMStudio => "local-model".to_string(),
    }
}

impl Config {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {:?}", path))?;

        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Load configuration, writing a default file first if none exists.
    ///
    /// Returns the config and whether it was freshly created.
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<(Self, bool)> {
        let path = path.as_ref();
        if path.exists() {
            return Ok((Self::from_file(path)?, false));
        }

        let config = Self::default();
        config.save(path)?;
        Ok((config, true))
    }

    /// Save configuration as pretty-printed JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let config_json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;

        std::fs::write(path.as_ref(), config_json)
            .with_context(|| format!("Failed to write config to file: {:?}", path.as_ref()))
    }

    /// Apply overrides from the process environment
    pub fn apply_env_overrides(&mut self) {
        self.apply_env_overrides_from(|name| std::env::var(name).ok());
    }

    /// Apply overrides from an arbitrary variable lookup.
    ///
    /// `PORT` and `LLBP_ALLOWED_ORIGIN` always win; provider API keys from
    /// the environment only fill keys left empty in the file.
    pub fn apply_env_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT").and_then(|p| p.trim().parse::<u16>().ok()) {
            self.server.port = port;
        }

        if let Some(origin) = lookup("LLBP_ALLOWED_ORIGIN").filter(|o| !o.trim().is_empty()) {
            self.server.allowed_origin = origin.trim().to_string();
        }

        for provider in CompletionProvider::all() {
            let Some(var) = provider.api_key_env_var() else {
                continue;
            };
            let Some(key) = lookup(var).filter(|k| !k.trim().is_empty()) else {
                continue;
            };

            let provider_str = provider.to_lowercase_string();
            match self.completion.available_providers.iter_mut()
                .find(|p| p.provider_type == provider_str) {
                Some(provider_config) => {
                    if provider_config.api_key.is_empty() {
                        provider_config.api_key = key.trim().to_string();
                    }
                }
                None => {
                    let mut provider_config = ProviderConfig::new(provider);
                    provider_config.api_key = key.trim().to_string();
                    self.completion.available_providers.push(provider_config);
                }
            }
        }
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(anyhow!("Server port must be non-zero"));
        }

        if self.server.max_upload_bytes == 0 {
            return Err(anyhow!("Maximum upload size must be non-zero"));
        }

        // Credentialed CORS cannot answer with a wildcard origin
        let origin = self.server.allowed_origin.trim();
        if origin.is_empty() || origin == "*" {
            return Err(anyhow!(
                "Allowed origin must name a single origin, got '{}'",
                self.server.allowed_origin
            ));
        }

        // Validate API key for providers that need one
        let provider = &self.completion.provider;
        if provider.requires_api_key() && self.completion.get_api_key().is_empty() {
            return Err(anyhow!(
                "Completion API key is required for {} provider",
                provider.display_name()
            ));
        }

        let endpoint = self.completion.get_endpoint();
        Url::parse(&endpoint)
            .with_context(|| format!("Invalid endpoint URL for {}: {}", provider.display_name(), endpoint))?;

        if self.completion.get_timeout_secs() == 0 {
            return Err(anyhow!("Completion timeout must be at least one second"));
        }

        if !self.completion.user_prompt_template.contains(REPORT_PLACEHOLDER) {
            return Err(anyhow!(
                "User prompt template must contain the {} placeholder",
                REPORT_PLACEHOLDER
            ));
        }

        let filename = self.document.filename.trim();
        if filename.is_empty() || !filename.to_lowercase().ends_with(".docx") {
            return Err(anyhow!("Document filename must end in .docx: '{}'", filename));
        }

        Ok(())
    }
}

impl CompletionConfig {
    /// Get the active provider configuration from the available_providers array
    pub fn get_active_provider_config(&self) -> Option<&ProviderConfig> {
        self.get_provider_config(&self.provider)
    }

    /// Get a specific provider configuration by type
    pub fn get_provider_config(&self, provider_type: &CompletionProvider) -> Option<&ProviderConfig> {
        let provider_str = provider_type.to_lowercase_string();
        self.available_providers.iter()
            .find(|p| p.provider_type == provider_str)
    }

    /// Get the model for the active provider
    pub fn get_model(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.model.is_empty() {
                return provider_config.model.clone();
            }
        }

        default_model(&self.provider)
    }

    /// Get the API key for the active provider
    pub fn get_api_key(&self) -> String {
        self.get_active_provider_config()
            .map(|p| p.api_key.clone())
            .unwrap_or_default()
    }

    /// Get the endpoint for the active provider
    pub fn get_endpoint(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.endpoint.is_empty() {
                return provider_config.endpoint.clone();
            }
        }

        default_endpoint(&self.provider)
    }

    /// Get the completion timeout for the active provider
    pub fn get_timeout_secs(&self) -> u64 {
        self.get_active_provider_config()
            .map(|p| p.timeout_secs)
            .unwrap_or_else(default_timeout_secs)
    }

    /// Override the model of the active provider, adding its entry if missing
    pub fn set_active_model(&mut self, model: &str) {
        let provider_str = self.provider.to_lowercase_string();
        match self.available_providers.iter_mut().find(|p| p.provider_type == provider_str) {
            Some(provider_config) => provider_config.model = model.to_string(),
            None => {
                let mut provider_config = ProviderConfig::new(self.provider.clone());
                provider_config.model = model.to_string();
                self.available_providers.push(provider_config);
            }
        }
    }

    /// Prompt pair rendered for every report
    pub fn briefing_prompt(&self) -> BriefingPrompt {
        BriefingPrompt::new(&self.system_prompt, &self.user_prompt_template)
    }
}
