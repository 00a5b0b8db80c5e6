use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::Path;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Source language code (ISO)
    pub source_language: String,

    /// Target language code (ISO)
    pub target_language: String,

    /// Translation config
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Document splitting config
    #[serde(default)]
    pub splitting: SplitConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Translation provider type
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationProvider {
    // @provider: Ollama
    #[default]
    Ollama,
    // @provider: Anthropic
    Anthropic,
}

impl TranslationProvider {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Ollama => "Ollama",
            Self::Anthropic => "Anthropic",
        }
    }

    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Ollama => "ollama".to_string(),
            Self::Anthropic => "anthropic".to_string(),
        }
    }
}

// Implement Display trait for TranslationProvider
impl std::fmt::Display for TranslationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

// Implement FromStr trait for TranslationProvider
impl std::str::FromStr for TranslationProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "ollama" => Ok(Self::Ollama),
            "anthropic" => Ok(Self::Anthropic),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Ollama service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OllamaConfig {
    /// Model name (e.g., "llama2", "mistral")
    #[serde(default = "default_ollama_model")]
    pub model: String,

    /// Fallback model used after a first-model failure on a chunk
    #[serde(default = "default_ollama_fallback_model")]
    pub fallback_model: String,

    /// Service endpoint URL
    #[serde(default = "default_ollama_endpoint")]
    pub endpoint: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            model: default_ollama_model(),
            fallback_model: default_ollama_fallback_model(),
            endpoint: default_ollama_endpoint(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Anthropic service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AnthropicConfig {
    /// Model name (e.g., "claude-3-haiku-20240307")
    #[serde(default = "default_anthropic_model")]
    pub model: String,

    /// Fallback model used after a first-model failure on a chunk
    #[serde(default = "default_anthropic_fallback_model")]
    pub fallback_model: String,

    /// API key for the service
    #[serde(default = "String::new")]
    pub api_key: String,

    /// Service endpoint URL (optional, for self-hosted)
    #[serde(default = "default_anthropic_endpoint")]
    pub endpoint: String,

    /// Request timeout in seconds
    #[serde(default = "default_anthropic_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            model: default_anthropic_model(),
            fallback_model: default_anthropic_fallback_model(),
            api_key: String::new(),
            endpoint: default_anthropic_endpoint(),
            timeout_secs: default_anthropic_timeout_secs(),
        }
    }
}

/// Translation service configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct TranslationConfig {
    /// Translation provider to use
    #[serde(default)]
    pub provider: TranslationProvider,

    /// Ollama provider settings
    #[serde(default)]
    pub ollama: OllamaConfig,

    /// Anthropic provider settings
    #[serde(default)]
    pub anthropic: AnthropicConfig,

    /// Common translation settings
    #[serde(default)]
    pub common: TranslationCommonConfig,
}

impl TranslationConfig {
    /// Get the primary model name for the active provider
    pub fn get_model(&self) -> String {
        match self.provider {
            TranslationProvider::Ollama => self.ollama.model.clone(),
            TranslationProvider::Anthropic => self.anthropic.model.clone(),
        }
    }

    /// Get the fallback model name for the active provider
    pub fn get_fallback_model(&self) -> String {
        match self.provider {
            TranslationProvider::Ollama => self.ollama.fallback_model.clone(),
            TranslationProvider::Anthropic => self.anthropic.fallback_model.clone(),
        }
    }
}

/// Common translation settings applicable to all providers
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationCommonConfig {
    /// System prompt template for translation
    /// Placeholders: {source_language}, {target_language}
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    /// Temperature parameter for text generation (0.0 to 1.0)
    /// Lower values make output more deterministic, higher values more creative
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Whether to cache chunk translations in memory for the run
    #[serde(default = "default_true")]
    pub cache_enabled: bool,
}

impl Default for TranslationCommonConfig {
    fn default() -> Self {
        Self {
            system_prompt: default_system_prompt(),
            temperature: default_temperature(),
            cache_enabled: true,
        }
    }
}

/// Configuration for document splitting and scheduling
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SplitConfig {
    /// Maximum UTF-8 bytes per chunk sent to the translation service
    #[serde(default = "default_max_bytes_per_chunk")]
    pub max_bytes_per_chunk: usize,

    /// Global budget of chunks in flight across all documents
    #[serde(default = "default_concurrent_chunks")]
    pub concurrent_chunks: usize,

    /// ATX header level used as the primary split boundary
    #[serde(default = "default_header_split_level")]
    pub header_split_level: u8,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            max_bytes_per_chunk: default_max_bytes_per_chunk(),
            concurrent_chunks: default_concurrent_chunks(),
            header_split_level: default_header_split_level(),
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

fn default_ollama_model() -> String {
    "llama3.2".to_string()
}

fn default_ollama_fallback_model() -> String {
    "mistral".to_string()
}

fn default_ollama_endpoint() -> String {
    "http://localhost:11434".to_string()
}

fn default_anthropic_model() -> String {
    "claude-3-haiku-20240307".to_string()
}

fn default_anthropic_fallback_model() -> String {
    "claude-3-5-sonnet-20240620".to_string()
}

fn default_anthropic_endpoint() -> String {
    "https://api.anthropic.com".to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_anthropic_timeout_secs() -> u64 {
    60
}

fn default_temperature() -> f32 {
    0.3
}

fn default_max_bytes_per_chunk() -> usize {
    20_000
}

fn default_concurrent_chunks() -> usize {
    8
}

fn default_header_split_level() -> u8 {
    3
}

fn default_true() -> bool {
    true
}

fn default_system_prompt() -> String {
    "You are a professional translator for technical documentation. \
     Translate the Markdown text from {source_language} to {target_language}. \
     Preserve all Markdown structure exactly: headers keep their level, lists \
     keep their markers, reference links keep their labels and definitions. \
     Tokens of the form <<CODE_N>> are placeholders and must be copied to the \
     output completely unchanged. Reply with the translated text only."
        .to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_language: "en".to_string(),
            target_language: "fr".to_string(),
            translation: TranslationConfig::default(),
            splitting: SplitConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .map_err(|e| anyhow!("Failed to read config file {:?}: {}", path.as_ref(), e))?;
        let config: Config = serde_json::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse config file {:?}: {}", path.as_ref(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, content)
            .map_err(|e| anyhow!("Failed to write config file {:?}: {}", path.as_ref(), e))?;
        Ok(())
    }

    /// Validate the configuration values
    pub fn validate(&self) -> Result<()> {
        if self.source_language.trim().is_empty() {
            return Err(anyhow!("Source language cannot be empty"));
        }

        if self.target_language.trim().is_empty() {
            return Err(anyhow!("Target language cannot be empty"));
        }

        if self.source_language == self.target_language {
            return Err(anyhow!(
                "Source and target languages are identical: {}",
                self.source_language
            ));
        }

        if self.splitting.max_bytes_per_chunk == 0 {
            return Err(anyhow!("max_bytes_per_chunk must be greater than zero"));
        }

        if self.splitting.concurrent_chunks == 0 {
            return Err(anyhow!("concurrent_chunks must be greater than zero"));
        }

        if !(1..=6).contains(&self.splitting.header_split_level) {
            return Err(anyhow!(
                "header_split_level must be between 1 and 6, got {}",
                self.splitting.header_split_level
            ));
        }

        if self.translation.provider == TranslationProvider::Anthropic
            && self.translation.anthropic.api_key.trim().is_empty()
        {
            return Err(anyhow!("Anthropic provider requires an API key"));
        }

        Ok(())
    }
}
