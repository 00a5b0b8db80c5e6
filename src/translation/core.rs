/*!
 * Core translation service implementation.
 *
 * This module contains the main TranslationService struct and its
 * implementation, which is responsible for translating chunks of Markdown
 * text using various AI providers.
 */

use async_trait::async_trait;
use log::{debug, info};

use crate::app_config::{Config, TranslationConfig, TranslationProvider as ConfigTranslationProvider};
use crate::errors::{ProviderError, TranslationError};
use crate::language_utils;
use crate::providers::anthropic::{Anthropic, AnthropicRequest};
use crate::providers::ollama::{GenerationRequest, Ollama};
use crate::providers::Provider;
use crate::translation::cache::TranslationCache;
use crate::translation::ChunkTranslator;

/// Maximum tokens requested from providers that require an explicit cap
const MAX_COMPLETION_TOKENS: u32 = 8192;

/// Translation provider implementation variants
enum TranslationProviderImpl {
    /// Ollama LLM service
    Ollama {
        /// Client instance
        client: Ollama,
    },

    /// Anthropic API service
    Anthropic {
        /// Client instance
        client: Anthropic,
    },
}

/// Main translation service for Markdown chunk translation
pub struct TranslationService {
    /// Provider implementation
    provider: TranslationProviderImpl,

    /// Configuration for the translation service
    pub config: TranslationConfig,

    /// Source language code
    source_language: String,

    /// Target language code
    target_language: String,

    /// Translation cache shared across all documents of a run
    pub cache: TranslationCache,
}

impl TranslationService {
    /// Create a new translation service from the application configuration
    pub fn new(config: &Config) -> Self {
        let translation = config.translation.clone();

        let provider = match translation.provider {
            ConfigTranslationProvider::Ollama => TranslationProviderImpl::Ollama {
                client: Ollama::from_url(
                    &translation.ollama.endpoint,
                    translation.ollama.timeout_secs,
                ),
            },
            ConfigTranslationProvider::Anthropic => TranslationProviderImpl::Anthropic {
                client: Anthropic::new(
                    &translation.anthropic.api_key,
                    &translation.anthropic.endpoint,
                    translation.anthropic.timeout_secs,
                ),
            },
        };

        Self {
            provider,
            cache: TranslationCache::new(translation.common.cache_enabled),
            config: translation,
            source_language: config.source_language.clone(),
            target_language: config.target_language.clone(),
        }
    }

    /// Build the system prompt from the configured template, substituting
    /// full language names for the configured codes
    pub fn build_system_prompt(&self) -> String {
        // Language names read better in prompts than bare codes; fall back
        // to the code when the name cannot be resolved
        let source_name = language_utils::get_language_name(&self.source_language)
            .unwrap_or_else(|_| self.source_language.clone());
        let target_name = language_utils::get_language_name(&self.target_language)
            .unwrap_or_else(|_| self.target_language.clone());

        self.config
            .common
            .system_prompt
            .replace("{source_language}", &source_name)
            .replace("{target_language}", &target_name)
    }

    /// Test the connection to the translation provider
    pub async fn test_connection(&self) -> Result<(), ProviderError> {
        info!(
            "Testing connection to {} with model {}",
            self.config.provider.display_name(),
            self.config.get_model()
        );

        match &self.provider {
            TranslationProviderImpl::Ollama { client } => {
                let version = client.version().await?;
                info!("Successfully connected to Ollama {}", version);
                Ok(())
            }
            TranslationProviderImpl::Anthropic { client } => {
                client.test_connection().await?;
                info!("Successfully connected to Anthropic API");
                Ok(())
            }
        }
    }

    /// Translate a single text with the given model
    pub async fn translate_text(
        &self,
        text: &str,
        model: &str,
    ) -> Result<String, TranslationError> {
        // Whitespace-only chunks pass through untouched
        if text.trim().is_empty() {
            return Ok(text.to_string());
        }

        if let Some(cached) =
            self.cache
                .get(text, &self.source_language, &self.target_language, model)
        {
            return Ok(cached);
        }

        let system_prompt = self.build_system_prompt();

        let translated = match &self.provider {
            TranslationProviderImpl::Ollama { client } => {
                let request = GenerationRequest::new(model, text)
                    .system(&system_prompt)
                    .temperature(self.config.common.temperature)
                    .no_stream();

                let response = client.generate(request).await?;
                Ollama::extract_text(&response)
            }
            TranslationProviderImpl::Anthropic { client } => {
                let request = AnthropicRequest::new(model, MAX_COMPLETION_TOKENS)
                    .system(&system_prompt)
                    .temperature(self.config.common.temperature)
                    .add_message("user", text);

                let response = client.send(request).await?;
                Anthropic::extract_text(&response)
            }
        };

        if translated.trim().is_empty() {
            return Err(TranslationError::EmptyResponse);
        }

        debug!(
            "Translated {} bytes -> {} bytes with {}",
            text.len(),
            translated.len(),
            model
        );

        self.cache.store(
            text,
            &self.source_language,
            &self.target_language,
            model,
            &translated,
        );

        Ok(translated)
    }
}

#[async_trait]
impl ChunkTranslator for TranslationService {
    async fn translate_chunk(
        &self,
        text: &str,
        use_fallback: bool,
    ) -> Result<String, TranslationError> {
        let model = if use_fallback {
            self.config.get_fallback_model()
        } else {
            self.config.get_model()
        };

        self.translate_text(text, &model).await
    }
}
