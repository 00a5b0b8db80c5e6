use std::time::Duration;

use async_trait::async_trait;
use log::error;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::errors::ProviderError;
use crate::providers::Provider;

/// Ollama client for interacting with the Ollama API
#[derive(Debug)]
pub struct Ollama {
    /// Base URL of the Ollama API
    base_url: String,
    /// HTTP client for making requests
    client: Client,
    /// Maximum number of retry attempts
    max_retries: u32,
    /// Base backoff time in milliseconds for exponential backoff
    backoff_base_ms: u64,
}

/// Generate request for the Ollama API
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Model name to use for generation
    model: String,
    /// Prompt to generate from
    prompt: String,
    /// System message to guide the model
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    /// Additional model parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<GenerationOptions>,
    /// Whether to stream the response
    #[serde(skip_serializing_if = "Option::is_none")]
    stream: Option<bool>,
}

/// Generation options for the Ollama API
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Temperature for generation (default: 0.8)
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    /// Top-p sampling (default: 0.9)
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    /// Maximum number of tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

/// Generation response from the Ollama API
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerationResponse {
    /// Model name
    pub model: String,
    /// Creation timestamp
    #[serde(default)]
    pub created_at: String,
    /// Generated text
    pub response: String,
    /// Whether the generation is complete
    pub done: bool,
    /// Number of prompt tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_eval_count: Option<u64>,
    /// Number of generated tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eval_count: Option<u64>,
}

/// Builder methods for GenerationRequest - API surface for library consumers
#[allow(dead_code)]
impl GenerationRequest {
    /// Create a new generation request
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            system: None,
            options: None,
            stream: Some(false),
        }
    }

    /// Set the system prompt
    pub fn system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Set the temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        if let Some(options) = &mut self.options {
            options.temperature = Some(temperature);
        } else {
            self.options = Some(GenerationOptions {
                temperature: Some(temperature),
                top_p: None,
                num_predict: None,
            });
        }
        self
    }

    /// Disable streaming for this request
    pub fn no_stream(mut self) -> Self {
        self.stream = Some(false);
        self
    }
}

impl Ollama {
    /// Create a new Ollama client from a complete URL
    pub fn from_url(url: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            base_url: url.into().trim_end_matches('/').to_string(),
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .http1_only()
                .pool_idle_timeout(Duration::from_secs(90))
                .pool_max_idle_per_host(20)
                .tcp_keepalive(Duration::from_secs(60))
                .build()
                .unwrap_or_default(),
            max_retries: 3,
            backoff_base_ms: 1000,
        }
    }

    /// Generate text from the Ollama API with retry logic
    ///
    /// Server errors and network errors are retried with exponential
    /// backoff; client errors fail immediately.
    pub async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<GenerationResponse, ProviderError> {
        let url = format!("{}/api/generate", self.base_url);

        let mut attempt = 0;
        let mut last_error = None;

        while attempt <= self.max_retries {
            match self.client.post(&url).json(&request).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        let response_text = response.text().await.map_err(|e| {
                            ProviderError::ParseError(format!(
                                "Failed to get response text from Ollama API: {}",
                                e
                            ))
                        })?;

                        match serde_json::from_str::<GenerationResponse>(&response_text) {
                            Ok(generated) => return Ok(generated),
                            Err(e) => {
                                // The response may be JSONL from a streaming
                                // endpoint; stitch the pieces back together
                                if let Some(stitched) = Self::parse_streamed(&response_text) {
                                    return Ok(stitched);
                                }
                                error!(
                                    "Failed to parse Ollama API response: {}. Raw response (first 500 chars): {}",
                                    e,
                                    response_text.chars().take(500).collect::<String>()
                                );
                                last_error = Some(ProviderError::ParseError(format!(
                                    "Failed to parse Ollama API response: {}",
                                    e
                                )));
                            }
                        }
                    } else if status.is_server_error() {
                        let error_text = response
                            .text()
                            .await
                            .unwrap_or_else(|_| "Failed to get error response text".to_string());
                        error!(
                            "Ollama API error ({}): {} - attempt {}/{}",
                            status,
                            error_text,
                            attempt + 1,
                            self.max_retries + 1
                        );
                        last_error = Some(ProviderError::ApiError {
                            status_code: status.as_u16(),
                            message: error_text,
                        });
                    } else {
                        let error_text = response
                            .text()
                            .await
                            .unwrap_or_else(|_| "Failed to get error response text".to_string());
                        error!("Ollama API error ({}): {}", status, error_text);
                        return Err(ProviderError::ApiError {
                            status_code: status.as_u16(),
                            message: error_text,
                        });
                    }
                }
                Err(e) => {
                    error!(
                        "Ollama API network error: {} - attempt {}/{}",
                        e,
                        attempt + 1,
                        self.max_retries + 1
                    );
                    last_error = Some(ProviderError::ConnectionError(e.to_string()));
                }
            }

            attempt += 1;
            if attempt <= self.max_retries {
                let backoff_ms = self.backoff_base_ms * (1u64 << (attempt - 1));
                tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
            }
        }

        Err(last_error.unwrap_or_else(|| {
            ProviderError::RequestFailed(format!(
                "Ollama API request failed after {} attempts",
                self.max_retries + 1
            ))
        }))
    }

    /// Reassemble a JSONL streaming response into a single response
    fn parse_streamed(response_text: &str) -> Option<GenerationResponse> {
        let lines: Vec<&str> = response_text.lines().filter(|l| !l.is_empty()).collect();
        let last = serde_json::from_str::<serde_json::Value>(lines.last()?).ok()?;

        let mut full_response = String::new();
        for line in &lines {
            if let Ok(obj) = serde_json::from_str::<serde_json::Value>(line) {
                if let Some(part) = obj.get("response").and_then(|v| v.as_str()) {
                    full_response.push_str(part);
                }
            }
        }

        Some(GenerationResponse {
            model: last
                .get("model")
                .and_then(|v| v.as_str())
                .unwrap_or("unknown")
                .to_string(),
            created_at: last
                .get("created_at")
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string(),
            response: full_response,
            done: true,
            prompt_eval_count: last.get("prompt_eval_count").and_then(|v| v.as_u64()),
            eval_count: last.get("eval_count").and_then(|v| v.as_u64()),
        })
    }

    /// Get the Ollama API version
    pub async fn version(&self) -> Result<String, ProviderError> {
        let url = format!("{}/api/version", self.base_url);
        let response: serde_json::Value = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ProviderError::ConnectionError(format!("Failed to connect to Ollama: {}", e)))?
            .json()
            .await
            .map_err(|e| {
                ProviderError::ParseError(format!("Failed to parse Ollama version response: {}", e))
            })?;

        response["version"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| {
                ProviderError::ParseError("Invalid version format in response".to_string())
            })
    }
}

#[async_trait]
impl Provider for Ollama {
    type Request = GenerationRequest;
    type Response = GenerationResponse;

    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError> {
        self.generate(request).await
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        self.version().await.map(|_| ())
    }

    fn extract_text(response: &Self::Response) -> String {
        response.response.clone()
    }
}
