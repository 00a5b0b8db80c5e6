/*!
 * Error types for the marktwai application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

/// Errors that can occur when working with provider APIs
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

/// Errors that can occur during translation of a single chunk
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Error from the provider API
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// The provider returned an empty response
    #[error("Provider returned an empty translation")]
    EmptyResponse,

    /// A chunk failed on both the primary and the fallback model
    #[error("Chunk {index} failed after fallback attempt: {reason}")]
    ChunkFailed {
        /// Ordinal index of the failed chunk
        index: usize,
        /// Description of the last failure
        reason: String
    },
}

/// Fatal per-document pipeline errors
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Anchor tokens were lost, duplicated or mutated during translation.
    /// This is a hard stop: silently accepting it would splice translated
    /// text into code regions or vice versa.
    #[error("Code block restoration failed for '{document}': {reason}")]
    CodeBlockRestoration {
        /// Document identifier (path or name)
        document: String,
        /// What went wrong with the anchors
        reason: String,
    },

    /// The translated document failed structural validation
    #[error("Structure validation failed for '{document}': {source_count} headers in source, {translated_count} in translation")]
    StructureValidation {
        /// Document identifier
        document: String,
        /// Header count in the clean source text
        source_count: usize,
        /// Header count in the translated text
        translated_count: usize,
    },

    /// The translated document failed reference-link validation
    #[error("Link validation failed for '{document}': {reason}")]
    LinkValidation {
        /// Document identifier
        document: String,
        /// Summary of the link issues
        reason: String,
    },
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from translation
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// Fatal per-document pipeline error
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
