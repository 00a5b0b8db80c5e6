/*!
 * # marktwai - Markdown Translation with AI
 *
 * A Rust library for structure-preserving translation of Markdown
 * documentation using AI.
 *
 * ## Features
 *
 * - Protect fenced blocks and inline code behind anchor tokens so code is
 *   never translated
 * - Split documents into byte-budgeted chunks along headers, paragraphs
 *   and lines
 * - Translate chunks concurrently under one global in-flight budget, with
 *   automatic fallback to a second model
 * - Validate translated output (header counts, reference links) before
 *   accepting it
 * - Batch processing of whole documentation trees
 * - ISO 639-1 and ISO 639-2 language code support
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `markdown`: Code region isolation and document splitting:
 *   - `markdown::code_regions`: Anchor-based code protection
 *   - `markdown::splitter`: Structure-aware byte-budgeted splitting
 * - `translation`: AI-powered translation services:
 *   - `translation::core`: Core translation functionality
 *   - `translation::scheduler`: Globally bounded chunk scheduling
 *   - `translation::pipeline`: Per-document translation pipeline
 *   - `translation::cache`: Caching mechanisms for translations
 * - `validation`: Structure and link validation of translated output
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `language_utils`: ISO language code utilities
 * - `providers`: Client implementations for various LLM providers:
 *   - `providers::ollama`: Ollama API client
 *   - `providers::anthropic`: Anthropic API client
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod file_utils;
pub mod language_utils;
pub mod markdown;
pub mod providers;
pub mod translation;
pub mod validation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use errors::{AppError, PipelineError, ProviderError, TranslationError};
pub use language_utils::{get_language_name, language_codes_match, normalize_to_part2t};
pub use markdown::{CodeRegionIsolator, MarkdownSplitter};
pub use translation::{ChunkTranslator, DocumentPipeline, Scheduler, TranslationService};
pub use validation::ValidationService;
