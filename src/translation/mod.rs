/*!
 * Translation service for Markdown document translation using AI providers.
 *
 * This module contains the core functionality for translating document
 * chunks using various AI providers. It is split into several submodules:
 *
 * - `core`: Core translation functionality and service definition
 * - `cache`: Caching mechanisms for chunk translations
 * - `scheduler`: Globally bounded concurrent chunk scheduling
 * - `pipeline`: Per-document isolate/split/translate/validate pipeline
 */

use async_trait::async_trait;

use crate::errors::TranslationError;

// Re-export main types for easier usage
pub use self::cache::TranslationCache;
pub use self::core::TranslationService;
pub use self::pipeline::{BatchSummary, DocumentJob, DocumentPipeline, DocumentResult};
pub use self::scheduler::{Scheduler, TranslationOutcome};

// Submodules
pub mod cache;
pub mod core;
pub mod pipeline;
pub mod scheduler;

/// A translator that handles one chunk of Markdown text at a time.
///
/// The scheduler drives this trait; the production implementation is
/// [`TranslationService`], and tests substitute their own. `use_fallback`
/// selects the fallback model after a first failure on the same chunk.
#[async_trait]
pub trait ChunkTranslator: Send + Sync {
    /// Translate a single chunk of text
    async fn translate_chunk(
        &self,
        text: &str,
        use_fallback: bool,
    ) -> Result<String, TranslationError>;
}
