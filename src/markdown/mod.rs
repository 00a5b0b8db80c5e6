/*!
 * Markdown document handling.
 *
 * This module contains the structure-preserving machinery that runs before
 * and after translation:
 *
 * - `code_regions`: protects fenced blocks and inline code spans behind
 *   anchor tokens so the translation service never sees code
 * - `splitter`: splits clean text into byte-budgeted, losslessly
 *   reassemblable chunks along structural boundaries
 */

pub mod code_regions;
pub mod splitter;

// Re-export main types
pub use code_regions::{CodeRegionIsolator, ProtectedRegion, RegionKind, RestoreFailure};
pub use splitter::{Chunk, ChunkKind, MarkdownSplitter};
