/*!
 * Common test utilities for the marktwai test suite
 */

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// Re-export the mock translators module
pub mod mock_translators;

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// A small Markdown document with all the structure the pipeline cares
/// about: headers, a fenced block, inline code and a reference link
pub fn sample_document() -> String {
    "<!-- marktwai:translate -->\n\
     # Installation\n\n\
     Run `cargo install` to get started, see [the guide][guide].\n\n\
     ```rust\n\
     fn main() {\n    println!(\"hello\");\n}\n\
     ```\n\n\
     ## Configuration\n\n\
     Edit the file shown above.\n\n\
     [guide]: https://example.com/guide\n"
        .to_string()
}
