/*!
 * Validation of translated Markdown output.
 *
 * A translated document is only accepted when both validators pass:
 *
 * - `structure`: header counts must match between source and translation
 * - `links`: reference-style links must still resolve to definitions
 * - `service`: orchestrates both and produces the accept/reject report
 */

pub mod links;
pub mod structure;
pub mod service;

// Re-export main types
pub use links::{LinkValidationResult, LinkValidator};
pub use service::{ValidationConfig, ValidationReport, ValidationService};
pub use structure::{StructureValidationResult, StructureValidator};

use once_cell::sync::Lazy;
use regex::Regex;

/// Regex stripping HTML comments (including multi-line ones)
static HTML_COMMENT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)<!--.*?-->").expect("Invalid comment regex")
});

/// Regex stripping inline code spans (single or double backtick delimited)
static INLINE_CODE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new("``[^`]*``|`[^`\n]*`").expect("Invalid inline code regex")
});

/// Blank out fenced code blocks and HTML comments so element counting and
/// link extraction never trip over code samples or commented-out text.
/// Line structure is preserved so counts stay line-accurate.
pub(crate) fn mask_protected_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut fence: Option<(u8, usize)> = None;

    for line in text.split_inclusive('\n') {
        let content = line.trim_end_matches(['\n', '\r']);
        let trimmed = content.trim_start_matches(' ');
        let indent = content.len() - trimmed.len();

        match fence {
            None => {
                let first = trimmed.as_bytes().first().copied();
                if indent <= 3 && matches!(first, Some(b'`') | Some(b'~')) {
                    let ch = first.unwrap_or(b'`');
                    let run = trimmed.bytes().take_while(|&b| b == ch).count();
                    if run >= 3 {
                        fence = Some((ch, run));
                        out.push('\n');
                        continue;
                    }
                }
                out.push_str(line);
            }
            Some((ch, len)) => {
                let run = trimmed.bytes().take_while(|&b| b == ch).count();
                if indent <= 3 && run >= len && trimmed[run..].trim().is_empty() {
                    fence = None;
                }
                out.push('\n');
            }
        }
    }

    let out = HTML_COMMENT_REGEX.replace_all(&out, "");
    INLINE_CODE_REGEX.replace_all(&out, "").into_owned()
}
