/*!
 * Structural validation of translated Markdown.
 *
 * The gate is the header count: a translation that gained or lost headers
 * has broken the document outline and is rejected. Drift in list items or
 * block quotes is reported as warnings only, since translators routinely
 * re-wrap list prose without damaging the structure.
 */

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use super::mask_protected_text;

/// ATX header line, any level
static HEADER_LINE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ \t]{0,3}#{1,6}[ \t]").expect("Invalid header line regex")
});

/// Unordered or ordered list item line
static LIST_ITEM_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ \t]*(?:[-*+]|\d+[.)])[ \t]").expect("Invalid list item regex")
});

/// Block quote line
static BLOCK_QUOTE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ \t]{0,3}>").expect("Invalid block quote regex")
});

/// Counts of structural elements in one text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementCounts {
    /// ATX headers of any level
    pub headers: usize,
    /// List item lines
    pub list_items: usize,
    /// Block quote lines
    pub block_quotes: usize,
}

/// Result of structural validation
#[derive(Debug, Clone)]
pub struct StructureValidationResult {
    /// Whether the header-count gate passed
    pub passed: bool,
    /// Element counts in the source text
    pub source: ElementCounts,
    /// Element counts in the translated text
    pub translated: ElementCounts,
    /// Hard failures (header mismatch)
    pub issues: Vec<String>,
    /// Soft drift (lists, quotes)
    pub warnings: Vec<String>,
}

/// Validates that translation preserved the document outline
pub struct StructureValidator;

impl StructureValidator {
    /// Count structural elements, ignoring fenced code and HTML comments
    pub fn count_elements(text: &str) -> ElementCounts {
        let masked = mask_protected_text(text);
        ElementCounts {
            headers: HEADER_LINE_REGEX.find_iter(&masked).count(),
            list_items: LIST_ITEM_REGEX.find_iter(&masked).count(),
            block_quotes: BLOCK_QUOTE_REGEX.find_iter(&masked).count(),
        }
    }

    /// Compare source and translated texts
    pub fn validate(source: &str, translated: &str) -> StructureValidationResult {
        let src = Self::count_elements(source);
        let dst = Self::count_elements(translated);

        let mut issues = Vec::new();
        let mut warnings = Vec::new();

        if src.headers != dst.headers {
            issues.push(format!(
                "Header count changed: {} in source, {} in translation",
                src.headers, dst.headers
            ));
        }

        if src.list_items != dst.list_items {
            warnings.push(format!(
                "List item count changed: {} in source, {} in translation",
                src.list_items, dst.list_items
            ));
        }

        if src.block_quotes != dst.block_quotes {
            warnings.push(format!(
                "Block quote count changed: {} in source, {} in translation",
                src.block_quotes, dst.block_quotes
            ));
        }

        debug!(
            "Structure validation: headers {}/{}, lists {}/{}, quotes {}/{}",
            src.headers, dst.headers, src.list_items, dst.list_items,
            src.block_quotes, dst.block_quotes
        );

        StructureValidationResult {
            passed: issues.is_empty(),
            source: src,
            translated: dst,
            issues,
            warnings,
        }
    }
}
