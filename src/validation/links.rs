/*!
 * Reference-link validation for translated Markdown.
 *
 * Reference-style links (`[text][label]`, shortcut `[text][]`) resolve
 * through `[label]: url` definitions elsewhere in the document. A
 * translation that renames a label without renaming its definition, or
 * that drops a definition's URL, silently breaks navigation. Labels are
 * normalized before comparison so translator line-wrapping inside a label
 * is not mistaken for a broken reference.
 */

use std::collections::HashMap;

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use super::mask_protected_text;

/// Reference-style link: [text][label] or [text][]
static REFERENCE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[([^\[\]]*)\]\[([^\[\]]*)\]").expect("Invalid reference regex")
});

/// Link definition line: [label]: url
static DEFINITION_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ \t]{0,3}\[([^\[\]]+)\]:[ \t]*(\S*)").expect("Invalid definition regex")
});

/// Inline link: [text](url)
static INLINE_LINK_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[([^\[\]]*)\]\(([^()]*)\)").expect("Invalid inline link regex")
});

/// Links and definitions extracted from one text
#[derive(Debug, Clone, Default)]
pub struct LinkInventory {
    /// Normalized labels of reference-style links, in order of appearance
    pub references: Vec<String>,
    /// Normalized label -> URL for definitions
    pub definitions: HashMap<String, String>,
    /// Count of inline `[text](url)` links
    pub inline_links: usize,
}

/// Result of link validation
#[derive(Debug, Clone)]
pub struct LinkValidationResult {
    /// Whether no hard failures were found
    pub passed: bool,
    /// Hard failures (broken references, lost URLs)
    pub issues: Vec<String>,
    /// Soft problems (unused leftover definitions)
    pub warnings: Vec<String>,
}

/// Validates reference-link consistency between source and translation
pub struct LinkValidator;

impl LinkValidator {
    /// Case-insensitive label with whitespace runs collapsed to one space
    pub fn normalize_label(raw: &str) -> String {
        raw.to_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Extract references, definitions and inline links from a text,
    /// ignoring fenced code and HTML comments
    pub fn extract(text: &str) -> LinkInventory {
        let masked = mask_protected_text(text);
        let mut inventory = LinkInventory::default();

        for caps in DEFINITION_REGEX.captures_iter(&masked) {
            let label = Self::normalize_label(&caps[1]);
            let url = caps[2].to_string();
            inventory.definitions.insert(label, url);
        }

        for caps in REFERENCE_REGEX.captures_iter(&masked) {
            let text_part = &caps[1];
            let label_part = &caps[2];
            // Shortcut form [text][] uses the text as the label
            let label = if label_part.trim().is_empty() {
                Self::normalize_label(text_part)
            } else {
                Self::normalize_label(label_part)
            };
            if !label.is_empty() {
                inventory.references.push(label);
            }
        }

        inventory.inline_links = INLINE_LINK_REGEX.find_iter(&masked).count();

        inventory
    }

    /// Compare source and translated texts
    pub fn validate(source: &str, translated: &str) -> LinkValidationResult {
        let src = Self::extract(source);
        let dst = Self::extract(translated);

        let mut issues = Vec::new();
        let mut warnings = Vec::new();

        // Every reference in the translation must resolve
        for label in &dst.references {
            if !dst.definitions.contains_key(label) {
                issues.push(format!("Broken reference: [{}] has no definition", label));
            }
        }

        // A definition whose URL vanished lost its target
        for (label, url) in &dst.definitions {
            if url.is_empty() {
                let had_url = src
                    .definitions
                    .get(label)
                    .map(|u| !u.is_empty())
                    .unwrap_or(true);
                if had_url {
                    issues.push(format!("Lost URL: definition [{}] is empty", label));
                }
            }
        }

        // All references converted to inline links (or dropped) means the
        // reference structure of the document did not survive
        if !src.references.is_empty() && dst.references.is_empty() {
            issues.push(format!(
                "All {} reference-style links were lost in translation",
                src.references.len()
            ));
        }

        // Leftover definitions nothing points at any more
        for label in dst.definitions.keys() {
            if !dst.references.contains(label) {
                warnings.push(format!("Unused definition: [{}]", label));
            }
        }

        debug!(
            "Link validation: {} refs / {} defs in source, {} refs / {} defs in translation, {} issues",
            src.references.len(),
            src.definitions.len(),
            dst.references.len(),
            dst.definitions.len(),
            issues.len()
        );

        LinkValidationResult {
            passed: issues.is_empty(),
            issues,
            warnings,
        }
    }
}
