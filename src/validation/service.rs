/*!
 * Validation service that orchestrates all output validators.
 *
 * A document is accepted only when both the structure and the link
 * validator pass; otherwise it is discarded and reported as failed, with
 * the accumulated issues kept for diagnostics.
 */

use log::debug;
use serde::{Deserialize, Serialize};

use super::links::LinkValidator;
use super::structure::StructureValidator;

/// Configuration for the validation service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Whether validation is enabled
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Whether to run the structure (header count) validator
    #[serde(default = "default_true")]
    pub structure_validation: bool,

    /// Whether to run the reference-link validator
    #[serde(default = "default_true")]
    pub link_validation: bool,
}

fn default_true() -> bool {
    true
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            structure_validation: true,
            link_validation: true,
        }
    }
}

/// Complete validation report for one document
#[derive(Debug, Clone)]
pub struct ValidationReport {
    /// Whether the structure validator passed
    pub structure_ok: bool,
    /// Whether the link validator passed
    pub links_ok: bool,
    /// Header count in the source text
    pub source_headers: usize,
    /// Header count in the translated text
    pub translated_headers: usize,
    /// Hard failures from all validators
    pub issues: Vec<String>,
    /// Soft problems from all validators
    pub warnings: Vec<String>,
}

impl ValidationReport {
    /// The acceptance gate: both validators must pass
    pub fn passed(&self) -> bool {
        self.structure_ok && self.links_ok
    }

    /// Report for a document validated with checks disabled
    pub fn all_clear() -> Self {
        Self {
            structure_ok: true,
            links_ok: true,
            source_headers: 0,
            translated_headers: 0,
            issues: vec![],
            warnings: vec![],
        }
    }

    /// One-line summary for logging
    pub fn summary(&self) -> String {
        format!(
            "structure: {}, links: {}, {} issues, {} warnings",
            if self.structure_ok { "ok" } else { "FAILED" },
            if self.links_ok { "ok" } else { "FAILED" },
            self.issues.len(),
            self.warnings.len()
        )
    }
}

/// Validation service for translated documents
pub struct ValidationService {
    config: ValidationConfig,
}

impl ValidationService {
    /// Create a new validation service with default configuration
    pub fn new() -> Self {
        Self::with_config(ValidationConfig::default())
    }

    /// Create a new validation service with custom configuration
    pub fn with_config(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Check if validation is enabled
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Validate a translated document against its source
    pub fn validate_document(&self, source: &str, translated: &str) -> ValidationReport {
        if !self.config.enabled {
            return ValidationReport::all_clear();
        }

        let mut report = ValidationReport::all_clear();

        if self.config.structure_validation {
            let structure = StructureValidator::validate(source, translated);
            report.structure_ok = structure.passed;
            report.source_headers = structure.source.headers;
            report.translated_headers = structure.translated.headers;
            report.issues.extend(structure.issues);
            report.warnings.extend(structure.warnings);
        }

        if self.config.link_validation {
            let links = LinkValidator::validate(source, translated);
            report.links_ok = links.passed;
            report.issues.extend(links.issues);
            report.warnings.extend(links.warnings);
        }

        debug!("Validation complete: {}", report.summary());

        report
    }
}

impl Default for ValidationService {
    fn default() -> Self {
        Self::new()
    }
}
