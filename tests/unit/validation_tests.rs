/*!
 * Tests for output validation of translated documents
 */

use marktwai::validation::links::LinkValidator;
use marktwai::validation::service::{ValidationConfig, ValidationService};
use marktwai::validation::structure::StructureValidator;

#[test]
fn test_validateDocument_withFaithfulTranslation_shouldPass() {
    let service = ValidationService::new();
    let source = "# Guide\n\n- step one\n- step two\n\nSee [the site][home].\n\n[home]: https://example.com\n";
    let translated =
        "# Guía\n\n- paso uno\n- paso dos\n\nVea [el sitio][home].\n\n[home]: https://example.com\n";

    let report = service.validate_document(source, translated);

    assert!(report.passed(), "issues: {:?}", report.issues);
    assert_eq!(report.source_headers, report.translated_headers);
}

#[test]
fn test_validateDocument_withExtraHeader_shouldFail() {
    let service = ValidationService::new();
    let source = "# Only\n\ntext\n";
    let translated = "# Only\n\n# Invented\n\ntexte\n";

    let report = service.validate_document(source, translated);

    assert!(!report.passed());
    assert!(!report.structure_ok);
    assert_eq!(report.translated_headers, 2);
}

#[test]
fn test_validateDocument_withRenamedLabel_shouldFailLinksOnly() {
    let service = ValidationService::new();
    let source = "# T\n\nSee [x][api].\n\n[api]: https://example.com/api\n";
    let translated = "# T\n\nVoir [x][apí].\n\n[api]: https://example.com/api\n";

    let report = service.validate_document(source, translated);

    assert!(report.structure_ok);
    assert!(!report.links_ok);
    assert!(!report.passed());
}

#[test]
fn test_validateDocument_withStructureCheckOff_shouldSkipGate() {
    let config = ValidationConfig {
        structure_validation: false,
        ..Default::default()
    };
    let service = ValidationService::with_config(config);

    // Header loss would fail the default gate
    let report = service.validate_document("# A\n", "A\n");

    assert!(report.passed());
}

#[test]
fn test_validateDocument_withListDrift_shouldCollectWarnings() {
    let service = ValidationService::new();
    let source = "# T\n\n- a\n- b\n- c\n";
    let translated = "# T\n\n- a merged with b\n- c\n";

    let report = service.validate_document(source, translated);

    assert!(report.passed());
    assert!(report
        .warnings
        .iter()
        .any(|w| w.contains("List item count changed")));
}

#[test]
fn test_countElements_shouldNotSeeRestoredCode() {
    // After anchors are restored, code content must stay invisible to the
    // validator or every document with headers in code would be rejected
    let text = "# Real\n\n```md\n# inside a fence\n- fake item\n```\n\nUse `# not a header` inline.\n";
    let counts = StructureValidator::count_elements(text);

    assert_eq!(counts.headers, 1);
    assert_eq!(counts.list_items, 0);
}

#[test]
fn test_linkExtract_shouldSkipHtmlComments() {
    let text = "<!-- marktwai:translate -->\nreal [x][y]\n\n[y]: https://example.com\n";
    let inventory = LinkValidator::extract(text);

    assert_eq!(inventory.references.len(), 1);
    assert_eq!(
        inventory.definitions.get("y").map(String::as_str),
        Some("https://example.com")
    );
}

#[test]
fn test_validate_withReferenceTurnedInline_shouldFail() {
    let source = "Read [more][details].\n\n[details]: https://example.com/d\n";
    let translated = "Lire [plus](https://example.com/d).\n";

    let result = LinkValidator::validate(source, translated);

    assert!(!result.passed);
}
