/*!
 * Tests for anchor-based code region isolation
 */

use marktwai::markdown::code_regions::{CodeRegionIsolator, RegionKind};

#[test]
fn test_extract_withMixedRegions_shouldUseOneCounter() {
    let raw = "Use `a` first.\n\n```sh\nrun it\n```\n\nThen `b`.\n";
    let (clean, regions) = CodeRegionIsolator::extract(raw);

    assert_eq!(regions.len(), 3);
    // Fenced blocks are lifted first, then inline spans, one shared counter
    assert!(clean.contains("<<CODE_0>>"));
    assert!(clean.contains("<<CODE_1>>"));
    assert!(clean.contains("<<CODE_2>>"));
    assert_eq!(regions[0].kind, RegionKind::Fenced);
    assert_eq!(regions[1].kind, RegionKind::Inline);
    assert_eq!(regions[2].kind, RegionKind::Inline);
}

#[test]
fn test_extract_thenRestore_shouldRoundTrip() {
    let raw = "# Doc\n\nInline `x = 1` here.\n\n~~~python\nprint(\"hi\")\n~~~\n\nDone.\n";
    let (clean, regions) = CodeRegionIsolator::extract(raw);

    assert!(!clean.contains("print"));
    assert_eq!(CodeRegionIsolator::restore(&clean, &regions).unwrap(), raw);
}

#[test]
fn test_restore_withReorderedAnchors_shouldStillRestore() {
    // Translation may legitimately move an anchor within a sentence
    let raw = "First `one` then `two`.\n";
    let (_, regions) = CodeRegionIsolator::extract(raw);

    let translated = "Puis <<CODE_1>> avant <<CODE_0>>.\n";
    let restored = CodeRegionIsolator::restore(translated, &regions).unwrap();

    assert_eq!(restored, "Puis `two` avant `one`.\n");
}

#[test]
fn test_restore_withDroppedAnchor_shouldFail() {
    let raw = "Keep `this` and `that`.\n";
    let (_, regions) = CodeRegionIsolator::extract(raw);

    let translated = "Garde <<CODE_0>>.\n";
    let failure = CodeRegionIsolator::restore(translated, &regions).unwrap_err();

    assert!(failure.to_string().contains("missing"));
}

#[test]
fn test_restore_withDuplicatedAnchor_shouldFail() {
    let raw = "Only `one` region.\n";
    let (_, regions) = CodeRegionIsolator::extract(raw);

    let translated = "<<CODE_0>> et <<CODE_0>>.\n";
    assert!(CodeRegionIsolator::restore(translated, &regions).is_err());
}

#[test]
fn test_restore_withMutatedAnchor_shouldFail() {
    let raw = "Only `one` region.\n";
    let (_, regions) = CodeRegionIsolator::extract(raw);

    // Lowercased token counts as a mutation, not a disappearance
    let translated = "<<code_0>> reste.\n";
    assert!(CodeRegionIsolator::restore(translated, &regions).is_err());
}

#[test]
fn test_extract_withUnterminatedFence_shouldProtectRest() {
    let raw = "intro\n```\ncode to the end";
    let (clean, regions) = CodeRegionIsolator::extract(raw);

    assert_eq!(regions.len(), 1);
    assert!(!clean.contains("code to the end"));
}

#[test]
fn test_extract_withIndentedFence_shouldStillMatch() {
    let raw = "   ```\n   indented\n   ```\n";
    let (clean, regions) = CodeRegionIsolator::extract(raw);

    assert_eq!(regions.len(), 1);
    assert_eq!(CodeRegionIsolator::restore(&clean, &regions).unwrap(), raw);
}

#[test]
fn test_anchor_shouldFormatToken() {
    assert_eq!(CodeRegionIsolator::anchor(7), "<<CODE_7>>");
}
