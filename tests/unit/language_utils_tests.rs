/*!
 * Tests for ISO language code handling
 */

use marktwai::language_utils::{
    get_language_name, language_codes_match, normalize_to_part2t, validate_language_code,
    LanguageCodeType,
};

#[test]
fn test_validateLanguageCode_shouldTrimAndLowercase() {
    assert!(matches!(
        validate_language_code(" EN "),
        Ok(LanguageCodeType::Part1)
    ));
    assert!(matches!(
        validate_language_code("SPA"),
        Ok(LanguageCodeType::Part2T)
    ));
}

#[test]
fn test_validateLanguageCode_withBadInput_shouldFail() {
    assert!(validate_language_code("").is_err());
    assert!(validate_language_code("english").is_err());
    assert!(validate_language_code("q1").is_err());
}

#[test]
fn test_normalizeToPart2t_shouldMapBibliographicCodes() {
    assert_eq!(normalize_to_part2t("ger").unwrap(), "deu");
    assert_eq!(normalize_to_part2t("chi").unwrap(), "zho");
    assert_eq!(normalize_to_part2t("dut").unwrap(), "nld");
}

#[test]
fn test_normalizeToPart2t_shouldExpandTwoLetterCodes() {
    assert_eq!(normalize_to_part2t("es").unwrap(), "spa");
    assert_eq!(normalize_to_part2t("ja").unwrap(), "jpn");
}

#[test]
fn test_languageCodesMatch_shouldCompareNormalizedForms() {
    assert!(language_codes_match("de", "ger"));
    assert!(language_codes_match("zh", "chi"));
    assert!(!language_codes_match("es", "pt"));
}

#[test]
fn test_getLanguageName_shouldResolveAllFormats() {
    assert_eq!(get_language_name("es").unwrap(), "Spanish");
    assert_eq!(get_language_name("deu").unwrap(), "German");
    assert_eq!(get_language_name("fre").unwrap(), "French");
    assert!(get_language_name("zz").is_err());
}
