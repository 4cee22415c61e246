/*!
 * Unit tests for language code utilities
 */

use sublingo::language_utils::{codes_match, language_name, to_2_letter, to_3_letter};

#[test]
fn test_to_2_letter_withTwoLetterCode_shouldPassThrough() {
    assert_eq!(to_2_letter("en"), "en");
    assert_eq!(to_2_letter("FR"), "fr");
    assert_eq!(to_2_letter(" es "), "es");
}

#[test]
fn test_to_2_letter_withThreeLetterCode_shouldNarrow() {
    assert_eq!(to_2_letter("eng"), "en");
    assert_eq!(to_2_letter("spa"), "es");
    assert_eq!(to_2_letter("jpn"), "ja");
}

#[test]
fn test_to_2_letter_withBVariantCode_shouldNarrowLikeTVariant() {
    assert_eq!(to_2_letter("fre"), "fr");
    assert_eq!(to_2_letter("fra"), "fr");
    assert_eq!(to_2_letter("ger"), "de");
    assert_eq!(to_2_letter("dut"), "nl");
    assert_eq!(to_2_letter("chi"), "zh");
}

#[test]
fn test_to_2_letter_withUnknownCode_shouldTruncate() {
    // Lossy fallback, documented as approximate
    assert_eq!(to_2_letter("xyz"), "xy");
}

#[test]
fn test_to_3_letter_withThreeLetterCode_shouldPassThrough() {
    assert_eq!(to_3_letter("eng"), "eng");
    assert_eq!(to_3_letter("FRE"), "fre");
}

#[test]
fn test_to_3_letter_withTwoLetterCode_shouldWidenToTVariant() {
    // The T form wins over B aliases when widening
    assert_eq!(to_3_letter("fr"), "fra");
    assert_eq!(to_3_letter("de"), "deu");
    assert_eq!(to_3_letter("en"), "eng");
    assert_eq!(to_3_letter("zh"), "zho");
}

#[test]
fn test_to_3_letter_withUnknownCode_shouldReturnAsIs() {
    assert_eq!(to_3_letter("q!"), "q!");
}

#[test]
fn test_codes_match_withMixedWidths_shouldCompareNormalized() {
    assert!(codes_match("en", "eng"));
    assert!(codes_match("fre", "fra"));
    assert!(codes_match("fr", "fre"));
    assert!(!codes_match("en", "fra"));
}

#[test]
fn test_codes_match_withDifferentCase_shouldMatch() {
    assert!(codes_match("EN", "eng"));
}

#[test]
fn test_language_name_withKnownCodes_shouldReturnEnglishName() {
    assert_eq!(language_name("fr").as_deref(), Some("French"));
    assert_eq!(language_name("spa").as_deref(), Some("Spanish"));
}
