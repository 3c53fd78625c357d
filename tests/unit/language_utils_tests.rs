/*!
 * Tests for language utility functions
 */

use isolang::Language;
use vidsum::language_utils::{
    get_language_name, normalize_to_part2t, resolve_language, stemmer_algorithm, stop_words,
};

#[test]
fn test_normalizeToPart2t_withVariousCodes_shouldNormalize() {
    assert_eq!(normalize_to_part2t("en").unwrap(), "eng");
    assert_eq!(normalize_to_part2t("FR").unwrap(), "fra");
    assert_eq!(normalize_to_part2t("fre").unwrap(), "fra");
    assert_eq!(normalize_to_part2t("ger").unwrap(), "deu");
    assert!(normalize_to_part2t("xx").is_err());
    assert!(normalize_to_part2t("english").is_err());
}

#[test]
fn test_resolveLanguage_withNamesAndCodes_shouldResolve() {
    assert_eq!(resolve_language("es").unwrap(), Language::Spa);
    assert_eq!(resolve_language("Swedish").unwrap(), Language::Swe);
    assert!(resolve_language("Elvish").is_err());
}

#[test]
fn test_getLanguageName_withCode_shouldReturnEnglishName() {
    assert_eq!(get_language_name("de").unwrap(), "German");
}

#[test]
fn test_stemmerAlgorithm_withSupportedAndUnsupported_shouldDiffer() {
    assert!(stemmer_algorithm(Language::Eng).is_some());
    assert!(stemmer_algorithm(Language::Jpn).is_none());
}

#[test]
fn test_stopWords_withEnglish_shouldContainCommonWords() {
    let english = stop_words(Language::Eng);
    assert!(english.contains("the"));
    assert!(english.contains("and"));
    assert!(stop_words(Language::Fra).is_empty());
}
