use std::collections::HashSet;
use anyhow::{Result, anyhow};
use isolang::Language;
use once_cell::sync::Lazy;
use rust_stemmers::Algorithm;

/// Language utilities for the summarizer
///
/// This module resolves the configured summary language (an ISO 639-1 or
/// ISO 639-2 code, or an English language name such as "english") and maps
/// it to the stemming algorithm and stop-word list used by the scorer.

/// ISO 639-2/B codes that differ from their ISO 639-2/T counterpart
const PART2B_TO_PART2T: &[(&str, &str)] = &[
    ("fre", "fra"),
    ("ger", "deu"),
    ("dut", "nld"),
    ("gre", "ell"),
    ("chi", "zho"),
    ("cze", "ces"),
    ("ice", "isl"),
    ("alb", "sqi"),
    ("arm", "hye"),
    ("baq", "eus"),
    ("bur", "mya"),
    ("per", "fas"),
    ("geo", "kat"),
    ("may", "msa"),
    ("mac", "mkd"),
    ("rum", "ron"),
    ("slo", "slk"),
    ("wel", "cym"),
];

/// Languages with a Snowball stemmer
const STEMMED_LANGUAGES: &[Language] = &[
    Language::Ara,
    Language::Dan,
    Language::Nld,
    Language::Eng,
    Language::Fin,
    Language::Fra,
    Language::Deu,
    Language::Ell,
    Language::Hun,
    Language::Ita,
    Language::Nor,
    Language::Por,
    Language::Ron,
    Language::Rus,
    Language::Spa,
    Language::Swe,
    Language::Tam,
    Language::Tur,
];

static ENGLISH_STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "a", "about", "above", "after", "again", "against", "all", "am", "an", "and",
        "any", "are", "aren't", "as", "at", "be", "because", "been", "before", "being",
        "below", "between", "both", "but", "by", "can", "can't", "cannot", "could",
        "couldn't", "did", "didn't", "do", "does", "doesn't", "doing", "don't", "down",
        "during", "each", "few", "for", "from", "further", "had", "hadn't", "has",
        "hasn't", "have", "haven't", "having", "he", "he'd", "he'll", "he's", "her",
        "here", "here's", "hers", "herself", "him", "himself", "his", "how", "how's",
        "i", "i'd", "i'll", "i'm", "i've", "if", "in", "into", "is", "isn't", "it",
        "it's", "its", "itself", "just", "let's", "me", "more", "most", "mustn't", "my",
        "myself", "no", "nor", "not", "now", "of", "off", "on", "once", "only", "or",
        "other", "ought", "our", "ours", "ourselves", "out", "over", "own", "same",
        "shan't", "she", "she'd", "she'll", "she's", "should", "shouldn't", "so", "some",
        "such", "than", "that", "that's", "the", "their", "theirs", "them", "themselves",
        "then", "there", "there's", "these", "they", "they'd", "they'll", "they're",
        "they've", "this", "those", "through", "to", "too", "under", "until", "up",
        "very", "was", "wasn't", "we", "we'd", "we'll", "we're", "we've", "were",
        "weren't", "what", "what's", "when", "when's", "where", "where's", "which",
        "while", "who", "who's", "whom", "why", "why's", "will", "with", "won't",
        "would", "wouldn't", "you", "you'd", "you'll", "you're", "you've", "your",
        "yours", "yourself", "yourselves", "yeah", "okay", "oh", "um", "uh",
    ]
    .into_iter()
    .collect()
});

static NO_STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(HashSet::new);

/// Normalize a language code to ISO 639-2/T (3-letter) format
pub fn normalize_to_part2t(code: &str) -> Result<String> {
    let normalized_code = code.trim().to_lowercase();

    if normalized_code.len() == 2 {
        if let Some(lang) = Language::from_639_1(&normalized_code) {
            return Ok(lang.to_639_3().to_string());
        }
    } else if normalized_code.len() == 3 {
        if Language::from_639_3(&normalized_code).is_some() {
            return Ok(normalized_code);
        }

        if let Some((_, part2t)) = PART2B_TO_PART2T.iter().find(|(b, _)| *b == normalized_code) {
            return Ok((*part2t).to_string());
        }
    }

    Err(anyhow!("Cannot normalize invalid language code: {}", code))
}

/// Resolve a language code or English language name
pub fn resolve_language(input: &str) -> Result<Language> {
    if let Ok(part2t) = normalize_to_part2t(input) {
        if let Some(lang) = Language::from_639_3(&part2t) {
            return Ok(lang);
        }
    }

    // Names are only accepted for languages the scorer can stem
    let wanted = input.trim();
    STEMMED_LANGUAGES
        .iter()
        .copied()
        .find(|lang| lang.to_name().eq_ignore_ascii_case(wanted))
        .ok_or_else(|| anyhow!("Unknown language: {}", input))
}

/// Get the language name from a code
pub fn get_language_name(code: &str) -> Result<String> {
    Ok(resolve_language(code)?.to_name().to_string())
}

/// Snowball stemmer for the language, if one exists
pub fn stemmer_algorithm(lang: Language) -> Option<Algorithm> {
    let algorithm = match lang {
        Language::Ara => Algorithm::Arabic,
        Language::Dan => Algorithm::Danish,
        Language::Nld => Algorithm::Dutch,
        Language::Eng => Algorithm::English,
        Language::Fin => Algorithm::Finnish,
        Language::Fra => Algorithm::French,
        Language::Deu => Algorithm::German,
        Language::Ell => Algorithm::Greek,
        Language::Hun => Algorithm::Hungarian,
        Language::Ita => Algorithm::Italian,
        Language::Nor => Algorithm::Norwegian,
        Language::Por => Algorithm::Portuguese,
        Language::Ron => Algorithm::Romanian,
        Language::Rus => Algorithm::Russian,
        Language::Spa => Algorithm::Spanish,
        Language::Swe => Algorithm::Swedish,
        Language::Tam => Algorithm::Tamil,
        Language::Tur => Algorithm::Turkish,
        _ => return None,
    };
    Some(algorithm)
}

/// Stop words ignored when scoring sentences.
///
/// Only English ships a list; other languages score every word.
pub fn stop_words(lang: Language) -> &'static HashSet<&'static str> {
    match lang {
        Language::Eng => &ENGLISH_STOP_WORDS,
        _ => &NO_STOP_WORDS,
    }
}
