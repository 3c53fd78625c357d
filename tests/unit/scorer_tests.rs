/*!
 * Tests for the latent semantic scorer
 */

use isolang::Language;
use vidsum::app_config::ScorerConfig;
use vidsum::subtitle_processor::Cue;
use vidsum::summary::{Corpus, LsaScorer, Scorer};

fn corpus_of(texts: &[&str]) -> Corpus {
    let cues: Vec<Cue> = texts
        .iter()
        .enumerate()
        .map(|(i, text)| Cue::new(i, i as u64 * 2000, (i as u64 + 1) * 2000, *text))
        .collect();
    Corpus::build(&cues)
}

#[test]
fn test_lsaScorer_withEnglishName_shouldResolveLanguage() {
    let scorer = LsaScorer::new("English", &ScorerConfig::default()).unwrap();
    assert_eq!(scorer.language(), Language::Eng);
}

#[test]
fn test_lsaScorer_withUnknownLanguage_shouldFail() {
    assert!(LsaScorer::new("klingon", &ScorerConfig::default()).is_err());
}

#[test]
fn test_lsaScorer_withInvalidSmoothing_shouldFail() {
    let config = ScorerConfig { smoothing: 1.0, ..ScorerConfig::default() };
    assert!(LsaScorer::new("en", &config).is_err());
}

#[test]
fn test_rank_withOverlongRequest_shouldReturnWholeCorpusInOrder() {
    let corpus = corpus_of(&["Rust compiles fast", "Cargo fetches crates", "Tests keep rust honest"]);
    let scorer = LsaScorer::new("en", &ScorerConfig::default()).unwrap();

    let ranked = scorer.rank(&corpus, 10.0);
    let positions: Vec<usize> = ranked.iter().map(|s| s.position).collect();
    assert_eq!(positions, vec![0, 1, 2]);
}

#[test]
fn test_rank_withZeroRequest_shouldReturnNothing() {
    let corpus = corpus_of(&["Rust compiles fast", "Cargo fetches crates"]);
    let scorer = LsaScorer::new("en", &ScorerConfig::default()).unwrap();
    assert!(scorer.rank(&corpus, 0.0).is_empty());
    assert!(scorer.rank(&corpus, -4.0).is_empty());
}

#[test]
fn test_rank_withDenseSentence_shouldPreferIt() {
    // The long sentence carries the most terms and wins the top slot
    let corpus = corpus_of(&[
        "Okay",
        "The compiler checks ownership borrowing lifetimes and thread safety before running",
        "Right",
    ]);
    let scorer = LsaScorer::new("en", &ScorerConfig::default()).unwrap();
    let ranked = scorer.rank(&corpus, 1.0);
    assert_eq!(ranked.len(), 1);
    assert_eq!(ranked[0].cue_index, 1);
}

#[test]
fn test_rank_withAnnotationInCues_shouldReportOriginalCueIndex() {
    let cues = vec![
        Cue::new(0, 0, 1000, "[music]"),
        Cue::new(1, 1000, 2000, "Satellites orbit the planet"),
        Cue::new(2, 2000, 3000, "[laughter]"),
        Cue::new(3, 3000, 4000, "Orbit decay pulls satellites down"),
    ];
    let corpus = Corpus::build(&cues);
    let scorer = LsaScorer::new("en", &ScorerConfig::default()).unwrap();

    let ranked = scorer.rank(&corpus, 2.0);
    let indices: Vec<usize> = ranked.iter().map(|s| s.cue_index).collect();
    assert_eq!(indices, vec![1, 3]);
}

#[test]
fn test_rank_withUnstemmedLanguage_shouldStillRate() {
    let corpus = corpus_of(&["東京 大阪 京都", "大阪 名古屋"]);
    let scorer = LsaScorer::new("ja", &ScorerConfig::default()).unwrap();
    let ratings = scorer.ratings(&corpus);
    assert_eq!(ratings.len(), 2);
    assert!(ratings.iter().all(|r| *r > 0.0));
}
