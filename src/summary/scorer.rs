/*!
 * Sentence ranking.
 *
 * `Scorer` is the seam the duration controller drives. `LsaScorer` is the
 * latent-semantic implementation: a smoothed term-frequency matrix is
 * decomposed and every sentence is rated by the length of its projection
 * onto the strongest latent topics.
 */

use std::collections::{BTreeMap, HashSet};
use anyhow::{Result, anyhow};
use isolang::Language;
use log::{debug, warn};
use ndarray::{Array1, Array2};
use once_cell::sync::Lazy;
use regex::Regex;
use rust_stemmers::Stemmer;
use crate::app_config::ScorerConfig;
use crate::language_utils;
use super::corpus::Corpus;

static WORD_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\p{L}\p{N}][\p{L}\p{N}']*").unwrap());

const POWER_ITERATIONS: usize = 500;
const POWER_TOLERANCE: f64 = 1e-12;

/// A sentence picked by the scorer
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredSentence {
    /// Index of the cue the sentence was built from
    pub cue_index: usize,
    /// Position of the sentence in the corpus
    pub position: usize,
    /// Importance rating, higher is better
    pub rating: f64,
}

/// Ranks corpus sentences by importance.
///
/// Implementations must be deterministic: the same corpus and count always
/// yield the same sentences, or the duration controller may never settle.
pub trait Scorer {
    /// Return the `requested` best sentences.
    ///
    /// `requested` is truncated toward zero and clamped to `0..=corpus.len()`.
    fn rank(&self, corpus: &Corpus, requested: f64) -> Vec<ScoredSentence>;
}

/// Turn a real-valued sentence count into a usable one
pub fn clamp_count(requested: f64, len: usize) -> usize {
    if !requested.is_finite() || requested <= 0.0 {
        if requested == f64::INFINITY {
            return len;
        }
        return 0;
    }
    (requested.trunc() as usize).min(len)
}

/// Pick the `count` best rated positions and return them in corpus order.
///
/// Ties keep corpus order.
pub fn select_best(ratings: &[f64], count: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..ratings.len()).collect();
    order.sort_by(|a, b| ratings[*b].total_cmp(&ratings[*a]));
    order.truncate(count);
    order.sort_unstable();
    order
}

/// Latent semantic analysis scorer
pub struct LsaScorer {
    language: Language,
    stemmer: Option<Stemmer>,
    stop_words: &'static HashSet<&'static str>,
    smoothing: f64,
    min_dimensions: usize,
    reduction_ratio: f64,
}

impl LsaScorer {
    /// Create a scorer for a language code or English language name
    pub fn new(language: &str, config: &ScorerConfig) -> Result<Self> {
        let language = language_utils::resolve_language(language)?;
        if !(0.0..1.0).contains(&config.smoothing) {
            return Err(anyhow!("Smoothing must be in [0, 1), got {}", config.smoothing));
        }

        let stemmer = language_utils::stemmer_algorithm(language).map(Stemmer::create);
        if stemmer.is_none() {
            warn!("No stemmer for {}, scoring raw words", language.to_name());
        }

        Ok(Self {
            language,
            stemmer,
            stop_words: language_utils::stop_words(language),
            smoothing: config.smoothing,
            min_dimensions: config.min_dimensions,
            reduction_ratio: config.reduction_ratio,
        })
    }

    /// Language the scorer tokenizes for
    pub fn language(&self) -> Language {
        self.language
    }

    /// Rate every sentence of the corpus, in corpus order
    pub fn ratings(&self, corpus: &Corpus) -> Vec<f64> {
        let sentences: Vec<Vec<String>> = corpus
            .entries()
            .iter()
            .map(|entry| self.terms(&entry.sentence))
            .collect();

        let mut dictionary: BTreeMap<&str, usize> = BTreeMap::new();
        for term in sentences.iter().flatten() {
            let next = dictionary.len();
            dictionary.entry(term.as_str()).or_insert(next);
        }

        if dictionary.is_empty() {
            return vec![0.0; sentences.len()];
        }

        let mut matrix = Array2::<f64>::zeros((dictionary.len(), sentences.len()));
        for (col, terms) in sentences.iter().enumerate() {
            for term in terms {
                matrix[[dictionary[term.as_str()], col]] += 1.0;
            }
        }
        self.smooth_term_frequency(&mut matrix);

        let singular_count = matrix.nrows().min(matrix.ncols());
        let dimensions = self
            .min_dimensions
            .max((singular_count as f64 * self.reduction_ratio) as usize);

        let gram = matrix.t().dot(&matrix);
        if dimensions >= singular_count {
            // Keeping every latent dimension reduces to the column norms
            return gram.diag().iter().map(|v| v.max(0.0).sqrt()).collect();
        }

        debug!(
            "LSA over {} terms x {} sentences, keeping {} of {} dimensions",
            matrix.nrows(),
            matrix.ncols(),
            dimensions,
            singular_count
        );
        rank_by_topics(gram, dimensions)
    }

    fn terms(&self, sentence: &str) -> Vec<String> {
        WORD_REGEX
            .find_iter(sentence)
            .map(|m| m.as_str().to_lowercase())
            .filter(|word| !self.stop_words.contains(word.as_str()))
            .map(|word| match &self.stemmer {
                Some(stemmer) => stemmer.stem(&word).into_owned(),
                None => word,
            })
            .collect()
    }

    fn smooth_term_frequency(&self, matrix: &mut Array2<f64>) {
        for mut column in matrix.columns_mut() {
            let max = column.iter().cloned().fold(0.0, f64::max);
            if max != 0.0 {
                column.mapv_inplace(|freq| self.smoothing + (1.0 - self.smoothing) * freq / max);
            }
        }
    }
}

impl Scorer for LsaScorer {
    fn rank(&self, corpus: &Corpus, requested: f64) -> Vec<ScoredSentence> {
        let count = clamp_count(requested, corpus.len());
        if count == 0 {
            return Vec::new();
        }

        let ratings = self.ratings(corpus);
        select_best(&ratings, count)
            .into_iter()
            .map(|position| ScoredSentence {
                cue_index: corpus.entries()[position].cue_index,
                position,
                rating: ratings[position],
            })
            .collect()
    }
}

/// Rate sentences by `sqrt(sum(sigma_i^2 * v_ij^2))` over the strongest
/// `dimensions` right singular vectors.
///
/// The singular pairs come from deterministic power iteration with deflation
/// on the symmetric Gram matrix, whose eigenvalues are `sigma_i^2`.
fn rank_by_topics(mut gram: Array2<f64>, dimensions: usize) -> Vec<f64> {
    let n = gram.nrows();
    let mut ranks = Array1::<f64>::zeros(n);

    for _ in 0..dimensions {
        let Some((eigenvalue, vector)) = dominant_eigenpair(&gram) else {
            break;
        };

        ranks += &vector.mapv(|v| eigenvalue * v * v);

        // Deflate so the next pass finds the following topic
        for i in 0..n {
            for j in 0..n {
                gram[[i, j]] -= eigenvalue * vector[i] * vector[j];
            }
        }
    }

    ranks.iter().map(|r| r.max(0.0).sqrt()).collect()
}

fn dominant_eigenpair(matrix: &Array2<f64>) -> Option<(f64, Array1<f64>)> {
    let n = matrix.nrows();
    // Uneven start vector so symmetric inputs do not stall on a saddle
    let mut vector = Array1::from_shape_fn(n, |i| 1.0 + i as f64 / n as f64);
    let norm = vector.dot(&vector).sqrt();
    vector /= norm;

    let mut eigenvalue = 0.0;
    for _ in 0..POWER_ITERATIONS {
        let next = matrix.dot(&vector);
        let norm = next.dot(&next).sqrt();
        if norm <= POWER_TOLERANCE {
            return None;
        }
        let next = next / norm;
        let delta = (&next - &vector).mapv(f64::abs).sum();
        vector = next;
        eigenvalue = vector.dot(&matrix.dot(&vector));
        if delta <= POWER_TOLERANCE {
            break;
        }
    }

    (eigenvalue > POWER_TOLERANCE).then_some((eigenvalue, vector))
}
