/*!
 * Duration-constrained extractive summarization of subtitle tracks.
 *
 * The pipeline turns cues into a scorable corpus, ranks its sentences, maps
 * the winners back to time ranges and resizes the requested sentence count
 * until the selected duration reaches a target:
 *
 * - `corpus`: cue to sentence normalization, one sentence per spoken cue
 * - `scorer`: the ranking seam and the latent-semantic implementation
 * - `regions`: scored sentence to time range resolution
 * - `controller`: the feedback loop over the requested sentence count
 */

use serde::Serialize;

pub use self::controller::{Direction, DurationController, Summary, initial_count, mean_cue_duration};
pub use self::corpus::{Corpus, CorpusEntry, normalize_sentence};
pub use self::regions::RegionResolver;
pub use self::scorer::{LsaScorer, ScoredSentence, Scorer, clamp_count};

pub mod controller;
pub mod corpus;
pub mod regions;
pub mod scorer;

/// A `(start, end)` interval of the source video, in seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Region {
    /// Start offset in seconds
    pub start: f64,
    /// End offset in seconds
    pub end: f64,
}

impl Region {
    /// Create a new region
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Length of the interval in seconds
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// Total length of a set of regions.
///
/// Overlapping or duplicated regions are counted as many times as they appear.
pub fn time_regions<'a, I>(regions: I) -> f64
where
    I: IntoIterator<Item = &'a Region>,
{
    regions.into_iter().map(Region::duration).sum()
}
