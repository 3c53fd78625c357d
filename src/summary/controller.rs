/*!
 * Duration controller.
 *
 * Sizes a summary so its total duration reaches a target. The initial
 * sentence count assumes every cue lasts the mean cue duration; the loop then
 * steps the count by one sentence in the direction fixed by the first
 * measurement until the selected duration crosses the target.
 */

use log::{debug, info};
use serde::Serialize;
use crate::errors::SummaryError;
use crate::subtitle_processor::Cue;
use super::corpus::Corpus;
use super::regions::RegionResolver;
use super::scorer::{Scorer, clamp_count};
use super::{Region, time_regions};

/// Which side of the target the first measurement landed on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Selected less than the target, the count grows
    TooShort,
    /// Selected at least the target, the count shrinks
    TooLong,
}

/// Regions selected when the controller stopped
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    /// Time ranges in the order the scorer returned them
    pub regions: Vec<Region>,
    /// Cue index behind each region
    pub cue_indices: Vec<usize>,
    /// Sum of region durations in seconds
    pub total_time: f64,
    /// Duration the loop aimed for
    pub target: f64,
    /// Final real-valued sentence count
    pub requested_count: f64,
    /// Number of scorer calls
    pub iterations: usize,
    /// Side the loop approached the target from
    pub direction: Direction,
}

impl Summary {
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

/// Average cue length over the whole, unfiltered cue sequence
pub fn mean_cue_duration(cues: &[Cue]) -> Result<f64, SummaryError> {
    if cues.is_empty() {
        return Err(SummaryError::NoCues);
    }

    let total: f64 = cues.iter().map(Cue::duration_secs).sum();
    let mean = total / cues.len() as f64;
    if mean <= 0.0 {
        return Err(SummaryError::ZeroMeanDuration { cue_count: cues.len() });
    }
    Ok(mean)
}

/// Sentence count to request first: `target / mean cue duration`
pub fn initial_count(cues: &[Cue], target: f64) -> Result<f64, SummaryError> {
    Ok(target / mean_cue_duration(cues)?)
}

/// Drives the scorer until the selected duration crosses the target
pub struct DurationController<'a, S: Scorer + ?Sized> {
    scorer: &'a S,
    max_iterations: usize,
}

impl<'a, S: Scorer + ?Sized> DurationController<'a, S> {
    pub fn new(scorer: &'a S, max_iterations: usize) -> Self {
        Self {
            scorer,
            max_iterations: max_iterations.max(1),
        }
    }

    /// Select cue regions whose total duration crosses `target` seconds.
    ///
    /// Stops at the first whole-sentence step that crosses the target from
    /// the side of the first measurement, so the result may overshoot by up
    /// to one sentence. Fails with `Convergence` when the iteration cap is
    /// hit or every sentence is already selected and the total is still short.
    pub fn find_summary_regions(&self, cues: &[Cue], target: f64) -> Result<Summary, SummaryError> {
        if !target.is_finite() || target < 0.0 {
            return Err(SummaryError::InvalidTarget(target));
        }

        let mut requested_count = initial_count(cues, target)?;
        let corpus = Corpus::build(cues);
        let resolver = RegionResolver::new(cues);
        debug!(
            "Corpus has {} of {} cues, starting at {:.2} sentences for {:.2}s",
            corpus.len(),
            cues.len(),
            requested_count,
            target
        );

        let mut iterations = 0;
        let mut selection = self.evaluate(&corpus, &resolver, requested_count, &mut iterations)?;
        let mut total_time = total_of(&selection);

        let direction = if total_time < target {
            Direction::TooShort
        } else {
            Direction::TooLong
        };

        loop {
            let crossed = match direction {
                Direction::TooShort => total_time >= target,
                Direction::TooLong => total_time <= target,
            };
            if crossed {
                break;
            }

            let saturated = direction == Direction::TooShort
                && clamp_count(requested_count, corpus.len()) >= corpus.len();
            if saturated || iterations >= self.max_iterations {
                return Err(SummaryError::Convergence {
                    iterations,
                    requested_count,
                    total_time,
                    target,
                });
            }

            requested_count += match direction {
                Direction::TooShort => 1.0,
                Direction::TooLong => -1.0,
            };
            selection = self.evaluate(&corpus, &resolver, requested_count, &mut iterations)?;
            total_time = total_of(&selection);
        }

        info!(
            "Selected {} cues ({:.2}s of {:.2}s target) after {} iterations",
            selection.len(),
            total_time,
            target,
            iterations
        );

        let (cue_indices, regions): (Vec<usize>, Vec<Region>) = selection.into_iter().unzip();
        Ok(Summary {
            regions,
            cue_indices,
            total_time,
            target,
            requested_count,
            iterations,
            direction,
        })
    }

    fn evaluate(
        &self,
        corpus: &Corpus,
        resolver: &RegionResolver,
        requested_count: f64,
        iterations: &mut usize,
    ) -> Result<Vec<(usize, Region)>, SummaryError> {
        *iterations += 1;
        let sentences = self.scorer.rank(corpus, requested_count);
        let selection = resolver.resolve(&sentences)?;
        debug!(
            "Iteration {}: requested {:.2}, got {} regions totalling {:.2}s",
            iterations,
            requested_count,
            selection.len(),
            total_of(&selection)
        );
        Ok(selection)
    }
}

fn total_of(selection: &[(usize, Region)]) -> f64 {
    time_regions(selection.iter().map(|(_, region)| region))
}
