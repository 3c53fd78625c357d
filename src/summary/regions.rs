use std::collections::HashSet;
use crate::errors::SummaryError;
use crate::subtitle_processor::Cue;
use super::Region;
use super::scorer::ScoredSentence;

// @module: Scored sentence to time range resolution

/// Maps scored sentences back to the time ranges of their cues
pub struct RegionResolver<'a> {
    cues: &'a [Cue],
}

impl<'a> RegionResolver<'a> {
    pub fn new(cues: &'a [Cue]) -> Self {
        Self { cues }
    }

    /// Resolve sentences to `(cue_index, region)` pairs in the given order.
    ///
    /// A cue selected twice is kept once. A sentence pointing at a cue that
    /// does not exist, or at a non-speech annotation that the corpus never
    /// contains, means corpus and scorer disagree and fails the whole call.
    pub fn resolve(&self, sentences: &[ScoredSentence]) -> Result<Vec<(usize, Region)>, SummaryError> {
        let mut seen = HashSet::with_capacity(sentences.len());
        let mut resolved = Vec::with_capacity(sentences.len());

        for sentence in sentences {
            let cue = self
                .cue(sentence.cue_index)
                .ok_or(SummaryError::MalformedTag { cue_index: Some(sentence.cue_index) })?;

            if seen.insert(cue.index) {
                resolved.push((cue.index, cue.to_region()));
            }
        }

        Ok(resolved)
    }

    fn cue(&self, index: usize) -> Option<&'a Cue> {
        self.cues
            .get(index)
            .filter(|cue| cue.index == index && !cue.is_annotation())
    }
}
