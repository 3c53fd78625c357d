/*!
 * Cue to sentence conversion.
 *
 * Every spoken cue becomes exactly one sentence. The originating cue index
 * travels next to the text in `CorpusEntry` instead of being embedded in it,
 * so the scorer never has to preserve any markup.
 */

use std::fmt::Write;
use crate::subtitle_processor::Cue;

/// One scorable sentence and the cue it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusEntry {
    /// Index of the originating cue
    pub cue_index: usize,
    /// Normalized sentence, always ending with a single period
    pub sentence: String,
}

/// Ordered sentences built from a cue sequence
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Corpus {
    entries: Vec<CorpusEntry>,
}

impl Corpus {
    /// Build the corpus, skipping bracketed non-speech annotations
    pub fn build(cues: &[Cue]) -> Self {
        let entries = cues
            .iter()
            .filter(|cue| !cue.is_annotation())
            .map(|cue| CorpusEntry {
                cue_index: cue.index,
                sentence: normalize_sentence(&cue.text),
            })
            .collect();

        Self { entries }
    }

    /// Sentences in cue order
    pub fn entries(&self) -> &[CorpusEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render as a single text blob where every sentence is prefixed with
    /// its parenthesized cue index, e.g. `(0) Hello there. (2) Bye. `
    pub fn to_tagged_text(&self) -> String {
        let mut text = String::new();
        for entry in &self.entries {
            let _ = write!(text, "({}) {} ", entry.cue_index, entry.sentence);
        }
        text
    }
}

/// Normalize cue text into a single sentence.
///
/// Line breaks become spaces, leading/trailing ellipses are stripped, every
/// `.`, `?` and `!` is removed, and one period is appended.
pub fn normalize_sentence(text: &str) -> String {
    let joined = text.replace("\r\n", " ").replace('\n', " ");
    let stripped = joined.trim().trim_matches(|c| c == '.' || c == '\u{2026}');

    let cleaned: String = stripped
        .chars()
        .filter(|c| !matches!(c, '.' | '?' | '!' | '\u{2026}'))
        .collect();

    let mut sentence = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    sentence.push('.');
    sentence
}
