use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use chardetng::EncodingDetector;
use encoding_rs::Encoding;
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use crate::errors::SubtitleError;
use crate::summary::Region;

// @module: Subtitle loading and cue timing

// @const: SRT timestamp regex, accepts ',' or '.' before the milliseconds
static TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{1,2}):(\d{2}):(\d{2})[,.](\d{3})\s*-->\s*(\d{1,2}):(\d{2}):(\d{2})[,.](\d{3})").unwrap()
});

// @struct: Single timed subtitle cue
#[derive(Debug, Clone, PartialEq)]
pub struct Cue {
    // @field: 0-based position in the track, stable for the whole run
    pub index: usize,

    // @field: Start time in ms
    pub start_ms: u64,

    // @field: End time in ms
    pub end_ms: u64,

    // @field: Cue text, line breaks preserved
    pub text: String,
}

impl Cue {
    /// Creates a new cue
    pub fn new(index: usize, start_ms: u64, end_ms: u64, text: impl Into<String>) -> Self {
        Cue {
            index,
            start_ms,
            end_ms,
            text: text.into(),
        }
    }

    /// Parse an `HH:MM:SS,mmm` (or `HH:MM:SS`) timestamp to milliseconds
    pub fn parse_timestamp(timestamp: &str) -> Result<u64, SubtitleError> {
        let invalid = |message: &str| SubtitleError::InvalidTimestamp {
            timestamp: timestamp.to_string(),
            message: message.to_string(),
        };

        let parts: Vec<&str> = timestamp.trim().split(&[':', ',', '.'][..]).collect();
        if parts.len() != 3 && parts.len() != 4 {
            return Err(invalid("Invalid timestamp format"));
        }

        let field = |i: usize| -> Result<u64, SubtitleError> {
            parts[i].parse::<u64>().map_err(|_| invalid("Non-numeric timestamp component"))
        };

        let hours = field(0)?;
        let minutes = field(1)?;
        let seconds = field(2)?;
        let millis = if parts.len() == 4 { field(3)? } else { 0 };

        if minutes >= 60 || seconds >= 60 || millis >= 1000 {
            return Err(invalid("Invalid time components in timestamp"));
        }

        hours
            .checked_mul(3_600_000)
            .and_then(|ms| ms.checked_add(minutes * 60_000 + seconds * 1_000 + millis))
            .ok_or_else(|| invalid("Timestamp out of range"))
    }

    /// Format a timestamp in milliseconds to SRT format (HH:MM:SS,mmm)
    pub fn format_timestamp(ms: u64) -> String {
        let hours = ms / 3_600_000;
        let minutes = (ms % 3_600_000) / 60_000;
        let seconds = (ms % 60_000) / 1_000;
        let millis = ms % 1_000;

        format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
    }

    /// Start offset in fractional seconds
    pub fn start_secs(&self) -> f64 {
        self.start_ms as f64 / 1000.0
    }

    /// End offset in fractional seconds
    pub fn end_secs(&self) -> f64 {
        self.end_ms as f64 / 1000.0
    }

    /// Length of the cue in seconds
    pub fn duration_secs(&self) -> f64 {
        self.end_secs() - self.start_secs()
    }

    /// The time range this cue covers in the source video
    pub fn to_region(&self) -> Region {
        Region::new(self.start_secs(), self.end_secs())
    }

    /// Non-speech annotations such as "[music]" open with a bracket
    pub fn is_annotation(&self) -> bool {
        self.text.trim_start().starts_with('[')
    }
}

impl fmt::Display for Cue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.index + 1)?;
        writeln!(
            f,
            "{} --> {}",
            Self::format_timestamp(self.start_ms),
            Self::format_timestamp(self.end_ms)
        )?;
        writeln!(f, "{}", self.text)?;
        writeln!(f)
    }
}

/// Ordered cue sequence loaded from one caption file
#[derive(Debug, Clone)]
pub struct SubtitleTrack {
    /// Source filename
    pub source_file: PathBuf,

    /// Name of the text encoding the file was decoded with
    pub encoding: String,

    /// Cues ordered by start time, indexed 0..n
    pub cues: Vec<Cue>,
}

impl SubtitleTrack {
    /// Load a caption file, detecting its text encoding from the raw bytes
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SubtitleError> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        let (content, encoding) = decode_subtitle_bytes(&bytes)?;
        debug!("Decoded {:?} as {}", path, encoding);

        let cues = Self::parse_srt_string(&content)?;
        if cues.is_empty() {
            return Err(SubtitleError::Empty(path.display().to_string()));
        }

        Ok(SubtitleTrack {
            source_file: path.to_path_buf(),
            encoding: encoding.to_string(),
            cues,
        })
    }

    /// Parse SRT format string into cues.
    ///
    /// Malformed blocks are skipped with a warning. The result is sorted by
    /// start time and re-indexed, so `cues[i].index == i` always holds.
    pub fn parse_srt_string(content: &str) -> Result<Vec<Cue>, SubtitleError> {
        let mut cues = Vec::new();

        let mut current_times: Option<(u64, u64)> = None;
        let mut current_text = String::new();

        let mut flush = |times: Option<(u64, u64)>, text: &mut String, line: usize| {
            if let Some((start_ms, end_ms)) = times {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    warn!("Skipping cue without text ending at line {}", line);
                } else if end_ms < start_ms {
                    warn!(
                        "Skipping cue ending at line {}: end {} before start {}",
                        line,
                        Cue::format_timestamp(end_ms),
                        Cue::format_timestamp(start_ms)
                    );
                } else {
                    let index = cues.len();
                    cues.push(Cue::new(index, start_ms, end_ms, trimmed));
                }
            }
            text.clear();
        };

        let mut line_count = 0;
        let mut lines = content.lines().peekable();
        while let Some(line) = lines.next() {
            line_count += 1;
            let trimmed = line.trim().trim_start_matches('\u{feff}');

            if trimmed.is_empty() {
                flush(current_times.take(), &mut current_text, line_count);
                continue;
            }

            if let Some(caps) = TIMESTAMP_REGEX.captures(trimmed) {
                // A timestamp always opens a new block, even if the blank separator was missing
                flush(current_times.take(), &mut current_text, line_count);
                current_times = Some((
                    Self::parse_timestamp_to_ms(&caps, 1),
                    Self::parse_timestamp_to_ms(&caps, 5),
                ));
                continue;
            }

            // Counter line: digits immediately followed by a timestamp line
            let is_counter = trimmed.chars().all(|c| c.is_ascii_digit())
                && lines
                    .peek()
                    .is_some_and(|next| TIMESTAMP_REGEX.is_match(next.trim()));
            if is_counter {
                flush(current_times.take(), &mut current_text, line_count);
                continue;
            }

            if current_times.is_some() {
                if !current_text.is_empty() {
                    current_text.push('\n');
                }
                current_text.push_str(trimmed);
            } else {
                warn!("Unexpected text at line {} before a timestamp: {}", line_count, trimmed);
            }
        }
        flush(current_times.take(), &mut current_text, line_count);

        // Sort by start time to ensure correct order
        cues.sort_by_key(|cue| cue.start_ms);
        for (i, cue) in cues.iter_mut().enumerate() {
            cue.index = i;
        }

        Ok(cues)
    }

    /// Restrict the track to cues lying entirely inside `[start_ms, end_ms)`.
    ///
    /// Kept cues are re-indexed from zero.
    pub fn window(&self, start_ms: u64, end_ms: Option<u64>) -> Self {
        let cues = self
            .cues
            .iter()
            .filter(|cue| cue.start_ms >= start_ms && end_ms.is_none_or(|end| cue.end_ms <= end))
            .enumerate()
            .map(|(i, cue)| Cue { index: i, ..cue.clone() })
            .collect();

        SubtitleTrack {
            source_file: self.source_file.clone(),
            encoding: self.encoding.clone(),
            cues,
        }
    }

    /// Timestamp of the last cue end, in seconds
    pub fn span_secs(&self) -> f64 {
        self.cues.iter().map(Cue::end_secs).fold(0.0, f64::max)
    }

    fn parse_timestamp_to_ms(caps: &regex::Captures, start_idx: usize) -> u64 {
        let part = |offset: usize| -> u64 {
            caps.get(start_idx + offset)
                .map_or(0, |m| m.as_str().parse().unwrap_or(0))
        };

        (part(0) * 3600 + part(1) * 60 + part(2)) * 1000 + part(3)
    }
}

impl fmt::Display for SubtitleTrack {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Subtitle Track")?;
        writeln!(f, "Source: {:?}", self.source_file)?;
        writeln!(f, "Encoding: {}", self.encoding)?;
        writeln!(f, "Cues: {}", self.cues.len())?;
        Ok(())
    }
}

/// Decode raw caption bytes, returning the text and the encoding name used.
///
/// A BOM wins; otherwise valid UTF-8 is taken as-is; otherwise the encoding
/// is guessed from the byte distribution.
pub fn decode_subtitle_bytes(bytes: &[u8]) -> Result<(String, &'static str), SubtitleError> {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        return decode_with(encoding, &bytes[bom_len..]);
    }

    if let Ok(text) = std::str::from_utf8(bytes) {
        return Ok((text.to_string(), encoding_rs::UTF_8.name()));
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    let encoding = detector.guess(None, true);
    decode_with(encoding, bytes)
}

fn decode_with(encoding: &'static Encoding, bytes: &[u8]) -> Result<(String, &'static str), SubtitleError> {
    let (text, had_errors) = encoding.decode_without_bom_handling(bytes);
    if had_errors {
        if text.chars().all(|c| c == char::REPLACEMENT_CHARACTER || c.is_whitespace()) {
            return Err(SubtitleError::Encoding(format!(
                "no readable text as {}",
                encoding.name()
            )));
        }
        warn!("Some characters could not be decoded as {}", encoding.name());
    }
    Ok((text.into_owned(), encoding.name()))
}
