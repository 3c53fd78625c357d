/*!
 * Error types for the vidsum application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur while loading a subtitle file
#[derive(Error, Debug)]
pub enum SubtitleError {
    /// The file decoded fine but held no usable cue
    #[error("No subtitle cues found in {0}")]
    Empty(String),

    /// The raw bytes could not be decoded to text
    #[error("Failed to decode subtitle text: {0}")]
    Encoding(String),

    /// A timestamp could not be parsed
    #[error("Invalid timestamp '{timestamp}': {message}")]
    InvalidTimestamp {
        /// The text as given
        timestamp: String,
        /// What went wrong
        message: String,
    },

    /// Underlying file access failed
    #[error("Subtitle file error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by the duration-constrained region selection
#[derive(Error, Debug)]
pub enum SummaryError {
    /// There is nothing to summarize
    #[error("Cannot summarize an empty cue sequence")]
    NoCues,

    /// Every cue has zero length, so no sentence count can be derived
    #[error("Mean cue duration is zero across {cue_count} cues")]
    ZeroMeanDuration {
        /// Number of cues that were averaged
        cue_count: usize,
    },

    /// The target duration is negative or not a number
    #[error("Invalid target duration: {0}")]
    InvalidTarget(f64),

    /// A ranked sentence could not be traced back to a cue
    #[error("Scored sentence does not resolve to a cue (index {cue_index:?})")]
    MalformedTag {
        /// The index carried by the sentence, if any
        cue_index: Option<usize>,
    },

    /// The sentence count never crossed the target duration
    #[error(
        "Summary did not converge after {iterations} iterations \
         (requested {requested_count:.2} sentences, {total_time:.2}s selected, target {target:.2}s)"
    )]
    Convergence {
        /// Number of scorer calls made
        iterations: usize,
        /// Requested count at the moment the loop gave up
        requested_count: f64,
        /// Selected duration at the moment the loop gave up
        total_time: f64,
        /// Duration the loop was aiming for
        target: f64,
    },
}

/// Errors from the external media tools
#[derive(Error, Debug)]
pub enum MediaError {
    /// ffmpeg/ffprobe could not be started
    #[error("Failed to run {tool}: {message}")]
    ToolMissing {
        /// Executable name
        tool: String,
        /// Spawn error
        message: String,
    },

    /// ffprobe ran but the output was unusable
    #[error("Failed to probe video: {0}")]
    ProbeFailed(String),

    /// ffmpeg exited with an error
    #[error("Rendering failed: {0}")]
    RenderFailed(String),

    /// A tool ran past its deadline
    #[error("{tool} timed out after {secs} seconds")]
    Timeout {
        /// Executable name
        tool: String,
        /// Deadline that was exceeded
        secs: u64,
    },

    /// Nothing was selected to render
    #[error("No regions to render")]
    NoRegions,
}

/// Errors from the video/caption download collaborator
#[derive(Error, Debug)]
pub enum DownloadError {
    /// The URL is not something we can fetch
    #[error("Invalid video URL: {0}")]
    InvalidUrl(String),

    /// The download tool failed or could not be started
    #[error("Download tool failed: {0}")]
    ToolFailed(String),

    /// The tool succeeded but an expected file is missing
    #[error("Download did not produce {0}")]
    MissingArtifact(String),
}
