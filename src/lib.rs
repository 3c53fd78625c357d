/*!
 * # vidsum - subtitle-driven video summaries
 *
 * Shortens a video to a fraction of its length by keeping the subtitle cues
 * an extractive summarizer ranks highest and concatenating their time ranges.
 *
 * ## Features
 *
 * - SRT loading with automatic text encoding detection
 * - Latent semantic sentence ranking with stemming and stop words for 18 languages
 * - Duration-constrained region selection
 * - Clip cutting, concatenation and downscaling through ffmpeg
 * - URL intake through yt-dlp and a folder watch trigger, both running
 *   each summary in a worker process
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `subtitle_processor`: Caption file loading and cue timing
 * - `summary`: Region selection:
 *   - `summary::corpus`: Cue to sentence corpus
 *   - `summary::scorer`: Sentence ranking
 *   - `summary::regions`: Sentence to time range mapping
 *   - `summary::controller`: Duration feedback loop
 * - `media`: ffprobe, ffmpeg and yt-dlp front ends
 * - `worker`: Child process dispatch
 * - `watcher`: Folder trigger
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `language_utils`: ISO language codes, stemmers and stop words
 * - `errors`: Custom error types for the application
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod file_utils;
pub mod subtitle_processor;
pub mod summary;
pub mod media;
pub mod worker;
pub mod watcher;
pub mod app_controller;
pub mod language_utils;
pub mod errors;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{Controller, RunOutcome, SummaryRequest};
pub use subtitle_processor::{Cue, SubtitleTrack};
pub use summary::{DurationController, LsaScorer, Region, Scorer, Summary, time_regions};
pub use language_utils::{normalize_to_part2t, get_language_name};
pub use errors::{DownloadError, MediaError, SubtitleError, SummaryError};
