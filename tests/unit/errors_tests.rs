/*!
 * Tests for error types and conversions
 */

use vidsum::errors::{DownloadError, MediaError, SubtitleError, SummaryError};

#[test]
fn test_summaryError_convergence_shouldDisplayProgress() {
    let error = SummaryError::Convergence {
        iterations: 12,
        requested_count: 40.0,
        total_time: 55.5,
        target: 90.0,
    };
    let display = format!("{}", error);
    assert!(display.contains("12 iterations"));
    assert!(display.contains("55.50s"));
    assert!(display.contains("90.00s"));
}

#[test]
fn test_summaryError_zeroMeanDuration_shouldMentionCueCount() {
    let display = SummaryError::ZeroMeanDuration { cue_count: 4 }.to_string();
    assert!(display.contains("4 cues"));
}

#[test]
fn test_subtitleError_invalidTimestamp_shouldDisplayInput() {
    let error = SubtitleError::InvalidTimestamp {
        timestamp: "1:2".to_string(),
        message: "Invalid timestamp format".to_string(),
    };
    assert_eq!(error.to_string(), "Invalid timestamp '1:2': Invalid timestamp format");
}

#[test]
fn test_mediaError_timeout_shouldDisplayToolAndSecs() {
    let error = MediaError::Timeout { tool: "ffmpeg".to_string(), secs: 3600 };
    assert_eq!(error.to_string(), "ffmpeg timed out after 3600 seconds");
}

#[test]
fn test_downloadError_invalidUrl_shouldDisplayUrl() {
    let error = DownloadError::InvalidUrl("ftp://x".to_string());
    assert_eq!(error.to_string(), "Invalid video URL: ftp://x");
}
