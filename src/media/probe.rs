use std::ffi::OsStr;
use std::path::Path;
use std::time::Duration;
use serde::Serialize;
use serde_json::Value;
use crate::errors::MediaError;
use super::{filter_ffmpeg_stderr, run_tool};

// @module: Container inspection through ffprobe

const PROBE_TIMEOUT: Duration = Duration::from_secs(60);

/// What the renderer needs to know about a source video
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoInfo {
    /// Container duration in seconds
    pub duration_secs: f64,
    /// Frame width of the first video stream
    pub width: u32,
    /// Frame height of the first video stream
    pub height: u32,
    /// Whether any audio stream is present
    pub has_audio: bool,
}

impl VideoInfo {
    /// Probe a video file
    pub async fn probe<P: AsRef<Path>>(ffprobe: &str, video_path: P) -> Result<Self, MediaError> {
        let video_path = video_path.as_ref();
        if !video_path.exists() {
            return Err(MediaError::ProbeFailed(format!("Video file not found: {:?}", video_path)));
        }

        let args = [
            OsStr::new("-v"),
            OsStr::new("error"),
            OsStr::new("-print_format"),
            OsStr::new("json"),
            OsStr::new("-show_format"),
            OsStr::new("-show_streams"),
            video_path.as_os_str(),
        ];
        let output = run_tool(ffprobe, args, PROBE_TIMEOUT).await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(MediaError::ProbeFailed(filter_ffmpeg_stderr(&stderr)));
        }

        Self::from_probe_json(&String::from_utf8_lossy(&output.stdout))
    }

    /// Parse `ffprobe -print_format json -show_format -show_streams` output
    pub fn from_probe_json(json: &str) -> Result<Self, MediaError> {
        let json: Value = serde_json::from_str(json)
            .map_err(|e| MediaError::ProbeFailed(format!("Invalid ffprobe JSON: {}", e)))?;

        let streams = json
            .get("streams")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();

        let codec_type = |stream: &Value| stream.get("codec_type").and_then(Value::as_str).map(str::to_string);

        let video = streams
            .iter()
            .find(|s| codec_type(s).as_deref() == Some("video"))
            .ok_or_else(|| MediaError::ProbeFailed("No video stream found".to_string()))?;
        let has_audio = streams.iter().any(|s| codec_type(s).as_deref() == Some("audio"));

        let dimension = |key: &str| video.get(key).and_then(Value::as_u64).unwrap_or(0) as u32;

        // Container duration first, stream duration as a fallback
        let duration_secs = json
            .get("format")
            .and_then(|f| f.get("duration"))
            .or_else(|| video.get("duration"))
            .and_then(Value::as_str)
            .and_then(|d| d.parse::<f64>().ok())
            .ok_or_else(|| MediaError::ProbeFailed("Container reports no duration".to_string()))?;

        Ok(Self {
            duration_secs,
            width: dimension("width"),
            height: dimension("height"),
            has_audio,
        })
    }
}
