use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use log::warn;
use crate::subtitle_processor::Cue;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Summary language code (ISO) or English name
    #[serde(default = "default_language")]
    pub language: String,

    /// Region selection settings
    #[serde(default)]
    pub summary: SummaryConfig,

    /// Sentence scoring settings
    #[serde(default)]
    pub scorer: ScorerConfig,

    /// Video rendering settings
    #[serde(default)]
    pub render: RenderConfig,

    /// URL download settings
    #[serde(default)]
    pub download: DownloadConfig,

    /// Folder watch settings
    #[serde(default)]
    pub watch: WatchConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Region selection settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SummaryConfig {
    /// Fraction of the original duration to keep
    #[serde(default = "default_target_ratio")]
    pub target_ratio: f64,

    /// Maximum scorer calls before giving up
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            target_ratio: default_target_ratio(),
            max_iterations: default_max_iterations(),
        }
    }
}

/// Latent semantic scorer settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ScorerConfig {
    /// Term frequency smoothing in [0, 1)
    #[serde(default = "default_smoothing")]
    pub smoothing: f64,

    /// Fewest latent dimensions kept when rating sentences
    #[serde(default = "default_min_dimensions")]
    pub min_dimensions: usize,

    /// Share of latent dimensions kept (1.0 keeps all)
    #[serde(default = "default_reduction_ratio")]
    pub reduction_ratio: f64,
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            smoothing: default_smoothing(),
            min_dimensions: default_min_dimensions(),
            reduction_ratio: default_reduction_ratio(),
        }
    }
}

/// Output rendering settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RenderConfig {
    /// Appended to the input base name
    #[serde(default = "default_output_suffix")]
    pub output_suffix: String,

    /// Output container extension
    #[serde(default = "default_output_extension")]
    pub output_extension: String,

    /// ffmpeg video encoder
    #[serde(default = "default_video_codec")]
    pub video_codec: String,

    /// ffmpeg audio encoder
    #[serde(default = "default_audio_codec")]
    pub audio_codec: String,

    /// Output frame size is the input size divided by this, per axis
    #[serde(default = "default_scale_divisor")]
    pub scale_divisor: u32,

    /// Render timeout in seconds
    #[serde(default = "default_render_timeout_secs")]
    pub timeout_secs: u64,

    /// ffmpeg executable
    #[serde(default = "default_ffmpeg_path")]
    pub ffmpeg_path: String,

    /// ffprobe executable
    #[serde(default = "default_ffprobe_path")]
    pub ffprobe_path: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            output_suffix: default_output_suffix(),
            output_extension: default_output_extension(),
            video_codec: default_video_codec(),
            audio_codec: default_audio_codec(),
            scale_divisor: default_scale_divisor(),
            timeout_secs: default_render_timeout_secs(),
            ffmpeg_path: default_ffmpeg_path(),
            ffprobe_path: default_ffprobe_path(),
        }
    }
}

/// URL download settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DownloadConfig {
    /// Downloader executable
    #[serde(default = "default_download_tool")]
    pub tool: String,

    /// Caption language to request
    #[serde(default = "default_subtitle_language")]
    pub subtitle_language: String,

    /// Download timeout in seconds
    #[serde(default = "default_download_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            tool: default_download_tool(),
            subtitle_language: default_subtitle_language(),
            timeout_secs: default_download_timeout_secs(),
        }
    }
}

/// Folder watch settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct WatchConfig {
    /// Extension of the videos that trigger a run
    #[serde(default = "default_watch_extension")]
    pub extension: String,

    /// Processing window start passed to each run
    #[serde(default = "default_window_start")]
    pub window_start: String,

    /// Processing window end passed to each run
    #[serde(default = "default_window_end")]
    pub window_end: String,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            extension: default_watch_extension(),
            window_start: default_window_start(),
            window_end: default_window_end(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Name as accepted by `--log-level`
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl From<&LogLevel> for log::LevelFilter {
    fn from(level: &LogLevel) -> Self {
        match level {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_language() -> String {
    "en".to_string()
}

fn default_target_ratio() -> f64 {
    0.25 // a quarter of the original
}

fn default_max_iterations() -> usize {
    500
}

fn default_smoothing() -> f64 {
    0.4
}

fn default_min_dimensions() -> usize {
    3
}

fn default_reduction_ratio() -> f64 {
    1.0
}

fn default_output_suffix() -> String {
    "_summarised".to_string()
}

fn default_output_extension() -> String {
    "mp4".to_string()
}

fn default_video_codec() -> String {
    "libx264".to_string()
}

fn default_audio_codec() -> String {
    "aac".to_string()
}

fn default_scale_divisor() -> u32 {
    2
}

fn default_render_timeout_secs() -> u64 {
    3600
}

fn default_ffmpeg_path() -> String {
    "ffmpeg".to_string()
}

fn default_ffprobe_path() -> String {
    "ffprobe".to_string()
}

fn default_download_tool() -> String {
    "yt-dlp".to_string()
}

fn default_subtitle_language() -> String {
    "en".to_string()
}

fn default_download_timeout_secs() -> u64 {
    1800
}

fn default_watch_extension() -> String {
    "mp4".to_string()
}

fn default_window_start() -> String {
    "00:00:00".to_string()
}

fn default_window_end() -> String {
    "00:05:00".to_string()
}

impl Config {
    /// Load the configuration file, writing a default one if it is missing
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            let file = File::open(path)
                .with_context(|| format!("Failed to open config file: {}", path.display()))?;
            let reader = BufReader::new(file);
            return serde_json::from_reader(reader)
                .with_context(|| format!("Failed to parse config file: {}", path.display()));
        }

        warn!("Config file not found at '{}', creating default config.", path.display());
        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write default config to file: {}", path.display()))?;

        Ok(config)
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        crate::language_utils::resolve_language(&self.language)?;

        let ratio = self.summary.target_ratio;
        if !(ratio > 0.0 && ratio <= 1.0) {
            return Err(anyhow!("summary.target_ratio must be in (0, 1], got {}", ratio));
        }
        if self.summary.max_iterations == 0 {
            return Err(anyhow!("summary.max_iterations must be at least 1"));
        }

        if !(0.0..1.0).contains(&self.scorer.smoothing) {
            return Err(anyhow!("scorer.smoothing must be in [0, 1), got {}", self.scorer.smoothing));
        }
        if !(self.scorer.reduction_ratio > 0.0 && self.scorer.reduction_ratio <= 1.0) {
            return Err(anyhow!(
                "scorer.reduction_ratio must be in (0, 1], got {}",
                self.scorer.reduction_ratio
            ));
        }

        if self.render.scale_divisor == 0 {
            return Err(anyhow!("render.scale_divisor must be at least 1"));
        }
        if self.render.output_suffix.is_empty() {
            return Err(anyhow!("render.output_suffix must not be empty"));
        }

        let start = Cue::parse_timestamp(&self.watch.window_start)
            .context("Invalid watch.window_start")?;
        let end = Cue::parse_timestamp(&self.watch.window_end)
            .context("Invalid watch.window_end")?;
        if end <= start {
            return Err(anyhow!("watch.window_end must be after watch.window_start"));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            language: default_language(),
            summary: SummaryConfig::default(),
            scorer: ScorerConfig::default(),
            render: RenderConfig::default(),
            download: DownloadConfig::default(),
            watch: WatchConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
