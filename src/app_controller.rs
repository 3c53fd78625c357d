use anyhow::{anyhow, Context, Result};
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};
use std::time::Instant;
use crate::app_config::Config;
use crate::file_utils::{FileManager, FileType};
use crate::language_utils;
use crate::media::{ClipRenderer, Downloader, FfmpegRenderer};
use crate::subtitle_processor::{Cue, SubtitleTrack};
use crate::summary::{DurationController, LsaScorer, Summary};
use crate::watcher::FolderWatcher;
use crate::worker::{WorkerJob, WorkerOverrides};

// @module: Application controller for video summaries

/// One summarize-and-render run
#[derive(Debug, Clone, Default)]
pub struct SummaryRequest {
    // @field: Source video
    pub video: PathBuf,
    // @field: Caption file
    pub subtitles: PathBuf,
    // @field: Processing window start, `HH:MM:SS[,mmm]`
    pub start_time: Option<String>,
    // @field: Processing window end
    pub end_time: Option<String>,
    // @field: Known source duration in seconds, skips probing
    pub duration: Option<f64>,
    // @field: Overwrite an existing summary
    pub force_overwrite: bool,
    // @field: Print the selected regions instead of rendering
    pub dry_run: bool,
}

impl SummaryRequest {
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(video: P, subtitles: Q) -> Self {
        Self {
            video: video.as_ref().to_path_buf(),
            subtitles: subtitles.as_ref().to_path_buf(),
            ..Self::default()
        }
    }
}

/// How a run ended when it did not fail
#[derive(Debug)]
pub enum RunOutcome {
    /// Summary written to this path
    Rendered(PathBuf),
    /// Summary already existed and overwriting was not requested
    Skipped(PathBuf),
    /// Regions were selected but nothing was rendered
    DryRun(Summary),
}

/// Main application controller
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Clip assembler used for probing and rendering
    renderer: Box<dyn ClipRenderer>,
}

impl Controller {
    // @method: Create a controller rendering with ffmpeg
    pub fn with_config(config: Config) -> Result<Self> {
        let renderer = Box::new(FfmpegRenderer::new(config.render.clone()));
        Self::with_renderer(config, renderer)
    }

    /// Create a controller with a custom clip assembler
    pub fn with_renderer(config: Config, renderer: Box<dyn ClipRenderer>) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;
        debug!(
            "Summarizing in {}",
            language_utils::get_language_name(&config.language).unwrap_or_else(|_| config.language.clone())
        );
        Ok(Self { config, renderer })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Where the summary of `video` is written
    pub fn output_path(&self, video: &Path) -> PathBuf {
        FileManager::generate_output_path(video, &self.config.render.output_suffix, &self.config.render.output_extension)
    }

    /// Pick the regions of `cues` whose total duration crosses `target` seconds
    pub fn select_regions(&self, cues: &[Cue], target: f64) -> Result<Summary> {
        let scorer = LsaScorer::new(&self.config.language, &self.config.scorer)?;
        let controller = DurationController::new(&scorer, self.config.summary.max_iterations);
        let summary = controller.find_summary_regions(cues, target)?;
        Ok(summary)
    }

    /// Run the whole pipeline for one video
    pub async fn summarize(&self, request: &SummaryRequest) -> Result<RunOutcome> {
        let start_time = Instant::now();

        if !request.video.exists() {
            return Err(anyhow!("Input video does not exist: {:?}", request.video));
        }

        if FileManager::detect_file_type(&request.video) != FileType::Video {
            warn!("{:?} does not have a known video extension, trying anyway", request.video);
        }

        let output_path = self.output_path(&request.video);
        if output_path.exists() && !request.force_overwrite && !request.dry_run {
            warn!("Skipping {:?}, summary already exists (use -f to force overwrite)", request.video);
            return Ok(RunOutcome::Skipped(output_path));
        }

        let track = SubtitleTrack::load(&request.subtitles)
            .with_context(|| format!("Failed to load subtitles from {:?}", request.subtitles))?;
        debug!("{}", track);

        let window_start = parse_optional_timestamp(request.start_time.as_deref())?.unwrap_or(0);
        let window_end = parse_optional_timestamp(request.end_time.as_deref())?;
        if window_end.is_some_and(|end| end <= window_start) {
            return Err(anyhow!("End time must be after start time"));
        }
        let track = track.window(window_start, window_end);

        let video_duration = match request.duration {
            Some(duration) => duration,
            None => self
                .renderer
                .duration(&request.video)
                .await
                .with_context(|| format!("Failed to read the duration of {:?}", request.video))?,
        };
        if track.span_secs() > video_duration {
            warn!(
                "Subtitles run to {:.2}s but the video is only {:.2}s long",
                track.span_secs(),
                video_duration
            );
        }
        let effective = effective_duration(video_duration, window_start, window_end);
        let target = effective * self.config.summary.target_ratio;
        info!(
            "Summarizing {} cues of {:?}: {} down to {}",
            track.cues.len(),
            request.video,
            Self::format_duration(effective),
            Self::format_duration(target)
        );

        let summary = self.select_regions(&track.cues, target)?;
        info!(
            "Selected {} cues in {} iterations (requested {:.2}): {:.2}s against a {:.2}s target",
            summary.cue_indices.len(),
            summary.iterations,
            summary.requested_count,
            summary.total_time,
            summary.target
        );

        if summary.is_empty() && !request.dry_run {
            return Err(anyhow!("No regions selected for a {:.2}s target, nothing to render", target));
        }

        if request.dry_run {
            let json = serde_json::to_string_pretty(&summary).context("Failed to serialize summary")?;
            println!("{}", json);
            return Ok(RunOutcome::DryRun(summary));
        }

        let rendered = self
            .renderer
            .render(&request.video, &summary.regions, &output_path)
            .await
            .with_context(|| format!("Failed to render {:?}", output_path))?;

        info!(
            "Success: {} ({})",
            rendered.display(),
            Self::format_duration(start_time.elapsed().as_secs_f64())
        );
        Ok(RunOutcome::Rendered(rendered))
    }

    /// Download a video with its captions and summarize it in a worker.
    ///
    /// Download failures are logged and reported as `Ok(false)`.
    pub async fn run_url(&self, url: &str, keep_original: bool, force_overwrite: bool, overrides: &WorkerOverrides) -> Result<bool> {
        let work_dir = std::env::current_dir().context("Failed to read the working directory")?;
        let downloader = Downloader::new(self.config.download.clone());

        let media = match downloader.download(url, &work_dir).await {
            Ok(media) => media,
            Err(e) => {
                error!("{}", e);
                return Ok(false);
            }
        };

        let job = WorkerJob::new(&media.video, &media.subtitles)
            .with_overrides(overrides)
            .with_force_overwrite(force_overwrite);
        let result = job.run().await;

        if !keep_original {
            for file in media.files() {
                if let Err(e) = FileManager::remove_if_exists(file) {
                    warn!("{:#}", e);
                }
            }
        }

        let status = result?;
        if !status.success() {
            error!("Summary of {} failed ({})", url, status);
        }
        Ok(status.success())
    }

    /// Summarize every new video that appears in `dir`
    pub async fn watch(&self, dir: &Path, overrides: &WorkerOverrides) -> Result<()> {
        let watcher = FolderWatcher::new(
            dir,
            self.config.watch.clone(),
            self.config.render.output_suffix.clone(),
            overrides.clone(),
        );
        watcher.run().await
    }

    // Format seconds in a human-readable format
    pub fn format_duration(secs: f64) -> String {
        let secs = secs.max(0.0);
        let total_seconds = secs as u64;
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{:.3}s", secs)
        }
    }
}

fn parse_optional_timestamp(timestamp: Option<&str>) -> Result<Option<u64>> {
    timestamp
        .map(|t| Cue::parse_timestamp(t).context("Invalid processing window"))
        .transpose()
}

/// Length of the processing window clipped to the video, in seconds
pub fn effective_duration(video_secs: f64, window_start_ms: u64, window_end_ms: Option<u64>) -> f64 {
    let start = window_start_ms as f64 / 1000.0;
    let end = window_end_ms.map_or(video_secs, |end| (end as f64 / 1000.0).min(video_secs));
    (end - start).max(0.0)
}
