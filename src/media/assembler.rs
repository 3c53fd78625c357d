use std::ffi::OsString;
use std::fmt::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use async_trait::async_trait;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use crate::app_config::RenderConfig;
use crate::errors::MediaError;
use crate::summary::Region;
use super::probe::VideoInfo;
use super::{filter_ffmpeg_stderr, run_tool};

// @module: Region concatenation into the summary video

/// Cuts selected regions out of a source video and joins them into a new file
#[async_trait]
pub trait ClipRenderer: Send + Sync {
    /// Duration of the source video in seconds, as reported by its container
    async fn duration(&self, source: &Path) -> Result<f64, MediaError>;

    /// Render `regions`, in the given order, from `source` into `output`.
    ///
    /// `output` either holds the complete render afterwards or is untouched.
    async fn render(&self, source: &Path, regions: &[Region], output: &Path) -> Result<PathBuf, MediaError>;
}

/// `ClipRenderer` backed by a single ffmpeg filter graph
pub struct FfmpegRenderer {
    config: RenderConfig,
}

impl FfmpegRenderer {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Build the `-filter_complex` graph: trim every region, concatenate the
    /// pieces in order, then shrink the frame by `scale_divisor` per axis.
    ///
    /// Output labels are `[vout]` and, with audio, `[aout]`.
    pub fn build_filter_graph(regions: &[Region], has_audio: bool, scale_divisor: u32) -> String {
        let mut graph = String::new();
        let mut inputs = String::new();

        for (i, region) in regions.iter().enumerate() {
            let _ = write!(
                graph,
                "[0:v]trim=start={:.3}:end={:.3},setpts=PTS-STARTPTS[v{i}];",
                region.start, region.end
            );
            let _ = write!(inputs, "[v{i}]");
            if has_audio {
                let _ = write!(
                    graph,
                    "[0:a]atrim=start={:.3}:end={:.3},asetpts=PTS-STARTPTS[a{i}];",
                    region.start, region.end
                );
                let _ = write!(inputs, "[a{i}]");
            }
        }

        let audio_streams = u8::from(has_audio);
        let _ = write!(
            graph,
            "{inputs}concat=n={}:v=1:a={audio_streams}[vcat]{};",
            regions.len(),
            if has_audio { "[aout]" } else { "" }
        );

        // Even dimensions keep yuv420p encoders happy
        let divisor = scale_divisor.max(1) * 2;
        let _ = write!(graph, "[vcat]scale=trunc(iw/{divisor})*2:trunc(ih/{divisor})*2[vout]");
        graph
    }

    /// Full ffmpeg argument list for one render
    pub fn build_args(&self, source: &Path, regions: &[Region], has_audio: bool, destination: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["-y".into(), "-v".into(), "error".into(), "-i".into(), source.into()];

        args.push("-filter_complex".into());
        args.push(Self::build_filter_graph(regions, has_audio, self.config.scale_divisor).into());

        let mut flags = vec!["-map", "[vout]", "-c:v", self.config.video_codec.as_str()];
        if has_audio {
            flags.extend(["-map", "[aout]", "-c:a", self.config.audio_codec.as_str()]);
        }
        flags.extend(["-movflags", "+faststart"]);
        args.extend(flags.into_iter().map(OsString::from));
        args.push(destination.into());
        args
    }

    fn spinner(message: String) -> ProgressBar {
        let spinner = ProgressBar::new_spinner();
        let style = ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        spinner.set_style(style);
        spinner.set_message(message);
        spinner.enable_steady_tick(Duration::from_millis(120));
        spinner
    }
}

#[async_trait]
impl ClipRenderer for FfmpegRenderer {
    async fn duration(&self, source: &Path) -> Result<f64, MediaError> {
        Ok(VideoInfo::probe(&self.config.ffprobe_path, source).await?.duration_secs)
    }

    async fn render(&self, source: &Path, regions: &[Region], output: &Path) -> Result<PathBuf, MediaError> {
        // Zero-length cuts add nothing and make concat reject the graph
        let regions: Vec<Region> = regions.iter().copied().filter(|r| r.duration() > 0.0).collect();
        if regions.is_empty() {
            return Err(MediaError::NoRegions);
        }

        let info = VideoInfo::probe(&self.config.ffprobe_path, source).await?;
        if !info.has_audio {
            warn!("{:?} has no audio stream, rendering video only", source);
        }

        let dir = match output.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let extension = output
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_else(|| format!(".{}", self.config.output_extension));

        // Rendered next to the output and only renamed into place on success;
        // dropping the handle on any error path deletes the partial file.
        let staging = tempfile::Builder::new()
            .prefix(".vidsum-")
            .suffix(&extension)
            .tempfile_in(&dir)
            .map_err(|e| MediaError::RenderFailed(format!("Failed to create temporary file in {:?}: {}", dir, e)))?;

        let args = self.build_args(source, &regions, info.has_audio, staging.path());
        debug!("Rendering {} regions into {:?}", regions.len(), staging.path());

        let spinner = Self::spinner(format!("Rendering {} clips", regions.len()));
        let result = run_tool(
            &self.config.ffmpeg_path,
            &args,
            Duration::from_secs(self.config.timeout_secs),
        )
        .await;
        spinner.finish_and_clear();

        let rendered = result?;
        if !rendered.status.success() {
            let stderr = String::from_utf8_lossy(&rendered.stderr);
            return Err(MediaError::RenderFailed(filter_ffmpeg_stderr(&stderr)));
        }

        staging
            .persist(output)
            .map_err(|e| MediaError::RenderFailed(format!("Failed to move render into {:?}: {}", output, e.error)))?;

        info!(
            "Rendered {:?} at {}x{}",
            output,
            info.width / self.config.scale_divisor.max(1),
            info.height / self.config.scale_divisor.max(1)
        );
        Ok(output.to_path_buf())
    }
}
