use std::path::{Path, PathBuf};
use std::time::Duration;
use log::{debug, info};
use url::Url;
use crate::app_config::DownloadConfig;
use crate::errors::DownloadError;
use crate::file_utils::FileManager;
use super::run_tool;

// @module: Video and caption download through yt-dlp

/// Files produced by one download
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadedMedia {
    pub video: PathBuf,
    pub subtitles: PathBuf,
}

impl DownloadedMedia {
    /// Every file the download created
    pub fn files(&self) -> [&Path; 2] {
        [&self.video, &self.subtitles]
    }
}

// @struct: yt-dlp front end
pub struct Downloader {
    config: DownloadConfig,
}

impl Downloader {
    pub fn new(config: DownloadConfig) -> Self {
        Self { config }
    }

    /// Parse and check a source URL
    pub fn parse_url(raw: &str) -> Result<Url, DownloadError> {
        let url = Url::parse(raw.trim()).map_err(|e| DownloadError::InvalidUrl(format!("{}: {}", raw, e)))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(DownloadError::InvalidUrl(format!("unsupported scheme '{}'", other))),
        }
    }

    /// Stable file name for a video URL.
    ///
    /// YouTube watch URLs use the `v` query value, `youtu.be` links their
    /// path, anything else the last path segment.
    pub fn video_id(url: &Url) -> Result<String, DownloadError> {
        let from_query = url
            .query_pairs()
            .find(|(key, _)| key == "v")
            .map(|(_, value)| value.into_owned());

        let id = from_query.or_else(|| {
            url.path_segments()
                .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
                .map(str::to_string)
        });

        let id = id
            .map(|id| id.chars().filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_').collect::<String>())
            .filter(|id| !id.is_empty())
            .ok_or_else(|| DownloadError::InvalidUrl(format!("no video id in {}", url)))?;

        Ok(id)
    }

    fn build_args(&self, url: &Url, id: &str, work_dir: &Path) -> Vec<String> {
        let template = work_dir.join(format!("{}.%(ext)s", id));
        vec![
            "-f".to_string(),
            "mp4/bestvideo+bestaudio/best".to_string(),
            "--merge-output-format".to_string(),
            "mp4".to_string(),
            "-o".to_string(),
            template.to_string_lossy().to_string(),
            "--write-subs".to_string(),
            "--write-auto-subs".to_string(),
            "--sub-langs".to_string(),
            self.config.subtitle_language.clone(),
            "--convert-subs".to_string(),
            "srt".to_string(),
            "--no-playlist".to_string(),
            url.to_string(),
        ]
    }

    /// Fetch the video and its captions into `work_dir`
    pub async fn download(&self, raw_url: &str, work_dir: &Path) -> Result<DownloadedMedia, DownloadError> {
        let url = Self::parse_url(raw_url)?;
        let id = Self::video_id(&url)?;
        FileManager::ensure_dir(work_dir).map_err(|e| DownloadError::ToolFailed(e.to_string()))?;

        info!("Downloading {} as '{}'", url, id);
        let output = run_tool(
            &self.config.tool,
            self.build_args(&url, &id, work_dir),
            Duration::from_secs(self.config.timeout_secs),
        )
        .await
        .map_err(|e| DownloadError::ToolFailed(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let last_line = stderr.lines().rev().find(|l| !l.trim().is_empty()).unwrap_or("no output");
            return Err(DownloadError::ToolFailed(format!("{} exited with {}: {}", self.config.tool, output.status, last_line)));
        }

        let video = work_dir.join(format!("{}.mp4", id));
        if !FileManager::file_exists(&video) {
            return Err(DownloadError::MissingArtifact(video.display().to_string()));
        }

        // yt-dlp names captions `<id>.<lang>.srt`
        let subtitles = FileManager::find_files(work_dir, "srt")
            .map_err(|e| DownloadError::ToolFailed(e.to_string()))?
            .into_iter()
            .find(|path| {
                path.file_name()
                    .map(|name| name.to_string_lossy().starts_with(&format!("{}.", id)))
                    .unwrap_or(false)
            })
            .ok_or_else(|| DownloadError::MissingArtifact(format!("captions for '{}'", id)))?;

        debug!("Downloaded {:?} with captions {:?}", video, subtitles);
        Ok(DownloadedMedia { video, subtitles })
    }
}
