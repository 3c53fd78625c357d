/*!
 * External media collaborators.
 *
 * Everything here shells out to a command line tool and never decodes media
 * in-process:
 *
 * - `probe`: container duration and frame size via ffprobe
 * - `assembler`: cutting, concatenating and downscaling regions via ffmpeg
 * - `download`: fetching a video and its captions from a URL via yt-dlp
 */

use std::ffi::OsStr;
use std::process::Output;
use std::time::Duration;
use log::debug;
use tokio::process::Command;
use crate::errors::MediaError;

pub use self::assembler::{ClipRenderer, FfmpegRenderer};
pub use self::download::{DownloadedMedia, Downloader};
pub use self::probe::VideoInfo;

pub mod assembler;
pub mod download;
pub mod probe;

/// Run a tool to completion, killing it if it outlives `timeout`
pub(crate) async fn run_tool<I, S>(program: &str, args: I, timeout: Duration) -> Result<Output, MediaError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut command = Command::new(program);
    command.args(args).kill_on_drop(true);
    debug!("Running {:?}", command.as_std());

    let future = command.output();
    tokio::select! {
        result = future => {
            result.map_err(|e| MediaError::ToolMissing {
                tool: program.to_string(),
                message: e.to_string(),
            })
        },
        _ = tokio::time::sleep(timeout) => {
            Err(MediaError::Timeout {
                tool: program.to_string(),
                secs: timeout.as_secs(),
            })
        }
    }
}

/// Filter ffmpeg stderr to only show meaningful error lines, stripping the
/// version banner, build configuration, and stream metadata noise.
pub(crate) fn filter_ffmpeg_stderr(stderr: &str) -> String {
    let noise_prefixes = [
        "ffmpeg version",
        "ffprobe version",
        "built with",
        "configuration:",
        "lib",
        "Input #",
        "Metadata:",
        "Duration:",
        "Chapter",
        "Stream #",
        "title",
        "encoder",
        "Output #",
        "Stream mapping:",
        "Press [q]",
        "frame=",
        "size=",
    ];

    let meaningful: Vec<&str> = stderr
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| !noise_prefixes.iter().any(|p| line.starts_with(p)))
        .collect();

    if meaningful.is_empty() {
        "unknown ffmpeg error (stderr was empty after filtering)".to_string()
    } else {
        meaningful.join("\n")
    }
}
