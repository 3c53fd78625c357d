/*!
 * Worker process dispatch.
 *
 * A summarize-and-render run for one video happens in a child process running
 * this same executable, so a crash or a long render in one run never stalls
 * the side that accepts new videos (URL intake, folder watch).
 */

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use anyhow::{Context, Result};
use log::{debug, error, info};
use tokio::process::{Child, Command};
use crate::app_config::LogLevel;

/// Settings the parent applied on top of its config file.
///
/// The child reloads the config file on its own, so anything the parent's
/// command line changed has to be forwarded as flags.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkerOverrides {
    // @field: Configuration file the parent was started with
    pub config_path: Option<PathBuf>,
    // @field: --language
    pub language: Option<String>,
    // @field: --ratio
    pub ratio: Option<f64>,
    // @field: --log-level
    pub log_level: Option<LogLevel>,
}

impl WorkerOverrides {
    /// Global flags reproducing these settings in a child process
    pub fn args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = Vec::new();
        if let Some(config) = &self.config_path {
            args.push("--config-path".into());
            args.push(config.clone().into());
        }
        if let Some(language) = &self.language {
            args.push("--language".into());
            args.push(language.into());
        }
        if let Some(ratio) = self.ratio {
            args.push("--ratio".into());
            args.push(ratio.to_string().into());
        }
        if let Some(level) = &self.log_level {
            args.push("--log-level".into());
            args.push(level.as_str().into());
        }
        args
    }
}

/// Arguments of one worker run: `-i VIDEO -s SUBS [--start-time T] [--end-time T]`
#[derive(Debug, Clone, PartialEq)]
pub struct WorkerJob {
    // @field: Source video
    pub video: PathBuf,
    // @field: Caption file for the video
    pub subtitles: PathBuf,
    // @field: Processing window, `HH:MM:SS[,mmm]`
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    // @field: Config file and command line overrides of the parent
    pub overrides: WorkerOverrides,
    // @field: Overwrite an existing summary
    pub force_overwrite: bool,
}

impl WorkerJob {
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(video: P, subtitles: Q) -> Self {
        Self {
            video: video.as_ref().to_path_buf(),
            subtitles: subtitles.as_ref().to_path_buf(),
            start_time: None,
            end_time: None,
            overrides: WorkerOverrides::default(),
            force_overwrite: false,
        }
    }

    /// Restrict the run to `[start, end)`
    pub fn with_window(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.start_time = Some(start.into());
        self.end_time = Some(end.into());
        self
    }

    pub fn with_config_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.overrides.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Forward the parent's config file and command line overrides
    pub fn with_overrides(mut self, overrides: &WorkerOverrides) -> Self {
        self.overrides = overrides.clone();
        self
    }

    pub fn with_force_overwrite(mut self, force: bool) -> Self {
        self.force_overwrite = force;
        self
    }

    /// Command line handed to the child
    pub fn args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "-i".into(),
            self.video.clone().into(),
            "-s".into(),
            self.subtitles.clone().into(),
        ];
        if let Some(start) = &self.start_time {
            args.push("--start-time".into());
            args.push(start.into());
        }
        if let Some(end) = &self.end_time {
            args.push("--end-time".into());
            args.push(end.into());
        }
        args.extend(self.overrides.args());
        if self.force_overwrite {
            args.push("--force-overwrite".into());
        }
        args
    }

    fn command(&self) -> Result<Command> {
        let exe = std::env::current_exe().context("Failed to locate the current executable")?;
        let mut command = Command::new(exe);
        command
            .args(self.args())
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        Ok(command)
    }

    /// Start the worker without waiting for it
    pub fn spawn(&self) -> Result<Child> {
        let mut command = self.command()?;
        debug!("Spawning worker {:?}", command.as_std());
        command
            .spawn()
            .with_context(|| format!("Failed to start worker for {:?}", self.video))
    }

    /// Start the worker and reap it from a background task
    pub fn spawn_detached(&self) -> Result<()> {
        let mut child = self.spawn()?;
        let video = self.video.clone();
        tokio::spawn(async move {
            match child.wait().await {
                Ok(status) if status.success() => info!("Worker for {:?} finished", video),
                Ok(status) => error!("Worker for {:?} failed with {}", video, status),
                Err(e) => error!("Lost track of worker for {:?}: {}", video, e),
            }
        });
        Ok(())
    }

    /// Run the worker to completion
    pub async fn run(&self) -> Result<ExitStatus> {
        let mut child = self.spawn()?;
        child
            .wait()
            .await
            .with_context(|| format!("Failed to wait for worker on {:?}", self.video))
    }
}
