use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use anyhow::{anyhow, Context, Result};
use log::{debug, error, info, warn};
use notify::event::{CreateKind, ModifyKind, RenameMode};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use crate::app_config::WatchConfig;
use crate::file_utils::FileManager;
use crate::worker::{WorkerJob, WorkerOverrides};

// @module: Folder trigger that starts a worker for every new video

const DEBOUNCE: Duration = Duration::from_secs(2);

// @struct: Watches one directory for new videos
pub struct FolderWatcher {
    // @field: Directory being watched
    dir: PathBuf,
    // @field: Extension and processing window
    config: WatchConfig,
    // @field: Suffix of rendered summaries, which must not trigger a run
    output_suffix: String,
    // @field: Passed on to every worker
    overrides: WorkerOverrides,
    // @field: Last trigger per path
    recent: HashMap<PathBuf, Instant>,
}

impl FolderWatcher {
    pub fn new<P: AsRef<Path>>(
        dir: P,
        config: WatchConfig,
        output_suffix: impl Into<String>,
        overrides: WorkerOverrides,
    ) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            config,
            output_suffix: output_suffix.into(),
            overrides,
            recent: HashMap::new(),
        }
    }

    /// Videos in `event` that should start a run
    pub fn triggered_paths(&self, event: &Event) -> Vec<PathBuf> {
        let created = matches!(
            event.kind,
            EventKind::Create(CreateKind::File | CreateKind::Any)
                | EventKind::Modify(ModifyKind::Name(RenameMode::To))
        );
        if !created {
            return Vec::new();
        }

        event
            .paths
            .iter()
            .filter(|path| FileManager::has_extension(path, &self.config.extension))
            .filter(|path| !self.is_own_output(path))
            .cloned()
            .collect()
    }

    /// Hidden render staging files and finished summaries
    fn is_own_output(&self, path: &Path) -> bool {
        let hidden = path
            .file_name()
            .is_some_and(|name| name.to_string_lossy().starts_with('.'));
        let summary = !self.output_suffix.is_empty()
            && path
                .file_stem()
                .is_some_and(|stem| stem.to_string_lossy().ends_with(&self.output_suffix));
        hidden || summary
    }

    /// Record a trigger for `path`, returning false if it fired within the debounce window
    pub fn should_trigger(&mut self, path: &Path, now: Instant) -> bool {
        if let Some(last) = self.recent.get(path) {
            if now.duration_since(*last) < DEBOUNCE {
                return false;
            }
        }
        self.recent.insert(path.to_path_buf(), now);
        self.recent.retain(|_, seen| now.duration_since(*seen) < DEBOUNCE * 30);
        true
    }

    /// Worker invocation for a new video
    pub fn job_for(&self, video: &Path) -> WorkerJob {
        WorkerJob::new(video, FileManager::sibling_subtitle_path(video))
            .with_window(self.config.window_start.clone(), self.config.window_end.clone())
            .with_overrides(&self.overrides)
    }

    /// Watch until the process is interrupted or the watcher fails
    pub async fn run(mut self) -> Result<()> {
        if !self.dir.is_dir() {
            return Err(anyhow!("Watch directory does not exist: {:?}", self.dir));
        }

        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut watcher = RecommendedWatcher::new(
            move |result: notify::Result<Event>| {
                if tx.send(result).is_err() {
                    debug!("Watch channel closed, dropping event");
                }
            },
            notify::Config::default(),
        )
        .context("Failed to create folder watcher")?;

        watcher
            .watch(&self.dir, RecursiveMode::NonRecursive)
            .with_context(|| format!("Failed to watch {:?}", self.dir))?;
        info!("Watching {:?} for new .{} files", self.dir, self.config.extension);

        loop {
            tokio::select! {
                received = rx.recv() => {
                    match received {
                        Some(Ok(event)) => self.handle(&event),
                        Some(Err(e)) => warn!("Folder watcher error: {}", e),
                        None => break,
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("Stopping folder watch");
                    break;
                }
            }
        }

        Ok(())
    }

    fn handle(&mut self, event: &Event) {
        for video in self.triggered_paths(event) {
            if !self.should_trigger(&video, Instant::now()) {
                debug!("Ignoring repeated event for {:?}", video);
                continue;
            }

            info!("New video {:?}, starting a summary run", video);
            if let Err(e) = self.job_for(&video).spawn_detached() {
                error!("{:#}", e);
            }
        }
    }
}
