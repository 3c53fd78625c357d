// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow};
use log::{error, info, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;
use clap::{Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use vidsum::app_config::{self, Config};
use vidsum::app_controller::{Controller, RunOutcome, SummaryRequest};
use vidsum::file_utils::FileManager;
use vidsum::worker::WorkerOverrides;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Summarize every new video dropped into a directory
    Watch {
        /// Directory to watch
        #[arg(value_name = "DIR")]
        dir: PathBuf,
    },

    /// Generate shell completions for vidsum
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// vidsum - subtitle-driven video summaries
///
/// Keeps the subtitle cues an extractive summarizer ranks highest and cuts
/// the video down to their time ranges.
#[derive(Parser, Debug)]
#[command(name = "vidsum")]
#[command(version)]
#[command(about = "Shorten a video to its most important subtitled moments")]
#[command(long_about = "vidsum ranks subtitle sentences with latent semantic analysis and keeps the
best ones until their combined length reaches a quarter (configurable) of the video.

EXAMPLES:
    vidsum -i talk.mp4 -s talk.srt                   # Write talk_summarised.mp4
    vidsum -i talk.mp4                               # Subtitles default to talk.srt
    vidsum -i talk.mp4 --end-time 00:05:00           # Only the first five minutes
    vidsum -i talk.mp4 --dry-run                     # Print the selected regions as JSON
    vidsum -u https://youtu.be/dQw4w9WgXcQ -k        # Download, summarize, keep the download
    vidsum watch ~/incoming                          # Summarize new .mp4 files as they appear
    vidsum completions bash > vidsum.bash            # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input video file
    #[arg(short = 'i', long, value_name = "VIDEO", conflicts_with = "url")]
    input_video: Option<PathBuf>,

    /// Subtitle file for the input video (defaults to VIDEO with an .srt extension)
    #[arg(short = 's', long, value_name = "SUBS", requires = "input_video")]
    subtitles: Option<PathBuf>,

    /// Video URL to download and summarize
    #[arg(short = 'u', long, conflicts_with_all = ["input_video", "subtitles"])]
    url: Option<String>,

    /// Keep the downloaded video and subtitles
    #[arg(short = 'k', long, requires = "url")]
    keep_original_file: bool,

    /// Processing window start (HH:MM:SS)
    #[arg(long, value_name = "TIME")]
    start_time: Option<String>,

    /// Processing window end (HH:MM:SS)
    #[arg(long, value_name = "TIME")]
    end_time: Option<String>,

    /// Source duration in seconds, skips probing the video
    #[arg(long, value_name = "SECS")]
    duration: Option<f64>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Print the selected regions as JSON instead of rendering
    #[arg(long)]
    dry_run: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json", global = true)]
    config_path: PathBuf,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,

    /// Summary language code or English name (e.g., 'en', 'fr', 'german')
    #[arg(long, global = true)]
    language: Option<String>,

    /// Fraction of the original duration to keep
    #[arg(long, global = true)]
    ratio: Option<f64>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        // Filtering is left to log::max_level so it can change after init
        let logger = Box::new(CustomLogger::new(LevelFilter::Trace));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji and ANSI color for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("❌", "1;31"),
            Level::Warn => ("🚧", "1;33"),
            Level::Info => ("🎬", "1;32"),
            Level::Debug => ("🔍", "1;36"),
            Level::Trace => ("📋", "1;35"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (emoji, color) = Self::style_for_level(record.level());
            let _ = writeln!(
                std::io::stderr(),
                "\x1B[{}m{} {} {}\x1B[0m",
                color, now, emoji, record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Info until the config says otherwise
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    if let Some(Commands::Completions { shell }) = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "vidsum", &mut std::io::stdout());
        return Ok(());
    }

    match run(cli).await {
        Ok(true) => Ok(()),
        Ok(false) => std::process::exit(1),
        Err(e) => {
            error!("{:#}", e);
            std::process::exit(1);
        }
    }
}

/// Load the configuration and apply command line overrides
fn load_config(options: &CommandLineOptions) -> Result<Config> {
    if let Some(cli_level) = &options.log_level {
        let level: app_config::LogLevel = cli_level.clone().into();
        log::set_max_level(LevelFilter::from(&level));
    }

    let mut config = Config::load_or_create(&options.config_path)?;

    if let Some(language) = &options.language {
        config.language = language.clone();
    }
    if let Some(ratio) = options.ratio {
        config.summary.target_ratio = ratio;
    }
    match &options.log_level {
        Some(level) => config.log_level = level.clone().into(),
        None => log::set_max_level(LevelFilter::from(&config.log_level)),
    }

    Ok(config)
}

/// Config path and command line overrides a worker process must repeat
fn worker_overrides(options: &CommandLineOptions) -> WorkerOverrides {
    WorkerOverrides {
        config_path: Some(options.config_path.clone()),
        language: options.language.clone(),
        ratio: options.ratio,
        log_level: options.log_level.clone().map(Into::into),
    }
}

/// Dispatch to the selected mode, returning false on a reported failure
async fn run(options: CommandLineOptions) -> Result<bool> {
    let config = load_config(&options)?;
    let controller = Controller::with_config(config)?;

    if let Some(Commands::Watch { dir }) = &options.command {
        controller.watch(dir, &worker_overrides(&options)).await?;
        return Ok(true);
    }

    if let Some(url) = &options.url {
        return controller
            .run_url(url, options.keep_original_file, options.force_overwrite, &worker_overrides(&options))
            .await;
    }

    let video = options
        .input_video
        .clone()
        .ok_or_else(|| anyhow!("Either --input-video or --url is required"))?;
    let subtitles = options
        .subtitles
        .clone()
        .unwrap_or_else(|| FileManager::sibling_subtitle_path(&video));

    let request = SummaryRequest {
        start_time: options.start_time.clone(),
        end_time: options.end_time.clone(),
        duration: options.duration,
        force_overwrite: options.force_overwrite,
        dry_run: options.dry_run,
        ..SummaryRequest::new(&video, &subtitles)
    };

    match controller.summarize(&request).await? {
        RunOutcome::Rendered(path) => info!("Summary written to {}", path.display()),
        RunOutcome::Skipped(path) => info!("Kept existing summary {}", path.display()),
        RunOutcome::DryRun(summary) => info!("Dry run selected {} regions", summary.regions.len()),
    }
    Ok(true)
}
