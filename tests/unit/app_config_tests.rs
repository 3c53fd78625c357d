/*!
 * Tests for application configuration functionality
 */

use anyhow::Result;
use vidsum::app_config::{Config, LogLevel};
use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.language, "en");
    assert_eq!(config.summary.target_ratio, 0.25);
    assert_eq!(config.summary.max_iterations, 500);
    assert_eq!(config.scorer.smoothing, 0.4);
    assert_eq!(config.render.output_suffix, "_summarised");
    assert_eq!(config.render.output_extension, "mp4");
    assert_eq!(config.render.scale_divisor, 2);
    assert_eq!(config.download.tool, "yt-dlp");
    assert_eq!(config.watch.window_end, "00:05:00");
    assert_eq!(config.log_level, LogLevel::Info);
    assert!(config.validate().is_ok());
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();

    config.language = "xyz".to_string();
    assert!(config.validate().is_err());
    config.language = "german".to_string();
    assert!(config.validate().is_ok());
    config.language = "en".to_string();

    config.summary.target_ratio = 0.0;
    assert!(config.validate().is_err());
    config.summary.target_ratio = 1.5;
    assert!(config.validate().is_err());
    config.summary.target_ratio = 1.0;
    assert!(config.validate().is_ok());

    config.summary.max_iterations = 0;
    assert!(config.validate().is_err());
    config.summary.max_iterations = 10;

    config.render.scale_divisor = 0;
    assert!(config.validate().is_err());
    config.render.scale_divisor = 2;

    config.watch.window_end = "00:00:00".to_string();
    assert!(config.validate().is_err());
    config.watch.window_end = "later".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_loadOrCreate_withMissingFile_shouldWriteDefaults() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = dir.path().join("conf.json");

    let config = Config::load_or_create(&path)?;
    assert!(path.exists());
    assert_eq!(config.language, "en");

    let reloaded = Config::load_or_create(&path)?;
    assert_eq!(reloaded.summary.target_ratio, config.summary.target_ratio);
    Ok(())
}

#[test]
fn test_loadOrCreate_withPartialFile_shouldFillDefaults() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        dir.path(),
        "conf.json",
        r#"{"language": "fr", "summary": {"target_ratio": 0.5}, "log_level": "debug"}"#,
    )?;

    let config = Config::load_or_create(&path)?;
    assert_eq!(config.language, "fr");
    assert_eq!(config.summary.target_ratio, 0.5);
    assert_eq!(config.summary.max_iterations, 500);
    assert_eq!(config.render.video_codec, "libx264");
    assert_eq!(config.log_level, LogLevel::Debug);
    Ok(())
}

#[test]
fn test_loadOrCreate_withBrokenJson_shouldFail() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = common::create_test_file(dir.path(), "conf.json", "{ not json")?;
    assert!(Config::load_or_create(&path).is_err());
    Ok(())
}

#[test]
fn test_logLevel_conversion_shouldMapToFilter() {
    assert_eq!(log::LevelFilter::from(&LogLevel::Warn), log::LevelFilter::Warn);
    assert_eq!(log::LevelFilter::from(&LogLevel::Trace), log::LevelFilter::Trace);
}
