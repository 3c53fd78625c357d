/*!
 * Integration tests for application lifecycle
 */

use anyhow::Result;
use vidsum::app_config::Config;
use vidsum::app_controller::{Controller, RunOutcome, SummaryRequest};
use vidsum::worker::WorkerOverrides;
use crate::common;
use crate::common::mock_media::MockRenderer;

fn controller_with(renderer: &MockRenderer) -> Result<Controller> {
    Controller::with_renderer(Config::default(), Box::new(renderer.clone()))
}

/// Test the controller initialization with default config
#[test]
fn test_controller_initialization_withDefaultConfig_shouldSucceed() -> Result<()> {
    let controller = Controller::with_config(Config::default())?;
    assert_eq!(controller.config().language, "en");
    Ok(())
}

#[test]
fn test_controller_withInvalidConfig_shouldFail() {
    let mut config = Config::default();
    config.summary.target_ratio = 2.0;
    assert!(Controller::with_config(config).is_err());
}

#[tokio::test]
async fn test_summarize_withMockRenderer_shouldWriteSuffixedOutput() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let video = common::create_test_file(dir.path(), "talk.mp4", "not really a video")?;
    let subtitles = common::create_test_subtitle(dir.path(), "talk.srt")?;
    let renderer = MockRenderer::new(40.0);
    let controller = controller_with(&renderer)?;

    let outcome = controller.summarize(&SummaryRequest::new(&video, &subtitles)).await?;

    let expected = dir.path().join("talk_summarised.mp4");
    assert!(matches!(&outcome, RunOutcome::Rendered(path) if *path == expected));
    assert!(expected.exists());

    let log = renderer.log();
    let log = log.lock().unwrap();
    assert_eq!(log.duration_calls, 1);
    assert_eq!(log.renders.len(), 1);
    // 40s at a quarter is 10s, reached with three of the four spoken cues
    let total: f64 = log.renders[0].iter().map(|r| r.duration()).sum();
    assert_eq!(log.renders[0].len(), 3);
    assert!(total >= 10.0);
    Ok(())
}

#[tokio::test]
async fn test_summarize_withKnownDuration_shouldSkipProbe() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let video = common::create_test_file(dir.path(), "talk.mp4", "")?;
    let subtitles = common::create_test_subtitle(dir.path(), "talk.srt")?;
    let renderer = MockRenderer::new(999.0);
    let controller = controller_with(&renderer)?;

    let request = SummaryRequest { duration: Some(24.0), ..SummaryRequest::new(&video, &subtitles) };
    controller.summarize(&request).await?;

    assert_eq!(renderer.log().lock().unwrap().duration_calls, 0);
    Ok(())
}

#[tokio::test]
async fn test_summarize_withDryRun_shouldNotRender() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let video = common::create_test_file(dir.path(), "talk.mp4", "")?;
    let subtitles = common::create_test_subtitle(dir.path(), "talk.srt")?;
    let renderer = MockRenderer::new(40.0);
    let controller = controller_with(&renderer)?;

    let request = SummaryRequest { dry_run: true, ..SummaryRequest::new(&video, &subtitles) };
    let outcome = controller.summarize(&request).await?;

    match outcome {
        RunOutcome::DryRun(summary) => {
            assert_eq!(summary.target, 10.0);
            assert!(summary.total_time >= summary.target);
        }
        other => panic!("expected a dry run, got {:?}", other),
    }
    assert!(renderer.log().lock().unwrap().renders.is_empty());
    assert!(!dir.path().join("talk_summarised.mp4").exists());
    Ok(())
}

#[tokio::test]
async fn test_summarize_withExistingOutput_shouldSkipUnlessForced() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let video = common::create_test_file(dir.path(), "talk.mp4", "")?;
    let subtitles = common::create_test_subtitle(dir.path(), "talk.srt")?;
    common::create_test_file(dir.path(), "talk_summarised.mp4", "old")?;
    let renderer = MockRenderer::new(40.0);
    let controller = controller_with(&renderer)?;

    let outcome = controller.summarize(&SummaryRequest::new(&video, &subtitles)).await?;
    assert!(matches!(outcome, RunOutcome::Skipped(_)));
    assert!(renderer.log().lock().unwrap().renders.is_empty());

    let forced = SummaryRequest { force_overwrite: true, ..SummaryRequest::new(&video, &subtitles) };
    let outcome = controller.summarize(&forced).await?;
    assert!(matches!(outcome, RunOutcome::Rendered(_)));
    assert_eq!(std::fs::read_to_string(dir.path().join("talk_summarised.mp4"))?, "3 regions");
    Ok(())
}

#[tokio::test]
async fn test_summarize_withFailingRenderer_shouldLeaveNoOutput() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let video = common::create_test_file(dir.path(), "talk.mp4", "")?;
    let subtitles = common::create_test_subtitle(dir.path(), "talk.srt")?;
    let renderer = MockRenderer::new(40.0).failing();
    let controller = controller_with(&renderer)?;

    let result = controller.summarize(&SummaryRequest::new(&video, &subtitles)).await;
    assert!(result.is_err());
    assert!(!dir.path().join("talk_summarised.mp4").exists());
    Ok(())
}

#[tokio::test]
async fn test_summarize_withEmptySubtitles_shouldFailBeforeRendering() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let video = common::create_test_file(dir.path(), "talk.mp4", "")?;
    let subtitles = common::create_test_file(dir.path(), "talk.srt", "\n\n")?;
    let renderer = MockRenderer::new(40.0);
    let controller = controller_with(&renderer)?;

    let result = controller.summarize(&SummaryRequest::new(&video, &subtitles)).await;
    assert!(result.is_err());
    assert!(renderer.log().lock().unwrap().renders.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_summarize_withWindow_shouldOnlyUseCuesInside() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let video = common::create_test_file(dir.path(), "talk.mp4", "")?;
    let subtitles = common::create_test_subtitle(dir.path(), "talk.srt")?;
    let renderer = MockRenderer::new(40.0);
    let controller = controller_with(&renderer)?;

    let request = SummaryRequest {
        start_time: Some("00:00:00".to_string()),
        end_time: Some("00:00:15".to_string()),
        dry_run: true,
        ..SummaryRequest::new(&video, &subtitles)
    };
    let RunOutcome::DryRun(summary) = controller.summarize(&request).await? else {
        panic!("expected a dry run");
    };

    assert_eq!(summary.target, 3.75);
    assert!(summary.regions.iter().all(|r| r.end <= 15.0));
    Ok(())
}

#[tokio::test]
async fn test_summarize_withReversedWindow_shouldFail() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let video = common::create_test_file(dir.path(), "talk.mp4", "")?;
    let subtitles = common::create_test_subtitle(dir.path(), "talk.srt")?;
    let controller = controller_with(&MockRenderer::new(40.0))?;

    let request = SummaryRequest {
        start_time: Some("00:01:00".to_string()),
        end_time: Some("00:00:30".to_string()),
        ..SummaryRequest::new(&video, &subtitles)
    };
    assert!(controller.summarize(&request).await.is_err());
    Ok(())
}

#[test]
fn test_summarize_withMissingVideo_shouldFail() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let subtitles = common::create_test_subtitle(dir.path(), "talk.srt")?;
    let controller = controller_with(&MockRenderer::new(40.0))?;

    let request = SummaryRequest::new(dir.path().join("missing.mp4"), &subtitles);
    let result = tokio_test::block_on(controller.summarize(&request));
    assert!(result.is_err());
    Ok(())
}

#[test]
fn test_runUrl_withInvalidUrl_shouldReportWithoutCrashing() -> Result<()> {
    let controller = controller_with(&MockRenderer::new(40.0))?;
    let succeeded = tokio_test::block_on(controller.run_url("not a url", false, false, &WorkerOverrides::default()))?;
    assert!(!succeeded);
    Ok(())
}
