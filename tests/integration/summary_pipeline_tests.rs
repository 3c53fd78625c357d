/*!
 * Integration tests from subtitle file to selected regions
 */

use anyhow::Result;
use vidsum::app_config::ScorerConfig;
use vidsum::errors::SummaryError;
use vidsum::subtitle_processor::SubtitleTrack;
use vidsum::summary::{Corpus, Direction, DurationController, LsaScorer, time_regions};
use crate::common;

#[test]
fn test_pipeline_withSampleTalk_shouldSelectSpokenCuesAboveTarget() -> Result<()> {
    common::init_test_logger();
    let dir = common::create_temp_dir()?;
    let path = common::create_test_subtitle(dir.path(), "talk.srt")?;
    let track = SubtitleTrack::load(&path)?;

    let scorer = LsaScorer::new("en", &ScorerConfig::default())?;
    let summary = DurationController::new(&scorer, 100).find_summary_regions(&track.cues, 10.0)?;

    assert!(!summary.cue_indices.contains(&1), "annotation cue must never be selected");
    assert_eq!(summary.total_time, time_regions(&summary.regions));
    match summary.direction {
        Direction::TooShort => assert!(summary.total_time >= 10.0),
        Direction::TooLong => assert!(summary.total_time <= 10.0),
    }
    Ok(())
}

#[test]
fn test_pipeline_withUniformTrack_shouldMatchUniformGuess() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let cues = common::uniform_cues(10, 3);
    let path = common::create_test_file(dir.path(), "uniform.srt", &common::srt_from_cues(&cues))?;
    let track = SubtitleTrack::load(&path)?;
    assert_eq!(track.cues, cues);

    let scorer = LsaScorer::new("en", &ScorerConfig::default())?;
    let summary = DurationController::new(&scorer, 100).find_summary_regions(&track.cues, 9.0)?;

    // Every cue lasts 3s, so the first guess of 3 sentences is already exact
    assert_eq!(summary.iterations, 1);
    assert_eq!(summary.regions.len(), 3);
    assert_eq!(summary.total_time, 9.0);
    Ok(())
}

#[test]
fn test_pipeline_withRepeatedRuns_shouldBeDeterministic() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = common::create_test_subtitle(dir.path(), "talk.srt")?;
    let track = SubtitleTrack::load(&path)?;
    let scorer = LsaScorer::new("en", &ScorerConfig::default())?;
    let controller = DurationController::new(&scorer, 100);

    let first = controller.find_summary_regions(&track.cues, 7.0)?;
    let second = controller.find_summary_regions(&track.cues, 7.0)?;
    assert_eq!(first.cue_indices, second.cue_indices);
    assert_eq!(first.regions, second.regions);
    Ok(())
}

#[test]
fn test_pipeline_withTargetBeyondSpeech_shouldFailConvergence() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = common::create_test_subtitle(dir.path(), "talk.srt")?;
    let track = SubtitleTrack::load(&path)?;
    let scorer = LsaScorer::new("en", &ScorerConfig::default())?;

    let result = DurationController::new(&scorer, 100).find_summary_regions(&track.cues, 500.0);
    assert!(matches!(result, Err(SummaryError::Convergence { .. })));
    Ok(())
}

#[test]
fn test_pipeline_withEmptyWindow_shouldFailPrecondition() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = common::create_test_subtitle(dir.path(), "talk.srt")?;
    let track = SubtitleTrack::load(&path)?.window(600_000, None);
    assert!(Corpus::build(&track.cues).is_empty());

    let scorer = LsaScorer::new("en", &ScorerConfig::default())?;
    let result = DurationController::new(&scorer, 100).find_summary_regions(&track.cues, 5.0);
    assert!(matches!(result, Err(SummaryError::NoCues)));
    Ok(())
}
