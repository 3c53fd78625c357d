/*!
 * Tests for file utility functions
 */

use std::path::{Path, PathBuf};
use anyhow::Result;
use vidsum::file_utils::{FileManager, FileType};
use crate::common;

#[test]
fn test_generateOutputPath_withSuffix_shouldKeepDirectory() {
    let output = FileManager::generate_output_path("/videos/talk.mkv", "_summarised", "mp4");
    assert_eq!(output, PathBuf::from("/videos/talk_summarised.mp4"));

    let bare = FileManager::generate_output_path("talk.mp4", "_short", ".mp4");
    assert_eq!(bare, PathBuf::from("talk_short.mp4"));
}

#[test]
fn test_siblingSubtitlePath_withVideo_shouldSwapExtension() {
    assert_eq!(FileManager::sibling_subtitle_path("/in/demo.mp4"), PathBuf::from("/in/demo.srt"));
}

#[test]
fn test_findFiles_withMixedFiles_shouldReturnMatchesSorted() -> Result<()> {
    let dir = common::create_temp_dir()?;
    common::create_test_file(dir.path(), "b.srt", "")?;
    common::create_test_file(dir.path(), "a.SRT", "")?;
    common::create_test_file(dir.path(), "video.mp4", "")?;
    std::fs::create_dir(dir.path().join("nested"))?;
    common::create_test_file(&dir.path().join("nested"), "c.srt", "")?;

    let found = FileManager::find_files(dir.path(), "srt")?;
    let names: Vec<String> = found
        .iter()
        .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().to_string()))
        .collect();
    assert_eq!(names, vec!["a.SRT", "b.srt"]);
    Ok(())
}

#[test]
fn test_removeIfExists_withMissingFile_shouldSucceed() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = common::create_test_file(dir.path(), "gone.mp4", "x")?;

    FileManager::remove_if_exists(&path)?;
    assert!(!path.exists());
    FileManager::remove_if_exists(&path)?;
    Ok(())
}

#[test]
fn test_ensureDir_withNestedPath_shouldCreateParents() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let nested = dir.path().join("a").join("b");
    FileManager::ensure_dir(&nested)?;
    assert!(nested.is_dir());
    Ok(())
}

#[test]
fn test_detectFileType_withKnownExtensions_shouldClassify() {
    assert_eq!(FileManager::detect_file_type(Path::new("x.srt")), FileType::Subtitle);
    assert_eq!(FileManager::detect_file_type(Path::new("x.MP4")), FileType::Video);
    assert_eq!(FileManager::detect_file_type(Path::new("x.txt")), FileType::Unknown);
    assert_eq!(FileManager::detect_file_type(Path::new("noext")), FileType::Unknown);
}
