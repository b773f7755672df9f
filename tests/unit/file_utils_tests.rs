/*!
 * Tests for file utility functions
 */

use anyhow::Result;
use resubs::file_utils::FileManager;
use crate::common;

/// Test output path generation with tag and extension
#[test]
fn test_generate_output_path_withVideoInput_shouldInsertTag() {
    let path = FileManager::generate_output_path("/media/show/episode.mkv", "/out", "ja", "srt");
    assert_eq!(path.to_string_lossy(), "/out/episode.ja.srt");
}

/// Test directory creation is idempotent
#[test]
fn test_ensure_dir_withNestedPath_shouldCreateAndTolerate() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let nested = temp_dir.path().join("a/b/c");

    FileManager::ensure_dir(&nested)?;
    assert!(FileManager::dir_exists(&nested));

    // Second call is a no-op
    FileManager::ensure_dir(&nested)?;
    assert!(FileManager::dir_exists(&nested));

    Ok(())
}

/// Test video detection by extension
#[test]
fn test_is_video_file_withVariousExtensions_shouldMatchVideosOnly() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();

    let video = common::create_test_file(&dir, "movie.MKV", "x")?;
    let audio = common::create_test_file(&dir, "sound.mp3", "x")?;
    let subtitle = common::create_test_file(&dir, "movie.srt", "x")?;

    assert!(FileManager::is_video_file(&video));
    assert!(!FileManager::is_video_file(&audio));
    assert!(!FileManager::is_video_file(&subtitle));
    assert!(!FileManager::is_video_file(&dir));

    Ok(())
}

/// Test recursive video discovery
#[test]
fn test_find_video_files_withNestedDirs_shouldFindAllVideos() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();
    let nested = dir.join("season1");
    FileManager::ensure_dir(&nested)?;

    common::create_test_file(&dir, "a.mkv", "x")?;
    common::create_test_file(&nested, "b.mp4", "x")?;
    common::create_test_file(&nested, "notes.txt", "x")?;

    let videos = FileManager::find_video_files(&dir)?;
    assert_eq!(videos.len(), 2);

    Ok(())
}

/// Test exact-stem subtitle matching is preferred
#[test]
fn test_find_matching_subtitle_withExactStem_shouldPreferIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();

    let video = common::create_test_file(&dir, "episode.mkv", "x")?;
    common::create_test_file(&dir, "episode.en.srt", "x")?;
    let exact = common::create_test_file(&dir, "episode.srt", "x")?;

    assert_eq!(FileManager::find_matching_subtitle(&video), Some(exact));

    Ok(())
}

/// Test tagged sibling subtitles are found when no exact match exists
#[test]
fn test_find_matching_subtitle_withTaggedSibling_shouldFindIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();

    let video = common::create_test_file(&dir, "episode.mkv", "x")?;
    let tagged = common::create_test_file(&dir, "episode.en.srt", "x")?;

    assert_eq!(FileManager::find_matching_subtitle(&video), Some(tagged));

    Ok(())
}

/// Test no subtitle sibling yields None
#[test]
fn test_find_matching_subtitle_withNoSibling_shouldReturnNone() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();

    let video = common::create_test_file(&dir, "episode.mkv", "x")?;
    assert_eq!(FileManager::find_matching_subtitle(&video), None);

    Ok(())
}
