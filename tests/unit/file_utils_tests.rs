/*!
 * Tests for file utility functions
 */

use std::fs;
use anyhow::Result;
use assgrammarcheck::file_utils::FileManager;
use crate::common;

/// Test that file_exists returns true for existing files
#[test]
fn test_file_exists_withExistingFile_shouldReturnTrue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_file = common::create_test_file(temp_dir.path(), "test_file_exists.tmp", "test content")?;

    assert!(FileManager::file_exists(&test_file));
    assert!(!FileManager::dir_exists(&test_file));

    Ok(())
}

/// Test that file_exists returns false for non-existent files
#[test]
fn test_file_exists_withNonExistentFile_shouldReturnFalse() {
    assert!(!FileManager::file_exists("non_existent_file.tmp"));
}

/// Test that only .ass files directly inside the folder are found, sorted
#[test]
fn test_find_subtitle_files_withNestedFolders_shouldNotRecurse() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();
    common::create_test_file(dir, "b.ass", "")?;
    common::create_test_file(dir, "a.ASS", "")?;
    common::create_test_file(dir, "notes.txt", "")?;
    common::create_test_file(dir, "c.srt", "")?;
    fs::create_dir(dir.join("nested"))?;
    common::create_test_file(&dir.join("nested"), "deep.ass", "")?;

    let files = FileManager::find_subtitle_files(dir)?;

    let names: Vec<String> = files
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
        .collect();
    assert_eq!(names, vec!["a.ASS", "b.ass"]);
    Ok(())
}

/// Test that a single file input resolves to itself whatever its extension
#[test]
fn test_resolve_input_withFile_shouldReturnThatFile() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let file = common::create_test_file(temp_dir.path(), "episode.ass", "")?;

    assert_eq!(FileManager::resolve_input(&file)?, Some(vec![file.clone()]));
    Ok(())
}

/// Test that a missing input resolves to nothing
#[test]
fn test_resolve_input_withMissingPath_shouldReturnNone() -> Result<()> {
    assert_eq!(FileManager::resolve_input("./no_such_input_12345")?, None);
    Ok(())
}

/// Test that word lists skip comments and blanks and drop quotes
#[test]
fn test_read_word_list_withCommentsAndQuotes_shouldReturnWords() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        temp_dir.path(),
        "words.txt",
        "\u{feff}# character names\nTanjiro\n\n  \"Nezuko\"  \r\nKamado\n",
    )?;

    let words = FileManager::read_word_list(&path)?;

    assert_eq!(words, vec!["Tanjiro", "Nezuko", "Kamado"]);
    Ok(())
}
