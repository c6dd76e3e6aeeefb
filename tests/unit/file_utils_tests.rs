/*!
 * Tests for file utility functions
 */

use anyhow::Result;
use std::path::Path;
use yomidict::file_utils::FileManager;
use crate::common;

/// Test that file_exists returns true for existing files
#[test]
fn test_file_exists_withExistingFile_shouldReturnTrue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_file = common::create_test_file(temp_dir.path(), "test_file_exists.tmp", "test content")?;

    assert!(FileManager::file_exists(&test_file));
    assert!(!FileManager::file_exists(temp_dir.path()));

    Ok(())
}

/// Test that file_exists returns false for non-existent files
#[test]
fn test_file_exists_withNonExistentFile_shouldReturnFalse() {
    assert!(!FileManager::file_exists("non_existent_file.tmp"));
}

/// Test that ensure_dir creates nested directories and tolerates existing ones
#[test]
fn test_ensure_dir_withNestedDir_shouldCreateIdempotently() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let nested = temp_dir.path().join("dicts").join("yomitan");

    FileManager::ensure_dir(&nested)?;
    FileManager::ensure_dir(&nested)?;

    assert!(FileManager::dir_exists(&nested));
    Ok(())
}

/// Only the missing parent directory is created; bare file names need none
#[test]
fn test_ensure_parent_dir_withNestedFile_shouldCreateParentOnly() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let db_file = temp_dir.path().join("db").join("entries.db");

    FileManager::ensure_parent_dir(&db_file)?;
    FileManager::ensure_parent_dir("entries.db")?;

    assert!(FileManager::dir_exists(temp_dir.path().join("db")));
    assert!(!FileManager::file_exists(&db_file));
    Ok(())
}

/// Path separators in a tag never create subdirectories
#[test]
fn test_tagged_filename_withSlashInTag_shouldStaySingleComponent() {
    assert_eq!(
        FileManager::tagged_filename("JMdict_english.zip", "release/v1"),
        "JMdict_english_release_v1.zip"
    );
    assert_eq!(FileManager::tagged_filename("JMnedict.zip", "a\\b"), "JMnedict_a_b.zip");
}

/// The tag is inserted before the extension
#[test]
fn test_tagged_filename_withZip_shouldInsertTagBeforeExtension() {
    assert_eq!(
        FileManager::tagged_filename("JMdict_english.zip", "v1.2"),
        "JMdict_english_v1.2.zip"
    );
    assert_eq!(
        FileManager::tagged_filename("jitendex-yomitan.zip", "2024.01.01.0"),
        "jitendex-yomitan_2024.01.01.0.zip"
    );
}

/// Only the last extension is treated as the extension
#[test]
fn test_tagged_filename_withDoubleExtension_shouldTagBeforeLastOnly() {
    assert_eq!(FileManager::tagged_filename("dict.tar.gz", "v1"), "dict.tar_v1.gz");
}

/// Names without an extension get the tag appended
#[test]
fn test_tagged_filename_withoutExtension_shouldAppendTag() {
    assert_eq!(FileManager::tagged_filename("JMnedict", "v3"), "JMnedict_v3");
    assert_eq!(FileManager::tagged_filename(".hidden", "v3"), ".hidden_v3");
}

/// Partial downloads live next to the target with a .part suffix
#[test]
fn test_partial_download_path_shouldAppendPartSuffix() {
    let partial = FileManager::partial_download_path(Path::new("/data/dicts/yomitan/JMnedict.zip"));
    assert_eq!(partial, Path::new("/data/dicts/yomitan/JMnedict.zip.part"));
}
