/*!
 * Tests for file and folder utilities
 */

use std::fs;

use marktwai::file_utils::FileManager;

use crate::common::{create_temp_dir, create_test_file};

#[test]
fn test_generateOutputPath_shouldAppendLanguageBeforeExtension() {
    let dir = create_temp_dir().unwrap();

    let path = FileManager::generate_output_path("README.md", dir.path(), "es");

    assert_eq!(path, dir.path().join("README.es.md"));
}

#[test]
fn test_generateOutputPath_withDottedStem_shouldKeepStem() {
    let path = FileManager::generate_output_path("notes.v2.md", "out", "fr");
    assert_eq!(path, std::path::PathBuf::from("out/notes.v2.fr.md"));
}

#[test]
fn test_findFiles_shouldMatchExtensionCaseInsensitively() {
    let dir = create_temp_dir().unwrap();
    create_test_file(dir.path(), "upper.MD", "x").unwrap();
    create_test_file(dir.path(), "lower.md", "x").unwrap();
    create_test_file(dir.path(), "other.txt", "x").unwrap();

    let files = FileManager::find_files(dir.path(), "md").unwrap();

    assert_eq!(files.len(), 2);
}

#[test]
fn test_findFiles_shouldRecurseIntoSubdirectories() {
    let dir = create_temp_dir().unwrap();
    let sub = dir.path().join("a/b");
    fs::create_dir_all(&sub).unwrap();
    create_test_file(&sub, "deep.md", "x").unwrap();
    create_test_file(dir.path(), "top.md", "x").unwrap();

    let files = FileManager::find_files(dir.path(), ".md").unwrap();

    assert_eq!(files.len(), 2);
    // Results come back sorted for deterministic batch ordering
    let mut sorted = files.clone();
    sorted.sort();
    assert_eq!(files, sorted);
}

#[test]
fn test_readToString_withMissingFile_shouldFail() {
    let dir = create_temp_dir().unwrap();
    assert!(FileManager::read_to_string(dir.path().join("nope.md")).is_err());
}

#[test]
fn test_writeToFile_thenRead_shouldRoundTrip() {
    let dir = create_temp_dir().unwrap();
    let target = dir.path().join("nested/dir/out.md");

    FileManager::write_to_file(&target, "# Translated\n").unwrap();

    assert_eq!(
        FileManager::read_to_string(&target).unwrap(),
        "# Translated\n"
    );
}

#[test]
fn test_appendToLogFile_shouldAccumulateEntries() {
    let dir = create_temp_dir().unwrap();
    let log = dir.path().join("marktwai.issues.log");

    FileManager::append_to_log_file(&log, "doc.md rejected: header count changed").unwrap();
    FileManager::append_to_log_file(&log, "other.md: 2 chunks kept original text").unwrap();

    let content = fs::read_to_string(&log).unwrap();
    assert_eq!(content.lines().count(), 2);
    assert!(content.contains("doc.md rejected"));
    assert!(content.lines().all(|l| l.starts_with('[')));
}

#[test]
fn test_isMarkdown_shouldAcceptBothExtensions() {
    assert!(FileManager::is_markdown("guide.md"));
    assert!(FileManager::is_markdown("guide.markdown"));
    assert!(!FileManager::is_markdown("guide.mdx"));
    assert!(!FileManager::is_markdown("guide"));
}

#[test]
fn test_ensureDir_shouldBeIdempotent() {
    let dir = create_temp_dir().unwrap();
    let target = dir.path().join("x/y");

    FileManager::ensure_dir(&target).unwrap();
    FileManager::ensure_dir(&target).unwrap();

    assert!(FileManager::dir_exists(&target));
}
