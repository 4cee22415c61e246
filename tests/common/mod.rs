/*!
 * Common test utilities for the sublingo test suite
 */

use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use tempfile::TempDir;


/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &PathBuf, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// A small three-cue SRT document
pub const SAMPLE_SRT: &str = "1\n00:00:01,000 --> 00:00:04,000\nThis is a test subtitle.\n\n2\n00:00:05,000 --> 00:00:09,000\nIt contains multiple entries.\n\n3\n00:00:10,000 --> 00:00:14,000\nFor testing purposes.\n";

/// Creates a sample subtitle file for testing
pub fn create_test_subtitle(dir: &PathBuf, filename: &str) -> Result<PathBuf> {
    create_test_file(dir, filename, SAMPLE_SRT)
}

/// An SRT document with `count` cues, one second apart, texts `line 1..=count`
pub fn srt_with_cues(count: usize) -> String {
    let mut out = String::new();
    for i in 1..=count {
        out.push_str(&format!(
            "{}\n00:00:{:02},000 --> 00:00:{:02},500\nline {}\n\n",
            i,
            i % 60,
            i % 60,
            i
        ));
    }
    out
}
