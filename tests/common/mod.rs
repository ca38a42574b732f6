/*!
 * Common test utilities for the vttdex test suite
 */

use std::path::{Path, PathBuf};
use std::fs;
use anyhow::Result;
use tempfile::TempDir;

/// Routes library logging to the test output; repeated calls are harmless
pub fn init_test_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Auto-generated style captions where every phrase rolls over into the next cue
pub const ROLLING_CAPTIONS: &str = "WEBVTT
Kind: captions
Language: en

00:00:00.000 --> 00:00:02.000 align:start position:0%
welcome<00:00:00.500><c> back</c><00:00:01.000><c> everyone</c>

00:00:02.000 --> 00:00:02.010 align:start position:0%
welcome back everyone

00:00:02.010 --> 00:00:04.000 align:start position:0%
welcome back everyone
today<00:00:02.500><c> we</c><00:00:03.000><c> talk</c><00:00:03.500><c> money</c>

00:00:04.000 --> 00:00:04.010 align:start position:0%
today we talk money
";

/// Creates a sample caption file for testing
pub fn create_test_captions(dir: &Path, filename: &str) -> Result<PathBuf> {
    create_test_file(dir, filename, ROLLING_CAPTIONS)
}
