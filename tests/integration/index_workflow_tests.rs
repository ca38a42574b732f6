/*!
 * Integration tests for building the search index
 */

use std::fs;
use anyhow::Result;
use vttdex::app_config::Config;
use vttdex::app_controller::Controller;
use vttdex::errors::TranscriptError;
use vttdex::index_builder::{IndexBuilder, IndexRecord};
use crate::common;

/// Test that the index contains one record per non-empty transcript
#[test]
fn test_build_index_withTranscripts_shouldWriteJsonRecords() -> Result<()> {
    let clean = common::create_temp_dir()?;
    let out = common::create_temp_dir()?;
    common::create_test_file(clean.path(), "Source_20230615_My_Great_Title.txt", "great words")?;
    common::create_test_file(clean.path(), "loose notes.txt", "loose words")?;
    common::create_test_file(clean.path(), "Source_20230616_Empty.txt", "")?;
    common::create_test_file(clean.path(), "ignored.json", "{}")?;
    let index_file = out.path().join("search_data.json");

    let controller = Controller::with_config(Config::default())?;
    let summary = controller.build_index(clean.path(), &index_file)?;

    assert_eq!(summary.scanned, 3);
    assert_eq!(summary.indexed, 2);
    assert_eq!(summary.empty, 1);
    assert_eq!(summary.unreadable, 0);

    let records: Vec<IndexRecord> = serde_json::from_str(&fs::read_to_string(&index_file)?)?;
    assert_eq!(records.len(), 2);

    let great = records.iter().find(|r| r.source_name == "Source_20230615_My_Great_Title.txt").unwrap();
    assert_eq!(great.date, "2023-06-15");
    assert_eq!(great.title, "My Great Title");
    assert_eq!(great.text, "great words");

    let loose = records.iter().find(|r| r.source_name == "loose notes.txt").unwrap();
    assert_eq!(loose.date, "Unknown Date");
    assert_eq!(loose.title, "loose notes");

    Ok(())
}

/// Test that a missing transcript directory is fatal and writes nothing
#[test]
fn test_build_index_withMissingDir_shouldFailWithoutIndex() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let index_file = temp_dir.path().join("search_data.json");

    let controller = Controller::with_config(Config::default())?;
    let err = controller
        .build_index(&temp_dir.path().join("clean_txt"), &index_file)
        .unwrap_err();

    let transcript_error = err.downcast_ref::<TranscriptError>();
    assert!(matches!(transcript_error, Some(TranscriptError::MissingInputDirectory(_))));
    assert!(transcript_error.is_some_and(TranscriptError::is_fatal));
    assert!(!index_file.exists());

    Ok(())
}

/// Test that a failed index write surfaces IndexWriteFailure and keeps the directory clean
#[test]
fn test_write_index_withDirectoryTarget_shouldReturnIndexWriteFailure() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let target = temp_dir.path().join("search_data.json");
    fs::create_dir(&target)?;

    let result = IndexBuilder::new().write_index(&[], &target);

    assert!(matches!(result, Err(TranscriptError::IndexWriteFailure { .. })));
    assert_eq!(fs::read_dir(temp_dir.path())?.count(), 1);

    Ok(())
}

/// Test that rebuilding replaces the previous index entirely
#[test]
fn test_build_index_withExistingIndex_shouldRegenerateIt() -> Result<()> {
    let clean = common::create_temp_dir()?;
    let index_file = clean.path().join("index").join("search_data.json");
    fs::create_dir(clean.path().join("index"))?;
    fs::write(&index_file, "[{\"stale\": true}]")?;
    common::create_test_file(clean.path(), "A_20200101_Fresh.txt", "fresh")?;

    let controller = Controller::with_config(Config::default())?;
    controller.build_index(clean.path(), &index_file)?;

    let records: Vec<IndexRecord> = serde_json::from_str(&fs::read_to_string(&index_file)?)?;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].title, "Fresh");

    Ok(())
}

/// Test the full convert then index run with configured locations
#[test]
fn test_run_withConfiguredPaths_shouldConvertAndIndex() -> Result<()> {
    let root = common::create_temp_dir()?;
    let input = root.path().join("transcripts");
    fs::create_dir(&input)?;
    common::create_test_captions(&input, "TheMoneyGPS_20240105_Budget_Basics.en.vtt")?;

    let mut config = Config::default();
    config.paths.input_dir = input;
    config.paths.output_dir = root.path().join("clean_txt");
    config.paths.index_file = root.path().join("search_data.json");
    config.index.source_prefix = Some("TheMoneyGPS".to_string());

    let controller = Controller::with_config(config)?;
    let (conversion, index) = controller.run()?;

    assert_eq!(conversion.converted, 1);
    assert_eq!(index.indexed, 1);

    let records: Vec<IndexRecord> =
        serde_json::from_str(&fs::read_to_string(root.path().join("search_data.json"))?)?;
    assert_eq!(records[0].source_name, "TheMoneyGPS_20240105_Budget_Basics.txt");
    assert_eq!(records[0].date, "2024-01-05");
    assert_eq!(records[0].title, "Budget Basics");
    assert_eq!(records[0].text, "welcome back everyone today we talk money");

    Ok(())
}

/// Test that an unreadable transcript is counted while the index is still written
#[test]
fn test_build_index_withInvalidUtf8Transcript_shouldCountUnreadable() -> Result<()> {
    common::init_test_logger();
    let clean = common::create_temp_dir()?;
    let out = common::create_temp_dir()?;
    fs::write(clean.path().join("Source_20230101_Garbled.txt"), [0xff, 0xfe, 0xfd])?;
    common::create_test_file(clean.path(), "Source_20230102_Fine.txt", "fine words")?;
    let index_file = out.path().join("search_data.json");

    let controller = Controller::with_config(Config::default())?;
    let summary = controller.build_index(clean.path(), &index_file)?;

    assert_eq!(summary.scanned, 2);
    assert_eq!(summary.indexed, 1);
    assert_eq!(summary.unreadable, 1);
    assert_eq!(summary.empty, 0);

    let records: Vec<IndexRecord> = serde_json::from_str(&fs::read_to_string(&index_file)?)?;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].source_name, "Source_20230102_Fine.txt");

    Ok(())
}

/// Test that a dangling transcript symlink is counted as unreadable, not fatal
#[cfg(unix)]
#[test]
fn test_build_index_withDanglingSymlink_shouldCountUnreadable() -> Result<()> {
    common::init_test_logger();
    let clean = common::create_temp_dir()?;
    let out = common::create_temp_dir()?;
    common::create_test_file(clean.path(), "Source_20230102_Fine.txt", "fine words")?;
    std::os::unix::fs::symlink(clean.path().join("gone.txt"), clean.path().join("broken.txt"))?;
    let index_file = out.path().join("search_data.json");

    let controller = Controller::with_config(Config::default())?;
    let summary = controller.build_index(clean.path(), &index_file)?;

    assert_eq!(summary.indexed, 1);
    assert_eq!(summary.unreadable, 1);
    assert!(index_file.exists());

    Ok(())
}
