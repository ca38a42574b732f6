/*!
 * Tests for index record derivation
 */

use vttdex::index_builder::{extract_date_and_title, Artifact, IndexBuilder, IndexRecord, UNKNOWN_DATE};

/// Test that a conventional name yields an ISO date and a spaced title
#[test]
fn test_extract_date_and_title_withConventionalName_shouldParseBoth() {
    let (date, title) = extract_date_and_title("Source_20230615_My Great Title", None);
    assert_eq!(date, "2023-06-15");
    assert_eq!(title, "My Great Title");
}

/// Test that underscores in the title become spaces and the extension is ignored
#[test]
fn test_extract_date_and_title_withUnderscoredTitleAndExtension_shouldCleanTitle() {
    let (date, title) = extract_date_and_title("TheMoneyGPS_20240102_How_To_Budget.txt", None);
    assert_eq!(date, "2024-01-02");
    assert_eq!(title, "How To Budget");
}

/// Test that dots in the title are preserved
#[test]
fn test_extract_date_and_title_withDottedTitle_shouldKeepDots() {
    let (_, title) = extract_date_and_title("Show_20230101_Q&A with Dr. Smith.txt", None);
    assert_eq!(title, "Q&A with Dr. Smith");
}

/// Test the fallback for names outside the convention
#[test]
fn test_extract_date_and_title_withNonMatchingName_shouldFallBack() {
    let (date, title) = extract_date_and_title("random notes", None);
    assert_eq!(date, UNKNOWN_DATE);
    assert_eq!(title, "random notes");

    let (date, title) = extract_date_and_title("Source_2023_Short.txt", None);
    assert_eq!(date, "Unknown Date");
    assert_eq!(title, "Source_2023_Short");
}

/// Test that a configured source prefix must match exactly
#[test]
fn test_extract_date_and_title_withSourcePrefix_shouldRequireThatSource() {
    let (date, title) = extract_date_and_title("Channel_20230615_Title.txt", Some("Channel"));
    assert_eq!((date.as_str(), title.as_str()), ("2023-06-15", "Title"));

    let (date, title) = extract_date_and_title("Other_20230615_Title.txt", Some("Channel"));
    assert_eq!((date.as_str(), title.as_str()), ("Unknown Date", "Other_20230615_Title"));
}

/// Test that a source prefix containing its own date segment is matched literally
#[test]
fn test_extract_date_and_title_withDatedSourcePrefix_shouldAnchorAfterPrefix() {
    let (date, title) = extract_date_and_title("A_20230101_B_20240101_C.txt", Some("A_20230101_B"));
    assert_eq!((date.as_str(), title.as_str()), ("2024-01-01", "C"));

    let (date, title) = extract_date_and_title("A_20230101_B.txt", Some("A_20230101_B"));
    assert_eq!((date.as_str(), title.as_str()), (UNKNOWN_DATE, "A_20230101_B"));
}

/// Test that artifacts with empty content are left out of the index
#[test]
fn test_build_withEmptyArtifact_shouldSkipIt() {
    let artifacts = vec![
        Artifact::new("A_20230101_First.txt", "first text"),
        Artifact::new("B_20230102_Empty.txt", ""),
        Artifact::new("loose.txt", "loose text"),
    ];

    let records = IndexBuilder::new().build(artifacts);

    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|r| !r.text.is_empty()));
    assert!(records.iter().all(|r| r.source_name != "B_20230102_Empty.txt"));
}

/// Test that records are ordered by file name by default
#[test]
fn test_build_withUnsortedArtifacts_shouldSortByName() {
    let artifacts = vec![
        Artifact::new("c.txt", "3"),
        Artifact::new("a.txt", "1"),
        Artifact::new("b.txt", "2"),
    ];

    let names: Vec<String> = IndexBuilder::new()
        .build(artifacts)
        .into_iter()
        .map(|r| r.source_name)
        .collect();
    assert_eq!(names, vec!["a.txt", "b.txt", "c.txt"]);
}

/// Test that discovery order is kept when sorting is disabled
#[test]
fn test_build_withSortingDisabled_shouldKeepInputOrder() {
    let artifacts = vec![Artifact::new("z.txt", "z"), Artifact::new("a.txt", "a")];

    let records = IndexBuilder::new().with_sort_by_name(false).build(artifacts);
    assert_eq!(records[0].source_name, "z.txt");
    assert_eq!(records[1].source_name, "a.txt");
}

/// Test that JSON uses the fixed field names
#[test]
fn test_to_json_withRecord_shouldUseFixedFieldNames() {
    let record = IndexRecord {
        source_name: "S_20230615_T.txt".to_string(),
        date: "2023-06-15".to_string(),
        title: "T".to_string(),
        text: "words".to_string(),
    };

    let json = IndexBuilder::new().with_pretty(false).to_json(&[record]).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    let object = value[0].as_object().unwrap();

    let mut keys: Vec<&str> = object.keys().map(|k| k.as_str()).collect();
    keys.sort();
    assert_eq!(keys, vec!["date", "filename", "text", "title"]);
    assert_eq!(object["filename"], "S_20230615_T.txt");
}
