use std::path::{Path, PathBuf};
use regex::Regex;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use log::{debug, info, warn};
use anyhow::Result;
use crate::base_name::{strip_dotted_suffix, TRANSCRIPT_EXTENSION};
use crate::errors::TranscriptError;
use crate::file_utils::FileManager;

// @module: Search index construction from cleaned transcripts

// @const: <Source>_<YYYYMMDD>_<Title>
static ARTIFACT_NAME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<source>.+?)_(?P<date>[0-9]{8})_(?P<title>.*)$").unwrap()
});

// @const: _<YYYYMMDD>_<Title>, what follows a known source
static DATED_TITLE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^_(?P<date>[0-9]{8})_(?P<title>.*)$").unwrap()
});

/// Date used when an artifact name carries no date
pub const UNKNOWN_DATE: &str = "Unknown Date";

/// A cleaned transcript as read back from disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// File name, including the `.txt` extension
    pub name: String,
    pub content: String,
}

impl Artifact {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

/// One entry of the search index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexRecord {
    #[serde(rename = "filename")]
    pub source_name: String,
    pub date: String,
    pub title: String,
    pub text: String,
}

/// Artifacts read from a transcript directory
#[derive(Debug, Default)]
pub struct LoadedArtifacts {
    pub artifacts: Vec<Artifact>,
    /// Files that could not be read
    pub unreadable: usize,
}

/// Name with its trailing extension removed (`a.b.txt` -> `a.b`).
/// A leading dot does not start an extension.
fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(pos) if pos > 0 => &name[..pos],
        _ => name,
    }
}

/// Derive `(date, title)` from an artifact name.
///
/// Names following `<Source>_<YYYYMMDD>_<Title>`, optionally ending in `.txt`,
/// yield an ISO date and the title with underscores turned into spaces. When
/// `source_prefix` is set the name must start with it literally, and the date
/// is taken from right after it. Anything else yields [`UNKNOWN_DATE`] and the
/// name without its extension.
pub fn extract_date_and_title(name: &str, source_prefix: Option<&str>) -> (String, String) {
    let stem = strip_dotted_suffix(name, TRANSCRIPT_EXTENSION).unwrap_or(name);

    let captures = match source_prefix.filter(|prefix| !prefix.is_empty()) {
        Some(prefix) => stem
            .strip_prefix(prefix)
            .and_then(|rest| DATED_TITLE_REGEX.captures(rest)),
        None => ARTIFACT_NAME_REGEX.captures(stem),
    };

    if let Some(caps) = captures {
        let date = &caps["date"];
        let formatted = format!("{}-{}-{}", &date[..4], &date[4..6], &date[6..]);
        return (formatted, caps["title"].replace('_', " "));
    }

    (UNKNOWN_DATE.to_string(), strip_extension(name).to_string())
}

/// Builds the flat search index over cleaned transcripts
#[derive(Debug, Clone, Default)]
pub struct IndexBuilder {
    source_prefix: Option<String>,
    sort_by_name: bool,
    pretty: bool,
}

impl IndexBuilder {
    pub fn new() -> Self {
        Self {
            source_prefix: None,
            sort_by_name: true,
            pretty: true,
        }
    }

    /// Require artifact names to start with this source
    pub fn with_source_prefix(mut self, prefix: Option<String>) -> Self {
        self.source_prefix = prefix.filter(|p| !p.is_empty());
        self
    }

    pub fn with_sort_by_name(mut self, sort_by_name: bool) -> Self {
        self.sort_by_name = sort_by_name;
        self
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Build index records, skipping artifacts with empty content
    pub fn build(&self, mut artifacts: Vec<Artifact>) -> Vec<IndexRecord> {
        if self.sort_by_name {
            artifacts.sort_by(|a, b| a.name.cmp(&b.name));
        }

        artifacts
            .into_iter()
            .filter_map(|artifact| {
                if artifact.content.is_empty() {
                    debug!("Skipping empty transcript: {}", artifact.name);
                    return None;
                }
                let (date, title) =
                    extract_date_and_title(&artifact.name, self.source_prefix.as_deref());
                Some(IndexRecord {
                    source_name: artifact.name,
                    date,
                    title,
                    text: artifact.content,
                })
            })
            .collect()
    }

    /// Read every `.txt` artifact directly inside `dir`.
    ///
    /// Unreadable files are logged and counted; a missing directory is fatal.
    pub fn load_artifacts<P: AsRef<Path>>(dir: P) -> Result<LoadedArtifacts> {
        let dir = dir.as_ref();
        if !FileManager::dir_exists(dir) {
            return Err(TranscriptError::MissingInputDirectory(dir.to_path_buf()).into());
        }

        let mut loaded = LoadedArtifacts::default();
        for path in FileManager::find_files(dir, TRANSCRIPT_EXTENSION, false)? {
            let name = FileManager::file_name_lossy(&path);
            match FileManager::read_to_string(&path) {
                Ok(content) => loaded.artifacts.push(Artifact { name, content }),
                Err(e) => {
                    warn!("Error reading file {}: {:#}", name, e);
                    loaded.unreadable += 1;
                }
            }
        }
        Ok(loaded)
    }

    /// Serialize `records` as a JSON array of `{filename, date, title, text}`
    pub fn to_json(&self, records: &[IndexRecord]) -> serde_json::Result<String> {
        if self.pretty {
            serde_json::to_string_pretty(records)
        } else {
            serde_json::to_string(records)
        }
    }

    /// Persist the index atomically; an existing index survives a failed write
    pub fn write_index<P: AsRef<Path>>(&self, records: &[IndexRecord], path: P) -> Result<PathBuf, TranscriptError> {
        let path = path.as_ref();
        let json = self.to_json(records).map_err(|e| TranscriptError::IndexWriteFailure {
            path: path.to_path_buf(),
            source: e.into(),
        })?;

        FileManager::write_atomically(path, json.as_bytes()).map_err(|source| {
            TranscriptError::IndexWriteFailure {
                path: path.to_path_buf(),
                source,
            }
        })?;

        info!("Wrote {} record(s) to {}", records.len(), path.display());
        Ok(path.to_path_buf())
    }
}
