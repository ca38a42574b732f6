use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use log::warn;
use crate::base_name::{CAPTION_EXTENSION, KNOWN_LANGUAGE_CODES};
use crate::errors::AppError;
use crate::file_utils::FileManager;
use crate::index_builder::IndexBuilder;

/// Application configuration, loaded from a JSON file and overridden by
/// command line arguments
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    /// Input and output locations
    #[serde(default)]
    pub paths: PathsConfig,

    /// Caption conversion settings
    #[serde(default)]
    pub normalizer: NormalizerConfig,

    /// Search index settings
    #[serde(default)]
    pub index: IndexConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Directory and file locations
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PathsConfig {
    /// Directory holding the raw caption files
    #[serde(default = "default_input_dir")]
    pub input_dir: PathBuf,

    /// Directory receiving the cleaned transcripts
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// JSON search index written from the cleaned transcripts
    #[serde(default = "default_index_file")]
    pub index_file: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            input_dir: default_input_dir(),
            output_dir: default_output_dir(),
            index_file: default_index_file(),
        }
    }
}

/// Caption conversion settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct NormalizerConfig {
    /// Extension of caption files, without the dot
    #[serde(default = "default_caption_extension")]
    pub caption_extension: String,

    /// Language codes stripped from the end of caption file names
    #[serde(default = "default_language_codes")]
    pub language_codes: Vec<String>,

    /// Descend into subdirectories of the input directory
    #[serde(default)]
    pub recursive: bool,

    /// Do not write transcripts that come out empty; count them as skipped
    #[serde(default)]
    pub skip_empty_transcripts: bool,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            caption_extension: default_caption_extension(),
            language_codes: default_language_codes(),
            recursive: false,
            skip_empty_transcripts: false,
        }
    }
}

/// Search index settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct IndexConfig {
    /// When set, only names starting with `<prefix>_<YYYYMMDD>_` get a date and title
    #[serde(default)]
    pub source_prefix: Option<String>,

    /// Order records by artifact file name
    #[serde(default = "default_true")]
    pub sort_by_name: bool,

    /// Pretty-print the JSON index
    #[serde(default = "default_true")]
    pub pretty: bool,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            source_prefix: None,
            sort_by_name: true,
            pretty: true,
        }
    }
}

impl IndexConfig {
    /// Index builder configured from these settings
    pub fn builder(&self) -> IndexBuilder {
        IndexBuilder::new()
            .with_source_prefix(self.source_prefix.clone())
            .with_sort_by_name(self.sort_by_name)
            .with_pretty(self.pretty)
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Matching `log` crate filter
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_input_dir() -> PathBuf {
    PathBuf::from("transcripts")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("clean_txt")
}

fn default_index_file() -> PathBuf {
    PathBuf::from("search_data.json")
}

fn default_caption_extension() -> String {
    CAPTION_EXTENSION.to_string()
}

fn default_language_codes() -> Vec<String> {
    KNOWN_LANGUAGE_CODES.iter().map(|code| code.to_string()).collect()
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a JSON file, writing a default one when missing
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self, AppError> {
        let path = path.as_ref();
        if FileManager::file_exists(path) {
            return Self::load(path);
        }

        warn!("Config file not found at '{}', creating default config.", path.display());
        let config = Config::default();
        config.save(path)?;
        Ok(config)
    }

    /// Load configuration from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, AppError> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| AppError::File(format!("Failed to open config file {}: {}", path.display(), e)))?;
        let config: Config = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| AppError::Config(format!("Failed to parse config file {}: {}", path.display(), e)))?;
        Ok(config)
    }

    /// Save configuration as pretty-printed JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), AppError> {
        let json = serde_json::to_string_pretty(self)?;
        FileManager::write_to_file(path, &json)?;
        Ok(())
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<(), AppError> {
        let ext = &self.normalizer.caption_extension;
        if ext.is_empty() || ext.contains('.') {
            return Err(AppError::Config(format!(
                "Caption extension must be a bare extension such as 'vtt', got '{}'",
                ext
            )));
        }

        if let Some(code) = self.normalizer.language_codes.iter()
            .find(|code| code.len() != 2 || !code.chars().all(|c| c.is_ascii_alphabetic()))
        {
            return Err(AppError::Config(format!("Invalid language code: '{}'", code)));
        }

        if self.paths.index_file.is_dir() {
            return Err(AppError::Config(format!(
                "Index file path is a directory: {}",
                self.paths.index_file.display()
            )));
        }

        Ok(())
    }
}
