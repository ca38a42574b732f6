/*!
 * Error types for the vttdex application.
 *
 * This module contains custom error types for the conversion and indexing
 * stages, using the thiserror crate for ergonomic error definitions.
 */

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while converting captions or building the index
#[derive(Error, Debug)]
pub enum TranscriptError {
    /// The caption document could not be read
    #[error("Failed to read {}: {source}", .path.display())]
    ReadFailure {
        /// Path of the unreadable document
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The cleaned transcript could not be persisted
    #[error("Failed to write {}: {source}", .path.display())]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A mandatory input directory does not exist
    #[error("Input directory not found: {}", .0.display())]
    MissingInputDirectory(PathBuf),

    /// The aggregate index could not be persisted
    #[error("Failed to write index file {}: {source}", .path.display())]
    IndexWriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl TranscriptError {
    /// Whether the error aborts the whole run rather than a single document
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::MissingInputDirectory(_) | Self::IndexWriteFailure { .. })
    }
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from the configuration layer
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from conversion or indexing
    #[error("Transcript error: {0}")]
    Transcript(#[from] TranscriptError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::Config(error.to_string())
    }
}
