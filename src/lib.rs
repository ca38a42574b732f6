/*!
 * # vttdex - WebVTT transcript cleaner and search indexer
 *
 * A Rust library that turns machine-generated WebVTT caption files into
 * clean plain-text transcripts and builds a flat JSON search index over them.
 *
 * ## Features
 *
 * - Strip WebVTT headers, comments, style blocks, cue timings and sequence numbers
 * - Remove inline cue markup (`<c>`, `<v Speaker>`, karaoke timestamps)
 * - Collapse rolling captions that repeat the same line across cue blocks
 * - Derive dates and titles from `<Source>_<YYYYMMDD>_<Title>` file names
 * - Atomic index writes
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `caption_normalizer`: Line-driven state machine producing a cleaned transcript
 * - `base_name`: Caption file name to transcript base name resolution
 * - `index_builder`: Index records and JSON persistence
 * - `app_controller`: Batch conversion and index build driver
 * - `app_config`: Configuration management
 * - `file_utils`: File system operations
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod file_utils;
pub mod caption_normalizer;
pub mod base_name;
pub mod index_builder;
pub mod app_controller;
pub mod errors;

// Re-export main types for easier usage
pub use app_config::Config;
pub use caption_normalizer::{CaptionNormalizer, normalize_lines, normalize_str, normalize_file};
pub use base_name::{resolve_base_name, resolve_base_name_with};
pub use index_builder::{Artifact, IndexBuilder, IndexRecord, extract_date_and_title};
pub use app_controller::{Controller, ConversionSummary, DocumentOutcome, IndexSummary};
pub use errors::{AppError, TranscriptError};
