use anyhow::{Result, Context};
use log::{error, warn, info, debug};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use indicatif::{ProgressBar, ProgressStyle};
use crate::app_config::Config;
use crate::base_name::{resolve_base_name_with, TRANSCRIPT_EXTENSION};
use crate::caption_normalizer;
use crate::errors::TranscriptError;
use crate::file_utils::FileManager;
use crate::index_builder::IndexBuilder;

// @module: Application controller for caption conversion and indexing

/// Result of converting one caption document
#[derive(Debug)]
pub enum DocumentOutcome {
    /// Transcript written to `output`
    Converted { output: PathBuf },
    /// Transcript came out empty and empty transcripts are not persisted
    SkippedEmpty,
    /// Reading or writing failed
    Failed(TranscriptError),
}

/// Counts reported at the end of a conversion batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConversionSummary {
    pub total: usize,
    pub converted: usize,
    pub skipped: usize,
}

impl ConversionSummary {
    // @folds: One document outcome into the counts
    pub fn record(&mut self, outcome: &DocumentOutcome) {
        self.total += 1;
        match outcome {
            DocumentOutcome::Converted { .. } => self.converted += 1,
            DocumentOutcome::SkippedEmpty | DocumentOutcome::Failed(_) => self.skipped += 1,
        }
    }
}

impl fmt::Display for ConversionSummary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Total caption files found: {}", self.total)?;
        writeln!(f, "Successfully converted:    {}", self.converted)?;
        write!(f, "Skipped/Failed:            {}", self.skipped)
    }
}

/// Counts reported at the end of an index build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSummary {
    /// Transcript files found
    pub scanned: usize,
    /// Records written to the index
    pub indexed: usize,
    /// Transcripts left out because they were empty
    pub empty: usize,
    /// Transcripts that could not be read
    pub unreadable: usize,
    pub index_path: PathBuf,
}

impl fmt::Display for IndexSummary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Indexed {} of {} transcript file(s) into {} ({} empty, {} unreadable)",
            self.indexed,
            self.scanned,
            self.index_path.display(),
            self.empty,
            self.unreadable
        )
    }
}

/// Main application controller
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Output path of the transcript for a caption file
    pub fn output_path_for(&self, caption_file: &Path, output_dir: &Path) -> PathBuf {
        let file_name = FileManager::file_name_lossy(caption_file);
        let base = resolve_base_name_with(
            &file_name,
            &self.config.normalizer.caption_extension,
            &self.config.normalizer.language_codes,
        );
        output_dir.join(format!("{}.{}", base, TRANSCRIPT_EXTENSION))
    }

    /// Normalize one caption file and persist the transcript
    pub fn convert_document(&self, caption_file: &Path, output_dir: &Path) -> DocumentOutcome {
        let text = match caption_normalizer::normalize_file(caption_file) {
            Ok(text) => text,
            Err(e) => return DocumentOutcome::Failed(e),
        };

        if text.is_empty() && self.config.normalizer.skip_empty_transcripts {
            return DocumentOutcome::SkippedEmpty;
        }

        let output = self.output_path_for(caption_file, output_dir);
        match fs::write(&output, &text) {
            Ok(()) => {
                debug!("Wrote {} chars to {:?}", text.len(), output);
                DocumentOutcome::Converted { output }
            }
            Err(source) => DocumentOutcome::Failed(TranscriptError::WriteFailure { path: output, source }),
        }
    }

    /// Convert every caption file in `input_dir` into a transcript in `output_dir`.
    ///
    /// A missing input directory aborts before anything is touched. Per-document
    /// failures are logged and counted as skipped.
    pub fn convert_folder(&self, input_dir: &Path, output_dir: &Path) -> Result<ConversionSummary> {
        if !FileManager::dir_exists(input_dir) {
            return Err(TranscriptError::MissingInputDirectory(input_dir.to_path_buf()).into());
        }

        info!("Input caption folder: {:?}", input_dir);
        info!("Output transcript folder: {:?}", output_dir);
        FileManager::ensure_dir(output_dir)?;

        let files = FileManager::find_files(
            input_dir,
            &self.config.normalizer.caption_extension,
            self.config.normalizer.recursive,
        )?;

        let progress_bar = Self::create_progress_bar(files.len() as u64);
        let mut summary = ConversionSummary::default();

        for file in &files {
            let name = FileManager::file_name_lossy(file);
            progress_bar.set_message(name.clone());

            let outcome = self.convert_document(file, output_dir);
            match &outcome {
                DocumentOutcome::Converted { .. } => {}
                DocumentOutcome::SkippedEmpty => {
                    progress_bar.suspend(|| warn!("Skipped {}: no caption text", name));
                }
                DocumentOutcome::Failed(e) => {
                    progress_bar.suspend(|| error!("Skipped {}: {}", name, e));
                }
            }
            summary.record(&outcome);
            progress_bar.inc(1);
        }

        progress_bar.finish_and_clear();
        Ok(summary)
    }

    /// Build the search index from the transcripts in `clean_dir`
    pub fn build_index(&self, clean_dir: &Path, index_file: &Path) -> Result<IndexSummary> {
        info!("Creating search index from {:?}", clean_dir);

        let loaded = IndexBuilder::load_artifacts(clean_dir)?;
        let scanned = loaded.artifacts.len() + loaded.unreadable;
        let readable = loaded.artifacts.len();

        let builder = self.config.index.builder();
        let records = builder.build(loaded.artifacts);
        let index_path = builder.write_index(&records, index_file)?;

        Ok(IndexSummary {
            scanned,
            indexed: records.len(),
            empty: readable - records.len(),
            unreadable: loaded.unreadable,
            index_path,
        })
    }

    /// Convert with the configured locations, then index the results
    pub fn run(&self) -> Result<(ConversionSummary, IndexSummary)> {
        let paths = &self.config.paths;
        let conversion = self.convert_folder(&paths.input_dir, &paths.output_dir)?;
        let index = self.build_index(&paths.output_dir, &paths.index_file)?;
        Ok((conversion, index))
    }

    // @creates: Progress bar for a document batch
    fn create_progress_bar(len: u64) -> ProgressBar {
        let progress_bar = ProgressBar::new(len);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");
        progress_bar.set_style(style);
        progress_bar
    }
}
