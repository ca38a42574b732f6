use anyhow::{Result, Context};
use log::warn;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use walkdir::WalkDir;

// @module: File and directory utilities

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        Ok(())
    }

    /// Find files with a specific extension in a directory.
    ///
    /// Only direct children are returned unless `recursive` is set. The extension
    /// is compared case-insensitively. Results are sorted by path.
    ///
    /// A broken entry never fails the listing. When it carries a matching name
    /// (a dangling symlink, say) it is still returned, so the caller's read of it
    /// fails for that one file only; other broken entries are logged and skipped.
    pub fn find_files<P: AsRef<Path>>(dir: P, extension: &str, recursive: bool) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();
        let normalized_ext = extension.trim_start_matches('.');
        let max_depth = if recursive { usize::MAX } else { 1 };

        for entry in WalkDir::new(dir.as_ref()).min_depth(1).max_depth(max_depth).follow_links(true) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    match e.path() {
                        Some(path) if Self::has_extension(path, normalized_ext) => {
                            warn!("Broken directory entry {:?}: {}", path, e);
                            result.push(path.to_path_buf());
                        }
                        _ => warn!("Skipping unreadable directory entry: {}", e),
                    }
                    continue;
                }
            };
            let path = entry.path();

            if path.is_file() && Self::has_extension(path, normalized_ext) {
                result.push(path.to_path_buf());
            }
        }

        result.sort();
        Ok(result)
    }

    // @checks: Extension, ignoring ASCII case
    fn has_extension(path: &Path, extension: &str) -> bool {
        path.extension()
            .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case(extension))
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Replace `path` with `content` in one step.
    ///
    /// The bytes go to a temporary file in the destination directory, which is
    /// then renamed over `path`. On failure the previous file is left as it was.
    pub fn write_atomically<P: AsRef<Path>>(path: P, content: &[u8]) -> io::Result<()> {
        let path = path.as_ref();
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent)?;

        let mut temp = NamedTempFile::new_in(parent)?;
        temp.write_all(content)?;
        temp.as_file().sync_all()?;
        temp.persist(path).map_err(|e| e.error)?;
        Ok(())
    }

    /// File name component of a path as UTF-8 text
    pub fn file_name_lossy<P: AsRef<Path>>(path: P) -> String {
        path.as_ref()
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}
