use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

// @module: File and directory utilities

// @const: Extension of Advanced SubStation Alpha scripts
pub const SUBTITLE_EXTENSION: &str = "ass";

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

    /// Find files with a specific extension directly inside a directory
    ///
    /// Subdirectories are not searched. Results are sorted by path.
    pub fn find_files<P: AsRef<Path>>(dir: P, extension: &str) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();
        let extension = extension.trim_start_matches('.');

        for entry in WalkDir::new(dir.as_ref()).min_depth(1).max_depth(1).follow_links(true) {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if path.is_file() {
                if let Some(ext) = path.extension() {
                    if ext.to_string_lossy().eq_ignore_ascii_case(extension) {
                        result.push(path.to_path_buf());
                    }
                }
            }
        }

        result.sort();
        Ok(result)
    }

    /// Find the .ass files directly inside a directory
    pub fn find_subtitle_files<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
        Self::find_files(dir, SUBTITLE_EXTENSION)
    }

    /// Resolve a CLI input into the list of subtitle files to process
    ///
    /// Returns `None` when the path is neither a file nor a directory.
    pub fn resolve_input<P: AsRef<Path>>(input: P) -> Result<Option<Vec<PathBuf>>> {
        let input = input.as_ref();
        if Self::file_exists(input) {
            Ok(Some(vec![input.to_path_buf()]))
        } else if Self::dir_exists(input) {
            Ok(Some(Self::find_subtitle_files(input)?))
        } else {
            Ok(None)
        }
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Read a word list: one word per line, blank lines and `#` comments skipped
    pub fn read_word_list<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
        let content = Self::read_to_string(&path)?;
        let content = content.strip_prefix('\u{feff}').unwrap_or(&content);

        Ok(content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(|line| line.trim_matches('"').to_string())
            .collect())
    }
}
