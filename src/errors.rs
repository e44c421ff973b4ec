/*!
 * Error types for the assgrammarcheck application.
 *
 * This module contains custom error types for the grammar engine boundary,
 * subtitle file handling and the application as a whole, using the
 * thiserror crate for ergonomic error definitions.
 */

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur when talking to the grammar engine
#[derive(Error, Debug)]
pub enum EngineError {
    /// The engine process or server could not be brought up
    #[error("Failed to start grammar engine: {0}")]
    Startup(String),

    /// Error when a check request cannot be delivered
    #[error("Grammar engine request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an engine response fails
    #[error("Failed to parse grammar engine response: {0}")]
    ParseError(String),

    /// Error returned by the engine itself
    #[error("Grammar engine responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the engine
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The engine could not be stopped cleanly
    #[error("Failed to stop grammar engine: {0}")]
    Shutdown(String),

    /// The engine was used after it was shut down
    #[error("Grammar engine is not running")]
    NotRunning,
}

/// Errors that can occur while reading or writing a subtitle file
#[derive(Error, Debug)]
pub enum SubtitleError {
    /// The file could not be read or written
    #[error("Cannot access subtitle file {path:?}: {source}")]
    FileAccess {
        /// Offending file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The file content is not a valid .ass script
    #[error("Failed to parse subtitle file {path:?} (line {line}): {message}")]
    Parse {
        /// Offending file
        path: PathBuf,
        /// 1-based line in the file, 0 when the problem is not tied to a line
        line: usize,
        /// What went wrong
        message: String,
    },
}

impl SubtitleError {
    /// Path of the file the error refers to
    pub fn path(&self) -> &Path {
        match self {
            Self::FileAccess { path, .. } | Self::Parse { path, .. } => path.as_path(),
        }
    }
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Invalid command line input
    #[error("{0}")]
    Usage(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from a file or output operation
    #[error("File error: {0}")]
    File(String),

    /// Error from subtitle processing
    #[error("Subtitle error: {0}")]
    Subtitle(#[from] SubtitleError),

    /// Error from the grammar engine
    #[error("Grammar engine error: {0}")]
    Engine(#[from] EngineError),
}

impl AppError {
    /// File to skip when the run can continue with the next one
    pub fn failed_file(&self) -> Option<&Path> {
        match self {
            Self::Subtitle(e) => Some(e.path()),
            _ => None,
        }
    }
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Config(format!("{:#}", error))
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
