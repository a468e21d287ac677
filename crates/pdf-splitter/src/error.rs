//! Error types for the splitter

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for splitter operations
pub type Result<T> = std::result::Result<T, Error>;

/// Splitter errors
#[derive(Debug, Error)]
pub enum Error {
    /// Source PDF is missing or unreadable
    #[error("Input not found: '{path}': {message}")]
    InputNotFound { path: PathBuf, message: String },

    /// Output/manifest format not recognized
    #[error("Unsupported format: {0} (expected csv, tsv or zip)")]
    UnsupportedFormat(String),

    /// Strict mode and no boundary marker in the document
    #[error("No boundary marker found in {pages} page(s)")]
    NoMarkerFound { pages: usize },

    /// External sync tool failed or produced no link
    #[error("Upload of '{file}' failed: {message}")]
    UploadFailed { file: String, message: String },

    /// Could not write an output group
    #[error("Failed to write '{path}': {message}")]
    WriteFailed { path: PathBuf, message: String },

    /// Marker pattern does not compile
    #[error("Invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// PDF structure error
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// Manifest serialization error
    #[error("Manifest error: {0}")]
    Manifest(#[from] csv::Error),

    /// Zip bundle error
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create an input-not-found error
    pub fn input_not_found(path: impl AsRef<Path>, message: impl Into<String>) -> Self {
        Self::InputNotFound {
            path: path.as_ref().to_path_buf(),
            message: message.into(),
        }
    }

    /// Create an upload error
    pub fn upload_failed(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self::UploadFailed {
            file: file.into(),
            message: message.into(),
        }
    }

    /// Create a write error
    pub fn write_failed(path: impl AsRef<Path>, message: impl Into<String>) -> Self {
        Self::WriteFailed {
            path: path.as_ref().to_path_buf(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Whether the run may continue after this error
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::UploadFailed { .. })
    }
}
