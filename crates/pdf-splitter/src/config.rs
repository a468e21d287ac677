//! Configuration for the splitter

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::types::OutputMode;

/// Default student number shape
pub const DEFAULT_IDENTIFIER_PATTERN: &str = r"\b\d{4}-\d{5}\b";
/// Default overview block; group 1 captures the student name
pub const DEFAULT_OVERVIEW_PATTERN: &str = r"Name \(Last, First, Middle\)(.*?)Student No\.";

/// Main splitter configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SplitterConfig {
    /// Boundary detection
    #[serde(default)]
    pub markers: MarkerConfig,
    /// Output files and manifest
    #[serde(default)]
    pub output: OutputConfig,
    /// Remote sync
    #[serde(default)]
    pub upload: UploadConfig,
    /// Text extraction
    #[serde(default)]
    pub extraction: ExtractionConfig,
}

impl SplitterConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_toml(&raw)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(raw: &str) -> Result<Self> {
        let config: SplitterConfig =
            toml::from_str(raw).map_err(|e| Error::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check values that serde cannot
    pub fn validate(&self) -> Result<()> {
        if self.markers.fallback_identifier.trim().is_empty() {
            return Err(Error::config("markers.fallback_identifier must not be empty"));
        }
        if let Some(remote) = &self.upload.remote {
            if remote.trim().is_empty() {
                return Err(Error::config("upload.remote must not be empty when set"));
            }
        }
        if self.extraction.timeout_secs == 0 {
            return Err(Error::config("extraction.timeout_secs must be positive"));
        }
        Ok(())
    }

    /// Manifest location, defaulting to `<output dir>/manifest.<ext>`
    pub fn manifest_path(&self) -> PathBuf {
        self.output.manifest_path.clone().unwrap_or_else(|| {
            self.output
                .dir
                .join(format!("manifest.{}", self.output.mode.manifest_extension()))
        })
    }
}

/// What to do with pages before the first marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreamblePolicy {
    /// Leave them out of every group
    #[default]
    Drop,
    /// Merge them into the first group
    Attach,
}

impl FromStr for PreamblePolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "drop" => Ok(PreamblePolicy::Drop),
            "attach" => Ok(PreamblePolicy::Attach),
            other => Err(Error::config(format!(
                "unknown preamble policy '{}' (expected drop or attach)",
                other
            ))),
        }
    }
}

impl fmt::Display for PreamblePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreamblePolicy::Drop => f.write_str("drop"),
            PreamblePolicy::Attach => f.write_str("attach"),
        }
    }
}

/// Where the overview block may appear relative to the identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverviewWindow {
    /// Same page only
    #[default]
    SamePage,
    /// Same page or the page right after
    NextPage,
}

/// Boundary detection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkerConfig {
    /// Regex for the identifier (student number)
    #[serde(default = "default_identifier_pattern")]
    pub identifier_pattern: String,
    /// Regex for the overview block, matched case-insensitively across lines
    #[serde(default = "default_overview_pattern")]
    pub overview_pattern: String,
    #[serde(default)]
    pub overview_window: OverviewWindow,
    #[serde(default)]
    pub preamble: PreamblePolicy,
    /// Fail with `NoMarkerFound` instead of emitting the whole document
    #[serde(default)]
    pub require_marker: bool,
    /// Identifier used when no marker is found
    #[serde(default = "default_fallback_identifier")]
    pub fallback_identifier: String,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            identifier_pattern: default_identifier_pattern(),
            overview_pattern: default_overview_pattern(),
            overview_window: OverviewWindow::default(),
            preamble: PreamblePolicy::default(),
            require_marker: false,
            fallback_identifier: default_fallback_identifier(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving the split documents
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
    #[serde(default)]
    pub mode: OutputMode,
    /// Override for the manifest location
    #[serde(default)]
    pub manifest_path: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            mode: OutputMode::default(),
            manifest_path: None,
        }
    }
}

/// Remote sync configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// rclone destination, e.g. `remote:folder`; uploads are off when unset
    #[serde(default)]
    pub remote: Option<String>,
    /// rclone executable
    #[serde(default = "default_rclone_binary")]
    pub rclone_binary: String,
    /// Remove local files once uploaded
    #[serde(default)]
    pub delete_after_upload: bool,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            remote: None,
            rclone_binary: default_rclone_binary(),
            delete_after_upload: false,
        }
    }
}

/// Text extraction configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Give up on pdf-extract after this many seconds and use lopdf
    #[serde(default = "default_extraction_timeout")]
    pub timeout_secs: u64,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_extraction_timeout(),
        }
    }
}

fn default_identifier_pattern() -> String { DEFAULT_IDENTIFIER_PATTERN.to_string() }
fn default_overview_pattern() -> String { DEFAULT_OVERVIEW_PATTERN.to_string() }
fn default_fallback_identifier() -> String { "unknown".to_string() }
fn default_output_dir() -> PathBuf { PathBuf::from("output") }
fn default_rclone_binary() -> String { "rclone".to_string() }
fn default_extraction_timeout() -> u64 { 60 }
