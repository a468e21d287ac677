//! Manifest record types and output modes

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

use super::DocumentGroup;

/// How the results of a run are packaged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputMode {
    /// Comma-separated manifest
    #[default]
    Csv,
    /// Tab-separated manifest
    Tsv,
    /// CSV manifest plus a zip bundle of every output
    Zip,
}

impl OutputMode {
    /// Field delimiter used for the manifest
    pub fn delimiter(&self) -> u8 {
        match self {
            OutputMode::Tsv => b'\t',
            OutputMode::Csv | OutputMode::Zip => b',',
        }
    }

    /// Manifest file extension
    pub fn manifest_extension(&self) -> &'static str {
        match self {
            OutputMode::Tsv => "tsv",
            OutputMode::Csv | OutputMode::Zip => "csv",
        }
    }
}

impl FromStr for OutputMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(OutputMode::Csv),
            "tsv" => Ok(OutputMode::Tsv),
            "zip" => Ok(OutputMode::Zip),
            other => Err(Error::UnsupportedFormat(other.to_string())),
        }
    }
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OutputMode::Csv => "csv",
            OutputMode::Tsv => "tsv",
            OutputMode::Zip => "zip",
        };
        f.write_str(s)
    }
}

/// Outcome of a single group
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowStatus {
    /// Written locally, no upload configured
    Written,
    /// Uploaded and linked
    Uploaded,
    /// Upload failed; the local file is kept
    UploadFailed(String),
}

impl fmt::Display for RowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowStatus::Written => f.write_str("written"),
            RowStatus::Uploaded => f.write_str("uploaded"),
            RowStatus::UploadFailed(reason) => write!(f, "upload_failed: {}", reason),
        }
    }
}

/// One manifest line per produced group
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestRow {
    pub identifier: String,
    pub name: String,
    pub file: String,
    pub first_page: usize,
    pub last_page: usize,
    pub pages: usize,
    /// Remote link; empty when not uploaded
    pub link: String,
    #[serde(serialize_with = "serialize_display")]
    pub status: RowStatus,
}

impl ManifestRow {
    pub fn new(
        group: &DocumentGroup,
        file: impl Into<String>,
        link: Option<String>,
        status: RowStatus,
    ) -> Self {
        Self {
            identifier: group.identifier.clone(),
            name: group.name.clone().unwrap_or_default(),
            file: file.into(),
            first_page: group.first_page(),
            last_page: group.last_page(),
            pages: group.len(),
            link: link.unwrap_or_default(),
            status,
        }
    }

    pub fn has_link(&self) -> bool {
        !self.link.is_empty()
    }
}

fn serialize_display<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: fmt::Display,
    S: serde::Serializer,
{
    serializer.collect_str(value)
}
