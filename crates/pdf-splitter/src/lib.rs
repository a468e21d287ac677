//! pdf-splitter: split multi-record PDFs at boundary markers
//!
//! A record starts on a page carrying an identifier (a student number by
//! default) together with an overview block. Each record is written as its
//! own PDF, optionally uploaded through rclone, and listed in a manifest.

pub mod config;
pub mod error;
pub mod ingestion;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod splitting;
pub mod types;
pub mod upload;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::{OverviewWindow, PreamblePolicy, SplitterConfig};
pub use error::{Error, Result};
pub use pipeline::{JobReport, Splitter};
pub use splitting::BoundarySplitter;
pub use types::{DocumentGroup, ManifestRow, MarkerMatch, OutputMode, Page};
pub use upload::{RcloneUploader, Uploader};
