//! Core types for the splitter

pub mod manifest;
pub mod page;

pub use manifest::{ManifestRow, OutputMode, RowStatus};
pub use page::{DocumentGroup, MarkerMatch, Page};
