//! Output files: split documents, manifest and zip bundle

mod archive;
mod manifest;
mod naming;
mod writer;

pub use archive::create_zip;
pub use manifest::{write_manifest, MANIFEST_HEADER};
pub use naming::{sanitize_file_stem, FileNamer};
pub use writer::GroupWriter;
