//! Delimited manifest of produced groups

use std::path::Path;

use crate::error::Result;
use crate::types::ManifestRow;

/// Manifest header, in column order
pub const MANIFEST_HEADER: [&str; 8] = [
    "identifier",
    "name",
    "file",
    "first_page",
    "last_page",
    "pages",
    "link",
    "status",
];

/// Write the manifest, header included even when there are no rows
pub fn write_manifest(path: &Path, rows: &[ManifestRow], delimiter: u8) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .from_path(path)?;

    writer.write_record(MANIFEST_HEADER)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}
