//! Zip bundle of the run's outputs

use std::fs::File;
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::Result;

/// Bundle `files` (stored flat, by file name) into a deflated zip at `dest`
pub fn create_zip(files: &[PathBuf], dest: &Path) -> Result<PathBuf> {
    if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut zip = ZipWriter::new(File::create(dest)?);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for path in files {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        zip.start_file(name, options)?;
        let mut input = File::open(path)?;
        std::io::copy(&mut input, &mut zip)?;
    }

    zip.finish()?;
    Ok(dest.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn test_bundle_contains_files_by_name() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.txt");
        let b = dir.path().join("b.txt");
        std::fs::write(&a, "hello").unwrap();
        std::fs::write(&b, "world").unwrap();

        let dest = dir.path().join("bundle").join("out.zip");
        let zip_path = create_zip(&[a, b], &dest).unwrap();
        assert_eq!(zip_path, dest);

        let mut archive = zip::ZipArchive::new(File::open(&dest).unwrap()).unwrap();
        let mut names: Vec<String> = archive.file_names().map(String::from).collect();
        names.sort();
        assert_eq!(names, vec!["a.txt", "b.txt"]);

        let mut content = String::new();
        archive.by_name("b.txt").unwrap().read_to_string(&mut content).unwrap();
        assert_eq!(content, "world");
    }

    #[test]
    fn test_missing_input_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = create_zip(&[dir.path().join("missing.pdf")], &dir.path().join("out.zip"));
        assert!(result.is_err());
    }
}
