//! Per-group PDF writer

use lopdf::Document;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::types::DocumentGroup;

/// Writes page groups of a loaded document as standalone PDFs
pub struct GroupWriter<'a> {
    source: &'a Document,
    dir: PathBuf,
}

impl<'a> GroupWriter<'a> {
    /// Create the writer, making sure the output directory exists
    pub fn new(source: &'a Document, dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|e| Error::write_failed(&dir, e.to_string()))?;
        Ok(Self { source, dir })
    }

    /// Write one group under `file_name` in the output directory
    ///
    /// The file only appears once it is complete: bytes go to a temporary
    /// file in the same directory which is then renamed into place. An
    /// existing file of the same name, e.g. from an earlier run, is replaced.
    pub fn write(&self, group: &DocumentGroup, file_name: &str) -> Result<PathBuf> {
        let path = self.dir.join(file_name);
        let bytes = self.render(group, &path)?;

        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir)
            .map_err(|e| Error::write_failed(&path, e.to_string()))?;
        tmp.write_all(&bytes)
            .and_then(|_| tmp.flush())
            .map_err(|e| Error::write_failed(&path, e.to_string()))?;
        tmp.persist(&path)
            .map_err(|e| Error::write_failed(&path, e.error.to_string()))?;

        tracing::debug!(
            "Wrote pages {}-{} ({} bytes) to {}",
            group.first_page(),
            group.last_page(),
            bytes.len(),
            path.display()
        );
        Ok(path)
    }

    /// Serialize the group's pages into an in-memory PDF
    fn render(&self, group: &DocumentGroup, path: &Path) -> Result<Vec<u8>> {
        let mut doc = self.source.clone();
        let total = doc.get_pages().len();

        if group.is_empty() || group.end > total {
            return Err(Error::write_failed(
                path,
                format!(
                    "pages {}..{} out of range for a {}-page document",
                    group.start, group.end, total
                ),
            ));
        }

        // lopdf page numbers are 1-based
        let keep = (group.first_page() as u32)..=(group.last_page() as u32);
        let remove: Vec<u32> = doc
            .get_pages()
            .keys()
            .copied()
            .filter(|n| !keep.contains(n))
            .collect();

        if !remove.is_empty() {
            doc.delete_pages(&remove);
        }
        doc.prune_objects();

        let mut buf = Vec::new();
        doc.save_to(&mut buf)
            .map_err(|e| Error::write_failed(path, e.to_string()))?;
        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::pdf_with_pages;

    fn group(start: usize, end: usize) -> DocumentGroup {
        DocumentGroup {
            start,
            end,
            identifier: "2024-00001".to_string(),
            name: None,
            has_marker: true,
        }
    }

    fn load(bytes: &[u8]) -> Document {
        Document::load_mem(bytes).unwrap()
    }

    #[test]
    fn test_writes_only_group_pages() {
        let source = load(&pdf_with_pages(&["one", "two", "three", "four", "five"]));
        let dir = tempfile::tempdir().unwrap();
        let writer = GroupWriter::new(&source, dir.path().join("out")).unwrap();

        let first = writer.write(&group(0, 3), "a.pdf").unwrap();
        let second = writer.write(&group(3, 5), "b.pdf").unwrap();

        assert_eq!(Document::load(&first).unwrap().get_pages().len(), 3);
        assert_eq!(Document::load(&second).unwrap().get_pages().len(), 2);
        // source untouched
        assert_eq!(source.get_pages().len(), 5);
    }

    #[test]
    fn test_existing_file_is_replaced() {
        let source = load(&pdf_with_pages(&["one", "two", "three"]));
        let dir = tempfile::tempdir().unwrap();
        let writer = GroupWriter::new(&source, dir.path()).unwrap();

        let first = writer.write(&group(0, 3), "2024-00001.pdf").unwrap();
        assert_eq!(Document::load(&first).unwrap().get_pages().len(), 3);

        let second = writer.write(&group(2, 3), "2024-00001.pdf").unwrap();
        assert_eq!(first, second);
        assert_eq!(Document::load(&second).unwrap().get_pages().len(), 1);

        let entries = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn test_out_of_range_group_fails() {
        let source = load(&pdf_with_pages(&["one", "two"]));
        let dir = tempfile::tempdir().unwrap();
        let writer = GroupWriter::new(&source, dir.path()).unwrap();

        let err = writer.write(&group(1, 4), "x.pdf").unwrap_err();
        assert!(matches!(err, Error::WriteFailed { .. }));
        assert!(!dir.path().join("x.pdf").exists());
    }

    #[test]
    fn test_unwritable_directory_fails() {
        let source = load(&pdf_with_pages(&["one"]));
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, b"not a directory").unwrap();

        let err = GroupWriter::new(&source, blocker.join("out")).err().unwrap();
        assert!(matches!(err, Error::WriteFailed { .. }));
    }
}
