//! PDF loading and per-page text extraction

use lopdf::Document;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::types::Page;

/// Normalize extracted text so marker patterns see plain ASCII punctuation
pub(crate) fn cleanup_pdf_text(text: &str) -> String {
    text.replace('\0', "")
        .replace('\u{2010}', "-") // Hyphen
        .replace('\u{2011}', "-") // Non-breaking hyphen
        .replace('\u{2012}', "-") // Figure dash
        .replace('\u{2013}', "-") // En dash
        .replace('\u{2212}', "-") // Minus sign
        .replace('\u{2018}', "'")
        .replace('\u{2019}', "'")
        .replace('\u{201C}', "\"")
        .replace('\u{201D}', "\"")
        .replace('\u{00A0}', " ") // Non-breaking space
        .replace('\u{2002}', " ") // En space
        .replace('\u{2003}', " ") // Em space
        .replace('\u{2009}', " ") // Thin space
        .replace('\u{FB01}', "fi")
        .replace('\u{FB02}', "fl")
        .replace('\u{FB00}', "ff")
        .replace('\u{FB03}', "ffi")
        .replace('\u{FB04}', "ffl")
}

/// A loaded source PDF
pub struct PdfSource {
    path: PathBuf,
    data: Vec<u8>,
    document: Document,
}

impl PdfSource {
    /// Read and parse a PDF file
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|e| Error::input_not_found(path, e.to_string()))?;
        Self::from_bytes(path, data)
    }

    /// Parse a PDF already in memory
    pub fn from_bytes(path: impl AsRef<Path>, data: Vec<u8>) -> Result<Self> {
        let document = Document::load_mem(&data)?;
        Ok(Self {
            path: path.as_ref().to_path_buf(),
            data,
            document,
        })
    }

    /// File stem of the source, used for bundle names
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "output".to_string())
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    /// Extract the text of every page, in order
    ///
    /// Pages whose text cannot be extracted are kept with empty text so page
    /// indices always line up with the document.
    pub fn pages(&self, timeout: Duration) -> Vec<Page> {
        let expected = self.page_count();

        let texts = match extract_by_pages_with_timeout(&self.data, timeout) {
            Some(texts) if texts.len() == expected => texts,
            Some(texts) => {
                tracing::warn!(
                    "pdf-extract returned {} pages, document has {}; using lopdf",
                    texts.len(),
                    expected
                );
                self.extract_with_lopdf()
            }
            None => self.extract_with_lopdf(),
        };

        Page::from_texts(texts.iter().map(|t| cleanup_pdf_text(t)))
    }

    /// Fallback extraction using lopdf directly
    fn extract_with_lopdf(&self) -> Vec<String> {
        self.document
            .get_pages()
            .keys()
            .map(|&page_number| match self.document.extract_text(&[page_number]) {
                Ok(text) => text,
                Err(e) => {
                    tracing::debug!("Could not extract text for page {}: {}", page_number, e);
                    String::new()
                }
            })
            .collect()
    }
}

/// Run pdf-extract on a worker thread so a problematic font cannot hang the run
fn extract_by_pages_with_timeout(data: &[u8], timeout: Duration) -> Option<Vec<String>> {
    let data_vec = data.to_vec();
    let (tx, rx) = mpsc::channel();

    let handle = thread::spawn(move || {
        let result = pdf_extract::extract_text_from_mem_by_pages(&data_vec);
        let _ = tx.send(result);
    });

    match rx.recv_timeout(timeout) {
        Ok(Ok(pages)) => {
            let _ = handle.join();
            Some(pages)
        }
        Ok(Err(e)) => {
            let _ = handle.join();
            tracing::warn!("pdf-extract failed: {}, trying fallback", e);
            None
        }
        Err(mpsc::RecvTimeoutError::Timeout) => {
            // The thread cannot be killed; it is left to finish on its own
            tracing::error!("PDF extraction timeout after {:?}, trying fallback", timeout);
            None
        }
        Err(mpsc::RecvTimeoutError::Disconnected) => {
            tracing::error!("PDF extraction thread crashed, trying fallback");
            None
        }
    }
}
