//! Page and group types produced by the boundary scan


/// Extracted text of a single source page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// Page index (0-based)
    pub index: usize,
    /// Extracted text (may be empty)
    pub text: String,
}

impl Page {
    pub fn new(index: usize, text: impl Into<String>) -> Self {
        Self {
            index,
            text: text.into(),
        }
    }

    /// Build a page sequence from texts in document order
    pub fn from_texts<I, S>(texts: I) -> Vec<Page>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        texts
            .into_iter()
            .enumerate()
            .map(|(index, text)| Page::new(index, text))
            .collect()
    }
}

/// A page where a boundary marker was detected
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerMatch {
    /// Page index (0-based)
    pub page: usize,
    /// Matched identifier (student number)
    pub identifier: String,
    /// Name captured from the overview block
    pub name: Option<String>,
}

/// Contiguous run of pages forming one output document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentGroup {
    /// First page index (inclusive)
    pub start: usize,
    /// One past the last page index
    pub end: usize,
    /// Identifier used for naming the output
    pub identifier: String,
    /// Name captured with the opening marker
    pub name: Option<String>,
    /// False for the fallback whole-document group
    pub has_marker: bool,
}

impl DocumentGroup {
    /// Number of pages in the group
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// First page, 1-based
    pub fn first_page(&self) -> usize {
        self.start + 1
    }

    /// Last page, 1-based
    pub fn last_page(&self) -> usize {
        self.end
    }
}
