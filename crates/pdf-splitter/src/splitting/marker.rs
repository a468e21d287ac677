//! Boundary marker detection
//!
//! A page opens a new record when it carries an identifier (student number)
//! and an overview block. The overview block is matched case-insensitively
//! and may span lines; its first capture group, if any, is the record name.

use regex::{Regex, RegexBuilder};

use crate::config::{MarkerConfig, OverviewWindow};
use crate::error::{Error, Result};
use crate::types::{MarkerMatch, Page};

/// Compiled marker predicate
#[derive(Debug, Clone)]
pub struct MarkerDetector {
    identifier: Regex,
    overview: Regex,
    window: OverviewWindow,
}

impl MarkerDetector {
    /// Compile the configured patterns
    pub fn new(config: &MarkerConfig) -> Result<Self> {
        let identifier =
            Regex::new(&config.identifier_pattern).map_err(|source| Error::InvalidPattern {
                pattern: config.identifier_pattern.clone(),
                source,
            })?;

        let overview = RegexBuilder::new(&config.overview_pattern)
            .case_insensitive(true)
            .dot_matches_new_line(true)
            .build()
            .map_err(|source| Error::InvalidPattern {
                pattern: config.overview_pattern.clone(),
                source,
            })?;

        Ok(Self {
            identifier,
            overview,
            window: config.overview_window,
        })
    }

    /// Test a page, looking at the following page when the window allows it
    pub fn detect(&self, page: &Page, next: Option<&Page>) -> Option<MarkerMatch> {
        let identifier = self.identifier.find(&page.text)?;

        // A next page with its own identifier owns its overview block
        let overview = self.overview.captures(&page.text).or_else(|| match self.window {
            OverviewWindow::NextPage => next
                .filter(|n| !self.identifier.is_match(&n.text))
                .and_then(|n| self.overview.captures(&n.text)),
            OverviewWindow::SamePage => None,
        })?;

        let name = overview
            .get(1)
            .map(|m| collapse_whitespace(m.as_str()))
            .filter(|n| !n.is_empty());

        Some(MarkerMatch {
            page: page.index,
            identifier: identifier.as_str().to_string(),
            name,
        })
    }
}

/// Extracted names often carry line breaks between the name parts
fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
