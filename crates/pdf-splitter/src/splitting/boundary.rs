//! Page grouping by boundary markers

use crate::config::{MarkerConfig, PreamblePolicy};
use crate::error::{Error, Result};
use crate::types::{DocumentGroup, MarkerMatch, Page};

use super::MarkerDetector;

/// Partitions a page sequence into per-record groups
#[derive(Debug, Clone)]
pub struct BoundarySplitter {
    detector: MarkerDetector,
    preamble: PreamblePolicy,
    require_marker: bool,
    fallback_identifier: String,
}

/// Group being accumulated during the scan
struct OpenGroup {
    start: usize,
    identifier: String,
    name: Option<String>,
}

impl OpenGroup {
    fn close(self, end: usize) -> DocumentGroup {
        DocumentGroup {
            start: self.start,
            end,
            identifier: self.identifier,
            name: self.name,
            has_marker: true,
        }
    }
}

impl BoundarySplitter {
    /// Build a splitter from marker configuration
    pub fn new(config: &MarkerConfig) -> Result<Self> {
        Ok(Self {
            detector: MarkerDetector::new(config)?,
            preamble: config.preamble,
            require_marker: config.require_marker,
            fallback_identifier: config.fallback_identifier.clone(),
        })
    }

    pub fn preamble(&self) -> PreamblePolicy {
        self.preamble
    }

    /// Split pages into groups
    pub fn split(&self, pages: &[Page]) -> Result<Vec<DocumentGroup>> {
        self.split_observed(pages, |_, _| {})
    }

    /// Split pages into groups, reporting every scanned page and its match
    pub fn split_observed<F>(&self, pages: &[Page], mut observe: F) -> Result<Vec<DocumentGroup>>
    where
        F: FnMut(&Page, Option<&MarkerMatch>),
    {
        let mut groups = Vec::new();
        let mut open: Option<OpenGroup> = None;

        for (position, page) in pages.iter().enumerate() {
            let marker = self.detector.detect(page, pages.get(position + 1));
            observe(page, marker.as_ref());

            let Some(marker) = marker else {
                continue;
            };

            let start = match open.take() {
                Some(previous) => {
                    groups.push(previous.close(position));
                    position
                }
                None if self.preamble == PreamblePolicy::Attach => 0,
                None => position,
            };

            open = Some(OpenGroup {
                start,
                identifier: marker.identifier,
                name: marker.name,
            });
        }

        if let Some(last) = open {
            groups.push(last.close(pages.len()));
        }

        if groups.is_empty() && !pages.is_empty() {
            if self.require_marker {
                return Err(Error::NoMarkerFound { pages: pages.len() });
            }
            tracing::debug!(
                "No marker in {} page(s), emitting a single '{}' group",
                pages.len(),
                self.fallback_identifier
            );
            groups.push(DocumentGroup {
                start: 0,
                end: pages.len(),
                identifier: self.fallback_identifier.clone(),
                name: None,
                has_marker: false,
            });
        }

        Ok(groups)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OverviewWindow;
    use crate::test_support::marker_text;
    use proptest::prelude::*;

    fn splitter(preamble: PreamblePolicy, require_marker: bool) -> BoundarySplitter {
        BoundarySplitter::new(&MarkerConfig {
            preamble,
            require_marker,
            ..MarkerConfig::default()
        })
        .unwrap()
    }

    fn spans(groups: &[DocumentGroup]) -> Vec<(usize, usize, &str)> {
        groups
            .iter()
            .map(|g| (g.start, g.end, g.identifier.as_str()))
            .collect()
    }

    #[test]
    fn test_two_markers_in_five_pages() {
        let pages = Page::from_texts([
            marker_text("2024-00001"),
            "continued".to_string(),
            String::new(),
            marker_text("2024-00002"),
            "continued".to_string(),
        ]);
        let groups = splitter(PreamblePolicy::Drop, false).split(&pages).unwrap();
        assert_eq!(
            spans(&groups),
            vec![(0, 3, "2024-00001"), (3, 5, "2024-00002")]
        );
        assert!(groups.iter().all(|g| g.has_marker));
        assert_eq!(groups[0].name.as_deref(), Some("Doe, John"));
    }

    #[test]
    fn test_no_marker_falls_back_to_single_group() {
        let pages = Page::from_texts(["cover", "appendix"]);
        let groups = splitter(PreamblePolicy::Drop, false).split(&pages).unwrap();
        assert_eq!(spans(&groups), vec![(0, 2, "unknown")]);
        assert!(!groups[0].has_marker);
    }

    #[test]
    fn test_no_marker_in_strict_mode_fails() {
        let pages = Page::from_texts(["cover", "appendix"]);
        let err = splitter(PreamblePolicy::Drop, true).split(&pages).unwrap_err();
        assert!(matches!(err, Error::NoMarkerFound { pages: 2 }));
    }

    #[test]
    fn test_empty_input_yields_no_groups() {
        assert!(splitter(PreamblePolicy::Drop, false).split(&[]).unwrap().is_empty());
        assert!(splitter(PreamblePolicy::Attach, true).split(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_preamble_dropped_by_default() {
        let pages = Page::from_texts([
            "cover letter".to_string(),
            "instructions".to_string(),
            marker_text("2024-00001"),
            "continued".to_string(),
        ]);
        let groups = splitter(MarkerConfig::default().preamble, false)
            .split(&pages)
            .unwrap();
        assert_eq!(spans(&groups), vec![(2, 4, "2024-00001")]);
    }

    #[test]
    fn test_preamble_attached_to_first_group() {
        let pages = Page::from_texts([
            "cover letter".to_string(),
            marker_text("2024-00001"),
            marker_text("2024-00002"),
        ]);
        let groups = splitter(PreamblePolicy::Attach, false).split(&pages).unwrap();
        assert_eq!(
            spans(&groups),
            vec![(0, 2, "2024-00001"), (2, 3, "2024-00002")]
        );
    }

    #[test]
    fn test_duplicate_identifiers_are_not_merged() {
        let pages = Page::from_texts([
            marker_text("2024-00001"),
            marker_text("2024-00001"),
            "continued".to_string(),
        ]);
        let groups = splitter(PreamblePolicy::Drop, false).split(&pages).unwrap();
        assert_eq!(
            spans(&groups),
            vec![(0, 1, "2024-00001"), (1, 3, "2024-00001")]
        );
    }

    #[test]
    fn test_next_page_window_ignores_repeated_identifier_on_continuation() {
        let splitter = BoundarySplitter::new(&MarkerConfig {
            overview_window: OverviewWindow::NextPage,
            ..MarkerConfig::default()
        })
        .unwrap();
        let pages = Page::from_texts([
            marker_text("2024-00001"),
            "Transcript continued 2024-00001".to_string(),
            marker_text("2024-00002"),
        ]);
        let groups = splitter.split(&pages).unwrap();
        assert_eq!(
            spans(&groups),
            vec![(0, 2, "2024-00001"), (2, 3, "2024-00002")]
        );
    }

    #[test]
    fn test_next_page_window_splits_identifier_before_overview() {
        let splitter = BoundarySplitter::new(&MarkerConfig {
            overview_window: OverviewWindow::NextPage,
            ..MarkerConfig::default()
        })
        .unwrap();
        let pages = Page::from_texts([
            "Student number 2024-00001",
            "Name (Last, First, Middle) Doe, John Student No.",
            "continued",
        ]);
        let groups = splitter.split(&pages).unwrap();
        assert_eq!(spans(&groups), vec![(0, 3, "2024-00001")]);
        assert_eq!(groups[0].name.as_deref(), Some("Doe, John"));
    }

    #[test]
    fn test_observer_sees_every_page() {
        let pages = Page::from_texts([
            "cover".to_string(),
            marker_text("2024-00001"),
            "continued".to_string(),
        ]);
        let mut seen = Vec::new();
        splitter(PreamblePolicy::Drop, false)
            .split_observed(&pages, |page, marker| {
                seen.push((page.index, marker.map(|m| m.identifier.clone())));
            })
            .unwrap();
        assert_eq!(
            seen,
            vec![(0, None), (1, Some("2024-00001".to_string())), (2, None)]
        );
    }

    fn pages_from_flags(flags: &[bool]) -> Vec<Page> {
        Page::from_texts(flags.iter().enumerate().map(|(i, &is_marker)| {
            if is_marker {
                marker_text(&format!("2024-{:05}", i))
            } else {
                format!("page {}", i)
            }
        }))
    }

    proptest! {
        #[test]
        fn prop_groups_partition_matched_region(
            flags in proptest::collection::vec(any::<bool>(), 0..40),
            attach in any::<bool>(),
        ) {
            let policy = if attach { PreamblePolicy::Attach } else { PreamblePolicy::Drop };
            let pages = pages_from_flags(&flags);
            let groups = splitter(policy, false).split(&pages).unwrap();

            let markers: Vec<usize> = flags
                .iter()
                .enumerate()
                .filter(|(_, m)| **m)
                .map(|(i, _)| i)
                .collect();

            if pages.is_empty() {
                prop_assert!(groups.is_empty());
                return Ok(());
            }

            let expected_start = match (markers.first(), policy) {
                (Some(&first), PreamblePolicy::Drop) => first,
                _ => 0,
            };
            prop_assert_eq!(groups.first().unwrap().start, expected_start);
            prop_assert_eq!(groups.last().unwrap().end, pages.len());
            prop_assert_eq!(groups.len(), markers.len().max(1));

            for pair in groups.windows(2) {
                prop_assert_eq!(pair[0].end, pair[1].start);
            }
            for group in &groups {
                prop_assert!(!group.is_empty());
            }
            for (group, &marker) in groups.iter().zip(markers.iter()).skip(1) {
                prop_assert_eq!(group.start, marker);
            }
        }

        #[test]
        fn prop_split_is_deterministic(flags in proptest::collection::vec(any::<bool>(), 0..30)) {
            let pages = pages_from_flags(&flags);
            let splitter = splitter(PreamblePolicy::Drop, false);
            prop_assert_eq!(splitter.split(&pages).unwrap(), splitter.split(&pages).unwrap());
        }
    }
}
