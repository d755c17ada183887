//! In-memory document used by unit tests.

use std::path::{Path, PathBuf};

use super::strategy::{DocumentBackend, RedactableDocument, Region};
use crate::config::FillColor;
use crate::error::{RedactorError, RedactorResult};

/// Backend reading UTF-8 files whose pages are separated by form feeds.
#[derive(Debug, Default)]
pub struct FakeBackend;

impl DocumentBackend for FakeBackend {
    fn open(&self, path: &Path) -> RedactorResult<Box<dyn RedactableDocument>> {
        let text = std::fs::read_to_string(path).map_err(|source| RedactorError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let pages: Vec<&str> = text.split('\x0c').collect();
        Ok(Box::new(FakeDocument::new(&pages)))
    }

    fn name(&self) -> &str {
        "Fake"
    }

    fn is_secure(&self) -> bool {
        false
    }
}

/// Pages are plain strings; a region is the byte range of a match, stored
/// in `x0..x1`.
#[derive(Debug, Default)]
pub struct FakeDocument {
    pub pages: Vec<String>,
    /// Literals present in the text but without any region.
    pub hidden: Vec<String>,
    /// Page whose text extraction fails.
    pub broken_page: Option<usize>,
    pub pending: Vec<(usize, Region)>,
    /// `(page, regions committed)` per commit call.
    pub commits: Vec<(usize, usize)>,
    pub saved: Vec<PathBuf>,
}

impl FakeDocument {
    pub fn new(pages: &[&str]) -> Self {
        Self {
            pages: pages.iter().map(|p| p.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn hide_from_layout(mut self, literal: &str) -> Self {
        self.hidden.push(literal.to_string());
        self
    }

    pub fn break_page(mut self, page: usize) -> Self {
        self.broken_page = Some(page);
        self
    }
}

impl RedactableDocument for FakeDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_text(&mut self, page: usize) -> RedactorResult<String> {
        if self.broken_page == Some(page) {
            return Err(RedactorError::TextExtraction {
                page: page + 1,
                reason: "corrupt content stream".to_string(),
            });
        }
        Ok(self.pages[page].clone())
    }

    fn find_regions(&mut self, page: usize, literal: &str) -> RedactorResult<Vec<Region>> {
        if literal.is_empty() || self.hidden.iter().any(|h| h == literal) {
            return Ok(Vec::new());
        }
        Ok(self.pages[page]
            .match_indices(literal)
            .map(|(start, m)| Region::new(start as f64, 0.0, (start + m.len()) as f64, 1.0))
            .collect())
    }

    fn mark_for_removal(
        &mut self,
        page: usize,
        region: Region,
        _fill: FillColor,
    ) -> RedactorResult<()> {
        self.pending.push((page, region));
        Ok(())
    }

    fn commit_removals(&mut self, page: usize) -> RedactorResult<usize> {
        let mut ranges: Vec<(usize, usize)> = self
            .pending
            .iter()
            .filter(|(p, _)| *p == page)
            .map(|(_, r)| (r.x0 as usize, r.x1 as usize))
            .collect();
        self.pending.retain(|(p, _)| *p != page);

        ranges.sort_unstable_by(|a, b| b.cmp(a));
        for (start, end) in &ranges {
            self.pages[page].replace_range(*start..*end, "");
        }

        if !ranges.is_empty() {
            self.commits.push((page, ranges.len()));
        }
        Ok(ranges.len())
    }

    fn save(&mut self, path: &Path) -> RedactorResult<()> {
        self.saved.push(path.to_path_buf());
        Ok(())
    }
}
