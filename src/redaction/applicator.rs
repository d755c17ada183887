//! Applies a located span to a page.

use tracing::debug;

use super::strategy::RedactableDocument;
use crate::config::FillColor;
use crate::error::RedactorResult;

/// Marks every occurrence of a span on a page and commits the removal.
#[derive(Debug, Clone, Copy, Default)]
pub struct RedactionApplicator {
    fill: FillColor,
}

impl RedactionApplicator {
    pub fn new(fill: FillColor) -> Self {
        Self { fill }
    }

    /// Returns `true` iff at least one region was removed.
    ///
    /// A span present in the extracted text but absent from the page layout
    /// yields `false`; the caller must not treat that as success.
    pub fn apply(
        &self,
        doc: &mut dyn RedactableDocument,
        page: usize,
        span: &str,
    ) -> RedactorResult<bool> {
        let regions = doc.find_regions(page, span)?;
        if regions.is_empty() {
            debug!(page = page + 1, "span has no regions on page");
            return Ok(false);
        }

        for region in regions {
            doc.mark_for_removal(page, region, self.fill)?;
        }

        let committed = doc.commit_removals(page)?;
        debug!(page = page + 1, committed, "committed removals");
        Ok(committed > 0)
    }
}
