//! Document capability traits and supporting types.
//!
//! These traits are the seam between the redaction engine and a PDF engine.
//! The engine only needs per-page text, a literal-text region search, and a
//! mark/commit pair for removal.

use crate::config::FillColor;
use crate::error::RedactorResult;
use std::path::Path;

/// Axis-aligned rectangle in PDF user space (origin bottom-left).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl Region {
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self {
            x0: x0.min(x1),
            y0: y0.min(y1),
            x1: x0.max(x1),
            y1: y0.max(y1),
        }
    }

    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    /// Smallest region covering both.
    pub fn union(&self, other: &Region) -> Region {
        Region {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }

    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.x0 && x <= self.x1 && y >= self.y0 && y <= self.y1
    }

    /// Centre point `(x, y)`.
    pub fn center(&self) -> (f64, f64) {
        ((self.x0 + self.x1) / 2.0, (self.y0 + self.y1) / 2.0)
    }
}

/// An open document that supports secure text removal.
///
/// Page indices are zero-based.
pub trait RedactableDocument {
    fn page_count(&self) -> usize;

    /// Plain text of one page, lines separated by `\n`.
    fn page_text(&mut self, page: usize) -> RedactorResult<String>;

    /// Regions where `literal` occurs verbatim on the page.
    fn find_regions(&mut self, page: usize, literal: &str) -> RedactorResult<Vec<Region>>;

    /// Queues a region for removal; nothing changes until
    /// [`commit_removals`](Self::commit_removals).
    fn mark_for_removal(&mut self, page: usize, region: Region, fill: FillColor)
        -> RedactorResult<()>;

    /// Physically removes everything under the queued regions of a page and
    /// paints them over. Returns the number of regions committed.
    fn commit_removals(&mut self, page: usize) -> RedactorResult<usize>;

    /// Writes the document, with all committed removals, to `path`.
    fn save(&mut self, path: &Path) -> RedactorResult<()>;
}

/// Opens documents for redaction.
///
/// Implementations decide how text is extracted and how removal is
/// performed, allowing for different PDF engines.
pub trait DocumentBackend: Send + Sync {
    fn open(&self, path: &Path) -> RedactorResult<Box<dyn RedactableDocument>>;

    /// Returns a human-readable name for this backend.
    fn name(&self) -> &str;

    /// Returns whether removed text is physically deleted (vs visually obscured).
    fn is_secure(&self) -> bool;
}
