//! Per-document disposition state machine.
//!
//! A document starts `Unredacted` and is folded over its pages in order.
//! `Failed` absorbs everything; the other transitions are listed in
//! [`DocumentState::on_page`].

use std::fmt;

/// What a single page contributed to the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageEvent {
    /// No end marker on the page.
    NoTarget,
    /// A span was located but it is an empty-field placeholder.
    Placeholder,
    /// An end marker was found without a usable start marker.
    Ambiguous,
    /// A span was located and at least one region was removed.
    Redacted,
    /// A span was located but no matching region exists in the page layout.
    RegionNotFound,
}

/// Disposition of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DocumentState {
    /// No page matched any end marker, or only placeholders were found.
    #[default]
    Unredacted,
    /// At least one span was removed and nothing later demanded review.
    Redacted,
    /// A potential redaction was found but not completed.
    Flagged,
    /// Processing raised an error.
    Failed,
}

impl DocumentState {
    /// Applies one page's event.
    ///
    /// | current      | event          | next      |
    /// |--------------|----------------|-----------|
    /// | any          | NoTarget       | unchanged |
    /// | any          | Placeholder    | unchanged |
    /// | Unredacted   | Ambiguous      | Flagged   |
    /// | Flagged      | Ambiguous      | Flagged   |
    /// | Redacted     | Ambiguous      | Redacted  |
    /// | any          | Redacted       | Redacted  |
    /// | any          | RegionNotFound | Flagged   |
    /// | Failed       | any            | Failed    |
    #[must_use]
    pub fn on_page(self, event: PageEvent) -> Self {
        use DocumentState::*;

        match (self, event) {
            (Failed, _) => Failed,
            (state, PageEvent::NoTarget | PageEvent::Placeholder) => state,
            (Redacted, PageEvent::Ambiguous) => Redacted,
            (_, PageEvent::Ambiguous) => Flagged,
            (_, PageEvent::Redacted) => Redacted,
            (_, PageEvent::RegionNotFound) => Flagged,
        }
    }

    /// Terminal transition for an error while processing the document.
    #[must_use]
    pub fn fail(self) -> Self {
        Self::Failed
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unredacted => "Unredacted",
            Self::Redacted => "Redacted",
            Self::Flagged => "Flagged",
            Self::Failed => "Failed",
        }
    }
}

impl fmt::Display for DocumentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
