//! Marker-based span location.
//!
//! The confidential field sits at a fixed place in the source documents: a
//! labeled line followed by one of a few possible next-field labels. The
//! locator finds the text between those labels on one page. It never looks
//! across page boundaries, so a field split over two pages is reported as
//! `NoTarget` for the first page and `Ambiguous` for the second.

use crate::config::{MarkerSet, TieBreak};

/// Reason attached to an end marker seen without a start marker.
pub const START_MARKER_MISSING: &str = "start marker not found on this page";

/// Reason attached to an end marker that only occurs before the start marker.
pub const END_BEFORE_START: &str = "end marker precedes start marker";

/// Result of evaluating one page's text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpanResult {
    /// No end-marker candidate occurs on the page.
    NoTarget,
    /// The text strictly between the start marker and an end marker.
    Found(String),
    /// A span was located but it is an empty-field placeholder such as "n/a".
    Placeholder(String),
    /// An end marker is present but the span could not be delimited.
    Ambiguous(String),
}

impl SpanResult {
    /// Returns the span text for results that carry one.
    pub fn span(&self) -> Option<&str> {
        match self {
            Self::Found(s) | Self::Placeholder(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_ambiguous(&self) -> bool {
        matches!(self, Self::Ambiguous(_))
    }
}

/// Locates the confidential span in page text.
#[derive(Debug, Clone, Default)]
pub struct SpanLocator {
    markers: MarkerSet,
}

impl SpanLocator {
    pub fn new(markers: MarkerSet) -> Self {
        Self { markers }
    }

    /// Evaluates `page_text` against every end-marker candidate.
    ///
    /// Candidates are checked in priority order. With
    /// [`TieBreak::LastMatchWins`] each present candidate overwrites the
    /// previous result, including an earlier `Found` being replaced by a
    /// later `Ambiguous`.
    pub fn locate(&self, page_text: &str) -> SpanResult {
        let mut result = SpanResult::NoTarget;

        for end in self.markers.end_candidates() {
            if !page_text.contains(end.as_str()) {
                continue;
            }

            result = self.delimit(page_text, end);

            if self.markers.tie_break() == TieBreak::FirstMatchWins {
                break;
            }
        }

        result
    }

    /// Extracts the span for one end marker known to be present.
    ///
    /// The end marker may share characters with the start marker (the
    /// defaults share a newline), so it is searched from the start of the
    /// start marker. A match beginning inside the start marker means the
    /// field is empty.
    fn delimit(&self, page_text: &str, end: &str) -> SpanResult {
        let start = self.markers.start();

        let Some(start_idx) = page_text.find(start) else {
            return SpanResult::Ambiguous(START_MARKER_MISSING.to_string());
        };
        let span_begin = start_idx + start.len();

        let Some(offset) = page_text[start_idx..].find(end) else {
            return SpanResult::Ambiguous(END_BEFORE_START.to_string());
        };
        let end_idx = start_idx + offset;
        if end_idx < span_begin {
            return SpanResult::Placeholder(String::new());
        }

        let span = &page_text[span_begin..end_idx];
        if self.markers.is_placeholder(span) {
            SpanResult::Placeholder(span.to_string())
        } else {
            SpanResult::Found(span.to_string())
        }
    }
}
