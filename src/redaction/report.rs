//! Per-document processing results.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::domain::DocumentState;
use crate::error::RedactorError;

/// Note prefix for every potential redaction that was not completed.
pub const INCOMPLETE_NOTE: &str = "CHECK FILE: Potential redaction found but not completed";

/// Why a page needs human review.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FindingKind {
    /// End marker without a usable start marker.
    Ambiguous,
    /// Span located in the text but not in the page layout.
    RegionNotFound,
}

/// A page-level event that needs human review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    /// 1-based page number.
    pub page: usize,
    pub kind: FindingKind,
    pub reason: String,
}

impl Finding {
    pub fn ambiguous(page: usize, reason: impl Into<String>) -> Self {
        Self {
            page,
            kind: FindingKind::Ambiguous,
            reason: reason.into(),
        }
    }

    pub fn region_not_found(page: usize) -> Self {
        Self {
            page,
            kind: FindingKind::RegionNotFound,
            reason: "span text has no visible region on this page".to_string(),
        }
    }

    /// Audit-log note for this finding.
    pub fn note(&self) -> String {
        format!("{} (page {}: {})", INCOMPLETE_NOTE, self.page, self.reason)
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "page {}: {}", self.page, self.reason)
    }
}

/// Outcome of processing one document.
#[derive(Debug, Clone)]
pub struct DocumentReport {
    pub path: PathBuf,
    pub state: DocumentState,
    pub findings: Vec<Finding>,
    /// Error message when `state` is `Failed`.
    pub failure: Option<String>,
    pub pages_processed: usize,
    pub pages_redacted: usize,
    /// Where the redacted document was written, if it was.
    pub output: Option<PathBuf>,
}

impl DocumentReport {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            state: DocumentState::default(),
            findings: Vec::new(),
            failure: None,
            pages_processed: 0,
            pages_redacted: 0,
            output: None,
        }
    }

    /// Moves the report to `Failed`. Output written before the error is
    /// forgotten.
    pub fn fail(&mut self, error: &RedactorError) {
        self.state = self.state.fail();
        self.failure = Some(error.to_string());
        self.output = None;
    }

    pub fn is_redacted(&self) -> bool {
        self.state == DocumentState::Redacted
    }

    pub fn needs_review(&self) -> bool {
        matches!(self.state, DocumentState::Flagged | DocumentState::Failed)
            || !self.findings.is_empty()
    }
}
