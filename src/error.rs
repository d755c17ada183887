//! Error types for the batch redaction library.
//!
//! Errors are split by the layer that raises them. Per-document errors
//! (backend, extraction, layout) are converted into a `Failed` outcome by the
//! document processor; only startup errors reach the binary.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for redaction operations.
pub type RedactorResult<T> = Result<T, RedactorError>;

/// Error type for all redaction operations.
#[derive(Debug, Error)]
pub enum RedactorError {
    /// Error occurred while reading, writing or deleting a file
    #[error("IO error for path '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Error occurred while opening, editing or saving a PDF
    #[error("PDF processing error{}: {message}", page_suffix(.page))]
    PdfProcessing {
        message: String,
        page: Option<usize>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Text extraction failed for a page
    #[error("Text extraction failed on page {page}: {reason}")]
    TextExtraction { page: usize, reason: String },

    /// Content stream glyphs do not line up with the extracted layout
    #[error(
        "Page {page} content does not match its text layout (expected {expected} glyphs, found {found})"
    )]
    LayoutMismatch {
        page: usize,
        expected: usize,
        found: usize,
    },

    /// Invalid configuration or parameters
    #[error("Invalid input for '{parameter}': {reason}")]
    InvalidInput { parameter: String, reason: String },

    /// The audit log could not be created or appended to
    #[error("Audit log '{}' is not writable: {source}", .path.display())]
    AuditLog {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The batch root does not exist or is not a directory
    #[error("Directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    /// The user refused the confirmation prompt
    #[error("Operation cancelled by user")]
    UserDeclined,
}

fn page_suffix(page: &Option<usize>) -> String {
    page.map(|p| format!(" on page {}", p)).unwrap_or_default()
}

impl RedactorError {
    /// Wraps a backend error that occurred on a specific page.
    pub fn pdf<E>(message: impl Into<String>, page: Option<usize>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::PdfProcessing {
            message: message.into(),
            page,
            source: Some(Box::new(source)),
        }
    }

    /// Returns true for errors that should stop the whole batch rather than
    /// a single document.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::DirectoryNotFound(_) | Self::AuditLog { .. } | Self::UserDeclined
        )
    }
}

impl From<lopdf::Error> for RedactorError {
    fn from(err: lopdf::Error) -> Self {
        Self::pdf("lopdf backend error", None, err)
    }
}
