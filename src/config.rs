//! Run configuration.
//!
//! The tool is configured from the command line only. Every type here has a
//! `Default` carrying the production values for application/judge packets,
//! plus builder methods for overrides.

use crate::error::{RedactorError, RedactorResult};

/// Label that opens the confidential field.
pub const DEFAULT_START_MARKER: &str = "Login and Password information if needed\n";

/// Labels that may follow the confidential field, in priority order.
pub const DEFAULT_END_MARKERS: [&str; 3] = ["\nStory Link 1", "\nVideo Upload 1", "\nPublication, "];

/// Field values that mean "nothing entered".
pub const DEFAULT_PLACEHOLDERS: [&str; 2] = ["n/a", "na"];

/// Which end-marker candidate decides the span when several are present on
/// the same page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TieBreak {
    /// Every present candidate is evaluated in order and the last one
    /// overwrites earlier results.
    #[default]
    LastMatchWins,
    /// The first present candidate in priority order decides.
    FirstMatchWins,
}

/// Literal markers delimiting the confidential field.
///
/// Markers are matched case-sensitively against a single page's text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerSet {
    start: String,
    end_candidates: Vec<String>,
    tie_break: TieBreak,
    placeholders: Vec<String>,
}

impl MarkerSet {
    /// Creates a marker set with the default tie-break and placeholders.
    pub fn new<S: Into<String>>(start: S, end_candidates: Vec<String>) -> Self {
        Self {
            start: start.into(),
            end_candidates,
            ..Self::default()
        }
    }

    pub fn with_start<S: Into<String>>(mut self, start: S) -> Self {
        self.start = start.into();
        self
    }

    pub fn with_end_markers(mut self, end_candidates: Vec<String>) -> Self {
        self.end_candidates = end_candidates;
        self
    }

    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    pub fn start(&self) -> &str {
        &self.start
    }

    pub fn end_candidates(&self) -> &[String] {
        &self.end_candidates
    }

    pub fn tie_break(&self) -> TieBreak {
        self.tie_break
    }

    /// Returns true if `span` is an empty-field placeholder.
    ///
    /// Comparison is case-insensitive on the trimmed span. A blank span is
    /// always a placeholder.
    pub fn is_placeholder(&self, span: &str) -> bool {
        let lowered = span.trim().to_lowercase();
        lowered.is_empty() || self.placeholders.iter().any(|p| p.to_lowercase() == lowered)
    }

    /// Rejects marker sets that could never match or would match everywhere.
    pub fn validate(&self) -> RedactorResult<()> {
        if self.start.is_empty() {
            return Err(RedactorError::InvalidInput {
                parameter: "start_marker".to_string(),
                reason: "must not be empty".to_string(),
            });
        }

        if self.end_candidates.is_empty() {
            return Err(RedactorError::InvalidInput {
                parameter: "end_marker".to_string(),
                reason: "at least one end marker is required".to_string(),
            });
        }

        if self.end_candidates.iter().any(String::is_empty) {
            return Err(RedactorError::InvalidInput {
                parameter: "end_marker".to_string(),
                reason: "end markers must not be empty".to_string(),
            });
        }

        Ok(())
    }
}

impl Default for MarkerSet {
    fn default() -> Self {
        Self {
            start: DEFAULT_START_MARKER.to_string(),
            end_candidates: DEFAULT_END_MARKERS.iter().map(|m| m.to_string()).collect(),
            tie_break: TieBreak::default(),
            placeholders: DEFAULT_PLACEHOLDERS.iter().map(|p| p.to_string()).collect(),
        }
    }
}

/// File-name eligibility rules for batch discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFilter {
    prefixes: Vec<String>,
    extension: String,
    redacted_suffix: String,
}

impl FileFilter {
    /// Replaces the file-name prefixes a document must start with.
    pub fn with_prefixes(mut self, prefixes: Vec<String>) -> Self {
        self.prefixes = prefixes;
        self
    }

    /// Suffix inserted before the extension of redacted copies.
    pub fn redacted_suffix(&self) -> &str {
        &self.redacted_suffix
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Returns true if a file with this name should be redacted.
    ///
    /// Files that already carry the redaction suffix are never eligible, so
    /// repeated runs do not redact their own output.
    pub fn accepts(&self, file_name: &str) -> bool {
        if !self.prefixes.iter().any(|p| file_name.starts_with(p.as_str())) {
            return false;
        }
        if !file_name.ends_with(&self.extension) {
            return false;
        }
        let already_redacted = format!("{}{}", self.redacted_suffix, self.extension);
        !file_name.ends_with(&already_redacted)
    }
}

impl Default for FileFilter {
    fn default() -> Self {
        Self {
            prefixes: vec!["Application-".to_string(), "Judge-".to_string()],
            extension: ".pdf".to_string(),
            redacted_suffix: "_redacted".to_string(),
        }
    }
}

/// What happens to originals once a redacted copy exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunMode {
    /// Write a sibling redacted copy and keep the original.
    #[default]
    Copy,
    /// Write the redacted copy, then delete the original.
    Replace,
}

impl RunMode {
    pub fn is_destructive(self) -> bool {
        matches!(self, Self::Replace)
    }

    /// Prompt shown before any file is touched.
    pub fn confirmation_prompt(self) -> &'static str {
        match self {
            Self::Copy => "Redacted copies will be saved alongside the unredacted originals.",
            Self::Replace => {
                "You have chosen to create new redacted files and delete the originals. \
                 This action cannot be undone."
            }
        }
    }
}

/// Fill colour painted over removed regions, as RGB components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FillColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl FillColor {
    pub const BLACK: Self = Self {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };
}

impl Default for FillColor {
    fn default() -> Self {
        Self::BLACK
    }
}

/// Everything a batch run needs besides the directory and the audit sink.
#[derive(Debug, Clone, Default)]
pub struct BatchConfig {
    pub mode: RunMode,
    pub markers: MarkerSet,
    pub filter: FileFilter,
    pub fill: FillColor,
    /// Password tried on encrypted documents.
    pub password: Option<String>,
}

impl BatchConfig {
    pub fn with_mode(mut self, mode: RunMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_markers(mut self, markers: MarkerSet) -> Self {
        self.markers = markers;
        self
    }

    pub fn with_filter(mut self, filter: FileFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_password<S: Into<String>>(mut self, password: S) -> Self {
        self.password = Some(password.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_markers() {
        let markers = MarkerSet::default();
        assert_eq!(markers.start(), DEFAULT_START_MARKER);
        assert_eq!(markers.end_candidates().len(), 3);
        assert_eq!(markers.tie_break(), TieBreak::LastMatchWins);
        assert!(markers.validate().is_ok());
    }

    #[test]
    fn test_placeholders_are_case_insensitive() {
        let markers = MarkerSet::default();
        assert!(markers.is_placeholder("n/a"));
        assert!(markers.is_placeholder("N/A"));
        assert!(markers.is_placeholder(" NA "));
        assert!(markers.is_placeholder(""));
        assert!(markers.is_placeholder(" \n"));
        assert!(!markers.is_placeholder("nachos"));
        assert!(!markers.is_placeholder("user: alice / pw: hunter2"));
    }

    #[test]
    fn test_validate_rejects_empty_markers() {
        let markers = MarkerSet::default().with_start("");
        assert!(markers.validate().is_err());

        let markers = MarkerSet::default().with_end_markers(Vec::new());
        assert!(markers.validate().is_err());

        let markers = MarkerSet::default().with_end_markers(vec![String::new()]);
        assert!(markers.validate().is_err());
    }

    #[test]
    fn test_file_filter() {
        let filter = FileFilter::default();
        assert!(filter.accepts("Application-1234.pdf"));
        assert!(filter.accepts("Judge-Smith.pdf"));
        assert!(!filter.accepts("Application-1234_redacted.pdf"));
        assert!(!filter.accepts("Application-1234.docx"));
        assert!(!filter.accepts("Report-1234.pdf"));
        assert!(!filter.accepts("application-1234.pdf"));
    }

    #[test]
    fn test_custom_prefixes() {
        let filter = FileFilter::default().with_prefixes(vec!["Judge-".to_string()]);
        assert!(filter.accepts("Judge-7.pdf"));
        assert!(!filter.accepts("Application-7.pdf"));
        assert!(!filter.accepts("Judge-7_redacted.pdf"));
    }

    #[test]
    fn test_run_mode() {
        assert_eq!(RunMode::default(), RunMode::Copy);
        assert!(RunMode::Replace.is_destructive());
        assert!(RunMode::Replace.confirmation_prompt().contains("cannot be undone"));
        assert!(!RunMode::Copy.is_destructive());
    }
}
