//! Document processing: locating, removing and classifying.
//!
//! [`DocumentProcessor`] drives one document through its pages, asking the
//! [`SpanLocator`] for a span, the [`RedactionApplicator`] to remove it, and
//! folding the page events into a [`DocumentState`](crate::domain::DocumentState). The PDF engine sits
//! behind the [`DocumentBackend`] trait.

pub mod applicator;
pub mod content;
pub mod layout;
pub mod report;
pub mod secure;
pub mod strategy;

#[cfg(test)]
pub(crate) mod testing;

pub use applicator::RedactionApplicator;
pub use report::{DocumentReport, Finding, FindingKind};
pub use secure::SecureBackend;
pub use strategy::{DocumentBackend, RedactableDocument, Region};

use std::path::Path;

use tracing::{debug, info, warn};

use crate::config::{FillColor, MarkerSet};
use crate::domain::{PageEvent, SpanLocator, SpanResult};
use crate::error::{RedactorError, RedactorResult};

/// Processes one document at a time.
///
/// Processing never returns an error: anything that goes wrong inside a
/// document becomes a `Failed` report so the caller can move on.
pub struct DocumentProcessor {
    backend: Box<dyn DocumentBackend>,
    locator: SpanLocator,
    applicator: RedactionApplicator,
}

impl DocumentProcessor {
    /// Creates a processor over the given backend.
    pub fn new(backend: Box<dyn DocumentBackend>, markers: MarkerSet, fill: FillColor) -> Self {
        Self {
            backend,
            locator: SpanLocator::new(markers),
            applicator: RedactionApplicator::new(fill),
        }
    }

    /// Creates a processor with secure (physical removal) redaction.
    pub fn with_secure_backend(markers: MarkerSet) -> Self {
        Self::new(
            Box::new(SecureBackend::default()),
            markers,
            FillColor::default(),
        )
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Opens `input`, redacts it, and writes `output` if anything was removed.
    pub fn process(&self, input: &Path, output: &Path) -> DocumentReport {
        let mut report = DocumentReport::new(input);

        if !input.is_file() {
            report.fail(&RedactorError::Io {
                path: input.to_path_buf(),
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "Input file does not exist",
                ),
            });
            return report;
        }

        let outcome = self
            .backend
            .open(input)
            .and_then(|mut doc| self.evaluate(doc.as_mut(), output, &mut report));

        if let Err(e) = outcome {
            warn!(file = %input.display(), error = %e, "document failed");
            report.fail(&e);
        }
        report
    }

    /// Processes an already opened document.
    pub fn process_document(
        &self,
        doc: &mut dyn RedactableDocument,
        input: &Path,
        output: &Path,
    ) -> DocumentReport {
        let mut report = DocumentReport::new(input);
        if let Err(e) = self.evaluate(doc, output, &mut report) {
            warn!(file = %input.display(), error = %e, "document failed");
            report.fail(&e);
        }
        report
    }

    fn evaluate(
        &self,
        doc: &mut dyn RedactableDocument,
        output: &Path,
        report: &mut DocumentReport,
    ) -> RedactorResult<()> {
        for page in 0..doc.page_count() {
            let text = doc.page_text(page)?;
            report.pages_processed += 1;

            let event = self.page_event(doc, page, &text, report)?;
            report.state = report.state.on_page(event);
        }

        if report.pages_redacted > 0 {
            doc.save(output)?;
            report.output = Some(output.to_path_buf());
        }

        info!(
            file = %report.path.display(),
            state = %report.state,
            pages = report.pages_processed,
            redacted_pages = report.pages_redacted,
            "document processed"
        );
        Ok(())
    }

    fn page_event(
        &self,
        doc: &mut dyn RedactableDocument,
        page: usize,
        text: &str,
        report: &mut DocumentReport,
    ) -> RedactorResult<PageEvent> {
        let number = page + 1;

        let event = match self.locator.locate(text) {
            SpanResult::NoTarget => PageEvent::NoTarget,
            SpanResult::Placeholder(value) => {
                debug!(page = number, value = %value.trim(), "placeholder span, nothing to redact");
                PageEvent::Placeholder
            }
            SpanResult::Ambiguous(reason) => {
                warn!(file = %report.path.display(), page = number, %reason, "potential redaction not completed");
                report.findings.push(Finding::ambiguous(number, reason));
                PageEvent::Ambiguous
            }
            SpanResult::Found(span) => {
                if self.applicator.apply(doc, page, &span)? {
                    report.pages_redacted += 1;
                    PageEvent::Redacted
                } else {
                    warn!(file = %report.path.display(), page = number, "span located but no region found");
                    report.findings.push(Finding::region_not_found(number));
                    PageEvent::RegionNotFound
                }
            }
        };
        Ok(event)
    }
}

impl Default for DocumentProcessor {
    fn default() -> Self {
        Self::with_secure_backend(MarkerSet::default())
    }
}
