//! Batch orchestration over a directory tree.
//!
//! A run is strictly sequential: each eligible document is opened,
//! processed, saved or not, and closed before the next one starts. Errors
//! inside a document never stop the run; only a failing audit sink does.

pub mod confirm;
pub mod discovery;

pub use confirm::{require_confirmation, AssumeYes, Confirmation, PromptConfirmation, StdinConfirmation};
pub use discovery::{discover, redacted_path};

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::audit::{records_for, AuditRecord, AuditSink, ERROR_NOTE};
use crate::config::BatchConfig;
use crate::domain::DocumentState;
use crate::error::{RedactorError, RedactorResult};
use crate::redaction::{DocumentProcessor, DocumentReport, SecureBackend};

/// Results of one batch run.
#[derive(Debug, Default)]
pub struct BatchSummary {
    pub reports: Vec<DocumentReport>,
    /// Originals removed in replace mode.
    pub deleted: Vec<PathBuf>,
    /// Originals that replace mode failed to remove.
    pub delete_failures: Vec<PathBuf>,
}

impl BatchSummary {
    /// Originals whose redacted copy was written and whose state is `Redacted`.
    pub fn redacted_files(&self) -> Vec<&Path> {
        self.reports
            .iter()
            .filter(|r| r.is_redacted() && r.output.is_some())
            .map(|r| r.path.as_path())
            .collect()
    }

    pub fn count(&self, state: DocumentState) -> usize {
        self.reports.iter().filter(|r| r.state == state).count()
    }

    /// Documents with at least one finding or a failure.
    pub fn needs_review(&self) -> usize {
        self.reports.iter().filter(|r| r.needs_review()).count()
    }

    pub fn total(&self) -> usize {
        self.reports.len()
    }
}

/// Runs the document processor over every eligible file below a root.
pub struct BatchRunner {
    config: BatchConfig,
    processor: DocumentProcessor,
}

impl BatchRunner {
    /// Creates a runner using the secure backend. Fails on an invalid marker set.
    pub fn new(config: BatchConfig) -> RedactorResult<Self> {
        config.markers.validate()?;
        let mut backend = SecureBackend::new();
        if let Some(password) = &config.password {
            backend = backend.with_password(password.clone());
        }
        let processor = DocumentProcessor::new(
            Box::new(backend),
            config.markers.clone(),
            config.fill,
        );
        Ok(Self { config, processor })
    }

    /// Creates a runner around an existing processor.
    pub fn with_processor(config: BatchConfig, processor: DocumentProcessor) -> Self {
        Self { config, processor }
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Processes every eligible document below `root`, writing audit rows
    /// to `sink` as each document finishes.
    pub fn run(&self, root: &Path, sink: &mut dyn AuditSink) -> RedactorResult<BatchSummary> {
        if !root.is_dir() {
            return Err(RedactorError::DirectoryNotFound(root.to_path_buf()));
        }

        let files = discover(root, &self.config.filter);
        info!(
            root = %root.display(),
            files = files.len(),
            mode = ?self.config.mode,
            backend = self.processor.backend_name(),
            "starting batch"
        );

        let mut summary = BatchSummary::default();
        for (index, path) in files.iter().enumerate() {
            println!("\n{}) {}", index + 1, path.display());

            let output = redacted_path(path, &self.config.filter);
            let report = self.processor.process(path, &output);
            print_disposition(&report);

            for record in records_for(&report) {
                sink.record(record)?;
            }

            if self.config.mode.is_destructive() && report.is_redacted() && report.output.is_some() {
                self.remove_original(path, sink, &mut summary)?;
            }

            summary.reports.push(report);
        }

        info!(
            total = summary.total(),
            redacted = summary.count(DocumentState::Redacted),
            review = summary.needs_review(),
            "batch finished"
        );
        Ok(summary)
    }

    fn remove_original(
        &self,
        path: &Path,
        sink: &mut dyn AuditSink,
        summary: &mut BatchSummary,
    ) -> RedactorResult<()> {
        match fs::remove_file(path) {
            Ok(()) => {
                info!(file = %path.display(), "original deleted");
                summary.deleted.push(path.to_path_buf());
            }
            Err(e) => {
                warn!(file = %path.display(), error = %e, "could not delete original");
                println!("\t> {}: original not deleted", ERROR_NOTE);
                sink.record(AuditRecord::new(
                    path,
                    format!("{}: original not deleted ({})", ERROR_NOTE, e),
                ))?;
                summary.delete_failures.push(path.to_path_buf());
            }
        }
        Ok(())
    }
}

fn print_disposition(report: &DocumentReport) {
    for finding in &report.findings {
        println!("\t> {}", finding.note());
    }
    match report.state {
        DocumentState::Redacted => println!("\t> REDACTED"),
        DocumentState::Failed => println!(
            "\t> {}: {}",
            ERROR_NOTE,
            report.failure.as_deref().unwrap_or("unknown error")
        ),
        DocumentState::Unredacted | DocumentState::Flagged => {}
    }
}
