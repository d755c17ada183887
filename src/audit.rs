//! Append-only audit log of batch outcomes.
//!
//! The batch runner receives an [`AuditSink`] and writes one row per
//! terminal event. [`CsvAuditLog`] persists rows to a CSV file in the batch
//! root and reuses an existing log so repeated runs accumulate history.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::{debug, info};

use crate::domain::DocumentState;
use crate::error::{RedactorError, RedactorResult};
use crate::redaction::DocumentReport;

/// Column names written to a new log.
pub const LOG_HEADER: [&str; 3] = ["File", "Date_redacted", "Notes"];

/// Substring identifying an audit log by file name.
pub const LOG_NAME_MARKER: &str = "redactionlog";

pub const NO_TARGET_NOTE: &str = "No redaction target found";
pub const ERROR_NOTE: &str = "ERROR - needs review";

/// One row of the audit log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditRecord {
    pub file: String,
    pub date: String,
    pub note: String,
}

impl AuditRecord {
    /// Creates a record dated today.
    pub fn new(file: &Path, note: impl Into<String>) -> Self {
        Self {
            file: file.display().to_string(),
            date: today(),
            note: note.into(),
        }
    }

    /// The record as a CSV line, without the line terminator.
    pub fn to_csv(&self) -> String {
        csv_line(&[&self.file, &self.date, &self.note])
    }
}

/// Today's date as written to the log.
pub fn today() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

/// Rows describing one processed document.
///
/// Every finding gets its own row. A terminal row follows for `Redacted`
/// (no note), `Unredacted` and `Failed` documents; a `Flagged` document is
/// described by its findings.
pub fn records_for(report: &DocumentReport) -> Vec<AuditRecord> {
    let mut records: Vec<AuditRecord> = report
        .findings
        .iter()
        .map(|finding| AuditRecord::new(&report.path, finding.note()))
        .collect();

    match report.state {
        DocumentState::Redacted => records.push(AuditRecord::new(&report.path, "")),
        DocumentState::Unredacted => records.push(AuditRecord::new(&report.path, NO_TARGET_NOTE)),
        DocumentState::Failed => {
            let note = match &report.failure {
                Some(reason) => format!("{}: {}", ERROR_NOTE, reason),
                None => ERROR_NOTE.to_string(),
            };
            records.push(AuditRecord::new(&report.path, note));
        }
        DocumentState::Flagged => {}
    }

    records
}

/// Destination for audit records.
pub trait AuditSink {
    fn record(&mut self, record: AuditRecord) -> RedactorResult<()>;
}

/// Keeps records in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryAuditLog {
    pub records: Vec<AuditRecord>,
}

impl MemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AuditSink for MemoryAuditLog {
    fn record(&mut self, record: AuditRecord) -> RedactorResult<()> {
        self.records.push(record);
        Ok(())
    }
}

/// CSV audit log file opened for appending.
#[derive(Debug)]
pub struct CsvAuditLog {
    path: PathBuf,
    file: File,
    reused: bool,
}

impl CsvAuditLog {
    /// Opens the log for `dir`: the first file whose name contains
    /// `redactionlog`, or a new `redactionlog_YYYYMMDD.csv` with a header.
    pub fn open_in(dir: &Path) -> RedactorResult<Self> {
        match Self::find_existing(dir)? {
            Some(path) => {
                info!(log = %path.display(), "reusing existing audit log");
                Self::open_append(path, true)
            }
            None => {
                let name = format!("{}_{}.csv", LOG_NAME_MARKER, Local::now().format("%Y%m%d"));
                Self::create(dir.join(name))
            }
        }
    }

    /// Creates a log at `path` and writes the header.
    pub fn create(path: PathBuf) -> RedactorResult<Self> {
        let mut log = Self::open_append(path, false)?;
        let header = csv_line(&LOG_HEADER);
        log.write_line(&header)?;
        debug!(log = %log.path.display(), "created audit log");
        Ok(log)
    }

    fn open_append(path: PathBuf, reused: bool) -> RedactorResult<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| RedactorError::AuditLog {
                path: path.clone(),
                source,
            })?;
        Ok(Self { path, file, reused })
    }

    /// Finds an existing log among the direct children of `dir`.
    pub fn find_existing(dir: &Path) -> RedactorResult<Option<PathBuf>> {
        let entries = fs::read_dir(dir).map_err(|source| RedactorError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut candidates: Vec<PathBuf> = entries
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
            .filter(|entry| entry.file_name().to_string_lossy().contains(LOG_NAME_MARKER))
            .map(|entry| entry.path())
            .collect();
        candidates.sort();
        Ok(candidates.into_iter().next())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True if the log existed before this run.
    pub fn was_reused(&self) -> bool {
        self.reused
    }

    fn write_line(&mut self, line: &str) -> RedactorResult<()> {
        self.file
            .write_all(format!("{}\r\n", line).as_bytes())
            .and_then(|_| self.file.flush())
            .map_err(|source| RedactorError::AuditLog {
                path: self.path.clone(),
                source,
            })
    }
}

impl AuditSink for CsvAuditLog {
    fn record(&mut self, record: AuditRecord) -> RedactorResult<()> {
        self.write_line(&record.to_csv())
    }
}

/// Joins fields into one CSV line, quoting where needed.
fn csv_line(fields: &[&str]) -> String {
    fields
        .iter()
        .map(|field| csv_field(field))
        .collect::<Vec<_>>()
        .join(",")
}

fn csv_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
