//! Batch PDF redaction of a delimited confidential field.
//!
//! This library walks a directory of application and judge packets, finds
//! the text between a start label and one of several end labels on each
//! page, and physically removes it from the page content. Every document
//! gets an outcome in an append-only CSV audit log.
//!
//! # Features
//!
//! - **Secure Redaction**: Glyphs are removed from the content stream and
//!   covered with an opaque box; the old stream is pruned from the output
//! - **Marker-Delimited Spans**: Literal start/end labels with a
//!   configurable tie-break between end candidates
//! - **Review Flags**: Marker inconsistencies are flagged, never guessed at
//! - **Audit Log**: One CSV row per outcome, reused across runs
//!
//! # Architecture
//!
//! - [`domain`]: Span location and the per-document state machine
//! - [`redaction`]: PDF backend, applicator and document processor
//! - [`batch`]: Discovery, confirmation gate and orchestration
//! - [`audit`]: Audit records and sinks
//! - [`config`]: Markers, file filter and run mode
//! - [`error`]: Error handling
//!
//! # Quick Start
//!
//! ```no_run
//! use batch_redactor::{BatchConfig, BatchRunner, CsvAuditLog};
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let root = Path::new("/data/round1");
//! let runner = BatchRunner::new(BatchConfig::default())?;
//! let mut log = CsvAuditLog::open_in(root)?;
//!
//! let summary = runner.run(root, &mut log)?;
//! println!("{} redacted", summary.redacted_files().len());
//! # Ok(())
//! # }
//! ```
//!
//! # Examples
//!
//! ## Locating a span
//!
//! ```
//! use batch_redactor::domain::{SpanLocator, SpanResult};
//! use batch_redactor::MarkerSet;
//!
//! let locator = SpanLocator::new(MarkerSet::default());
//! let page = "Login and Password information if needed\nuser / hunter2\nStory Link 1";
//! assert_eq!(
//!     locator.locate(page),
//!     SpanResult::Found("user / hunter2".to_string())
//! );
//! ```

pub mod audit;
pub mod batch;
pub mod config;
pub mod domain;
pub mod error;
pub mod redaction;

pub use audit::{AuditRecord, AuditSink, CsvAuditLog, MemoryAuditLog};
pub use batch::{BatchRunner, BatchSummary, Confirmation, StdinConfirmation};
pub use config::{BatchConfig, FileFilter, MarkerSet, RunMode, TieBreak};
pub use domain::{DocumentState, SpanLocator, SpanResult};
pub use error::{RedactorError, RedactorResult};
pub use redaction::{DocumentProcessor, DocumentReport, SecureBackend};
