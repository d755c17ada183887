//! Batch PDF Redaction CLI Application.
//!
//! Walks a directory of application and judge packets, removes the
//! confidential field from each page, and records every outcome in a CSV
//! audit log next to the documents.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};

use batch_redactor::batch::{require_confirmation, AssumeYes};
use batch_redactor::{
    BatchConfig, BatchRunner, BatchSummary, Confirmation, CsvAuditLog, DocumentState, FileFilter,
    MarkerSet,
    RedactorError, RunMode, StdinConfirmation, TieBreak,
};

/// Batch PDF Redaction Tool
///
/// Finds the text between the login-information label and the next field
/// label on every page of Application-*.pdf and Judge-*.pdf files, and
/// physically removes it. Use `\n` in marker arguments for line breaks.
#[derive(Parser)]
#[command(name = "batch-redactor")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Directory to scan recursively
    #[arg(value_name = "DIRECTORY")]
    directory: PathBuf,

    /// `copy` keeps originals; `replace` deletes each original once its
    /// redacted copy is written
    #[arg(value_enum, default_value_t = ModeArg::Copy)]
    mode: ModeArg,

    /// Label that opens the confidential field
    #[arg(long, value_name = "TEXT")]
    start_marker: Option<String>,

    /// Label that may close the confidential field (can be specified
    /// multiple times, in priority order)
    #[arg(long = "end-marker", value_name = "TEXT")]
    end_markers: Vec<String>,

    /// Let the first end marker present on a page decide the span
    #[arg(long)]
    first_match_wins: bool,

    /// File-name prefix of documents to redact (can be specified multiple
    /// times; defaults to Application- and Judge-)
    #[arg(long = "prefix", value_name = "TEXT")]
    prefixes: Vec<String>,

    /// Password for encrypted documents
    #[arg(long, value_name = "PASSWORD")]
    password: Option<String>,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    yes: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ModeArg {
    Copy,
    Replace,
}

impl From<ModeArg> for RunMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Copy => RunMode::Copy,
            ModeArg::Replace => RunMode::Replace,
        }
    }
}

impl Cli {
    fn batch_config(&self) -> BatchConfig {
        let mut markers = MarkerSet::default();

        if let Some(start) = &self.start_marker {
            markers = markers.with_start(unescape(start));
        }
        if !self.end_markers.is_empty() {
            markers = markers.with_end_markers(self.end_markers.iter().map(|m| unescape(m)).collect());
        }
        if self.first_match_wins {
            markers = markers.with_tie_break(TieBreak::FirstMatchWins);
        }

        let mut config = BatchConfig::default()
            .with_mode(self.mode.into())
            .with_markers(markers);
        if !self.prefixes.is_empty() {
            config = config.with_filter(FileFilter::default().with_prefixes(self.prefixes.clone()));
        }
        if let Some(password) = &self.password {
            config = config.with_password(password.as_str());
        }
        config
    }
}

/// Turns the two-character sequence `\n` into a line break.
fn unescape(marker: &str) -> String {
    marker.replace("\\n", "\n")
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default)),
        )
        .init();
}

fn print_summary(summary: &BatchSummary, log: &Path) {
    println!("\nBatch Summary:");
    println!("  Files processed: {}", summary.total());
    println!("  Redacted:        {}", summary.count(DocumentState::Redacted));
    println!("  No target:       {}", summary.count(DocumentState::Unredacted));
    println!("  Flagged:         {}", summary.count(DocumentState::Flagged));
    println!("  Failed:          {}", summary.count(DocumentState::Failed));
    if !summary.deleted.is_empty() || !summary.delete_failures.is_empty() {
        println!("  Originals deleted: {}", summary.deleted.len());
        println!("  Delete failures:   {}", summary.delete_failures.len());
    }
    println!("  Audit log: {}", log.display());

    if summary.needs_review() > 0 {
        println!(
            "⚠ {} file(s) need review, see the audit log",
            summary.needs_review()
        );
    } else {
        println!("✓ Batch complete");
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = cli.batch_config();
    let mode = config.mode;
    let runner = BatchRunner::new(config).context("Invalid marker configuration")?;

    if !cli.directory.is_dir() {
        return Err(RedactorError::DirectoryNotFound(cli.directory.clone()).into());
    }

    if let Some(existing) = CsvAuditLog::find_existing(&cli.directory)? {
        let name = existing
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        println!(
            "\nA file called \"{}\" already exists in this location. \
             If any additional redactions are made, they will be logged in this file.",
            name
        );
    }

    let mut confirmation: Box<dyn Confirmation> = if cli.yes {
        Box::new(AssumeYes)
    } else {
        Box::new(StdinConfirmation::stdin())
    };

    match require_confirmation(confirmation.as_mut(), mode) {
        Ok(()) => {}
        Err(RedactorError::UserDeclined) => {
            println!("Cancelled. No files were changed.");
            return Ok(());
        }
        Err(e) => return Err(e).context("Confirmation failed"),
    }

    let mut log = CsvAuditLog::open_in(&cli.directory).context("Failed to open audit log")?;
    let summary = runner
        .run(&cli.directory, &mut log)
        .with_context(|| format!("Batch failed in {}", cli.directory.display()))?;

    print_summary(&summary, log.path());
    Ok(())
}
