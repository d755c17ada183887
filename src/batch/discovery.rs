//! Finding eligible documents and naming their redacted copies.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::FileFilter;

/// Recursively lists the files under `root` accepted by `filter`.
///
/// Traversal is sorted by file name so runs are reproducible. Entries that
/// cannot be read are skipped with a warning.
pub fn discover(root: &Path, filter: &FileFilter) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "skipping unreadable directory entry");
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let name = entry.file_name().to_string_lossy();
        if filter.accepts(&name) {
            files.push(entry.into_path());
        } else {
            debug!(file = %name, "not eligible");
        }
    }

    files
}

/// Sibling path of the redacted copy: `Judge-1.pdf` becomes
/// `Judge-1_redacted.pdf`.
pub fn redacted_path(original: &Path, filter: &FileFilter) -> PathBuf {
    let name = original
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let base = name.strip_suffix(filter.extension()).unwrap_or(&name);

    original.with_file_name(format!(
        "{}{}{}",
        base,
        filter.redacted_suffix(),
        filter.extension()
    ))
}
