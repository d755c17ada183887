//! Custom assertions for PDF redaction testing.
//!
//! Text assertions read pages through the library's own backend, which is
//! what the marker search sees. Stream assertions look at raw, decompressed
//! object bytes so removed text cannot hide behind an overlay.

use batch_redactor::redaction::{DocumentBackend, RedactableDocument, SecureBackend};
use std::path::Path;

/// Page texts of a PDF as extracted by the secure backend.
pub fn page_texts(pdf_path: &Path) -> Vec<String> {
    let mut doc = SecureBackend::new()
        .open(pdf_path)
        .unwrap_or_else(|e| panic!("Failed to open PDF '{}': {}", pdf_path.display(), e));

    (0..doc.page_count())
        .map(|page| {
            doc.page_text(page).unwrap_or_else(|e| {
                panic!(
                    "Failed to extract page {} of '{}': {}",
                    page + 1,
                    pdf_path.display(),
                    e
                )
            })
        })
        .collect()
}

/// All page texts joined with form feeds.
pub fn full_text(pdf_path: &Path) -> String {
    page_texts(pdf_path).join("\x0c")
}

/// Asserts that `pattern` is gone from the extracted text and from every
/// stream in the file.
///
/// # Panics
/// Panics if the pattern can still be found.
pub fn assert_redacted(pdf_path: &Path, pattern: &str) {
    let text = full_text(pdf_path);
    assert!(
        !text.contains(pattern),
        "Pattern '{}' should be redacted but was found in output PDF at '{}'",
        pattern,
        pdf_path.display()
    );
    assert!(
        !streams_contain(pdf_path, pattern),
        "Pattern '{}' is still encoded in a stream of '{}'",
        pattern,
        pdf_path.display()
    );
}

/// Asserts that a pattern has been preserved (not redacted) in a PDF.
///
/// # Panics
/// Panics if the pattern is not found in the PDF.
pub fn assert_preserved(pdf_path: &Path, pattern: &str) {
    let text = full_text(pdf_path);
    assert!(
        text.contains(pattern),
        "Pattern '{}' should be preserved but was not found in PDF at '{}'.\nText: {:?}",
        pattern,
        pdf_path.display(),
        text
    );
}

/// Returns true if any stream, decompressed, holds `pattern` either as
/// literal bytes or as a hex string.
pub fn streams_contain(pdf_path: &Path, pattern: &str) -> bool {
    let mut doc = ::lopdf::Document::load(pdf_path)
        .unwrap_or_else(|e| panic!("Failed to load PDF '{}': {}", pdf_path.display(), e));
    doc.decompress();

    let literal = pattern.as_bytes().to_vec();
    let upper: String = pattern.bytes().map(|b| format!("{:02X}", b)).collect();
    let lower = upper.to_lowercase();
    let needles = [literal, upper.into_bytes(), lower.into_bytes()];

    doc.objects.values().any(|object| match object {
        ::lopdf::Object::Stream(stream) => needles
            .iter()
            .any(|needle| contains_bytes(&stream.content, needle)),
        _ => false,
    })
}

fn contains_bytes(haystack: &[u8], needle: &[u8]) -> bool {
    !needle.is_empty() && haystack.windows(needle.len()).any(|w| w == needle)
}

/// Asserts that a file is a loadable PDF.
pub fn assert_valid_pdf(pdf_path: &Path) {
    assert!(
        pdf_path.exists(),
        "PDF should exist at '{}'",
        pdf_path.display()
    );
    assert!(
        ::lopdf::Document::load(pdf_path).is_ok(),
        "PDF should load at '{}'",
        pdf_path.display()
    );
}
