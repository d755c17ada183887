//! Secure redaction backend using lopdf and pdf-extract.
//!
//! This backend physically removes text from PDF documents: glyphs under a
//! committed region are deleted from the page's content stream, the old
//! stream is dropped from the file, and an opaque box is painted in their
//! place. Redacted content cannot be recovered from the saved bytes.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use lopdf::{Document, ObjectId};
use tracing::debug;

use super::content;
use super::layout::{self, PageLayout};
use super::strategy::{DocumentBackend, RedactableDocument, Region};
use crate::config::FillColor;
use crate::error::{RedactorError, RedactorResult};

/// Secure redaction backend that rewrites content streams.
///
/// This backend:
/// 1. Extracts page text and glyph geometry with `pdf-extract`
/// 2. Maps literal text back to the glyphs that show it
/// 3. Removes those glyphs from the content stream and paints over them
/// 4. Prunes orphaned objects before saving
#[derive(Debug, Clone, Default)]
pub struct SecureBackend {
    /// Password tried on encrypted documents
    password: String,
}

impl SecureBackend {
    /// Creates a new secure backend with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the password used to open encrypted documents.
    pub fn with_password<S: Into<String>>(mut self, password: S) -> Self {
        self.password = password.into();
        self
    }
}

impl DocumentBackend for SecureBackend {
    fn open(&self, path: &Path) -> RedactorResult<Box<dyn RedactableDocument>> {
        let mut doc = Document::load(path)
            .map_err(|e| RedactorError::pdf("Failed to open PDF", None, e))?;

        if doc.is_encrypted() {
            doc.decrypt(&self.password)
                .map_err(|e| RedactorError::pdf("Failed to decrypt PDF", None, e))?;
            doc.trailer.remove(b"Encrypt");
        }

        Ok(Box::new(LopdfDocument::new(doc)))
    }

    fn name(&self) -> &str {
        "SecureRedaction"
    }

    fn is_secure(&self) -> bool {
        true
    }
}

/// An open document with per-page layout cache and pending marks.
pub struct LopdfDocument {
    doc: Document,
    /// `(page number, page object)` in document order
    pages: Vec<(u32, ObjectId)>,
    layouts: HashMap<usize, PageLayout>,
    pending: HashMap<usize, Vec<(Region, FillColor)>>,
}

impl LopdfDocument {
    pub fn new(doc: Document) -> Self {
        let pages = doc.get_pages().into_iter().collect();
        Self {
            doc,
            pages,
            layouts: HashMap::new(),
            pending: HashMap::new(),
        }
    }

    fn page_ref(&self, page: usize) -> RedactorResult<(u32, ObjectId)> {
        self.pages
            .get(page)
            .copied()
            .ok_or_else(|| RedactorError::InvalidInput {
                parameter: "page".to_string(),
                reason: format!(
                    "page index {} out of range ({} pages)",
                    page,
                    self.pages.len()
                ),
            })
    }

    fn layout(&mut self, page: usize) -> RedactorResult<&PageLayout> {
        if !self.layouts.contains_key(&page) {
            let (number, page_id) = self.page_ref(page)?;
            content::expand_quote_operators(&mut self.doc, page_id, page + 1)?;
            let layout = layout::extract_layout(&self.doc, number)?;
            debug!(
                page = page + 1,
                glyphs = layout.glyphs().len(),
                "extracted page layout"
            );
            self.layouts.insert(page, layout);
        }
        Ok(&self.layouts[&page])
    }
}

impl RedactableDocument for LopdfDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_text(&mut self, page: usize) -> RedactorResult<String> {
        Ok(self.layout(page)?.text().to_string())
    }

    fn find_regions(&mut self, page: usize, literal: &str) -> RedactorResult<Vec<Region>> {
        Ok(self.layout(page)?.find_regions(literal))
    }

    fn mark_for_removal(
        &mut self,
        page: usize,
        region: Region,
        fill: FillColor,
    ) -> RedactorResult<()> {
        self.page_ref(page)?;
        self.pending.entry(page).or_default().push((region, fill));
        Ok(())
    }

    fn commit_removals(&mut self, page: usize) -> RedactorResult<usize> {
        let marks = self.pending.remove(&page).unwrap_or_default();
        if marks.is_empty() {
            return Ok(0);
        }

        let (_, page_id) = self.page_ref(page)?;
        self.layout(page)?;
        // Text changes once glyphs are gone; the cached layout is stale either way.
        let layout = self.layouts.remove(&page).unwrap_or_default();

        content::rewrite_page(&mut self.doc, page_id, page + 1, &layout, &marks)?;
        Ok(marks.len())
    }

    /// Writes to a sibling `.partial` file first and renames it over `path`,
    /// so a failed write never leaves a truncated document behind.
    fn save(&mut self, path: &Path) -> RedactorResult<()> {
        self.doc.prune_objects();
        self.doc.compress();

        let partial = partial_path(path);
        if let Err(e) = self.doc.save(&partial).map(drop) {
            let _ = fs::remove_file(&partial);
            return Err(RedactorError::pdf(
                format!("Failed to save {}", path.display()),
                None,
                e,
            ));
        }

        fs::rename(&partial, path).map_err(|source| {
            let _ = fs::remove_file(&partial);
            RedactorError::Io {
                path: path.to_path_buf(),
                source,
            }
        })
    }
}

fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".partial");
    path.with_file_name(name)
}
