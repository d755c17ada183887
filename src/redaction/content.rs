//! Content stream rewriting for secure removal.
//!
//! Glyphs are removed from `Tj`/`TJ` strings rather than hidden: each
//! removed glyph is replaced by a `TJ` displacement equal to its advance so
//! the remaining text keeps its position. Glyphs are addressed by their
//! index in show order, which is the same order [`PageLayout`] records them.
//! Pages showing text with `'` or `"` are expanded to `Tj` form first by
//! [`expand_quote_operators`], since the extractor only follows `Tj`/`TJ`.

use std::collections::{BTreeSet, HashSet};

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, StringFormat};
use tracing::debug;

use super::layout::{Glyph, PageLayout};
use super::strategy::Region;
use crate::config::FillColor;
use crate::error::{RedactorError, RedactorResult};

/// Removes every glyph under `marks` from the page and paints the marks.
///
/// The page's content is replaced by a single new stream; the old streams
/// become unreferenced. Returns the number of glyphs removed.
pub fn rewrite_page(
    doc: &mut Document,
    page_id: ObjectId,
    page_number: usize,
    layout: &PageLayout,
    marks: &[(Region, FillColor)],
) -> RedactorResult<usize> {
    let doomed = layout.glyphs_within(marks.iter().map(|(region, _)| region));

    let composite_fonts: HashSet<Vec<u8>> = doc
        .get_page_fonts(page_id)?
        .into_iter()
        .filter(|(_, font)| is_composite(font))
        .map(|(name, _)| name)
        .collect();

    let content = doc
        .get_page_content(page_id)
        .and_then(|bytes| Content::decode(&bytes))
        .map_err(|e| RedactorError::pdf("Failed to decode page content", Some(page_number), e))?;

    let mut stripper = GlyphStripper::new(&composite_fonts, &doomed, layout.glyphs());
    let mut operations = Vec::with_capacity(content.operations.len() + 2 + marks.len() * 5);

    operations.push(Operation::new("q", vec![]));
    for operation in content.operations {
        operations.push(stripper.rewrite(operation));
    }
    operations.push(Operation::new("Q", vec![]));

    if stripper.seen != layout.glyphs().len() {
        return Err(RedactorError::LayoutMismatch {
            page: page_number,
            expected: layout.glyphs().len(),
            found: stripper.seen,
        });
    }

    for (region, fill) in marks {
        operations.extend(fill_operations(region, fill));
    }

    let bytes = Content { operations }
        .encode()
        .map_err(|e| RedactorError::pdf("Failed to encode page content", Some(page_number), e))?;

    let stream_id = doc.add_object(Stream::new(Dictionary::new(), bytes));
    doc.get_dictionary_mut(page_id)?.set("Contents", stream_id);

    debug!(
        page = page_number,
        removed = stripper.removed,
        regions = marks.len(),
        "rewrote page content"
    );
    Ok(stripper.removed)
}

/// Replaces the `'` and `"` text operators on a page with their expanded
/// forms so the extractor and [`rewrite_page`] both see every shown string.
///
/// `string '` becomes `T* string Tj` and `aw ac string "` becomes
/// `aw Tw ac Tc T* string Tj`. The page is left alone when it uses neither.
/// Returns whether the content was replaced.
pub fn expand_quote_operators(
    doc: &mut Document,
    page_id: ObjectId,
    page_number: usize,
) -> RedactorResult<bool> {
    let content = doc
        .get_page_content(page_id)
        .and_then(|bytes| Content::decode(&bytes))
        .map_err(|e| RedactorError::pdf("Failed to decode page content", Some(page_number), e))?;

    if !content
        .operations
        .iter()
        .any(|op| op.operator == "'" || op.operator == "\"")
    {
        return Ok(false);
    }

    let mut operations = Vec::with_capacity(content.operations.len() + 8);
    for operation in content.operations {
        operations.extend(expand_quote(operation));
    }

    let bytes = Content { operations }
        .encode()
        .map_err(|e| RedactorError::pdf("Failed to encode page content", Some(page_number), e))?;
    let stream_id = doc.add_object(Stream::new(Dictionary::new(), bytes));
    doc.get_dictionary_mut(page_id)?.set("Contents", stream_id);

    debug!(page = page_number, "expanded quote text operators");
    Ok(true)
}

fn expand_quote(operation: Operation) -> Vec<Operation> {
    let Operation { operator, mut operands } = operation;
    match operator.as_str() {
        "'" => vec![
            Operation::new("T*", vec![]),
            Operation::new("Tj", operands),
        ],
        "\"" if operands.len() == 3 => {
            let text = operands.split_off(2);
            let char_spacing = operands.split_off(1);
            vec![
                Operation::new("Tw", operands),
                Operation::new("Tc", char_spacing),
                Operation::new("T*", vec![]),
                Operation::new("Tj", text),
            ]
        }
        _ => vec![Operation { operator, operands }],
    }
}

fn is_composite(font: &Dictionary) -> bool {
    font.get(b"Subtype")
        .and_then(Object::as_name)
        .map(|subtype| subtype == b"Type0")
        .unwrap_or(false)
}

/// `q r g b rg x y w h re f Q` for one region.
fn fill_operations(region: &Region, fill: &FillColor) -> Vec<Operation> {
    vec![
        Operation::new("q", vec![]),
        Operation::new(
            "rg",
            vec![
                Object::Real(fill.r),
                Object::Real(fill.g),
                Object::Real(fill.b),
            ],
        ),
        Operation::new(
            "re",
            vec![
                Object::Real(region.x0 as f32),
                Object::Real(region.y0 as f32),
                Object::Real(region.width() as f32),
                Object::Real(region.height() as f32),
            ],
        ),
        Operation::new("f", vec![]),
        Operation::new("Q", vec![]),
    ]
}

/// Walks text-showing operators and drops doomed glyphs.
struct GlyphStripper<'a> {
    composite_fonts: &'a HashSet<Vec<u8>>,
    doomed: &'a BTreeSet<usize>,
    glyphs: &'a [Glyph],
    two_byte: bool,
    saved: Vec<bool>,
    seen: usize,
    removed: usize,
}

impl<'a> GlyphStripper<'a> {
    fn new(
        composite_fonts: &'a HashSet<Vec<u8>>,
        doomed: &'a BTreeSet<usize>,
        glyphs: &'a [Glyph],
    ) -> Self {
        Self {
            composite_fonts,
            doomed,
            glyphs,
            two_byte: false,
            saved: Vec::new(),
            seen: 0,
            removed: 0,
        }
    }

    fn rewrite(&mut self, operation: Operation) -> Operation {
        match operation.operator.as_str() {
            "q" => self.saved.push(self.two_byte),
            "Q" => {
                if let Some(two_byte) = self.saved.pop() {
                    self.two_byte = two_byte;
                }
            }
            "Tf" => {
                if let Some(name) = operation.operands.first().and_then(|o| o.as_name().ok()) {
                    self.two_byte = self.composite_fonts.contains(name);
                }
            }
            "Tj" => {
                if let Some(Object::String(bytes, format)) = operation.operands.first() {
                    if let Some(parts) = self.strip(bytes, *format) {
                        return Operation::new("TJ", vec![Object::Array(parts)]);
                    }
                }
            }
            "TJ" => {
                if let Some(Object::Array(items)) = operation.operands.first() {
                    let mut parts = Vec::with_capacity(items.len());
                    let mut changed = false;
                    for item in items {
                        match item {
                            Object::String(bytes, format) => match self.strip(bytes, *format) {
                                Some(stripped) => {
                                    parts.extend(stripped);
                                    changed = true;
                                }
                                None => parts.push(item.clone()),
                            },
                            other => parts.push(other.clone()),
                        }
                    }
                    if changed {
                        return Operation::new("TJ", vec![Object::Array(parts)]);
                    }
                }
            }
            _ => {}
        }
        operation
    }

    /// Splits a shown string around doomed glyphs. Returns `None` when the
    /// string keeps all of its glyphs.
    fn strip(&mut self, bytes: &[u8], format: StringFormat) -> Option<Vec<Object>> {
        let step = if self.two_byte { 2 } else { 1 };
        let mut parts = Vec::new();
        let mut run = Vec::new();
        let mut changed = false;

        for code in bytes.chunks(step) {
            let index = self.seen;
            self.seen += 1;

            if self.doomed.contains(&index) {
                changed = true;
                self.removed += 1;
                if !run.is_empty() {
                    parts.push(Object::String(std::mem::take(&mut run), format));
                }
                parts.push(Object::Real(self.displacement(index)));
            } else {
                run.extend_from_slice(code);
            }
        }

        if !changed {
            return None;
        }
        if !run.is_empty() {
            parts.push(Object::String(run, format));
        }
        Some(parts)
    }

    /// `TJ` number that moves the pen by the removed glyph's advance.
    fn displacement(&self, index: usize) -> f32 {
        match self.glyphs.get(index) {
            Some(glyph) if glyph.font_size.abs() > f64::EPSILON => {
                (-glyph.advance * 1000.0 / glyph.font_size) as f32
            }
            _ => 0.0,
        }
    }
}
