//! Page text layout built from `pdf-extract`'s character stream.
//!
//! Every glyph the extractor shows is recorded in content order together
//! with its user-space box and advance. The page text is assembled from the
//! same stream, so every byte of text can be traced back to a glyph and a
//! literal found in the text can be turned into regions on the page.

use std::collections::BTreeSet;
use std::panic::{self, AssertUnwindSafe};

use lopdf::Document;
use pdf_extract::{MediaBox, OutputDev, OutputError, Transform};

use super::strategy::Region;
use crate::error::{RedactorError, RedactorResult};

/// Glyph extent above the baseline, as a fraction of the font size.
const ASCENT: f64 = 0.8;
/// Glyph extent below the baseline, as a fraction of the font size.
const DESCENT: f64 = 0.2;

/// One shown glyph.
#[derive(Debug, Clone)]
pub struct Glyph {
    /// Byte range of this glyph's characters in the page text.
    pub text_start: usize,
    pub text_end: usize,
    /// Text line the glyph belongs to, counted from zero.
    pub line: usize,
    pub bbox: Region,
    /// Horizontal displacement in unscaled text space (`w0 * Tfs + Tc [+ Tw]`).
    pub advance: f64,
    pub font_size: f64,
}

/// Text and glyph geometry of one page.
#[derive(Debug, Clone, Default)]
pub struct PageLayout {
    text: String,
    glyphs: Vec<Glyph>,
}

impl PageLayout {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn glyphs(&self) -> &[Glyph] {
        &self.glyphs
    }

    /// Regions covering every verbatim occurrence of `literal`, one region
    /// per text line an occurrence spans.
    pub fn find_regions(&self, literal: &str) -> Vec<Region> {
        if literal.is_empty() {
            return Vec::new();
        }

        let mut regions = Vec::new();
        for (start, matched) in self.text.match_indices(literal) {
            let end = start + matched.len();
            let mut current: Option<(usize, Region)> = None;

            for glyph in self
                .glyphs
                .iter()
                .filter(|g| g.text_start < end && g.text_end > start)
            {
                current = match current {
                    Some((line, region)) if line == glyph.line => {
                        Some((line, region.union(&glyph.bbox)))
                    }
                    Some((_, region)) => {
                        regions.push(region);
                        Some((glyph.line, glyph.bbox))
                    }
                    None => Some((glyph.line, glyph.bbox)),
                };
            }

            if let Some((_, region)) = current {
                regions.push(region);
            }
        }
        regions
    }

    /// Indices of glyphs whose centre lies inside any of `regions`.
    pub fn glyphs_within<'a, I>(&self, regions: I) -> BTreeSet<usize>
    where
        I: IntoIterator<Item = &'a Region>,
    {
        let regions: Vec<&Region> = regions.into_iter().collect();
        self.glyphs
            .iter()
            .enumerate()
            .filter(|(_, glyph)| {
                let (x, y) = glyph.bbox.center();
                regions.iter().any(|r| r.contains_point(x, y))
            })
            .map(|(index, _)| index)
            .collect()
    }
}

/// Where the previous glyph ended, used to decide on separators.
#[derive(Debug, Clone, Copy)]
struct Cursor {
    baseline: f64,
    end_x: f64,
    size: f64,
}

/// `OutputDev` that records glyphs instead of writing text.
#[derive(Default)]
struct LayoutCollector {
    layout: PageLayout,
    line: usize,
    cursor: Option<Cursor>,
}

impl LayoutCollector {
    fn push_separator(&mut self, x: f64, baseline: f64, size: f64) {
        let Some(prev) = self.cursor else {
            return;
        };
        let threshold = prev.size.max(size).max(1.0);

        if (baseline - prev.baseline).abs() > threshold * 0.5 {
            self.layout.text.push('\n');
            self.line += 1;
        } else if x > prev.end_x + threshold * 0.1 {
            self.layout.text.push(' ');
        }
    }
}

/// Maps a point in glyph space through the text rendering matrix.
fn apply(trm: &Transform, x: f64, y: f64) -> (f64, f64) {
    (
        x * trm.m11 + y * trm.m21 + trm.m31,
        x * trm.m12 + y * trm.m22 + trm.m32,
    )
}

impl OutputDev for LayoutCollector {
    fn begin_page(
        &mut self,
        _page_num: u32,
        _media_box: &MediaBox,
        _art_box: Option<(f64, f64, f64, f64)>,
    ) -> Result<(), OutputError> {
        Ok(())
    }

    fn end_page(&mut self) -> Result<(), OutputError> {
        Ok(())
    }

    fn output_character(
        &mut self,
        trm: &Transform,
        width: f64,
        spacing: f64,
        font_size: f64,
        char: &str,
    ) -> Result<(), OutputError> {
        let advance = width * font_size + spacing;
        let (x, baseline) = apply(trm, 0.0, 0.0);
        let size = font_size * (trm.m21 * trm.m21 + trm.m22 * trm.m22).sqrt();

        let corners = [
            apply(trm, 0.0, -DESCENT * font_size),
            apply(trm, width * font_size, -DESCENT * font_size),
            apply(trm, 0.0, ASCENT * font_size),
            apply(trm, width * font_size, ASCENT * font_size),
        ];
        let bbox = corners[1..]
            .iter()
            .fold(Region::new(corners[0].0, corners[0].1, corners[0].0, corners[0].1), |r, &(cx, cy)| {
                r.union(&Region::new(cx, cy, cx, cy))
            });

        self.push_separator(x, baseline, size);

        let text_start = self.layout.text.len();
        self.layout.text.push_str(char);
        self.layout.glyphs.push(Glyph {
            text_start,
            text_end: self.layout.text.len(),
            line: self.line,
            bbox,
            advance,
            font_size,
        });

        let (end_x, _) = apply(trm, advance, 0.0);
        self.cursor = Some(Cursor {
            baseline,
            end_x,
            size,
        });
        Ok(())
    }

    fn begin_word(&mut self) -> Result<(), OutputError> {
        Ok(())
    }

    fn end_word(&mut self) -> Result<(), OutputError> {
        Ok(())
    }

    fn end_line(&mut self) -> Result<(), OutputError> {
        Ok(())
    }
}

/// Extracts the layout of one page. `page_number` is 1-based, as in the
/// document's page tree.
///
/// The extraction library panics on some malformed content; that is caught
/// and reported as a [`RedactorError::TextExtraction`].
pub fn extract_layout(doc: &Document, page_number: u32) -> RedactorResult<PageLayout> {
    let mut collector = LayoutCollector::default();

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::output_doc_page(doc, &mut collector, page_number)
    }));

    match outcome {
        Ok(Ok(())) => Ok(collector.layout),
        Ok(Err(e)) => Err(RedactorError::TextExtraction {
            page: page_number as usize,
            reason: e.to_string(),
        }),
        Err(payload) => Err(RedactorError::TextExtraction {
            page: page_number as usize,
            reason: panic_message(payload.as_ref()),
        }),
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("extractor panicked: {}", s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("extractor panicked: {}", s)
    } else {
        "extractor panicked".to_string()
    }
}
