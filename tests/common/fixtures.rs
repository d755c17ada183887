//! Test fixtures and PDF builders.
//!
//! Provides builders for creating multi-page packet PDFs with one text
//! line per `use_text` call, so extracted text keeps the line structure the
//! markers rely on.

use anyhow::Result;
use printpdf::*;
use std::fs;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

pub const START: &str = "Login and Password information if needed";
pub const SECRET: &str = "user jlee pass hunter2";

/// Builder for creating test PDFs page by page.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// # use anyhow::Result;
/// # fn main() -> Result<()> {
/// PacketPdfBuilder::new()
///     .with_page(&["Applicant: Jordan Lee", "Story Link 1"])
///     .with_page(&["Scores"])
///     .build(Path::new("/tmp/Application-1.pdf"))?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct PacketPdfBuilder {
    title: String,
    pages: Vec<Vec<String>>,
    font_size: f32,
    line_step: Mm,
}

impl PacketPdfBuilder {
    pub fn new() -> Self {
        Self {
            title: "Packet".to_string(),
            pages: Vec::new(),
            font_size: 12.0,
            line_step: Mm(6.0),
        }
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    /// Adds a page with one text line per entry.
    pub fn with_page(mut self, lines: &[&str]) -> Self {
        self.pages.push(lines.iter().map(|l| l.to_string()).collect());
        self
    }

    /// Builds the PDF and writes it to the specified path.
    pub fn build(self, output_path: &Path) -> Result<PathBuf> {
        let (doc, first_page, first_layer) =
            PdfDocument::new(&self.title, Mm(210.0), Mm(297.0), "Layer 1");
        let font = doc.add_builtin_font(BuiltinFont::Helvetica)?;

        let pages = if self.pages.is_empty() {
            vec![Vec::new()]
        } else {
            self.pages
        };

        for (index, lines) in pages.iter().enumerate() {
            let (page, layer) = if index == 0 {
                (first_page, first_layer)
            } else {
                doc.add_page(Mm(210.0), Mm(297.0), "Layer 1")
            };
            let layer = doc.get_page(page).get_layer(layer);

            for (row, line) in lines.iter().enumerate() {
                let y = Mm(270.0 - self.line_step.0 * row as f32);
                layer.use_text(line.as_str(), self.font_size, Mm(20.0), y, &font);
            }
        }

        doc.save(&mut BufWriter::new(fs::File::create(output_path)?))?;
        Ok(output_path.to_path_buf())
    }
}

impl Default for PacketPdfBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Lines of a packet page carrying `secret` in the confidential field.
pub fn login_page<'a>(secret: &'a str, end_marker: &'a str) -> Vec<&'a str> {
    vec![
        "Application Form",
        "Applicant: Jordan Lee",
        START,
        secret,
        end_marker,
        "https://example.org/story",
    ]
}

/// Single-page application packet with the secret followed by `Story Link 1`.
pub fn create_application(path: &Path, secret: &str) -> Result<PathBuf> {
    PacketPdfBuilder::new()
        .with_title("Application")
        .with_page(&login_page(secret, "Story Link 1"))
        .build(path)
}

/// Judge packet without any markers.
pub fn create_scores_only(path: &Path) -> Result<PathBuf> {
    PacketPdfBuilder::new()
        .with_title("Judge Scores")
        .with_page(&["Judge Scores", "Creativity: 8", "Impact: 9"])
        .build(path)
}

/// Packet whose second page has an end marker but no start marker.
pub fn create_split_field(path: &Path) -> Result<PathBuf> {
    PacketPdfBuilder::new()
        .with_title("Split")
        .with_page(&["Application Form", START])
        .with_page(&[SECRET, "Story Link 1", "https://example.org/story"])
        .build(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_builder_writes_every_page() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("multi.pdf");

        PacketPdfBuilder::new()
            .with_page(&["one"])
            .with_page(&["two"])
            .with_page(&[])
            .build(&path)?;

        let doc = ::lopdf::Document::load(&path)?;
        assert_eq!(doc.get_pages().len(), 3);
        Ok(())
    }
}
