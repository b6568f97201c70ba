use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use lg_core::error::CoreError;
use lg_core::frame::CharGrid;
use lg_core::traits::GridSink;

/// Génère un document HTML autonome : une `<div>` par ligne, un `<span>`
/// par cellule, police monospace.
///
/// # Example
/// ```
/// use lg_core::frame::CharGrid;
/// use lg_render::html::render_html;
///
/// let grid = CharGrid::from_cells(1, 2, vec!['<', ' ']).unwrap();
/// let doc = render_html(&grid, "Courier New");
/// assert!(doc.contains("<span>&lt;</span><span>&nbsp;</span>"));
/// ```
#[must_use]
pub fn render_html(grid: &CharGrid, font: &str) -> String {
    let mut doc = String::with_capacity(grid.rows() as usize * grid.cols() as usize * 16 + 512);
    doc.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"UTF-8\">\n");
    doc.push_str("<title>lumaglyph</title>\n<style>\n");
    let _ = writeln!(
        doc,
        ".art {{ font-family: '{}', monospace; font-size: 4px; line-height: 1; }}",
        css_escape(font)
    );
    doc.push_str(".art div { white-space: pre; }\n");
    doc.push_str(".art span { display: inline-block; width: 1ch; text-align: center; }\n");
    doc.push_str("</style>\n</head>\n<body>\n<div class=\"art\">\n");
    for row in grid.iter_rows() {
        doc.push_str("<div>");
        for &ch in row {
            doc.push_str("<span>");
            push_escaped(&mut doc, ch);
            doc.push_str("</span>");
        }
        doc.push_str("</div>\n");
    }
    doc.push_str("</div>\n</body>\n</html>\n");
    doc
}

fn push_escaped(doc: &mut String, ch: char) {
    match ch {
        '&' => doc.push_str("&amp;"),
        '<' => doc.push_str("&lt;"),
        '>' => doc.push_str("&gt;"),
        '"' => doc.push_str("&quot;"),
        '\'' => doc.push_str("&#39;"),
        ' ' => doc.push_str("&nbsp;"),
        _ => doc.push(ch),
    }
}

/// Font names go inside a single-quoted CSS string.
fn css_escape(font: &str) -> String {
    font.chars()
        .filter(|c| !matches!(c, '\'' | '\\' | '<' | '>' | '\n'))
        .collect()
}

/// Writes each grid to an HTML file, overwriting it.
pub struct HtmlSink {
    path: PathBuf,
    font: String,
}

impl HtmlSink {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, font: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            font: font.into(),
        }
    }

    fn write_document(&self, grid: &CharGrid) -> std::io::Result<()> {
        let mut out = BufWriter::new(File::create(&self.path)?);
        out.write_all(render_html(grid, &self.font).as_bytes())?;
        out.flush()
    }
}

impl GridSink for HtmlSink {
    fn output(&mut self, grid: &CharGrid) -> Result<(), CoreError> {
        self.write_document(grid).map_err(|source| CoreError::Output {
            target: self.path.display().to_string(),
            source,
        })?;
        log::info!("HTML écrit dans {}", self.path.display());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "html"
    }
}
