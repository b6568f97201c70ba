use std::io::{self, Write};

use crossterm::queue;
use crossterm::style::Print;
use lg_core::error::CoreError;
use lg_core::frame::CharGrid;
use lg_core::traits::GridSink;

/// Écrit une `CharGrid` ligne par ligne, sans séparateur entre cellules.
///
/// # Example
/// ```
/// use lg_core::frame::CharGrid;
/// use lg_core::traits::GridSink;
/// use lg_render::console::ConsoleSink;
///
/// let grid = CharGrid::from_cells(2, 2, "#..#".chars().collect()).unwrap();
/// let mut sink = ConsoleSink::new(Vec::new());
/// sink.output(&grid).unwrap();
/// assert_eq!(sink.into_inner(), b"#.\n.#\n");
/// ```
pub struct ConsoleSink<W: Write> {
    out: W,
}

impl<W: Write> ConsoleSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Give back the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_grid(&mut self, grid: &CharGrid) -> io::Result<()> {
        for row in grid.iter_rows() {
            let line: String = row.iter().collect();
            queue!(self.out, Print(line), Print('\n'))?;
        }
        self.out.flush()
    }
}

impl<W: Write> GridSink for ConsoleSink<W> {
    fn output(&mut self, grid: &CharGrid) -> Result<(), CoreError> {
        self.write_grid(grid).map_err(|source| CoreError::Output {
            target: "terminal".into(),
            source,
        })
    }

    fn name(&self) -> &'static str {
        "console"
    }
}
