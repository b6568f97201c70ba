//! Output sinks for lumaglyph.
//!
//! Terminal printing and HTML document generation of character grids.

pub mod console;
pub mod html;

pub use console::ConsoleSink;
pub use html::HtmlSink;
