//! gpuwatch-render: Terminal rendering sink for the gpuwatch dashboard.

pub mod legend;
pub mod palette;
mod terminal;

pub use legend::{legend_text, LEGEND_TITLE};
pub use palette::accent_color;
pub use terminal::{column_widths, StdoutSink, TerminalSink};
