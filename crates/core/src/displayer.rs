//! Rendering sink trait and related types

use gpuwatch_types::{DisplayRow, TableSpec};
use thiserror::Error;

/// Errors raised by a rendering sink; these are not recoverable by the loop
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("sink used before begin()")]
    NotStarted,
}

/// Trait for rendering sinks
///
/// A sink owns the display surface. It receives a full replacement row set
/// each tick and redraws in place; it never appends.
pub trait RenderSink {
    /// Prepare the surface for the given table layout
    fn begin(&mut self, table: &TableSpec) -> Result<(), SinkError>;

    /// Replace the rows shown on the next redraw
    fn update(&mut self, rows: Vec<DisplayRow>) -> Result<(), SinkError>;

    /// Redraw the current rows in place
    fn refresh(&mut self) -> Result<(), SinkError>;

    /// Restore the surface; called once when the loop stops
    fn finish(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
}
