//! gpuwatch-types: Shared data types for the gpuwatch telemetry dashboard.
//!
//! This crate contains pure data types (tiers, thresholds, snapshots, styled
//! text and table rows) shared by every gpuwatch crate. Nothing here talks to
//! hardware or the terminal.

pub mod snapshot;
pub mod styled;
pub mod table;
pub mod thresholds;
pub mod tier;

// Re-export commonly used types at the crate root for convenience
pub use snapshot::{FetchFailure, FetchOutcome, GpuSnapshot, RamSnapshot, Target};
pub use styled::{Segment, StyledText};
pub use table::{Align, Column, DisplayRow, RowStatus, TableSpec, COLUMN_COUNT};
pub use thresholds::{MetricThresholds, ThresholdError, ThresholdSet};
pub use tier::{Accent, MetricKind, Tier};
