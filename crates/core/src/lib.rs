//! gpuwatch-core: Telemetry traits, classifier and formatter for gpuwatch.
//!
//! This crate contains the seams between the monitor and the outside world
//! (TelemetrySource, MemoryProvider, RenderSink) together with the pure
//! metric-to-visual functions and shared constants.

pub mod classifier;
pub mod constants;
mod data_source;
mod displayer;
pub mod format;

pub use classifier::{classify, Classifier};
pub use constants::{
    BAR_EMPTY, BAR_FILLED, BYTES_PER_GB, DEFAULT_BAR_WIDTH, DEFAULT_REFRESH_INTERVAL,
    DEFAULT_SAMPLE_INTERVAL, MAX_BAR_WIDTH, PLACEHOLDER, VENDOR_PREFIX,
};
pub use data_source::{
    DeviceHandle, FetchError, MemoryProvider, MemoryReading, MemoryUsage, Query, TelemetrySource,
};
pub use displayer::{RenderSink, SinkError};
pub use format::{
    format_bytes_as_gb, format_memory_pair, format_pcie, format_power, format_temperature,
    render_bar,
};

// Re-export types used in trait signatures for convenience
pub use gpuwatch_types::{DisplayRow, MetricThresholds, StyledText, TableSpec, ThresholdSet, Tier};
