//! Snapshot collection and the poll-render loop

mod bootstrap;
mod rows;
mod runner;
mod snapshot;

pub use bootstrap::{bootstrap, resolve_indices, MonitorError, SourceGuard};
pub use rows::{RowBuilder, ERROR_MARKER};
pub use runner::{LoopState, Monitor, MonitorOptions, StopReason};
pub use snapshot::{build_gpu_snapshot, build_ram_snapshot, memory_percent, strip_vendor_prefix};
