//! gpuwatch: live terminal dashboard for GPU and system memory telemetry.
//!
//! The binary wires a telemetry source, the host memory provider and the
//! terminal sink into a [`Monitor`]; everything here is also usable with the
//! scripted sources for testing.

pub mod config;
pub mod logging;
pub mod monitor;

pub use config::{ConfigError, ConfigOverrides, MonitorConfig};
pub use monitor::{
    build_gpu_snapshot, build_ram_snapshot, LoopState, Monitor, MonitorError, MonitorOptions,
    RowBuilder, SourceGuard, StopReason,
};
