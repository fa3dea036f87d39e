//! gpuwatch-sources: Telemetry source implementations for gpuwatch.

mod memory;
mod nvml;
mod scripted;
mod simulated;

pub use memory::SysinfoMemory;
pub use nvml::NvmlSource;
pub use scripted::{ScriptControl, ScriptedDevice, ScriptedMemory, ScriptedSource};
pub use simulated::{SimulatedDevice, SimulatedSource, Waveform};
