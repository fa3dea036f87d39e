//! Snapshot builders: one fetch attempt per device or host per tick

use gpuwatch_core::{FetchError, MemoryProvider, TelemetrySource, VENDOR_PREFIX};
use gpuwatch_types::{FetchOutcome, GpuSnapshot, RamSnapshot, Target};

/// Strip a leading vendor token from a device name
pub fn strip_vendor_prefix(name: &str) -> &str {
    name.strip_prefix(VENDOR_PREFIX).unwrap_or(name)
}

/// Memory percentage from raw byte counts (0.0 when total is 0)
pub fn memory_percent(used: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        used as f64 / total as f64 * 100.0
    }
}

fn query_gpu<S>(source: &S, index: u32) -> Result<GpuSnapshot, FetchError>
where
    S: TelemetrySource + ?Sized,
{
    let handle = source.handle(index)?;
    let name = source.device_name(handle)?;
    let memory = source.memory_info(handle)?;
    let utilization = source.utilization(handle)?;
    let temperature = source.temperature(handle)?;
    let power_mw = source.power_usage(handle)?;
    let pcie_generation = source.pcie_link_generation(handle)?;
    let pcie_width = source.pcie_link_width(handle)?;

    Ok(GpuSnapshot {
        index,
        name: strip_vendor_prefix(&name).to_string(),
        memory_used: memory.used,
        memory_total: memory.total,
        memory_percent: memory_percent(memory.used, memory.total),
        utilization,
        temperature,
        power_watts: power_mw as f64 / 1000.0,
        pcie_generation,
        pcie_width,
    })
}

/// Build a snapshot of one GPU.
///
/// Any failing query abandons the whole snapshot; the failure is logged and
/// returned as [`FetchOutcome::Failed`] so the caller can carry on.
pub fn build_gpu_snapshot<S>(source: &S, index: u32) -> FetchOutcome<GpuSnapshot>
where
    S: TelemetrySource + ?Sized,
{
    match query_gpu(source, index) {
        Ok(snapshot) => FetchOutcome::Ready(snapshot),
        Err(e) => {
            log::error!("Error getting GPU {} info: {}", index, e);
            FetchOutcome::failed(Target::Gpu(index), e.to_string())
        }
    }
}

/// Build a snapshot of host memory from a single provider call
pub fn build_ram_snapshot<M>(provider: &mut M) -> FetchOutcome<RamSnapshot>
where
    M: MemoryProvider + ?Sized,
{
    match provider.virtual_memory() {
        Ok(usage) => FetchOutcome::Ready(RamSnapshot {
            used: usage.used,
            total: usage.total,
            percent: usage.percent,
        }),
        Err(e) => {
            log::error!("Error getting RAM info: {}", e);
            FetchOutcome::failed(Target::SystemRam, e.to_string())
        }
    }
}
