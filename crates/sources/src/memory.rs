//! Host memory (RAM) provider using sysinfo

use gpuwatch_core::{FetchError, MemoryProvider, MemoryUsage, Query};
use sysinfo::System;

/// Host memory provider.
///
/// Percent is reported the way the host sees memory pressure:
/// `(total - available) / total`, which leaves reclaimable caches out.
pub struct SysinfoMemory {
    system: System,
}

impl SysinfoMemory {
    pub fn new() -> Self {
        log::info!("Creating sysinfo::System instance for host memory");
        Self {
            system: System::new(),
        }
    }
}

impl Default for SysinfoMemory {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a usage record from raw counters (bytes)
pub(crate) fn usage_from_counters(
    total: u64,
    used: u64,
    available: u64,
) -> Result<MemoryUsage, FetchError> {
    if total == 0 {
        return Err(FetchError::new(
            Query::HostMemory,
            "host memory information unavailable",
        ));
    }
    let percent = total.saturating_sub(available) as f64 / total as f64 * 100.0;
    Ok(MemoryUsage {
        total,
        used,
        percent,
    })
}

impl MemoryProvider for SysinfoMemory {
    fn virtual_memory(&mut self) -> Result<MemoryUsage, FetchError> {
        self.system.refresh_memory();
        usage_from_counters(
            self.system.total_memory(),
            self.system.used_memory(),
            self.system.available_memory(),
        )
    }
}
