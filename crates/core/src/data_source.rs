//! Telemetry source and host memory provider traits

use std::fmt;
use thiserror::Error;

/// Individual query issued against a telemetry source or memory provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Query {
    Init,
    DeviceCount,
    Handle,
    Name,
    MemoryInfo,
    Utilization,
    Temperature,
    PowerUsage,
    PcieLinkGeneration,
    PcieLinkWidth,
    Shutdown,
    HostMemory,
}

impl Query {
    pub fn as_str(&self) -> &'static str {
        match self {
            Query::Init => "init",
            Query::DeviceCount => "device count",
            Query::Handle => "device handle",
            Query::Name => "name",
            Query::MemoryInfo => "memory info",
            Query::Utilization => "utilization",
            Query::Temperature => "temperature",
            Query::PowerUsage => "power usage",
            Query::PcieLinkGeneration => "PCIe link generation",
            Query::PcieLinkWidth => "PCIe link width",
            Query::Shutdown => "shutdown",
            Query::HostMemory => "host memory",
        }
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed query; the description is opaque and only meant for logs
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{query} query failed: {description}")]
pub struct FetchError {
    pub query: Query,
    pub description: String,
}

impl FetchError {
    pub fn new(query: Query, description: impl Into<String>) -> Self {
        Self {
            query,
            description: description.into(),
        }
    }
}

/// Opaque reference to one device, obtained from [`TelemetrySource::handle`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceHandle(u32);

impl DeviceHandle {
    pub fn new(index: u32) -> Self {
        Self(index)
    }

    pub fn index(&self) -> u32 {
        self.0
    }
}

/// Raw device memory reading (bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MemoryReading {
    pub used: u64,
    pub total: u64,
}

/// Trait for GPU telemetry sources
///
/// A source is stateful and not reentrant: queries are issued one after
/// another from a single thread. Every query may fail on its own.
pub trait TelemetrySource: Send {
    /// Short name used in logs (e.g. "NVML")
    fn name(&self) -> &str;

    /// Acquire the underlying library/driver
    fn init(&mut self) -> Result<(), FetchError>;

    /// Number of enumerable devices
    fn device_count(&self) -> Result<u32, FetchError>;

    /// Resolve a device index to a handle
    fn handle(&self, index: u32) -> Result<DeviceHandle, FetchError>;

    /// Marketing name as reported by the vendor (prefix included)
    fn device_name(&self, handle: DeviceHandle) -> Result<String, FetchError>;

    fn memory_info(&self, handle: DeviceHandle) -> Result<MemoryReading, FetchError>;

    /// GPU utilization in percent
    fn utilization(&self, handle: DeviceHandle) -> Result<u32, FetchError>;

    /// Core temperature in Celsius
    fn temperature(&self, handle: DeviceHandle) -> Result<u32, FetchError>;

    /// Power draw in milliwatts
    fn power_usage(&self, handle: DeviceHandle) -> Result<u32, FetchError>;

    fn pcie_link_generation(&self, handle: DeviceHandle) -> Result<u32, FetchError>;

    fn pcie_link_width(&self, handle: DeviceHandle) -> Result<u32, FetchError>;

    /// Release the underlying library/driver
    fn shutdown(&mut self) -> Result<(), FetchError>;
}

/// Host memory usage as reported by the operating system
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MemoryUsage {
    pub total: u64, // bytes
    pub used: u64,  // bytes
    /// Host's own notion of memory pressure (0.0 to 100.0)
    pub percent: f64,
}

/// Trait for host memory-info providers
pub trait MemoryProvider: Send {
    /// Single call returning total/used/percent
    fn virtual_memory(&mut self) -> Result<MemoryUsage, FetchError>;
}

impl<T: TelemetrySource + ?Sized> TelemetrySource for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn init(&mut self) -> Result<(), FetchError> {
        (**self).init()
    }

    fn device_count(&self) -> Result<u32, FetchError> {
        (**self).device_count()
    }

    fn handle(&self, index: u32) -> Result<DeviceHandle, FetchError> {
        (**self).handle(index)
    }

    fn device_name(&self, handle: DeviceHandle) -> Result<String, FetchError> {
        (**self).device_name(handle)
    }

    fn memory_info(&self, handle: DeviceHandle) -> Result<MemoryReading, FetchError> {
        (**self).memory_info(handle)
    }

    fn utilization(&self, handle: DeviceHandle) -> Result<u32, FetchError> {
        (**self).utilization(handle)
    }

    fn temperature(&self, handle: DeviceHandle) -> Result<u32, FetchError> {
        (**self).temperature(handle)
    }

    fn power_usage(&self, handle: DeviceHandle) -> Result<u32, FetchError> {
        (**self).power_usage(handle)
    }

    fn pcie_link_generation(&self, handle: DeviceHandle) -> Result<u32, FetchError> {
        (**self).pcie_link_generation(handle)
    }

    fn pcie_link_width(&self, handle: DeviceHandle) -> Result<u32, FetchError> {
        (**self).pcie_link_width(handle)
    }

    fn shutdown(&mut self) -> Result<(), FetchError> {
        (**self).shutdown()
    }
}

impl<T: MemoryProvider + ?Sized> MemoryProvider for Box<T> {
    fn virtual_memory(&mut self) -> Result<MemoryUsage, FetchError> {
        (**self).virtual_memory()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_display() {
        let err = FetchError::new(Query::PowerUsage, "Not Supported");
        assert_eq!(err.to_string(), "power usage query failed: Not Supported");
    }

    #[test]
    fn test_device_handle_index() {
        assert_eq!(DeviceHandle::new(7).index(), 7);
    }
}
