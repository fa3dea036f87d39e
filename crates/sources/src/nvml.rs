//! NVIDIA telemetry source using NVML

use gpuwatch_core::{DeviceHandle, FetchError, MemoryReading, Query, TelemetrySource};

#[cfg(feature = "nvidia")]
use nvml_wrapper::{enum_wrappers::device::TemperatureSensor, error::NvmlError, Device, Nvml};

/// NVML-backed telemetry source.
///
/// The library is loaded by [`TelemetrySource::init`] and released by
/// [`TelemetrySource::shutdown`]; every query resolves the device by index.
pub struct NvmlSource {
    #[cfg(feature = "nvidia")]
    nvml: Option<Nvml>,
}

impl NvmlSource {
    pub fn new() -> Self {
        Self {
            #[cfg(feature = "nvidia")]
            nvml: None,
        }
    }

    /// Whether NVML support was compiled in
    pub fn is_supported() -> bool {
        cfg!(feature = "nvidia")
    }
}

impl Default for NvmlSource {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "nvidia")]
fn nvml_error(query: Query, err: NvmlError) -> FetchError {
    FetchError::new(query, err.to_string())
}

#[cfg(feature = "nvidia")]
impl NvmlSource {
    fn library(&self, query: Query) -> Result<&Nvml, FetchError> {
        self.nvml
            .as_ref()
            .ok_or_else(|| FetchError::new(query, "NVML is not initialized"))
    }

    fn device(&self, query: Query, handle: DeviceHandle) -> Result<Device<'_>, FetchError> {
        self.library(query)?
            .device_by_index(handle.index())
            .map_err(|e| nvml_error(query, e))
    }
}

#[cfg(feature = "nvidia")]
impl TelemetrySource for NvmlSource {
    fn name(&self) -> &str {
        "NVML"
    }

    fn init(&mut self) -> Result<(), FetchError> {
        if self.nvml.is_some() {
            return Ok(());
        }
        let nvml = Nvml::init().map_err(|e| nvml_error(Query::Init, e))?;
        self.nvml = Some(nvml);
        Ok(())
    }

    fn device_count(&self) -> Result<u32, FetchError> {
        self.library(Query::DeviceCount)?
            .device_count()
            .map_err(|e| nvml_error(Query::DeviceCount, e))
    }

    fn handle(&self, index: u32) -> Result<DeviceHandle, FetchError> {
        let handle = DeviceHandle::new(index);
        // Resolve once so a vanished device fails here rather than mid-snapshot
        self.device(Query::Handle, handle)?;
        Ok(handle)
    }

    fn device_name(&self, handle: DeviceHandle) -> Result<String, FetchError> {
        self.device(Query::Name, handle)?
            .name()
            .map_err(|e| nvml_error(Query::Name, e))
    }

    fn memory_info(&self, handle: DeviceHandle) -> Result<MemoryReading, FetchError> {
        let info = self
            .device(Query::MemoryInfo, handle)?
            .memory_info()
            .map_err(|e| nvml_error(Query::MemoryInfo, e))?;
        Ok(MemoryReading {
            used: info.used,
            total: info.total,
        })
    }

    fn utilization(&self, handle: DeviceHandle) -> Result<u32, FetchError> {
        self.device(Query::Utilization, handle)?
            .utilization_rates()
            .map(|u| u.gpu)
            .map_err(|e| nvml_error(Query::Utilization, e))
    }

    fn temperature(&self, handle: DeviceHandle) -> Result<u32, FetchError> {
        self.device(Query::Temperature, handle)?
            .temperature(TemperatureSensor::Gpu)
            .map_err(|e| nvml_error(Query::Temperature, e))
    }

    fn power_usage(&self, handle: DeviceHandle) -> Result<u32, FetchError> {
        self.device(Query::PowerUsage, handle)?
            .power_usage()
            .map_err(|e| nvml_error(Query::PowerUsage, e))
    }

    fn pcie_link_generation(&self, handle: DeviceHandle) -> Result<u32, FetchError> {
        self.device(Query::PcieLinkGeneration, handle)?
            .max_pcie_link_gen()
            .map_err(|e| nvml_error(Query::PcieLinkGeneration, e))
    }

    fn pcie_link_width(&self, handle: DeviceHandle) -> Result<u32, FetchError> {
        self.device(Query::PcieLinkWidth, handle)?
            .max_pcie_link_width()
            .map_err(|e| nvml_error(Query::PcieLinkWidth, e))
    }

    fn shutdown(&mut self) -> Result<(), FetchError> {
        match self.nvml.take() {
            Some(nvml) => nvml.shutdown().map_err(|e| nvml_error(Query::Shutdown, e)),
            None => Ok(()),
        }
    }
}

#[cfg(not(feature = "nvidia"))]
fn not_compiled(query: Query) -> FetchError {
    FetchError::new(query, "NVIDIA support not enabled at compile time")
}

#[cfg(not(feature = "nvidia"))]
impl TelemetrySource for NvmlSource {
    fn name(&self) -> &str {
        "NVML (disabled)"
    }

    fn init(&mut self) -> Result<(), FetchError> {
        Err(not_compiled(Query::Init))
    }

    fn device_count(&self) -> Result<u32, FetchError> {
        Err(not_compiled(Query::DeviceCount))
    }

    fn handle(&self, _index: u32) -> Result<DeviceHandle, FetchError> {
        Err(not_compiled(Query::Handle))
    }

    fn device_name(&self, _handle: DeviceHandle) -> Result<String, FetchError> {
        Err(not_compiled(Query::Name))
    }

    fn memory_info(&self, _handle: DeviceHandle) -> Result<MemoryReading, FetchError> {
        Err(not_compiled(Query::MemoryInfo))
    }

    fn utilization(&self, _handle: DeviceHandle) -> Result<u32, FetchError> {
        Err(not_compiled(Query::Utilization))
    }

    fn temperature(&self, _handle: DeviceHandle) -> Result<u32, FetchError> {
        Err(not_compiled(Query::Temperature))
    }

    fn power_usage(&self, _handle: DeviceHandle) -> Result<u32, FetchError> {
        Err(not_compiled(Query::PowerUsage))
    }

    fn pcie_link_generation(&self, _handle: DeviceHandle) -> Result<u32, FetchError> {
        Err(not_compiled(Query::PcieLinkGeneration))
    }

    fn pcie_link_width(&self, _handle: DeviceHandle) -> Result<u32, FetchError> {
        Err(not_compiled(Query::PcieLinkWidth))
    }

    fn shutdown(&mut self) -> Result<(), FetchError> {
        Ok(())
    }
}
