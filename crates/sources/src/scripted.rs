//! Scripted telemetry source and memory provider
//!
//! Readings are fixed by the caller and can be changed between ticks through
//! a shared [`ScriptControl`]. Every call is recorded so tests can assert on
//! query order and on how often the source was initialised and shut down.

use std::sync::{Arc, Mutex, MutexGuard};

use gpuwatch_core::{
    DeviceHandle, FetchError, MemoryProvider, MemoryReading, MemoryUsage, Query, TelemetrySource,
};

/// Readings reported for one scripted device
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptedDevice {
    pub name: String,
    pub memory: MemoryReading,
    pub utilization: u32,
    pub temperature: u32,
    /// Milliwatts
    pub power_usage: u32,
    pub pcie_generation: u32,
    pub pcie_width: u32,
    /// Query that fails for this device, if any
    pub failing: Option<Query>,
}

impl ScriptedDevice {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            memory: MemoryReading {
                used: 0,
                total: 1 << 30,
            },
            utilization: 0,
            temperature: 30,
            power_usage: 0,
            pcie_generation: 4,
            pcie_width: 16,
            failing: None,
        }
    }

    pub fn memory(mut self, used: u64, total: u64) -> Self {
        self.memory = MemoryReading { used, total };
        self
    }

    pub fn utilization(mut self, percent: u32) -> Self {
        self.utilization = percent;
        self
    }

    pub fn temperature(mut self, celsius: u32) -> Self {
        self.temperature = celsius;
        self
    }

    pub fn power_mw(mut self, milliwatts: u32) -> Self {
        self.power_usage = milliwatts;
        self
    }

    pub fn pcie(mut self, generation: u32, width: u32) -> Self {
        self.pcie_generation = generation;
        self.pcie_width = width;
        self
    }

    pub fn failing(mut self, query: Query) -> Self {
        self.failing = Some(query);
        self
    }
}

#[derive(Debug, Default)]
struct ScriptState {
    devices: Vec<ScriptedDevice>,
    /// Overrides `devices.len()` so out-of-range indices can be simulated
    reported_count: Option<u32>,
    fail_init: Option<String>,
    fail_shutdown: Option<String>,
    initialized: bool,
    init_calls: usize,
    shutdown_calls: usize,
    calls: Vec<(Option<u32>, Query)>,
}

/// Shared handle for inspecting and steering a [`ScriptedSource`]
#[derive(Debug, Clone)]
pub struct ScriptControl {
    state: Arc<Mutex<ScriptState>>,
}

fn lock(state: &Arc<Mutex<ScriptState>>) -> MutexGuard<'_, ScriptState> {
    // A panic in another test thread must not hide this one's assertions
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl ScriptControl {
    /// Make `query` fail for device `index` (or clear the failure with `None`)
    pub fn set_failure(&self, index: u32, query: Option<Query>) {
        if let Some(device) = lock(&self.state).devices.get_mut(index as usize) {
            device.failing = query;
        }
    }

    pub fn set_utilization(&self, index: u32, percent: u32) {
        if let Some(device) = lock(&self.state).devices.get_mut(index as usize) {
            device.utilization = percent;
        }
    }

    pub fn set_temperature(&self, index: u32, celsius: u32) {
        if let Some(device) = lock(&self.state).devices.get_mut(index as usize) {
            device.temperature = celsius;
        }
    }

    pub fn init_calls(&self) -> usize {
        lock(&self.state).init_calls
    }

    pub fn shutdown_calls(&self) -> usize {
        lock(&self.state).shutdown_calls
    }

    /// Every query issued so far as (device index, query)
    pub fn calls(&self) -> Vec<(Option<u32>, Query)> {
        lock(&self.state).calls.clone()
    }

    /// Device indices in the order their name was queried
    pub fn name_queries(&self) -> Vec<u32> {
        lock(&self.state)
            .calls
            .iter()
            .filter(|(_, query)| *query == Query::Name)
            .filter_map(|(index, _)| *index)
            .collect()
    }
}

/// Telemetry source that reports scripted readings
#[derive(Debug)]
pub struct ScriptedSource {
    state: Arc<Mutex<ScriptState>>,
}

impl ScriptedSource {
    pub fn new(devices: Vec<ScriptedDevice>) -> Self {
        Self {
            state: Arc::new(Mutex::new(ScriptState {
                devices,
                ..ScriptState::default()
            })),
        }
    }

    /// Report `count` devices regardless of how many are scripted
    pub fn with_reported_count(self, count: u32) -> Self {
        lock(&self.state).reported_count = Some(count);
        self
    }

    pub fn with_init_failure(self, description: impl Into<String>) -> Self {
        lock(&self.state).fail_init = Some(description.into());
        self
    }

    pub fn with_shutdown_failure(self, description: impl Into<String>) -> Self {
        lock(&self.state).fail_shutdown = Some(description.into());
        self
    }

    pub fn control(&self) -> ScriptControl {
        ScriptControl {
            state: Arc::clone(&self.state),
        }
    }

    fn read<T>(
        &self,
        query: Query,
        handle: DeviceHandle,
        read: impl FnOnce(&ScriptedDevice) -> T,
    ) -> Result<T, FetchError> {
        let mut state = lock(&self.state);
        state.calls.push((Some(handle.index()), query));
        if !state.initialized {
            return Err(FetchError::new(query, "scripted source is not initialized"));
        }
        let device = state
            .devices
            .get(handle.index() as usize)
            .ok_or_else(|| FetchError::new(query, "Invalid Argument"))?;
        if device.failing == Some(query) {
            return Err(FetchError::new(query, "scripted failure"));
        }
        Ok(read(device))
    }
}

impl TelemetrySource for ScriptedSource {
    fn name(&self) -> &str {
        "scripted"
    }

    fn init(&mut self) -> Result<(), FetchError> {
        let mut state = lock(&self.state);
        state.init_calls += 1;
        state.calls.push((None, Query::Init));
        if let Some(description) = state.fail_init.clone() {
            return Err(FetchError::new(Query::Init, description));
        }
        state.initialized = true;
        Ok(())
    }

    fn device_count(&self) -> Result<u32, FetchError> {
        let mut state = lock(&self.state);
        state.calls.push((None, Query::DeviceCount));
        if !state.initialized {
            return Err(FetchError::new(Query::DeviceCount, "scripted source is not initialized"));
        }
        Ok(state
            .reported_count
            .unwrap_or(state.devices.len() as u32))
    }

    fn handle(&self, index: u32) -> Result<DeviceHandle, FetchError> {
        let handle = DeviceHandle::new(index);
        self.read(Query::Handle, handle, |_| ())?;
        Ok(handle)
    }

    fn device_name(&self, handle: DeviceHandle) -> Result<String, FetchError> {
        self.read(Query::Name, handle, |d| d.name.clone())
    }

    fn memory_info(&self, handle: DeviceHandle) -> Result<MemoryReading, FetchError> {
        self.read(Query::MemoryInfo, handle, |d| d.memory)
    }

    fn utilization(&self, handle: DeviceHandle) -> Result<u32, FetchError> {
        self.read(Query::Utilization, handle, |d| d.utilization)
    }

    fn temperature(&self, handle: DeviceHandle) -> Result<u32, FetchError> {
        self.read(Query::Temperature, handle, |d| d.temperature)
    }

    fn power_usage(&self, handle: DeviceHandle) -> Result<u32, FetchError> {
        self.read(Query::PowerUsage, handle, |d| d.power_usage)
    }

    fn pcie_link_generation(&self, handle: DeviceHandle) -> Result<u32, FetchError> {
        self.read(Query::PcieLinkGeneration, handle, |d| d.pcie_generation)
    }

    fn pcie_link_width(&self, handle: DeviceHandle) -> Result<u32, FetchError> {
        self.read(Query::PcieLinkWidth, handle, |d| d.pcie_width)
    }

    fn shutdown(&mut self) -> Result<(), FetchError> {
        let mut state = lock(&self.state);
        state.shutdown_calls += 1;
        state.calls.push((None, Query::Shutdown));
        state.initialized = false;
        match state.fail_shutdown.clone() {
            Some(description) => Err(FetchError::new(Query::Shutdown, description)),
            None => Ok(()),
        }
    }
}

/// Memory provider that reports a scripted reading
#[derive(Debug, Clone)]
pub struct ScriptedMemory {
    state: Arc<Mutex<Result<MemoryUsage, String>>>,
}

impl ScriptedMemory {
    pub fn new(usage: MemoryUsage) -> Self {
        Self {
            state: Arc::new(Mutex::new(Ok(usage))),
        }
    }

    pub fn failing(description: impl Into<String>) -> Self {
        Self {
            state: Arc::new(Mutex::new(Err(description.into()))),
        }
    }

    /// Replace the reading returned from now on; clones share it
    pub fn set(&self, reading: Result<MemoryUsage, String>) {
        *self.state.lock().unwrap_or_else(|p| p.into_inner()) = reading;
    }
}

impl MemoryProvider for ScriptedMemory {
    fn virtual_memory(&mut self) -> Result<MemoryUsage, FetchError> {
        self.state
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
            .map_err(|description| FetchError::new(Query::HostMemory, description))
    }
}
