//! Simulated telemetry source for demonstration without NVIDIA hardware
//!
//! Every metric follows a periodic waveform driven by wall-clock time since
//! `init`, so the dashboard moves through all color tiers.

use std::time::Instant;

use gpuwatch_core::{DeviceHandle, FetchError, MemoryReading, Query, TelemetrySource};

const GIB: u64 = 1 << 30;

/// Waveform used to drive a simulated metric
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    /// Sine wave oscillation
    Sine,
    /// Sawtooth wave (linear ramp)
    Sawtooth,
    /// Triangle wave
    Triangle,
    /// Square wave
    Square,
}

impl Waveform {
    /// Normalized level (0.0 to 1.0) at `elapsed` seconds for the given period
    pub fn level(self, elapsed: f64, period: f64) -> f64 {
        let period = if period > 0.0 { period } else { 1.0 };
        match self {
            Waveform::Sine => {
                let phase = (elapsed / period) * std::f64::consts::TAU;
                (phase.sin() + 1.0) / 2.0
            }
            Waveform::Sawtooth => (elapsed / period).fract(),
            Waveform::Triangle => {
                let phase = (elapsed / period).fract() * 2.0; // 0.0 to 2.0
                if phase <= 1.0 {
                    phase
                } else {
                    2.0 - phase
                }
            }
            Waveform::Square => {
                if (elapsed / period).fract() < 0.5 {
                    0.0
                } else {
                    1.0
                }
            }
        }
    }
}

/// Static description of one simulated GPU
#[derive(Debug, Clone)]
pub struct SimulatedDevice {
    pub name: String,
    pub memory_total: u64,
    /// Board power limit in milliwatts
    pub power_limit_mw: u32,
    pub pcie_generation: u32,
    pub pcie_width: u32,
    /// Seconds added to the clock so devices do not move in lockstep
    pub phase_offset: f64,
    /// Fail temperature reads during the high half of a 30 s square wave
    pub dropout: bool,
}

impl SimulatedDevice {
    pub fn new(name: impl Into<String>, memory_gib: u64, power_limit_w: u32) -> Self {
        Self {
            name: name.into(),
            memory_total: memory_gib * GIB,
            power_limit_mw: power_limit_w * 1000,
            pcie_generation: 4,
            pcie_width: 16,
            phase_offset: 0.0,
            dropout: false,
        }
    }

    pub fn with_pcie(mut self, generation: u32, width: u32) -> Self {
        self.pcie_generation = generation;
        self.pcie_width = width;
        self
    }

    pub fn with_phase_offset(mut self, seconds: f64) -> Self {
        self.phase_offset = seconds;
        self
    }

    pub fn with_dropout(mut self) -> Self {
        self.dropout = true;
        self
    }
}

/// Telemetry source producing synthetic readings
pub struct SimulatedSource {
    devices: Vec<SimulatedDevice>,
    started: Option<Instant>,
}

impl SimulatedSource {
    pub fn new(devices: Vec<SimulatedDevice>) -> Self {
        Self {
            devices,
            started: None,
        }
    }

    /// A small mixed rig, one device of which drops readings periodically
    pub fn demo() -> Self {
        Self::new(vec![
            SimulatedDevice::new("NVIDIA GeForce RTX 4090", 24, 450),
            SimulatedDevice::new("NVIDIA RTX A4000", 16, 140).with_phase_offset(7.0),
            SimulatedDevice::new("NVIDIA Tesla T4", 16, 70)
                .with_pcie(3, 16)
                .with_phase_offset(13.0)
                .with_dropout(),
        ])
    }

    fn elapsed(&self, query: Query) -> Result<f64, FetchError> {
        self.started
            .map(|start| start.elapsed().as_secs_f64())
            .ok_or_else(|| FetchError::new(query, "simulated source is not initialized"))
    }

    fn device(&self, query: Query, handle: DeviceHandle) -> Result<(&SimulatedDevice, f64), FetchError> {
        let elapsed = self.elapsed(query)?;
        let device = self
            .devices
            .get(handle.index() as usize)
            .ok_or_else(|| FetchError::new(query, format!("no simulated device {}", handle.index())))?;
        Ok((device, elapsed + device.phase_offset))
    }
}

impl TelemetrySource for SimulatedSource {
    fn name(&self) -> &str {
        "simulated"
    }

    fn init(&mut self) -> Result<(), FetchError> {
        self.started.get_or_insert_with(Instant::now);
        Ok(())
    }

    fn device_count(&self) -> Result<u32, FetchError> {
        self.elapsed(Query::DeviceCount)?;
        Ok(self.devices.len() as u32)
    }

    fn handle(&self, index: u32) -> Result<DeviceHandle, FetchError> {
        let handle = DeviceHandle::new(index);
        self.device(Query::Handle, handle)?;
        Ok(handle)
    }

    fn device_name(&self, handle: DeviceHandle) -> Result<String, FetchError> {
        let (device, _) = self.device(Query::Name, handle)?;
        Ok(device.name.clone())
    }

    fn memory_info(&self, handle: DeviceHandle) -> Result<MemoryReading, FetchError> {
        let (device, t) = self.device(Query::MemoryInfo, handle)?;
        let level = 0.05 + 0.9 * Waveform::Sawtooth.level(t, 45.0);
        Ok(MemoryReading {
            used: (device.memory_total as f64 * level) as u64,
            total: device.memory_total,
        })
    }

    fn utilization(&self, handle: DeviceHandle) -> Result<u32, FetchError> {
        let (_, t) = self.device(Query::Utilization, handle)?;
        Ok((Waveform::Sine.level(t, 20.0) * 100.0).round() as u32)
    }

    fn temperature(&self, handle: DeviceHandle) -> Result<u32, FetchError> {
        let (device, t) = self.device(Query::Temperature, handle)?;
        if device.dropout && Waveform::Square.level(t, 30.0) > 0.5 {
            return Err(FetchError::new(Query::Temperature, "simulated sensor dropout"));
        }
        Ok((30.0 + 60.0 * Waveform::Triangle.level(t, 60.0)).round() as u32)
    }

    fn power_usage(&self, handle: DeviceHandle) -> Result<u32, FetchError> {
        let (device, t) = self.device(Query::PowerUsage, handle)?;
        let level = 0.2 + 0.8 * Waveform::Sine.level(t, 20.0);
        Ok((device.power_limit_mw as f64 * level) as u32)
    }

    fn pcie_link_generation(&self, handle: DeviceHandle) -> Result<u32, FetchError> {
        let (device, _) = self.device(Query::PcieLinkGeneration, handle)?;
        Ok(device.pcie_generation)
    }

    fn pcie_link_width(&self, handle: DeviceHandle) -> Result<u32, FetchError> {
        let (device, _) = self.device(Query::PcieLinkWidth, handle)?;
        Ok(device.pcie_width)
    }

    fn shutdown(&mut self) -> Result<(), FetchError> {
        self.started = None;
        Ok(())
    }
}
