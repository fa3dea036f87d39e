//! Shared fixtures for the monitor integration tests
#![allow(dead_code)]

use std::io;
use std::time::Duration;

use gpuwatch::MonitorOptions;
use gpuwatch_core::{MemoryUsage, RenderSink, SinkError};
use gpuwatch_sources::{ScriptedDevice, ScriptedMemory};
use gpuwatch_types::{DisplayRow, TableSpec};

pub const GIB: u64 = 1 << 30;

/// Sink that remembers every call instead of drawing
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub table: Option<TableSpec>,
    pub begun: usize,
    pub updates: Vec<Vec<DisplayRow>>,
    pub refreshes: usize,
    pub finished: usize,
    /// Fail the refresh with this (1-based) number
    pub fail_refresh: Option<usize>,
}

impl RecordingSink {
    pub fn failing_on_refresh(n: usize) -> Self {
        Self {
            fail_refresh: Some(n),
            ..Self::default()
        }
    }

    pub fn last_rows(&self) -> &[DisplayRow] {
        self.updates.last().map(Vec::as_slice).unwrap_or(&[])
    }
}

impl RenderSink for RecordingSink {
    fn begin(&mut self, table: &TableSpec) -> Result<(), SinkError> {
        self.begun += 1;
        self.table = Some(table.clone());
        Ok(())
    }

    fn update(&mut self, rows: Vec<DisplayRow>) -> Result<(), SinkError> {
        if self.begun == 0 {
            return Err(SinkError::NotStarted);
        }
        self.updates.push(rows);
        Ok(())
    }

    fn refresh(&mut self) -> Result<(), SinkError> {
        self.refreshes += 1;
        if self.fail_refresh == Some(self.refreshes) {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "terminal went away").into());
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        self.finished += 1;
        Ok(())
    }
}

pub fn gpu(name: &str) -> ScriptedDevice {
    ScriptedDevice::new(format!("NVIDIA {}", name))
        .memory(4 * GIB, 16 * GIB)
        .utilization(10)
        .temperature(35)
        .power_mw(60_000)
}

pub fn rtx_3090() -> ScriptedDevice {
    ScriptedDevice::new("NVIDIA GeForce RTX 3090")
        .memory(5 * GIB, 24 * GIB)
        .utilization(50)
        .temperature(65)
        .power_mw(250_000)
        .pcie(4, 16)
}

pub fn ram() -> ScriptedMemory {
    ScriptedMemory::new(MemoryUsage {
        total: 32 * GIB,
        used: 16 * GIB,
        percent: 50.0,
    })
}

pub fn options(max_ticks: Option<u64>) -> MonitorOptions {
    MonitorOptions {
        sample_interval: Duration::from_secs(2),
        refresh_interval: Duration::from_secs(1),
        max_ticks,
        ..MonitorOptions::default()
    }
}

/// Device labels of a row set, with accents stripped
pub fn labels(rows: &[DisplayRow]) -> Vec<String> {
    rows.iter().map(|row| row.device.plain_text()).collect()
}
