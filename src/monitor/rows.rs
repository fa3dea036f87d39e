//! Turning snapshots and fetch failures into table rows

use gpuwatch_core::{
    format_memory_pair, format_pcie, format_power, format_temperature, render_bar, Classifier,
    PLACEHOLDER,
};
use gpuwatch_types::{
    Accent, DisplayRow, FetchFailure, FetchOutcome, GpuSnapshot, RamSnapshot, RowStatus, StyledText,
    Target,
};

/// Marker appended to the device label of a failed row
pub const ERROR_MARKER: &str = "(Error)";

/// Formats snapshots into rows using one classifier and bar width
#[derive(Debug, Clone)]
pub struct RowBuilder {
    classifier: Classifier,
    bar_width: usize,
}

impl RowBuilder {
    pub fn new(classifier: Classifier, bar_width: usize) -> Self {
        Self {
            classifier,
            bar_width,
        }
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Bar plus "used/total GB" on a second line
    fn memory_cell(&self, percent: f64, used: u64, total: u64) -> StyledText {
        let mut cell = render_bar(percent, self.bar_width, &self.classifier.thresholds().memory);
        cell.push_plain(format!("\n{}", format_memory_pair(used, total)));
        cell
    }

    pub fn gpu_row(&self, gpu: &GpuSnapshot) -> DisplayRow {
        let thresholds = self.classifier.thresholds();
        let temperature_accent = self.classifier.temperature(gpu.temperature as f64).accent();

        DisplayRow {
            target: Target::Gpu(gpu.index),
            status: RowStatus::Ok,
            device: StyledText::plain(gpu.name.clone()),
            utilization: render_bar(gpu.utilization as f64, self.bar_width, &thresholds.utilization),
            memory: self.memory_cell(gpu.memory_percent, gpu.memory_used, gpu.memory_total),
            temperature: StyledText::accented(format_temperature(gpu.temperature), temperature_accent),
            power: StyledText::plain(format_power(gpu.power_watts)),
            pcie: StyledText::plain(format_pcie(gpu.pcie_generation, gpu.pcie_width)),
        }
    }

    /// Host memory row; both bar columns show memory pressure
    pub fn ram_row(&self, ram: &RamSnapshot) -> DisplayRow {
        DisplayRow {
            target: Target::SystemRam,
            status: RowStatus::Ok,
            device: StyledText::accented(Target::SystemRam.to_string(), Accent::Warning),
            utilization: render_bar(ram.percent, self.bar_width, &self.classifier.thresholds().memory),
            memory: self.memory_cell(ram.percent, ram.used, ram.total),
            temperature: StyledText::plain(PLACEHOLDER),
            power: StyledText::plain(PLACEHOLDER),
            pcie: StyledText::plain(PLACEHOLDER),
        }
    }

    /// Row standing in for a failed fetch
    pub fn error_row(&self, failure: &FetchFailure) -> DisplayRow {
        let mut device = StyledText::plain(format!("{} ", failure.target));
        device.push_accented(ERROR_MARKER, Accent::Danger);

        DisplayRow {
            target: failure.target,
            status: RowStatus::Failed,
            device,
            utilization: StyledText::plain(PLACEHOLDER),
            memory: StyledText::plain(PLACEHOLDER),
            temperature: StyledText::plain(PLACEHOLDER),
            power: StyledText::plain(PLACEHOLDER),
            pcie: StyledText::plain(PLACEHOLDER),
        }
    }

    pub fn gpu_outcome(&self, outcome: &FetchOutcome<GpuSnapshot>) -> DisplayRow {
        match outcome {
            FetchOutcome::Ready(gpu) => self.gpu_row(gpu),
            FetchOutcome::Failed(failure) => self.error_row(failure),
        }
    }

    pub fn ram_outcome(&self, outcome: &FetchOutcome<RamSnapshot>) -> DisplayRow {
        match outcome {
            FetchOutcome::Ready(ram) => self.ram_row(ram),
            FetchOutcome::Failed(failure) => self.error_row(failure),
        }
    }
}
