//! Table layout handed to the rendering sink and the rows that fill it.

use crate::snapshot::Target;
use crate::styled::StyledText;

/// Number of columns in the monitor table
pub const COLUMN_COUNT: usize = 6;

/// Horizontal alignment of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// A single column header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub header: String,
    pub align: Align,
}

impl Column {
    pub fn new(header: impl Into<String>, align: Align) -> Self {
        Self {
            header: header.into(),
            align,
        }
    }
}

/// Static description of the table: title and columns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSpec {
    pub title: String,
    pub columns: Vec<Column>,
}

impl TableSpec {
    /// The GPU/RAM monitor table
    pub fn monitor() -> Self {
        Self {
            title: "GPU and System Memory Monitor".to_string(),
            columns: vec![
                Column::new("Device", Align::Left),
                Column::new("Utilization", Align::Left),
                Column::new("Memory", Align::Left),
                Column::new("Temp", Align::Right),
                Column::new("Power", Align::Right),
                Column::new("PCIe", Align::Center),
            ],
        }
    }
}

impl Default for TableSpec {
    fn default() -> Self {
        Self::monitor()
    }
}

/// Whether a row carries readings or stands in for a failed fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowStatus {
    Ok,
    Failed,
}

/// One formatted table row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRow {
    pub target: Target,
    pub status: RowStatus,
    pub device: StyledText,
    pub utilization: StyledText,
    pub memory: StyledText,
    pub temperature: StyledText,
    pub power: StyledText,
    pub pcie: StyledText,
}

impl DisplayRow {
    /// Cells in column order
    pub fn cells(&self) -> [&StyledText; COLUMN_COUNT] {
        [
            &self.device,
            &self.utilization,
            &self.memory,
            &self.temperature,
            &self.power,
            &self.pcie,
        ]
    }

    /// Number of terminal lines the row needs
    pub fn height(&self) -> usize {
        self.cells()
            .iter()
            .map(|cell| cell.line_count())
            .max()
            .unwrap_or(1)
    }

    pub fn is_failed(&self) -> bool {
        self.status == RowStatus::Failed
    }
}
