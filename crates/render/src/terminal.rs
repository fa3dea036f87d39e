//! Terminal rendering sink built on ratatui and crossterm

use std::io::{self, Stdout};

use crossterm::{
    cursor::Show,
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen},
};
use gpuwatch_core::{RenderSink, SinkError};
use gpuwatch_types::{DisplayRow, TableSpec, ThresholdSet};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Alignment, Constraint, Layout},
    style::Style,
    text::{Line, Text},
    widgets::{Block, Cell, Padding, Paragraph, Row, Table},
    Frame, Terminal,
};

use crate::legend::{legend_height, legend_text, LEGEND_TITLE, LEGEND_WIDTH};
use crate::palette::{self, BORDER_COLOR, HEADER_STYLE, TITLE_STYLE};

/// Sink drawing to the process's own terminal
pub type StdoutSink = TerminalSink<CrosstermBackend<Stdout>>;

/// Restores the primary screen even if the sink is dropped during a panic
struct ScreenGuard {
    active: bool,
}

impl ScreenGuard {
    fn enter() -> io::Result<Self> {
        execute!(io::stdout(), EnterAlternateScreen)?;
        Ok(Self { active: true })
    }

    fn leave(&mut self) -> io::Result<()> {
        if self.active {
            self.active = false;
            execute!(io::stdout(), LeaveAlternateScreen, Show)?;
        }
        Ok(())
    }
}

impl Drop for ScreenGuard {
    fn drop(&mut self) {
        let _ = self.leave();
    }
}

/// Rendering sink that redraws the monitor table in place.
///
/// Raw mode is left off so Ctrl+C still reaches the process as SIGINT.
pub struct TerminalSink<B: Backend> {
    terminal: Terminal<B>,
    manage_screen: bool,
    screen: Option<ScreenGuard>,
    table: Option<TableSpec>,
    rows: Vec<DisplayRow>,
    legend: Text<'static>,
}

impl StdoutSink {
    /// Create a sink on stdout that switches to the alternate screen in `begin`
    pub fn stdout(thresholds: &ThresholdSet) -> Result<Self, SinkError> {
        let mut sink = Self::with_backend(CrosstermBackend::new(io::stdout()), thresholds)?;
        sink.manage_screen = true;
        Ok(sink)
    }
}

impl<B: Backend> TerminalSink<B> {
    /// Create a sink on an arbitrary backend; the screen is not switched
    pub fn with_backend(backend: B, thresholds: &ThresholdSet) -> Result<Self, SinkError> {
        Ok(Self {
            terminal: Terminal::new(backend)?,
            manage_screen: false,
            screen: None,
            table: None,
            rows: Vec::new(),
            legend: legend_text(thresholds),
        })
    }

    pub fn backend(&self) -> &B {
        self.terminal.backend()
    }

    /// Rows that the next refresh will draw
    pub fn rows(&self) -> &[DisplayRow] {
        &self.rows
    }
}

impl<B: Backend> RenderSink for TerminalSink<B> {
    fn begin(&mut self, table: &TableSpec) -> Result<(), SinkError> {
        if self.manage_screen && self.screen.is_none() {
            self.screen = Some(ScreenGuard::enter()?);
        }
        self.terminal.clear()?;
        self.table = Some(table.clone());
        log::debug!("Terminal sink started for table '{}'", table.title);
        Ok(())
    }

    fn update(&mut self, rows: Vec<DisplayRow>) -> Result<(), SinkError> {
        if self.table.is_none() {
            return Err(SinkError::NotStarted);
        }
        self.rows = rows;
        Ok(())
    }

    fn refresh(&mut self) -> Result<(), SinkError> {
        let Self {
            terminal,
            table,
            rows,
            legend,
            ..
        } = self;
        let table = table.as_ref().ok_or(SinkError::NotStarted)?;
        terminal.draw(|frame| draw_dashboard(frame, table, rows, legend))?;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        if let Some(mut screen) = self.screen.take() {
            screen.leave()?;
        }
        self.terminal.show_cursor()?;
        Ok(())
    }
}

/// Column widths wide enough for the header and every row's widest line
pub fn column_widths(table: &TableSpec, rows: &[DisplayRow]) -> Vec<u16> {
    table
        .columns
        .iter()
        .enumerate()
        .map(|(i, column)| {
            let widest = rows
                .iter()
                .map(|row| row.cells().get(i).map_or(0, |cell| palette::text_width(cell)))
                .max()
                .unwrap_or(0);
            widest.max(column.header.chars().count()) as u16
        })
        .collect()
}

fn draw_dashboard(frame: &mut Frame, table: &TableSpec, rows: &[DisplayRow], legend: &Text<'static>) {
    let [legend_area, table_area] =
        Layout::vertical([Constraint::Length(legend_height(legend)), Constraint::Min(0)])
            .areas(frame.area());
    let [legend_area, _] =
        Layout::horizontal([Constraint::Length(LEGEND_WIDTH), Constraint::Min(0)]).areas(legend_area);

    let guide = Paragraph::new(legend.clone())
        .alignment(Alignment::Right)
        .block(
            Block::bordered()
                .title(LEGEND_TITLE)
                .border_style(Style::new().fg(BORDER_COLOR))
                .padding(Padding::new(2, 2, 1, 1)),
        );
    frame.render_widget(guide, legend_area);

    let header = Row::new(table.columns.iter().map(|column| {
        Cell::from(Text::from(column.header.clone()).alignment(palette::alignment(column.align)))
    }))
    .style(HEADER_STYLE);

    let body = rows.iter().map(|row| {
        let cells = row
            .cells()
            .into_iter()
            .zip(&table.columns)
            .map(|(cell, column)| Cell::from(palette::to_text(cell, column.align)));
        Row::new(cells).height(row.height() as u16)
    });

    let widths = column_widths(table, rows)
        .into_iter()
        .map(Constraint::Length)
        .collect::<Vec<_>>();

    let monitor = Table::new(body, widths)
        .header(header)
        .column_spacing(2)
        .block(Block::new().title(Line::from(table.title.clone()).style(TITLE_STYLE).centered()));
    frame.render_widget(monitor, table_area);
}
