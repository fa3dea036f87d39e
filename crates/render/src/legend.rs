//! "Quick Guide" panel: key bindings, color legend and active metric ranges

use gpuwatch_types::{Accent, MetricThresholds, ThresholdSet};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span, Text};

use crate::palette::accent_color;

/// Panel title
pub const LEGEND_TITLE: &str = "Quick Guide";

/// Fixed outer width of the panel, borders included
pub const LEGEND_WIDTH: u16 = 40;

/// Border plus one line of vertical padding on each side
const LEGEND_CHROME: u16 = 4;

fn heading(text: &'static str) -> Line<'static> {
    Line::from(Span::styled(text, Style::new().fg(Color::Cyan)))
}

fn swatch(label: &'static str, accent: Accent) -> Span<'static> {
    Span::styled(label, Style::new().fg(accent_color(accent)))
}

fn range(label: &str, thresholds: &MetricThresholds, unit: &str) -> Line<'static> {
    Line::from(format!(
        "{}: <{}{} → >{}{}",
        label, thresholds.normal, unit, thresholds.top, unit
    ))
}

/// Build the legend text for the active thresholds
pub fn legend_text(thresholds: &ThresholdSet) -> Text<'static> {
    Text::from(vec![
        heading("Keyboard Controls:"),
        Line::from(vec![
            Span::styled("Ctrl+C", Style::new().fg(Color::Green)),
            Span::raw(": Exit monitor"),
        ]),
        Line::default(),
        heading("Color Indicators:"),
        Line::from(vec![
            swatch("Blue", Accent::Cold),
            Span::raw(": Low/Cool     "),
            swatch("Green", Accent::Ok),
            Span::raw(": Normal"),
        ]),
        Line::from(vec![
            swatch("Yellow", Accent::Warning),
            Span::raw(": Warning   "),
            swatch("Red", Accent::Danger),
            Span::raw(": Critical"),
        ]),
        Line::default(),
        heading("Metrics Ranges:"),
        range("Temperature", &thresholds.temperature, "°C"),
        range("Utilization", &thresholds.utilization, "%"),
        range("Memory", &thresholds.memory, "%"),
    ])
}

/// Outer height of the panel for the given text
pub fn legend_height(text: &Text<'_>) -> u16 {
    text.lines.len() as u16 + LEGEND_CHROME
}
