//! Mapping from accents and styled text to terminal styles

use gpuwatch_types::{Accent, Align, Segment, StyledText};
use ratatui::layout::Alignment;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};

/// Table title style
pub const TITLE_STYLE: Style = Style::new().fg(Color::Magenta).add_modifier(Modifier::BOLD);

/// Column header style
pub const HEADER_STYLE: Style = Style::new().fg(Color::Cyan).add_modifier(Modifier::BOLD);

/// Panel border color
pub const BORDER_COLOR: Color = Color::LightBlue;

/// Get the terminal color for an accent
pub fn accent_color(accent: Accent) -> Color {
    match accent {
        Accent::Cold => Color::LightBlue,
        Accent::Ok => Color::Green,
        Accent::Warning => Color::Yellow,
        Accent::Danger => Color::Red,
    }
}

fn segment_style(segment: &Segment) -> Style {
    match segment.accent {
        Some(accent) => Style::new().fg(accent_color(accent)),
        None => Style::new(),
    }
}

/// Get the ratatui alignment for a column alignment
pub fn alignment(align: Align) -> Alignment {
    match align {
        Align::Left => Alignment::Left,
        Align::Center => Alignment::Center,
        Align::Right => Alignment::Right,
    }
}

/// Convert styled cell text into ratatui text, one `Line` per `\n`
pub fn to_text(styled: &StyledText, align: Align) -> Text<'static> {
    let lines: Vec<Line<'static>> = styled
        .lines()
        .into_iter()
        .map(|segments| {
            Line::from(
                segments
                    .iter()
                    .map(|segment| Span::styled(segment.text.clone(), segment_style(segment)))
                    .collect::<Vec<_>>(),
            )
        })
        .collect();
    Text::from(lines).alignment(alignment(align))
}

/// Display width of the widest line in the styled text
pub fn text_width(styled: &StyledText) -> usize {
    styled
        .lines()
        .iter()
        .map(|segments| segments.iter().map(|s| s.text.chars().count()).sum::<usize>())
        .max()
        .unwrap_or(0)
}
