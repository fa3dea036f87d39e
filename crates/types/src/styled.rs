//! Styled text: plain strings with optional accent tags per segment.

use std::fmt;

use crate::tier::Accent;

/// A run of text with at most one accent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub accent: Option<Accent>,
}

impl Segment {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            accent: None,
        }
    }

    pub fn accented(text: impl Into<String>, accent: Accent) -> Self {
        Self {
            text: text.into(),
            accent: Some(accent),
        }
    }
}

/// Text made of segments; may span several lines via `\n`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyledText {
    segments: Vec<Segment>,
}

impl StyledText {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            segments: vec![Segment::plain(text)],
        }
    }

    pub fn accented(text: impl Into<String>, accent: Accent) -> Self {
        Self {
            segments: vec![Segment::accented(text, accent)],
        }
    }

    /// Append a segment (empty text is dropped)
    pub fn push(&mut self, segment: Segment) -> &mut Self {
        if !segment.text.is_empty() {
            self.segments.push(segment);
        }
        self
    }

    pub fn push_plain(&mut self, text: impl Into<String>) -> &mut Self {
        self.push(Segment::plain(text))
    }

    pub fn push_accented(&mut self, text: impl Into<String>, accent: Accent) -> &mut Self {
        self.push(Segment::accented(text, accent))
    }

    /// Append all segments of `other`
    pub fn extend(&mut self, other: StyledText) -> &mut Self {
        for segment in other.segments {
            self.push(segment);
        }
        self
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Text with all accents removed
    pub fn plain_text(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }

    /// Accents used anywhere in this text, in order of appearance
    pub fn accents(&self) -> Vec<Accent> {
        self.segments.iter().filter_map(|s| s.accent).collect()
    }

    /// Split into lines at `\n`, keeping each piece's accent
    pub fn lines(&self) -> Vec<Vec<Segment>> {
        let mut lines = vec![Vec::new()];
        for segment in &self.segments {
            let mut pieces = segment.text.split('\n');
            if let Some(first) = pieces.next() {
                if !first.is_empty() {
                    if let Some(line) = lines.last_mut() {
                        line.push(Segment {
                            text: first.to_string(),
                            accent: segment.accent,
                        });
                    }
                }
            }
            for piece in pieces {
                let mut line = Vec::new();
                if !piece.is_empty() {
                    line.push(Segment {
                        text: piece.to_string(),
                        accent: segment.accent,
                    });
                }
                lines.push(line);
            }
        }
        lines
    }

    pub fn line_count(&self) -> usize {
        1 + self
            .segments
            .iter()
            .map(|s| s.text.matches('\n').count())
            .sum::<usize>()
    }
}

impl fmt::Display for StyledText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            f.write_str(&segment.text)?;
        }
        Ok(())
    }
}

impl From<&str> for StyledText {
    fn from(text: &str) -> Self {
        StyledText::plain(text)
    }
}

impl From<String> for StyledText {
    fn from(text: String) -> Self {
        StyledText::plain(text)
    }
}
