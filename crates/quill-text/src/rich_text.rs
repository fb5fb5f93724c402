//! Minimal bold/italic run markup.
//!
//! Dialogue lines may contain `{b}…{/b}` and `{i}…{/i}`. Parsing strips the markers and
//! records style runs as byte ranges into the plain text. Any other brace sequence is
//! kept literally.
//!
//! ```
//! use quill_text::{RunStyle, StyledText};
//!
//! let styled = StyledText::parse("a {b}bold{/b} move");
//! assert_eq!(styled.text(), "a bold move");
//! assert_eq!(styled.runs()[1].style, RunStyle { bold: true, italic: false });
//! ```

use std::ops::Range;

/// Style flags carried by a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RunStyle {
    pub bold: bool,
    pub italic: bool,
}

/// A styled byte range of the plain text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledRun {
    pub range: Range<usize>,
    pub style: RunStyle,
}

/// Plain text plus its style runs. Runs are contiguous, non-empty and cover the text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StyledText {
    text: String,
    runs: Vec<StyledRun>,
}

const MARKERS: [(&str, Option<bool>, Option<bool>); 4] = [
    ("{b}", Some(true), None),
    ("{/b}", Some(false), None),
    ("{i}", None, Some(true)),
    ("{/i}", None, Some(false)),
];

impl StyledText {
    /// Unstyled text, no markup interpretation.
    pub fn plain(text: impl Into<String>) -> Self {
        let text = text.into();
        let runs = if text.is_empty() {
            Vec::new()
        } else {
            vec![StyledRun {
                range: 0..text.len(),
                style: RunStyle::default(),
            }]
        };
        Self { text, runs }
    }

    /// Parse `{b}`/`{i}` markup.
    pub fn parse(markup: &str) -> Self {
        if !markup.contains('{') {
            return Self::plain(markup);
        }

        let mut out = Self::default();
        let mut style = RunStyle::default();
        let mut rest = markup;
        while !rest.is_empty() {
            if let Some((marker, bold, italic)) =
                MARKERS.iter().find(|(marker, _, _)| rest.starts_with(marker))
            {
                if let Some(bold) = bold {
                    style.bold = *bold;
                }
                if let Some(italic) = italic {
                    style.italic = *italic;
                }
                rest = &rest[marker.len()..];
                continue;
            }

            let skip = rest.chars().next().map_or(0, char::len_utf8);
            let next = rest[skip..].find('{').map_or(rest.len(), |i| i + skip);
            out.push(&rest[..next], style);
            rest = &rest[next..];
        }
        out
    }

    /// Append text with a style, merging with the previous run when styles match.
    pub fn push(&mut self, text: &str, style: RunStyle) {
        if text.is_empty() {
            return;
        }
        let start = self.text.len();
        self.text.push_str(text);
        let end = self.text.len();
        match self.runs.last_mut() {
            Some(last) if last.style == style => last.range.end = end,
            _ => self.runs.push(StyledRun {
                range: start..end,
                style,
            }),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn runs(&self) -> &[StyledRun] {
        &self.runs
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// True when no run carries bold or italic.
    pub fn is_plain(&self) -> bool {
        self.runs.iter().all(|run| run.style == RunStyle::default())
    }

    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// Runs clipped to `range`, as `(text, style)` pieces in order.
    pub fn pieces(&self, range: Range<usize>) -> impl Iterator<Item = (&str, RunStyle)> + '_ {
        self.runs.iter().filter_map(move |run| {
            let start = run.range.start.max(range.start);
            let end = run.range.end.min(range.end);
            (start < end).then(|| (&self.text[start..end], run.style))
        })
    }

    /// Copy of a byte range with its runs rebased to zero.
    pub fn slice(&self, range: Range<usize>) -> StyledText {
        let mut out = StyledText::default();
        for (text, style) in self.pieces(range) {
            out.push(text, style);
        }
        out
    }
}
