//! Word wrapping, measurement and line rendering.
//!
//! Wrapping is greedy on single spaces. A token wider than the wrap width is hard-split
//! by binary search on the widest fitting character prefix, so every chunk holds at least
//! one character. Explicit line breaks are hard boundaries and empty lines are kept.

use crate::cache::FontCache;
use crate::font::{FontFace, FontKey};
use crate::rich_text::{RunStyle, StyledText};
use quill_core::Color;
use quill_core::profiling::profile_function;
use std::ops::Range;
use tiny_skia::{Pixmap, PixmapPaint, Transform};

/// Byte ranges of each line, split on `\n` (a trailing `\r` is dropped).
///
/// Matches `str::lines`: a trailing newline does not start another line.
pub fn line_ranges(text: &str) -> Vec<Range<usize>> {
    let bytes = text.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0;
    let mut push = |start: usize, mut end: usize| {
        if end > start && bytes[end - 1] == b'\r' {
            end -= 1;
        }
        lines.push(start..end);
    };
    for (i, &b) in bytes.iter().enumerate() {
        if b == b'\n' {
            push(start, i);
            start = i + 1;
        }
    }
    if start < bytes.len() {
        push(start, bytes.len());
    }
    lines
}

fn word_ranges(text: &str, line: Range<usize>) -> impl Iterator<Item = Range<usize>> + '_ {
    text[line.clone()].split(' ').scan(line.start, |pos, word| {
        let start = *pos;
        *pos = start + word.len() + 1;
        Some(start..start + word.len())
    })
}

fn non_empty(range: Range<usize>) -> Option<Range<usize>> {
    (!range.is_empty()).then_some(range)
}

/// Split one token into chunks that each fit `width`, or hold a single character.
fn hard_split(
    text: &str,
    word: Range<usize>,
    width: i32,
    measure: &mut impl FnMut(Range<usize>) -> i32,
) -> Vec<Range<usize>> {
    let bounds: Vec<usize> = text[word.clone()]
        .char_indices()
        .map(|(i, _)| word.start + i)
        .chain(std::iter::once(word.end))
        .collect();
    let n = bounds.len() - 1;

    let mut parts = Vec::new();
    let mut i = 0;
    while i < n {
        let (mut lo, mut hi) = (1, n - i);
        let mut best = 1;
        while lo <= hi {
            let mid = (lo + hi) / 2;
            if measure(bounds[i]..bounds[i + mid]) <= width {
                best = mid;
                lo = mid + 1;
            } else {
                hi = mid - 1;
            }
        }
        parts.push(bounds[i]..bounds[i + best]);
        i += best;
    }
    parts
}

/// Greedy wrap of `text` to `width`, returning byte ranges of each output line.
///
/// `measure` receives byte ranges of `text`. Returns nothing for empty text or a
/// non-positive width.
pub fn wrap_ranges(
    text: &str,
    width: i32,
    mut measure: impl FnMut(Range<usize>) -> i32,
) -> Vec<Range<usize>> {
    profile_function!();

    if width <= 0 || text.is_empty() {
        return Vec::new();
    }

    let mut out = Vec::new();
    for line in line_ranges(text) {
        let mut cur: Option<Range<usize>> = None;
        let mut last_pos = line.start;
        for word in word_ranges(text, line) {
            last_pos = word.end;
            let candidate = match &cur {
                Some(cur) => cur.start..word.end,
                None => word.clone(),
            };
            if candidate.is_empty() || measure(candidate.clone()) <= width {
                cur = non_empty(candidate);
                continue;
            }

            if let Some(done) = cur.take() {
                out.push(done);
            }
            if word.is_empty() || measure(word.clone()) <= width {
                cur = non_empty(word);
            } else {
                let mut chunks = hard_split(text, word, width, &mut measure);
                cur = chunks.pop();
                out.extend(chunks);
            }
        }
        out.push(cur.unwrap_or(last_pos..last_pos));
    }
    out
}

/// Font, color and spacing used to lay out a block of text.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub font: FontKey,
    pub color: Color,
    /// Vertical gap between wrapped lines.
    pub line_spacing: i32,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font: FontKey::sans(22),
            color: Color::from_rgb_u8(237, 237, 237),
            line_spacing: 8,
        }
    }
}

/// A rendered line plus the data needed to clip it per character.
#[derive(Debug, Clone)]
pub struct LineImage {
    /// `None` for lines with no visible width.
    pub image: Option<Pixmap>,
    pub width: i32,
    pub height: i32,
    /// Width of the first `n` characters at index `n`.
    pub prefix_widths: Vec<i32>,
}

impl LineImage {
    pub fn char_count(&self) -> usize {
        self.prefix_widths.len().saturating_sub(1)
    }

    /// Width covered by the first `chars` characters.
    pub fn prefix_width(&self, chars: usize) -> i32 {
        let idx = chars.min(self.char_count());
        self.prefix_widths.get(idx).copied().unwrap_or(0)
    }
}

/// Wrap and render helper bound to one [`TextStyle`].
#[derive(Debug, Clone)]
pub struct TextLayout {
    fonts: FontCache,
    style: TextStyle,
    face: FontFace,
}

impl TextLayout {
    pub fn new(fonts: FontCache, style: TextStyle) -> Self {
        let face = fonts.face(&style.font);
        Self { fonts, style, face }
    }

    pub fn set_style(&mut self, style: TextStyle) {
        self.face = self.fonts.face(&style.font);
        self.style = style;
    }

    pub fn style(&self) -> &TextStyle {
        &self.style
    }

    pub fn fonts(&self) -> &FontCache {
        &self.fonts
    }

    /// Regular face of the base font.
    pub fn face(&self) -> &FontFace {
        &self.face
    }

    pub fn line_height(&self) -> i32 {
        self.face.line_height()
    }

    pub fn ascent(&self) -> i32 {
        self.face.ascent()
    }

    /// Stacked height of `lines` wrapped lines.
    pub fn block_height(&self, lines: usize) -> i32 {
        if lines == 0 {
            return 0;
        }
        let n = lines as i32;
        n * self.line_height() + (n - 1) * self.style.line_spacing
    }

    fn face_for(&self, run: RunStyle) -> FontFace {
        if run == RunStyle::default() {
            self.face.clone()
        } else {
            self.fonts.face(&self.style.font.for_run(run))
        }
    }

    /// Width of plain text in the regular face.
    pub fn measure(&self, text: &str) -> i32 {
        self.fonts.measure(&self.face, text)
    }

    /// Width of a byte range of styled text, each run in its own face.
    pub fn measure_styled(&self, text: &StyledText, range: Range<usize>) -> i32 {
        text.pieces(range)
            .map(|(piece, style)| self.fonts.measure(&self.face_for(style), piece))
            .sum()
    }

    /// Wrap plain text into line strings.
    pub fn wrap(&self, text: &str, width: i32) -> Vec<String> {
        wrap_ranges(text, width, |range| self.measure(&text[range]))
            .into_iter()
            .map(|range| text[range].to_owned())
            .collect()
    }

    /// Wrap styled text; ranges index into `text.text()`.
    pub fn wrap_styled(&self, text: &StyledText, width: i32) -> Vec<Range<usize>> {
        if text.is_plain() {
            let plain = text.text();
            return wrap_ranges(plain, width, |range| self.measure(&plain[range]));
        }
        wrap_ranges(text.text(), width, |range| self.measure_styled(text, range))
    }

    /// Render one already-wrapped line.
    pub fn render_line(&self, line: &StyledText, color: Color) -> LineImage {
        profile_function!();

        let height = self.line_height();
        let mut prefix_widths = vec![0];
        let mut pieces = Vec::new();
        let mut x = 0;
        for (piece, style) in line.pieces(0..line.text().len()) {
            let face = self.face_for(style);
            let widths = self.fonts.prefix_widths(&face, piece);
            prefix_widths.extend(widths.iter().skip(1).map(|w| x + w));
            let piece_width = self.fonts.measure(&face, piece);
            pieces.push((face, piece, x));
            x += piece_width;
        }
        let width = x.max(prefix_widths.last().copied().unwrap_or(0));

        let image = match pieces.as_slice() {
            [] => None,
            [(face, piece, _)] => self.fonts.render(face, piece, color),
            _ => self.compose(&pieces, width, height, color),
        };

        LineImage {
            image,
            width,
            height,
            prefix_widths,
        }
    }

    fn compose(
        &self,
        pieces: &[(FontFace, &str, i32)],
        width: i32,
        height: i32,
        color: Color,
    ) -> Option<Pixmap> {
        let mut line = Pixmap::new(width.max(1) as u32, height.max(1) as u32)?;
        for (face, piece, x) in pieces {
            if let Some(image) = self.fonts.render(face, piece, color) {
                line.draw_pixmap(
                    *x,
                    0,
                    image.as_ref(),
                    &PixmapPaint::default(),
                    Transform::identity(),
                    None,
                );
            }
        }
        Some(line)
    }
}
