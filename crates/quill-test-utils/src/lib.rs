//! Test utilities for the Quill dialogue engine.
//!
//! Layout and scroll behavior depends on font metrics, and system fonts differ between
//! machines. [`MonoFonts`] is a deterministic [`FontBackend`] with fixed advances so tests
//! can assert exact pixel values without any font files.
//!
//! # Metrics
//!
//! For a face of `size` pixels:
//!
//! | metric      | value                         |
//! |-------------|-------------------------------|
//! | advance     | `size / 2` (+1 when bold)     |
//! | wide chars  | twice the advance             |
//! | line height | `size + size / 4`             |
//! | ascent      | `size`                        |
//!
//! # Example
//!
//! ```rust
//! use quill_test_utils::MonoFonts;
//! use quill_text::{FontKey, TextLayout, TextStyle};
//!
//! let fonts = MonoFonts::new();
//! let layout = TextLayout::new(fonts.cache(), TextStyle {
//!     font: FontKey::sans(16),
//!     ..TextStyle::default()
//! });
//! assert_eq!(layout.measure("abcd"), 32);
//! assert_eq!(layout.line_height(), 20);
//! ```

use parking_lot::Mutex;
use quill_core::Color;
use quill_text::{FaceMetrics, FontBackend, FontCache, FontKey, FontWeight};
use std::sync::Arc;
use tiny_skia::{Paint, Pixmap, Rect, Transform};

/// Records a backend call for verification in tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontCall {
    LoadFace { size: u32 },
    Measure { text: String },
    Render { text: String },
    HasGlyph { ch: char },
}

/// Fixed-advance font backend.
///
/// Clones share the same call log, so a test can keep one handle while the
/// [`FontCache`] owns another.
#[derive(Debug, Clone, Default)]
pub struct MonoFonts {
    missing: Vec<char>,
    wide: Vec<char>,
    calls: Arc<Mutex<Vec<FontCall>>>,
}

impl MonoFonts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report these characters as absent from every face.
    pub fn with_missing(mut self, chars: &str) -> Self {
        self.missing.extend(chars.chars());
        self
    }

    /// Give these characters a double advance.
    pub fn with_wide(mut self, chars: &str) -> Self {
        self.wide.extend(chars.chars());
        self
    }

    /// A [`FontCache`] over a clone of this backend.
    pub fn cache(&self) -> FontCache {
        FontCache::new(self.clone())
    }

    pub fn advance(key: &FontKey) -> i32 {
        let base = (key.size / 2) as i32;
        if key.weight == FontWeight::Bold {
            base + 1
        } else {
            base
        }
    }

    pub fn line_height(size: u32) -> i32 {
        (size + size / 4) as i32
    }

    pub fn char_width(&self, key: &FontKey, ch: char) -> i32 {
        let advance = Self::advance(key);
        if self.wide.contains(&ch) {
            advance * 2
        } else {
            advance
        }
    }

    fn width(&self, key: &FontKey, text: &str) -> i32 {
        text.chars().map(|ch| self.char_width(key, ch)).sum()
    }

    fn record(&self, call: FontCall) {
        self.calls.lock().push(call);
    }

    /// Every recorded call, oldest first.
    pub fn calls(&self) -> Vec<FontCall> {
        self.calls.lock().clone()
    }

    pub fn count_renders(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| matches!(call, FontCall::Render { .. }))
            .count()
    }

    pub fn count_measures(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| matches!(call, FontCall::Measure { .. }))
            .count()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }
}

impl FontBackend for MonoFonts {
    fn load_face(&mut self, key: &FontKey) -> FaceMetrics {
        self.record(FontCall::LoadFace { size: key.size });
        let line_height = Self::line_height(key.size);
        let ascent = key.size as i32;
        FaceMetrics {
            ascent,
            descent: line_height - ascent,
            line_height,
        }
    }

    fn measure(&mut self, key: &FontKey, text: &str) -> i32 {
        self.record(FontCall::Measure {
            text: text.to_owned(),
        });
        self.width(key, text)
    }

    fn prefix_widths(&mut self, key: &FontKey, text: &str) -> Vec<i32> {
        let mut widths = vec![0];
        let mut x = 0;
        for ch in text.chars() {
            x += self.char_width(key, ch);
            widths.push(x);
        }
        widths
    }

    fn has_glyph(&mut self, _key: &FontKey, ch: char) -> bool {
        self.record(FontCall::HasGlyph { ch });
        !self.missing.contains(&ch)
    }

    fn render(&mut self, key: &FontKey, text: &str, color: Color) -> Option<Pixmap> {
        self.record(FontCall::Render {
            text: text.to_owned(),
        });
        let width = self.width(key, text);
        let height = Self::line_height(key.size);
        let mut pixmap = Pixmap::new(width.max(0) as u32, height as u32)?;

        let [r, g, b, a] = color.to_rgba8();
        let mut paint = Paint::default();
        paint.set_color_rgba8(r, g, b, a);

        // Each visible character is a solid box from the cap line to the baseline.
        let top = (key.size / 4) as f32;
        let mut x = 0;
        for ch in text.chars() {
            let advance = self.char_width(key, ch);
            if !ch.is_whitespace() && advance > 2 {
                if let Some(rect) =
                    Rect::from_xywh(x as f32 + 1.0, top, advance as f32 - 2.0, key.size as f32 - top)
                {
                    pixmap.fill_rect(rect, &paint, Transform::identity(), None);
                }
            }
            x += advance;
        }
        Some(pixmap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_text::FontKey;

    #[test]
    fn test_mono_metrics() {
        let cache = MonoFonts::new().cache();
        let face = cache.face(&FontKey::sans(16));
        assert_eq!(face.line_height(), 20);
        assert_eq!(face.ascent(), 16);
        assert_eq!(cache.measure(&face, "hello"), 40);
    }

    #[test]
    fn test_bold_is_wider() {
        let cache = MonoFonts::new().cache();
        let bold = cache.face(&FontKey::sans(16).with_weight(FontWeight::Bold));
        assert_eq!(cache.measure(&bold, "ab"), 18);
    }

    #[test]
    fn test_measure_is_memoized() {
        let fonts = MonoFonts::new();
        let cache = fonts.cache();
        let face = cache.face(&FontKey::sans(16));
        cache.measure(&face, "same");
        cache.measure(&face, "same");
        assert_eq!(fonts.count_measures(), 1);
        assert_eq!(cache.stats().hits, 1);
    }

    #[test]
    fn test_render_size() {
        let cache = MonoFonts::new().cache();
        let face = cache.face(&FontKey::sans(16));
        let image = cache.render(&face, "ab c", Color::WHITE).unwrap();
        assert_eq!((image.width(), image.height()), (32, 20));
        assert!(cache.render(&face, "", Color::WHITE).is_none());
    }

    #[test]
    fn test_missing_glyphs() {
        let cache = MonoFonts::new().with_missing("▼").cache();
        let face = cache.face(&FontKey::sans(16));
        assert!(!cache.has_glyph(&face, '▼'));
        assert!(cache.has_glyph(&face, 'a'));
    }
}
