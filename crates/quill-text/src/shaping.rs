//! cosmic-text implementation of [`FontBackend`].
//!
//! Every call shapes a fresh single-line [`Buffer`]; results are memoized one level up
//! in [`FontCache`](crate::FontCache) and in the per-entry layout caches.

use crate::cache::FontBackend;
use crate::font::{FaceMetrics, FontDatabase, FontKey};
use cosmic_text::{Attrs, Buffer, Family, FontSystem, Metrics, Shaping, SwashCache, fontdb};
use quill_core::Color;
use quill_core::alloc::HashMap;
use quill_core::profiling::profile_function;
use tiny_skia::{Pixmap, PremultipliedColorU8};

/// Line box height used for a given pixel size.
pub fn line_height_for(size: u32) -> i32 {
    (size as f32 * 1.25).ceil() as i32
}

/// Font backend that shapes with cosmic-text and rasterizes with swash.
pub struct CosmicBackend {
    font_system: FontSystem,
    swash_cache: SwashCache,
    known_families: HashMap<String, bool>,
}

impl CosmicBackend {
    /// Create a backend over the given font database.
    pub fn new(db: FontDatabase) -> Self {
        let font_system = FontSystem::new_with_locale_and_db(
            sys_locale::get_locale().unwrap_or_else(|| String::from("en-US")),
            db.inner,
        );
        Self {
            font_system,
            swash_cache: SwashCache::new(),
            known_families: HashMap::new(),
        }
    }

    /// Create a backend with system fonts.
    pub fn with_system_fonts() -> Self {
        Self::new(FontDatabase::new())
    }

    /// Whether `family` exists; a miss is logged once and then remembered.
    fn family_available(&mut self, family: &str) -> bool {
        if let Some(&known) = self.known_families.get(family) {
            return known;
        }
        let available = self
            .font_system
            .db()
            .faces()
            .any(|face| face.families.iter().any(|(name, _)| name == family));
        if !available {
            tracing::warn!(
                "Font family '{}' is not available, falling back to sans-serif",
                family
            );
        }
        self.known_families.insert(family.to_owned(), available);
        available
    }

    fn resolved_family<'a>(&mut self, key: &'a FontKey) -> Option<&'a str> {
        match key.family.as_deref() {
            Some(name) if self.family_available(name) => Some(name),
            _ => None,
        }
    }

    fn shape(&mut self, key: &FontKey, text: &str) -> Buffer {
        profile_function!();

        let family = match self.resolved_family(key) {
            Some(name) => Family::Name(name),
            None => Family::SansSerif,
        };
        let attrs = Attrs::new()
            .family(family)
            .weight(key.weight.to_cosmic())
            .style(key.style.to_cosmic());

        let metrics = Metrics::new(key.size as f32, line_height_for(key.size) as f32);
        let mut buffer = Buffer::new(&mut self.font_system, metrics);
        buffer.set_size(&mut self.font_system, None, None);
        buffer.set_text(&mut self.font_system, text, attrs, Shaping::Advanced);
        buffer.shape_until_scroll(&mut self.font_system, false);
        buffer
    }
}

fn buffer_width(buffer: &Buffer) -> i32 {
    buffer
        .layout_runs()
        .map(|run| run.line_w)
        .fold(0.0_f32, f32::max)
        .ceil() as i32
}

impl FontBackend for CosmicBackend {
    fn load_face(&mut self, key: &FontKey) -> FaceMetrics {
        let line_height = line_height_for(key.size);
        let buffer = self.shape(key, "Ag");
        let ascent = buffer
            .layout_runs()
            .next()
            .map(|run| (run.line_y - run.line_top).round() as i32)
            .unwrap_or_else(|| (key.size as f32 * 0.8).round() as i32)
            .clamp(0, line_height);
        FaceMetrics {
            ascent,
            descent: line_height - ascent,
            line_height,
        }
    }

    fn measure(&mut self, key: &FontKey, text: &str) -> i32 {
        if text.is_empty() {
            return 0;
        }
        let buffer = self.shape(key, text);
        buffer_width(&buffer)
    }

    fn prefix_widths(&mut self, key: &FontKey, text: &str) -> Vec<i32> {
        let buffer = self.shape(key, text);
        let mut ends: Vec<(usize, f32)> = buffer
            .layout_runs()
            .flat_map(|run| run.glyphs.iter().map(|glyph| (glyph.end, glyph.x + glyph.w)))
            .collect();
        ends.sort_by_key(|(end, _)| *end);

        let mut widths = Vec::with_capacity(text.len() + 1);
        widths.push(0);
        let mut widest = 0.0_f32;
        let mut next = 0;
        for (i, ch) in text.char_indices() {
            let boundary = i + ch.len_utf8();
            while next < ends.len() && ends[next].0 <= boundary {
                widest = widest.max(ends[next].1);
                next += 1;
            }
            widths.push(widest.ceil() as i32);
        }
        widths
    }

    fn has_glyph(&mut self, key: &FontKey, ch: char) -> bool {
        let family = match self.resolved_family(key) {
            Some(name) => fontdb::Family::Name(name),
            None => fontdb::Family::SansSerif,
        };
        let families = [family];
        let query = fontdb::Query {
            families: &families,
            weight: key.weight.to_cosmic(),
            stretch: fontdb::Stretch::Normal,
            style: key.style.to_cosmic(),
        };

        let db = self.font_system.db();
        let Some(id) = db.query(&query) else {
            return false;
        };
        db.with_face_data(id, |data, index| {
            ttf_parser::Face::parse(data, index)
                .ok()
                .and_then(|face| face.glyph_index(ch))
                .is_some()
        })
        .unwrap_or(false)
    }

    fn render(&mut self, key: &FontKey, text: &str, color: Color) -> Option<Pixmap> {
        profile_function!();

        let buffer = self.shape(key, text);
        let width = buffer_width(&buffer);
        if width <= 0 {
            return None;
        }
        let mut pixmap = Pixmap::new(width as u32, line_height_for(key.size) as u32)?;
        let (w, h) = (pixmap.width() as i32, pixmap.height() as i32);

        let [r, g, b, a] = color.to_rgba8();
        let text_color = cosmic_text::Color::rgba(r, g, b, a);
        let pixels = pixmap.pixels_mut();
        buffer.draw(
            &mut self.font_system,
            &mut self.swash_cache,
            text_color,
            |x, y, cw, ch, c| {
                if c.a() == 0 {
                    return;
                }
                for py in y.max(0)..(y + ch as i32).min(h) {
                    for px in x.max(0)..(x + cw as i32).min(w) {
                        let idx = (py * w + px) as usize;
                        blend_over(&mut pixels[idx], c);
                    }
                }
            },
        );
        Some(pixmap)
    }
}

/// Source-over blend of a straight-alpha color onto a premultiplied pixel.
fn blend_over(dst: &mut PremultipliedColorU8, src: cosmic_text::Color) {
    let a = src.a() as u32;
    let inv = 255 - a;
    let mix = |s: u8, d: u8| ((s as u32 * a + d as u32 * inv + 127) / 255) as u8;
    let blended = PremultipliedColorU8::from_rgba(
        mix(src.r(), dst.red()),
        mix(src.g(), dst.green()),
        mix(src.b(), dst.blue()),
        mix(255, dst.alpha()),
    );
    if let Some(color) = blended {
        *dst = color;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_height_rounds_up() {
        assert_eq!(line_height_for(16), 20);
        assert_eq!(line_height_for(22), 28);
    }

    #[test]
    fn test_blend_over_transparent_pixel() {
        let mut px = PremultipliedColorU8::TRANSPARENT;
        blend_over(&mut px, cosmic_text::Color::rgba(255, 255, 255, 128));
        assert_eq!(px.alpha(), 128);
        assert!(px.red() <= px.alpha());
    }

    #[test]
    fn test_measure_with_system_fonts() {
        let mut backend = CosmicBackend::with_system_fonts();
        if backend.font_system.db().is_empty() {
            return;
        }
        let key = FontKey::sans(16);
        let short = backend.measure(&key, "Hi");
        let long = backend.measure(&key, "Hi there");
        assert!(long > short);
        let prefix = backend.prefix_widths(&key, "Hi there");
        assert_eq!(prefix.len(), "Hi there".chars().count() + 1);
        assert!(prefix.windows(2).all(|w| w[0] <= w[1]));
    }
}
