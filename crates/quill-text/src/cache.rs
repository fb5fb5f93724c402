//! Glyph and metrics provider.
//!
//! [`FontCache`] resolves a [`FontKey`] to a [`FontFace`] handle once and memoizes
//! width measurements, so wrapping the same transcript at a new width mostly hits the cache.
//! The actual shaping and rasterization live behind [`FontBackend`].

use crate::font::{FaceId, FaceMetrics, FontFace, FontKey};
use quill_core::Color;
use quill_core::alloc::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tiny_skia::Pixmap;

/// Measurement memo entries kept before the memo is flushed.
const DEFAULT_MAX_WIDTHS: usize = 16 * 1024;

/// Source of font metrics, measurements and line images.
pub trait FontBackend: Send {
    /// Resolve `key` to a concrete face and report its vertical metrics.
    ///
    /// Unknown families must fall back to a default face rather than fail.
    fn load_face(&mut self, key: &FontKey) -> FaceMetrics;

    /// Advance width of `text` in whole pixels.
    fn measure(&mut self, key: &FontKey, text: &str) -> i32;

    /// Cumulative widths of every character prefix of `text`.
    ///
    /// The result has one entry per character plus a leading zero.
    fn prefix_widths(&mut self, key: &FontKey, text: &str) -> Vec<i32> {
        let mut widths = Vec::with_capacity(text.len() + 1);
        widths.push(0);
        let mut widest = 0;
        for (i, ch) in text.char_indices() {
            widest = widest.max(self.measure(key, &text[..i + ch.len_utf8()]));
            widths.push(widest);
        }
        widths
    }

    /// Whether the face selected by `key` itself contains a glyph for `ch`.
    fn has_glyph(&mut self, key: &FontKey, ch: char) -> bool;

    /// Rasterize `text` as one line, `measure(text)` wide and one line high.
    ///
    /// Returns `None` for text with no width.
    fn render(&mut self, key: &FontKey, text: &str, color: Color) -> Option<Pixmap>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct WidthKey {
    face: FaceId,
    text_hash: u64,
    text_len: usize,
}

struct CacheInner {
    backend: Box<dyn FontBackend>,
    faces: HashMap<FontKey, FontFace>,
    next_face: u32,
    widths: HashMap<WidthKey, i32>,
    max_widths: usize,
    hits: u64,
    misses: u64,
}

/// Snapshot of cache counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub faces: usize,
    pub widths: usize,
    pub hits: u64,
    pub misses: u64,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f32 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f32 / total as f32
        }
    }
}

/// Shared font cache handle. Clones share the same backend and memo tables.
#[derive(Clone)]
pub struct FontCache {
    inner: Arc<Mutex<CacheInner>>,
}

impl FontCache {
    /// Create a cache over any backend.
    pub fn new(backend: impl FontBackend + 'static) -> Self {
        Self {
            inner: Arc::new(Mutex::new(CacheInner {
                backend: Box::new(backend),
                faces: HashMap::new(),
                next_face: 0,
                widths: HashMap::with_capacity(256),
                max_widths: DEFAULT_MAX_WIDTHS,
                hits: 0,
                misses: 0,
            })),
        }
    }

    /// Create a cache backed by cosmic-text with system fonts loaded.
    pub fn with_system_fonts() -> Self {
        Self::new(crate::shaping::CosmicBackend::with_system_fonts())
    }

    fn lock(&self) -> MutexGuard<'_, CacheInner> {
        // The tables stay consistent across a panic mid-measure, so poisoning is ignored.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Resolve a key to its cached face handle.
    pub fn face(&self, key: &FontKey) -> FontFace {
        let mut inner = self.lock();
        if let Some(face) = inner.faces.get(key) {
            return face.clone();
        }

        let metrics = inner.backend.load_face(key);
        let face = FontFace {
            id: FaceId(inner.next_face),
            key: Arc::new(key.clone()),
            metrics,
        };
        inner.next_face += 1;
        tracing::debug!(
            "Loaded face {:?} for {:?} ({}px, line height {})",
            face.id,
            key.family,
            key.size,
            metrics.line_height
        );
        inner.faces.insert(key.clone(), face.clone());
        face
    }

    /// Width of `text` in whole pixels.
    pub fn measure(&self, face: &FontFace, text: &str) -> i32 {
        if text.is_empty() {
            return 0;
        }

        let key = WidthKey {
            face: face.id,
            text_hash: fxhash::hash64(text),
            text_len: text.len(),
        };

        let mut inner = self.lock();
        if let Some(&width) = inner.widths.get(&key) {
            inner.hits += 1;
            return width;
        }

        inner.misses += 1;
        let width = inner.backend.measure(&face.key, text);
        if inner.widths.len() >= inner.max_widths {
            inner.widths.clear();
        }
        inner.widths.insert(key, width);
        width
    }

    /// Cumulative prefix widths of `text` (one per character, plus a leading zero).
    pub fn prefix_widths(&self, face: &FontFace, text: &str) -> Vec<i32> {
        if text.is_empty() {
            return vec![0];
        }
        self.lock().backend.prefix_widths(&face.key, text)
    }

    pub fn has_glyph(&self, face: &FontFace, ch: char) -> bool {
        self.lock().backend.has_glyph(&face.key, ch)
    }

    /// Rasterize one line of text.
    pub fn render(&self, face: &FontFace, text: &str, color: Color) -> Option<Pixmap> {
        if text.is_empty() {
            return None;
        }
        self.lock().backend.render(&face.key, text, color)
    }

    /// Bound the measurement memo. Exceeding the bound flushes it.
    pub fn set_max_widths(&self, max: usize) {
        let mut inner = self.lock();
        inner.max_widths = max.max(1);
        if inner.widths.len() > inner.max_widths {
            inner.widths.clear();
        }
    }

    /// Drop every cached face and measurement (e.g. after fonts are reloaded).
    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.faces.clear();
        inner.widths.clear();
        inner.hits = 0;
        inner.misses = 0;
    }

    pub fn stats(&self) -> CacheStats {
        let inner = self.lock();
        CacheStats {
            faces: inner.faces.len(),
            widths: inner.widths.len(),
            hits: inner.hits,
            misses: inner.misses,
        }
    }
}

impl std::fmt::Debug for FontCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontCache").field("stats", &self.stats()).finish()
    }
}
