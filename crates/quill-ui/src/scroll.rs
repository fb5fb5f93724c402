//! Vertical scroll state of the dialogue viewport.

const EDGE_EPSILON: f32 = 1e-3;

/// Content height versus viewport height with a clamped offset.
///
/// Every mutation clamps, so `offset` always lies in `0..=max_offset()`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollModel {
    content_height: i32,
    viewport_height: i32,
    offset: f32,
}

impl ScrollModel {
    pub fn new(content_height: i32, viewport_height: i32) -> Self {
        let mut model = Self::default();
        model.set_metrics(content_height, viewport_height);
        model
    }

    pub fn content_height(&self) -> i32 {
        self.content_height
    }

    pub fn viewport_height(&self) -> i32 {
        self.viewport_height
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn max_offset(&self) -> f32 {
        (self.content_height - self.viewport_height).max(0) as f32
    }

    pub fn clamp(&mut self) {
        self.offset = self.offset.clamp(0.0, self.max_offset());
    }

    pub fn set_metrics(&mut self, content_height: i32, viewport_height: i32) {
        self.content_height = content_height.max(0);
        self.viewport_height = viewport_height.max(0);
        self.clamp();
    }

    pub fn scroll(&mut self, delta: f32) {
        if delta.is_finite() {
            self.offset += delta;
        }
        self.clamp();
    }

    pub fn set_offset(&mut self, offset: f32) {
        if offset.is_finite() {
            self.offset = offset;
        }
        self.clamp();
    }

    pub fn to_top(&mut self) {
        self.offset = 0.0;
    }

    pub fn to_bottom(&mut self) {
        self.offset = self.max_offset();
    }

    /// Within `threshold` pixels of the bottom.
    pub fn near_bottom(&self, threshold: i32) -> bool {
        self.max_offset() - self.offset <= threshold.max(0) as f32
    }

    pub fn is_at_top(&self) -> bool {
        self.offset <= EDGE_EPSILON
    }

    pub fn is_at_bottom(&self) -> bool {
        self.max_offset() - self.offset <= EDGE_EPSILON
    }

    /// Offset as a fraction of the scroll range; 0 when nothing scrolls.
    pub fn ratio(&self) -> f32 {
        let max = self.max_offset();
        if max <= 0.0 { 0.0 } else { self.offset / max }
    }

    /// Move to `ratio` of the current scroll range.
    pub fn set_ratio(&mut self, ratio: f32) {
        self.set_offset(self.max_offset() * ratio.clamp(0.0, 1.0));
    }
}
