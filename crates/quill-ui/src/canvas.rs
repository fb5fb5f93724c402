//! A software drawing surface on top of a `tiny_skia` pixmap.
//!
//! All coordinates are integer pixels relative to the canvas origin. An optional
//! rectangular clip applies to every draw call.

use quill_core::{Color, Rect};
use quill_text::{TextError, TextResult};
use tiny_skia::{
    FillRule, FilterQuality, IntRect, Mask, Paint, Path, PathBuilder, Pixmap, PixmapPaint,
    Stroke, Transform,
};

struct Clip {
    rect: Rect<i32>,
    mask: Mask,
}

pub struct Canvas {
    pixmap: Pixmap,
    clip: Option<Clip>,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> TextResult<Self> {
        let pixmap =
            Pixmap::new(width, height).ok_or(TextError::PixmapAllocationFailed { width, height })?;
        Ok(Self::from_pixmap(pixmap))
    }

    pub fn from_pixmap(pixmap: Pixmap) -> Self {
        Self { pixmap, clip: None }
    }

    pub fn width(&self) -> i32 {
        self.pixmap.width() as i32
    }

    pub fn height(&self) -> i32 {
        self.pixmap.height() as i32
    }

    pub fn bounds(&self) -> Rect<i32> {
        Rect::new(0, 0, self.width(), self.height())
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub fn into_pixmap(self) -> Pixmap {
        self.pixmap
    }

    /// Fill the whole canvas, ignoring the clip.
    pub fn clear(&mut self, color: Color) {
        let [r, g, b, a] = color.to_rgba8();
        self.pixmap.fill(tiny_skia::Color::from_rgba8(r, g, b, a));
    }

    /// Restrict drawing to `rect`; `None` removes the clip.
    pub fn set_clip(&mut self, rect: Option<Rect<i32>>) {
        let Some(rect) = rect else {
            self.clip = None;
            return;
        };
        let Some(mut mask) = Mask::new(self.pixmap.width(), self.pixmap.height()) else {
            return;
        };
        let visible = rect.intersect(&self.bounds());
        if let Some(path) = visible.and_then(rect_path) {
            mask.fill_path(&path, FillRule::Winding, false, Transform::identity());
        }
        self.clip = Some(Clip {
            rect: visible.unwrap_or_default(),
            mask,
        });
    }

    pub fn clip_rect(&self) -> Option<Rect<i32>> {
        self.clip.as_ref().map(|clip| clip.rect)
    }

    pub fn fill_rect(&mut self, rect: Rect<i32>, color: Color) {
        let Some(area) = to_skia_rect(rect) else {
            return;
        };
        let paint = solid(color);
        let mask = self.clip.as_ref().map(|clip| &clip.mask);
        self.pixmap.fill_rect(area, &paint, Transform::identity(), mask);
    }

    pub fn fill_rounded_rect(&mut self, rect: Rect<i32>, radius: i32, color: Color) {
        let Some(path) = to_skia_rect(rect).and_then(|r| rounded_rect_path(r, radius as f32)) else {
            return;
        };
        let paint = solid(color);
        let mask = self.clip.as_ref().map(|clip| &clip.mask);
        self.pixmap
            .fill_path(&path, &paint, FillRule::Winding, Transform::identity(), mask);
    }

    /// Outline `rect` with a stroke centered half a pixel inside its edge.
    pub fn stroke_rounded_rect(&mut self, rect: Rect<i32>, radius: i32, width: f32, color: Color) {
        if rect.is_empty() || width <= 0.0 {
            return;
        }
        let half = width / 2.0;
        let Some(path) = tiny_skia::Rect::from_xywh(
            rect.x as f32 + half,
            rect.y as f32 + half,
            rect.width as f32 - width,
            rect.height as f32 - width,
        )
        .and_then(|r| rounded_rect_path(r, radius as f32 - half)) else {
            return;
        };
        let paint = solid(color);
        let stroke = Stroke {
            width,
            ..Stroke::default()
        };
        let mask = self.clip.as_ref().map(|clip| &clip.mask);
        self.pixmap
            .stroke_path(&path, &paint, &stroke, Transform::identity(), mask);
    }

    pub fn fill_polygon(&mut self, points: &[(f32, f32)], color: Color) {
        let Some((&(x0, y0), rest)) = points.split_first() else {
            return;
        };
        let mut pb = PathBuilder::new();
        pb.move_to(x0, y0);
        for &(x, y) in rest {
            pb.line_to(x, y);
        }
        pb.close();
        let Some(path) = pb.finish() else {
            return;
        };
        let paint = solid(color);
        let mask = self.clip.as_ref().map(|clip| &clip.mask);
        self.pixmap
            .fill_path(&path, &paint, FillRule::Winding, Transform::identity(), mask);
    }

    pub fn draw_image(&mut self, image: &Pixmap, x: i32, y: i32, opacity: f32) {
        if opacity <= 0.0 {
            return;
        }
        let paint = PixmapPaint {
            opacity: opacity.min(1.0),
            ..PixmapPaint::default()
        };
        let mask = self.clip.as_ref().map(|clip| &clip.mask);
        self.pixmap
            .draw_pixmap(x, y, image.as_ref(), &paint, Transform::identity(), mask);
    }

    /// Draw only the leftmost `visible_width` columns of `image`.
    pub fn draw_image_cropped(
        &mut self,
        image: &Pixmap,
        x: i32,
        y: i32,
        visible_width: i32,
        opacity: f32,
    ) {
        if visible_width <= 0 {
            return;
        }
        if visible_width as u32 >= image.width() {
            self.draw_image(image, x, y, opacity);
            return;
        }
        let cropped = IntRect::from_xywh(0, 0, visible_width as u32, image.height())
            .and_then(|area| image.clone_rect(area));
        if let Some(cropped) = cropped {
            self.draw_image(&cropped, x, y, opacity);
        }
    }

    pub fn draw_canvas(&mut self, other: &Canvas, x: i32, y: i32, opacity: f32) {
        self.draw_image(&other.pixmap, x, y, opacity);
    }

    /// Copy the pixels under `rect`, limited to the canvas bounds.
    pub fn capture(&self, rect: Rect<i32>) -> Option<Pixmap> {
        let area = rect.intersect(&self.bounds())?;
        let area = IntRect::from_xywh(area.x, area.y, area.width as u32, area.height as u32)?;
        self.pixmap.clone_rect(area)
    }

    /// Unpremultiplied color of one pixel.
    pub fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        if x < 0 || y < 0 {
            return None;
        }
        let px = self.pixmap.pixel(x as u32, y as u32)?.demultiply();
        Some(Color::from_rgba_u8(px.red(), px.green(), px.blue(), px.alpha()))
    }

    #[cfg(test)]
    pub(crate) fn has_mask(&self) -> bool {
        self.clip.is_some()
    }
}

fn solid(color: Color) -> Paint<'static> {
    let [r, g, b, a] = color.to_rgba8();
    let mut paint = Paint::default();
    paint.set_color_rgba8(r, g, b, a);
    paint.anti_alias = true;
    paint
}

fn to_skia_rect(rect: Rect<i32>) -> Option<tiny_skia::Rect> {
    if rect.is_empty() {
        return None;
    }
    tiny_skia::Rect::from_xywh(
        rect.x as f32,
        rect.y as f32,
        rect.width as f32,
        rect.height as f32,
    )
}

fn rect_path(rect: Rect<i32>) -> Option<Path> {
    to_skia_rect(rect).map(PathBuilder::from_rect)
}

/// Rectangle with quadratic corners of `radius`, clamped to half the shorter side.
pub fn rounded_rect_path(rect: tiny_skia::Rect, radius: f32) -> Option<Path> {
    let (x, y, w, h) = (rect.x(), rect.y(), rect.width(), rect.height());
    let r = radius.min(w / 2.0).min(h / 2.0);
    if r <= 0.0 {
        return Some(PathBuilder::from_rect(rect));
    }

    let mut pb = PathBuilder::new();
    pb.move_to(x + r, y);
    pb.line_to(x + w - r, y);
    pb.quad_to(x + w, y, x + w, y + r);
    pb.line_to(x + w, y + h - r);
    pb.quad_to(x + w, y + h, x + w - r, y + h);
    pb.line_to(x + r, y + h);
    pb.quad_to(x, y + h, x, y + h - r);
    pb.line_to(x, y + r);
    pb.quad_to(x, y, x + r, y);
    pb.close();
    pb.finish()
}

/// Keep only the parts of `pixmap` inside a rounded rectangle covering it.
pub fn apply_rounded_mask(pixmap: &mut Pixmap, radius: i32) {
    let Some(mut mask) = Mask::new(pixmap.width(), pixmap.height()) else {
        return;
    };
    let path = tiny_skia::Rect::from_xywh(0.0, 0.0, pixmap.width() as f32, pixmap.height() as f32)
        .and_then(|r| rounded_rect_path(r, radius as f32));
    if let Some(path) = path {
        mask.fill_path(&path, FillRule::Winding, true, Transform::identity());
        pixmap.apply_mask(&mask);
    }
}

/// Bilinear resize of `source` to `width` x `height`.
pub fn resample(source: &Pixmap, width: u32, height: u32) -> Option<Pixmap> {
    let mut target = Pixmap::new(width, height)?;
    let paint = PixmapPaint {
        quality: FilterQuality::Bilinear,
        ..PixmapPaint::default()
    };
    let transform = Transform::from_scale(
        width as f32 / source.width() as f32,
        height as f32 / source.height() as f32,
    );
    target.draw_pixmap(0, 0, source.as_ref(), &paint, transform, None);
    Some(target)
}

/// Cheap blur: shrink by `scale`, shrink further once per extra pass, then grow back.
///
/// Returns a copy of `source` when `scale` is outside `(0, 1)`.
pub fn downsample_blur(source: &Pixmap, scale: f32, passes: u32) -> Option<Pixmap> {
    if !(scale > 0.0 && scale < 1.0) {
        return Some(source.clone());
    }
    let (w, h) = (source.width(), source.height());
    let dw = ((w as f32 * scale) as u32).max(1);
    let dh = ((h as f32 * scale) as u32).max(1);

    let mut small = resample(source, dw, dh)?;
    for _ in 1..passes.max(1) {
        let sw = ((dw as f32 * 0.85) as u32).max(1);
        let sh = ((dh as f32 * 0.85) as u32).max(1);
        small = resample(&small, sw, sh)?;
    }
    resample(&small, w, h)
}
