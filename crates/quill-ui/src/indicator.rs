//! The pulsing "press to continue" marker drawn after the last waiting line.

use std::f32::consts::TAU;

use quill_core::Rect;
use quill_text::{FontKey, TextLayout};
use tiny_skia::Pixmap;

use crate::canvas::Canvas;
use crate::theme::{IndicatorAlign, Theme, WaitIndicatorStyle};

/// End of the line the indicator follows, in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndicatorAnchor {
    pub x_end: i32,
    pub y_top: i32,
    pub line_height: i32,
}

/// Opacity of the indicator at `time` seconds.
pub fn pulse_alpha(style: &WaitIndicatorStyle, time: f32) -> u8 {
    let period = style.period.max(1e-6);
    let phase = (time / period).rem_euclid(1.0);
    let s = 0.5 * (1.0 + (TAU * phase).sin());
    let min = style.alpha_min as f32;
    let max = style.alpha_max as f32;
    (min + (max - min) * s).round().clamp(0.0, 255.0) as u8
}

struct Glyph {
    /// `None` when the typeface lacks the glyph.
    image: Option<Pixmap>,
    ascent: i32,
}

/// Renders the indicator glyph once and reuses it until the theme changes.
#[derive(Default)]
pub struct WaitIndicator {
    glyph: Option<Glyph>,
}

impl WaitIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn invalidate(&mut self) {
        self.glyph = None;
    }

    fn glyph(&mut self, theme: &Theme, layout: &TextLayout) -> &Glyph {
        self.glyph.get_or_insert_with(|| {
            let style = &theme.wait_indicator;
            let size = ((theme.font_size as f32 * style.scale.max(0.1)) as u32).max(8);
            let family = style.font_family.as_deref().or(theme.font_family.as_deref());
            let fonts = layout.fonts();
            let face = fonts.face(&FontKey::new(family, size));

            let image = if fonts.has_glyph(&face, style.glyph) {
                fonts.render(&face, &style.glyph.to_string(), theme.indicator_color())
            } else {
                tracing::debug!("Indicator glyph {:?} missing, drawing a triangle", style.glyph);
                None
            };
            Glyph {
                image,
                ascent: face.ascent(),
            }
        })
    }

    /// Draw at `anchor`, returning the covered rect.
    pub fn draw(
        &mut self,
        canvas: &mut Canvas,
        viewport: Rect<i32>,
        anchor: IndicatorAnchor,
        theme: &Theme,
        layout: &TextLayout,
        time: f32,
    ) -> Option<Rect<i32>> {
        let style = &theme.wait_indicator;
        if !style.enabled {
            return None;
        }
        let alpha = pulse_alpha(style, time);
        let text_ascent = layout.ascent();
        let glyph = self.glyph(theme, layout);

        match &glyph.image {
            Some(image) => {
                let (w, h) = (image.width() as i32, image.height() as i32);
                let mut x = anchor.x_end + style.offset_x;
                let mut y = match style.align {
                    IndicatorAlign::Baseline => {
                        anchor.y_top + text_ascent - glyph.ascent + style.offset_y
                    }
                    IndicatorAlign::Bottom => anchor.y_top + anchor.line_height - h - style.offset_y,
                };
                if x + w > viewport.right() {
                    x = viewport.right() - w;
                }
                if y < viewport.y {
                    y = viewport.y;
                }
                canvas.draw_image(image, x, y, alpha as f32 / 255.0);
                Some(Rect::new(x, y, w, h))
            }
            None => {
                let h = (anchor.line_height / 2).max(6);
                let w = ((h as f32 * 1.1) as i32).max(6);
                let mut x = anchor.x_end + style.offset_x;
                let y = anchor.y_top + anchor.line_height - h - style.offset_y;
                if x + w > viewport.right() {
                    x = viewport.right() - w;
                }
                let color = theme.indicator_color().fade(alpha as f32 / 255.0);
                let (fx, fy) = (x as f32, y as f32);
                canvas.fill_polygon(
                    &[
                        (fx, fy),
                        (fx + w as f32, fy),
                        (fx + (w / 2) as f32, fy + h as f32),
                    ],
                    color,
                );
                Some(Rect::new(x, y, w, h))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pulse_alpha_range() {
        let style = WaitIndicatorStyle::default();
        assert_eq!(pulse_alpha(&style, 0.0), 148);
        assert_eq!(pulse_alpha(&style, style.period * 0.25), 255);
        assert_eq!(pulse_alpha(&style, style.period * 0.75), 40);
        assert_eq!(pulse_alpha(&style, style.period * 1.25), 255);
    }

    #[test]
    fn test_pulse_alpha_zero_period() {
        let style = WaitIndicatorStyle {
            period: 0.0,
            ..WaitIndicatorStyle::default()
        };
        let alpha = pulse_alpha(&style, 3.7);
        assert!((40..=255).contains(&alpha));
    }
}
