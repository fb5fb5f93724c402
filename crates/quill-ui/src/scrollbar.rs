//! Vertical scrollbar in the right padding gutter.

use quill_core::Rect;

use crate::canvas::Canvas;
use crate::theme::Theme;

/// Track and thumb rectangles in widget-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollbarGeometry {
    pub track: Rect<i32>,
    pub thumb: Rect<i32>,
}

/// Where the scrollbar goes for a widget of `widget_size`, or `None` when it is hidden.
pub fn scrollbar_geometry(
    theme: &Theme,
    widget_size: Rect<i32>,
    viewport_height: i32,
    content_height: i32,
    offset: f32,
    max_offset: f32,
) -> Option<ScrollbarGeometry> {
    let style = &theme.scrollbar;
    let padding = theme.padding;
    let track_x = widget_size.width - padding.right - style.margin - style.width;
    let track_y = padding.top;
    let track_h = widget_size.height - padding.vertical();
    if track_h <= 0 || style.width <= 0 {
        return None;
    }

    let overflow = content_height > viewport_height;
    if !overflow && !style.show_when_no_overflow {
        return None;
    }

    let (thumb_y, thumb_h) = if overflow {
        let ratio = (viewport_height as f32 / content_height.max(1) as f32).clamp(0.0, 1.0);
        let thumb_h = style.min_thumb.max((track_h as f32 * ratio) as i32);
        let position = offset / max_offset.max(1e-6);
        let free = (track_h - thumb_h).max(0);
        (track_y + (free as f32 * position) as i32, thumb_h)
    } else {
        (track_y, track_h)
    };

    Some(ScrollbarGeometry {
        track: Rect::new(track_x, track_y, style.width, track_h),
        thumb: Rect::new(track_x, thumb_y, style.width, thumb_h),
    })
}

pub fn draw_scrollbar(canvas: &mut Canvas, theme: &Theme, geometry: ScrollbarGeometry) {
    let style = &theme.scrollbar;
    canvas.fill_rounded_rect(geometry.track, style.radius, style.track_color);
    canvas.fill_rounded_rect(geometry.thumb, style.radius, style.thumb_color);
}
