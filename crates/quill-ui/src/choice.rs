//! The multiple-choice panel that follows the dialogue flow.
//!
//! The panel is anchored below the last dialogue line, slides up while it fades in,
//! and blurs whatever text scrolls underneath it. Drawing and hit testing share the
//! same geometry, including the intro slide, so a click always lands on the row that
//! is drawn under the pointer.

use quill_core::profiling::profile_function;
use quill_core::Rect;
use quill_text::{FontCache, LineImage, StyledText, TextLayout};

use crate::animation::{EasingFunction, progress};
use crate::canvas::{Canvas, apply_rounded_mask, downsample_blur};
use crate::theme::{ChoiceStyle, Theme};

#[derive(Debug, Clone)]
struct ChoiceRow {
    lines: Vec<LineImage>,
    widest: i32,
    height: i32,
}

#[derive(Debug, Clone)]
struct RowCache {
    wrap_width: i32,
    rows: Vec<ChoiceRow>,
}

/// Derived panel metrics for one viewport.
#[derive(Debug, Clone, Copy)]
struct PanelMetrics {
    inset: i32,
    text_x: i32,
    max_text_width: i32,
    panel_width: i32,
}

pub struct ChoiceOverlay {
    labels: Vec<String>,
    selected: Option<usize>,
    hover: Option<usize>,
    anim_elapsed: f32,
    anchor_to_bottom: bool,
    layout: TextLayout,
    theme: Theme,
    rows: Option<RowCache>,
}

impl ChoiceOverlay {
    pub fn new(fonts: FontCache, theme: Theme) -> Self {
        Self {
            labels: Vec::new(),
            selected: None,
            hover: None,
            anim_elapsed: 0.0,
            anchor_to_bottom: false,
            layout: TextLayout::new(fonts, theme.text_style()),
            theme,
            rows: None,
        }
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.layout.set_style(theme.text_style());
        self.theme = theme;
        self.rows = None;
    }

    /// Open the panel with `labels`, selecting the first one.
    pub fn show(&mut self, labels: Vec<String>, anchor_to_bottom: bool) {
        tracing::debug!("Showing {} choices", labels.len());
        self.selected = if labels.is_empty() { None } else { Some(0) };
        self.labels = labels;
        self.hover = None;
        self.anim_elapsed = 0.0;
        self.anchor_to_bottom = anchor_to_bottom;
        self.rows = None;
    }

    pub fn hide(&mut self) {
        self.labels.clear();
        self.selected = None;
        self.hover = None;
        self.anim_elapsed = 0.0;
        self.anchor_to_bottom = false;
        self.rows = None;
    }

    pub fn is_active(&self) -> bool {
        !self.labels.is_empty()
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn hover(&self) -> Option<usize> {
        self.hover
    }

    /// Whether the view was at the bottom when the panel opened.
    pub fn anchor_to_bottom(&self) -> bool {
        self.anchor_to_bottom
    }

    /// Move the selection by `delta` rows, wrapping around at both ends.
    pub fn move_selection(&mut self, delta: i32) {
        if self.labels.is_empty() {
            return;
        }
        let n = self.labels.len() as i64;
        let current = self.selected.map_or(-1, |i| i as i64);
        self.selected = Some((current + delta as i64).rem_euclid(n) as usize);
    }

    /// Set the hovered row; hovering a row also selects it.
    pub fn set_hover(&mut self, index: Option<usize>) {
        let index = index.filter(|&i| i < self.labels.len());
        self.hover = index;
        if index.is_some() {
            self.selected = index;
        }
    }

    /// Advance the intro animation, returning whether it moved.
    pub fn tick(&mut self, dt: f32) -> bool {
        let duration = self.theme.choice.intro_duration;
        if !self.is_active() || self.anim_elapsed >= duration {
            return false;
        }
        self.anim_elapsed = (self.anim_elapsed + dt.max(0.0)).min(duration);
        true
    }

    pub fn intro_progress(&self) -> f32 {
        progress(self.anim_elapsed, self.theme.choice.intro_duration)
    }

    pub fn is_animating(&self) -> bool {
        self.is_active() && self.intro_progress() < 1.0
    }

    /// Remaining upward slide of the panel in pixels.
    pub fn slide_offset(&self) -> i32 {
        let eased = EasingFunction::CubicOut.apply(self.intro_progress());
        ((1.0 - eased) * self.theme.choice.slide_px as f32) as i32
    }

    fn metrics(&self, viewport: Rect<i32>) -> PanelMetrics {
        let style = &self.theme.choice;
        let inset = style.inset;
        PanelMetrics {
            inset,
            text_x: viewport.x + inset + style.padding.left,
            max_text_width: (viewport.width - (inset * 2 + style.padding.horizontal())).max(0),
            panel_width: (viewport.width - inset * 2).max(0),
        }
    }

    fn ensure_rows(&mut self, max_text_width: i32) -> &[ChoiceRow] {
        let stale = self
            .rows
            .as_ref()
            .is_none_or(|cache| cache.wrap_width != max_text_width);
        if stale {
            let rows = self
                .labels
                .iter()
                .map(|label| self.build_row(label, max_text_width))
                .collect();
            self.rows = Some(RowCache {
                wrap_width: max_text_width,
                rows,
            });
        }
        self.rows.as_ref().map_or(&[][..], |cache| cache.rows.as_slice())
    }

    fn build_row(&self, label: &str, max_text_width: i32) -> ChoiceRow {
        let mut wrapped = self.layout.wrap(label, max_text_width);
        if wrapped.is_empty() {
            // Every row keeps at least one line so it stays clickable.
            wrapped.push(if max_text_width > 0 {
                String::new()
            } else {
                label.to_owned()
            });
        }
        let lines: Vec<LineImage> = wrapped
            .iter()
            .map(|line| {
                self.layout
                    .render_line(&StyledText::plain(line.as_str()), self.theme.text_color)
            })
            .collect();
        let padding = self.theme.choice.padding;
        ChoiceRow {
            widest: lines.iter().map(|l| l.width).max().unwrap_or(0),
            height: padding.top + self.layout.block_height(lines.len()) + padding.bottom,
            lines,
        }
    }

    fn rows_height(&self, rows: &[ChoiceRow]) -> i32 {
        if rows.is_empty() {
            return 0;
        }
        let gap = self.theme.line_spacing;
        rows.iter().map(|r| r.height).sum::<i32>() + gap * (rows.len() as i32 - 1)
    }

    /// Total height the panel occupies in the flow, including the inset above and below.
    pub fn panel_height(&mut self, viewport: Rect<i32>) -> i32 {
        if !self.is_active() {
            return 0;
        }
        let metrics = self.metrics(viewport);
        self.ensure_rows(metrics.max_text_width);
        let rows = self.rows.as_ref().map_or(&[][..], |c| c.rows.as_slice());
        metrics.inset * 2 + self.rows_height(rows)
    }

    /// Top edge of the first row for a flow anchor at `anchor_y`.
    fn panel_top(&self, anchor_y: i32) -> i32 {
        anchor_y + self.theme.choice.inset - self.slide_offset()
    }

    /// Row under `point` (widget-local), if any.
    ///
    /// In strict mode the point must also be within the row's text horizontally;
    /// otherwise anywhere across the row's height counts.
    pub fn hit_test(
        &mut self,
        viewport: Rect<i32>,
        anchor_y: i32,
        point: (i32, i32),
        strict: bool,
    ) -> Option<usize> {
        if !self.is_active() {
            return None;
        }
        let metrics = self.metrics(viewport);
        let top = self.panel_top(anchor_y);
        let gap = self.theme.line_spacing;
        let (px, py) = point;

        let rows = self.ensure_rows(metrics.max_text_width);
        let mut y = top;
        for (index, row) in rows.iter().enumerate() {
            if py >= y && py < y + row.height {
                if !strict {
                    return Some(index);
                }
                let text_right = metrics.text_x + row.widest.min(metrics.max_text_width);
                return (px >= metrics.text_x && px < text_right).then_some(index);
            }
            y += row.height + gap;
        }
        None
    }

    /// Draw the panel into `canvas` below the flow anchor `anchor_y`.
    pub fn draw(&mut self, canvas: &mut Canvas, viewport: Rect<i32>, anchor_y: i32) {
        profile_function!();
        if !self.is_active() {
            return;
        }

        let metrics = self.metrics(viewport);
        let top = self.panel_top(anchor_y);
        let fade = self.intro_progress();
        let radius = self.theme.choice_radius();
        let gap = self.theme.line_spacing;
        let style = self.theme.choice.clone();
        let text_color = self.theme.text_color;
        let border = self.theme.box_border;

        self.ensure_rows(metrics.max_text_width);
        let Some(cache) = self.rows.take() else {
            return;
        };
        let panel = Rect::new(
            viewport.x + metrics.inset,
            top,
            metrics.panel_width,
            self.rows_height(&cache.rows),
        );

        draw_backdrop(canvas, panel, viewport, radius, &style, fade);
        canvas.stroke_rounded_rect(panel, radius, 1.0, border.fade(fade));

        let line_gap = self.layout.style().line_spacing;
        let line_height = self.layout.line_height();
        let mut y = top;
        for (index, row) in cache.rows.iter().enumerate() {
            let mut line_y = y + style.padding.top;
            for line in &row.lines {
                if let Some(image) = &line.image {
                    canvas.draw_image(image, metrics.text_x, line_y, fade);
                }
                line_y += line_height + line_gap;
            }

            if self.selected == Some(index) {
                let width = row.widest.min(metrics.max_text_width);
                let thickness = style.underline_thickness;
                let underline_y = y + row.height - style.padding.bottom - thickness;
                if width > 0 && thickness > 0 {
                    canvas.fill_rect(
                        Rect::new(metrics.text_x, underline_y, width, thickness),
                        text_color.fade(fade),
                    );
                }
            }
            y += row.height + gap;
        }

        self.rows = Some(cache);
    }
}

/// Blur, tint and round the pixels under the visible part of `panel`.
fn draw_backdrop(
    canvas: &mut Canvas,
    panel: Rect<i32>,
    viewport: Rect<i32>,
    radius: i32,
    style: &ChoiceStyle,
    fade: f32,
) {
    let Some(area) = panel
        .intersect(&viewport)
        .and_then(|r| r.intersect(&canvas.bounds()))
    else {
        return;
    };
    let Some(snapshot) = canvas.capture(area) else {
        return;
    };
    let Some(blurred) = downsample_blur(&snapshot, style.blur_scale, style.blur_passes) else {
        return;
    };

    let mut backdrop = Canvas::from_pixmap(blurred);
    if let Some(tint) = style.tint {
        backdrop.fill_rect(backdrop.bounds(), tint);
    }
    let mut backdrop = backdrop.into_pixmap();
    apply_rounded_mask(&mut backdrop, radius);
    canvas.draw_image(&backdrop, area.x, area.y, fade);
}
