//! Wrapped, rendered dialogue lines and their drawing.
//!
//! [`TextView`] keeps one [`EntryLayout`] per visible entry, built for the current
//! wrap width. A width or theme change drops every layout; otherwise only entries
//! the cache has not seen are laid out, and entries that left the queue are evicted.

use std::ops::Range;

use quill_core::Rect;
use quill_core::alloc::{HashMap, HashSet};
use quill_core::profiling::profile_function;
use quill_text::{FontCache, LineImage, StyledText, TextLayout};

use crate::background::BackgroundProvider;
use crate::canvas::Canvas;
use crate::indicator::{IndicatorAnchor, WaitIndicator};
use crate::reveal::{Entry, EntryId};
use crate::theme::Theme;

/// One wrapped line of an entry.
#[derive(Debug, Clone)]
pub struct LayoutLine {
    /// Byte range into the entry's plain text.
    pub range: Range<usize>,
    pub image: LineImage,
    /// Index of the line's first character among the entry's revealable characters.
    pub reveal_start: usize,
}

/// Cached layout of one entry.
#[derive(Debug, Clone, Default)]
pub struct EntryLayout {
    pub lines: Vec<LayoutLine>,
    /// Revealable characters in the entry (line breaks excluded).
    pub chars: usize,
    pub height: i32,
}

/// A background image slot bound to the view.
pub struct BackgroundBinding<'a> {
    pub provider: &'a dyn BackgroundProvider,
    pub slot: &'a str,
}

pub struct TextView {
    layout: TextLayout,
    theme: Theme,
    wrap_width: Option<i32>,
    cache: HashMap<EntryId, EntryLayout>,
    blink: f32,
    indicator: WaitIndicator,
    indicator_rect: Option<Rect<i32>>,
}

impl TextView {
    pub fn new(fonts: FontCache, theme: Theme) -> Self {
        Self {
            layout: TextLayout::new(fonts, theme.text_style()),
            theme,
            wrap_width: None,
            cache: HashMap::default(),
            blink: 0.0,
            indicator: WaitIndicator::new(),
            indicator_rect: None,
        }
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn text_layout(&self) -> &TextLayout {
        &self.layout
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.layout.set_style(theme.text_style());
        self.theme = theme;
        self.indicator.invalidate();
        self.invalidate_layout();
    }

    /// Advance the indicator pulse.
    pub fn update(&mut self, dt: f32) {
        self.blink += dt.max(0.0);
    }

    pub fn invalidate_layout(&mut self) {
        self.wrap_width = None;
        self.cache.clear();
    }

    pub fn wrap_width(&self) -> Option<i32> {
        self.wrap_width
    }

    pub fn cached(&self, id: EntryId) -> Option<&EntryLayout> {
        self.cache.get(&id)
    }

    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    /// Make sure every entry has a layout for `width`.
    pub fn ensure_layout(&mut self, width: i32, entries: &[Entry]) {
        if width <= 0 {
            self.wrap_width = Some(width);
            self.cache.clear();
            return;
        }

        if self.wrap_width != Some(width) {
            tracing::debug!(
                "Wrap width changed {:?} -> {}, relayout of {} entries",
                self.wrap_width,
                width,
                entries.len()
            );
            self.wrap_width = Some(width);
            self.cache.clear();
        } else if self.has_stale(entries) {
            let live: HashSet<EntryId> = entries.iter().map(Entry::id).collect();
            self.cache.retain(|id, _| live.contains(id));
        }

        for entry in entries {
            if !self.cache.contains_key(&entry.id()) {
                let layout = self.layout_entry(entry, width);
                self.cache.insert(entry.id(), layout);
            }
        }
    }

    /// Some cached layout belongs to an entry that is gone.
    fn has_stale(&self, entries: &[Entry]) -> bool {
        let live_cached = entries
            .iter()
            .filter(|e| self.cache.contains_key(&e.id()))
            .count();
        self.cache.len() > live_cached
    }

    fn layout_entry(&self, entry: &Entry, width: i32) -> EntryLayout {
        profile_function!();

        let styled = StyledText::parse(entry.text());
        let plain = styled.text();
        let color = if entry.is_player_choice() {
            self.theme.player_choice_color
        } else {
            self.theme.text_color
        };

        let lines: Vec<LayoutLine> = self
            .layout
            .wrap_styled(&styled, width)
            .into_iter()
            .map(|range| LayoutLine {
                reveal_start: revealable_chars(&plain[..range.start]),
                image: self.layout.render_line(&styled.slice(range.clone()), color),
                range,
            })
            .collect();

        EntryLayout {
            chars: revealable_chars(plain),
            height: self.layout.block_height(lines.len()),
            lines,
        }
    }

    /// Stacked height of the laid out entries with `entry_gap` between them.
    pub fn content_height(&self, entries: &[Entry]) -> i32 {
        if entries.is_empty() || self.wrap_width.is_none_or(|w| w <= 0) {
            return 0;
        }
        let heights: i32 = entries
            .iter()
            .filter_map(|e| self.cache.get(&e.id()))
            .map(|layout| layout.height)
            .sum();
        heights + self.theme.entry_gap * (entries.len() as i32 - 1)
    }

    /// The text area inside `widget_rect`, in widget-local coordinates.
    ///
    /// The scrollbar gutter is always reserved so wrapping does not change when the
    /// scrollbar appears.
    pub fn viewport_rect(&self, widget_rect: Rect<i32>) -> Rect<i32> {
        let padding = self.theme.padding;
        let gutter = self.theme.scrollbar.gutter();
        Rect::new(
            padding.left,
            padding.top,
            (widget_rect.width - (padding.horizontal() + gutter)).max(0),
            (widget_rect.height - padding.vertical()).max(0),
        )
    }

    /// Where the indicator was drawn last frame.
    pub fn indicator_rect(&self) -> Option<Rect<i32>> {
        self.indicator_rect
    }

    /// Draw the panel and every visible line into a widget-sized `canvas`.
    pub fn draw_into(
        &mut self,
        canvas: &mut Canvas,
        widget_rect: Rect<i32>,
        entries: &[Entry],
        scroll_offset: f32,
        background: Option<BackgroundBinding<'_>>,
    ) {
        profile_function!();
        self.indicator_rect = None;

        let full = widget_rect.at_origin();
        let radius = self.theme.border_radius;
        match background {
            Some(bg) if bg.provider.slot_has_image(bg.slot) => {
                bg.provider.draw_slot(bg.slot, canvas, full);
            }
            _ => canvas.fill_rounded_rect(full, radius, self.theme.box_background),
        }
        canvas.stroke_rounded_rect(full, radius, 1.0, self.theme.box_border);

        let viewport = self.viewport_rect(widget_rect);
        self.ensure_layout(viewport.width, entries);
        if viewport.is_empty() {
            return;
        }

        let previous_clip = canvas.clip_rect();
        canvas.set_clip(Some(viewport));

        let line_gap = self.theme.line_spacing;
        let mut y = viewport.y - scroll_offset.round() as i32;
        let mut anchor = None;
        let last_entry = entries.len().saturating_sub(1);

        for (i, entry) in entries.iter().enumerate() {
            let Some(layout) = self.cache.get(&entry.id()) else {
                continue;
            };
            let offset = entry.slide_offset();
            let alpha = entry.alpha();
            let shown = entry.chars_to_show();
            let last_line = layout.lines.len().saturating_sub(1);

            for (j, line) in layout.lines.iter().enumerate() {
                let h = line.image.height;
                let top = y + offset;

                if i == last_entry && j == last_line && entry.wait_for_input() && entry.is_settled()
                {
                    anchor = Some(IndicatorAnchor {
                        x_end: viewport.x + line.image.width,
                        y_top: top,
                        line_height: h,
                    });
                }

                if top + h >= viewport.y && top <= viewport.bottom() {
                    let visible_width = match shown {
                        None => line.image.width,
                        Some(shown) => line
                            .image
                            .prefix_width(shown.saturating_sub(line.reveal_start)),
                    };
                    if let Some(image) = &line.image.image {
                        canvas.draw_image_cropped(image, viewport.x, top, visible_width, alpha);
                    }
                }

                y += h;
                if j < last_line {
                    y += line_gap;
                }
            }

            if i < last_entry {
                y += self.theme.entry_gap;
            }
        }

        if let Some(anchor) = anchor {
            self.indicator_rect = self.indicator.draw(
                canvas,
                viewport,
                anchor,
                &self.theme,
                &self.layout,
                self.blink,
            );
        }

        canvas.set_clip(previous_clip);
    }
}

fn revealable_chars(text: &str) -> usize {
    text.chars().filter(|&c| c != '\n').count()
}
