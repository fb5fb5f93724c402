//! The dialogue box widget.
//!
//! [`TextBox`] ties the reveal queue, the layout cache, the scroll model and the choice
//! overlay into one update/draw/input cycle:
//!
//! ```text
//! update(dt) -> queue.advance -> choice.tick -> sync scroll metrics -> anchor to bottom
//! draw(canvas) -> background + lines + indicator -> scrollbar -> choice panel -> composite
//! ```
//!
//! Scrolling follows new lines while the reader stays at (or near) the bottom. Scrolling
//! up detaches the view until the reader returns to the bottom.

use std::sync::Arc;

use quill_core::Rect;
use quill_core::math::Vec2;
use quill_core::profiling::profile_function;
use quill_text::FontCache;

use crate::background::BackgroundProvider;
use crate::canvas::Canvas;
use crate::choice::ChoiceOverlay;
use crate::reveal::{Entry, EntryId, RevealParams, RevealQueue};
use crate::scroll::ScrollModel;
use crate::scrollbar::{draw_scrollbar, scrollbar_geometry};
use crate::theme::Theme;
use crate::view::{BackgroundBinding, TextView};

pub struct TextBox {
    rect: Rect<i32>,
    theme: Theme,
    opacity: f32,
    queue: RevealQueue,
    view: TextView,
    scroll: ScrollModel,
    choice: ChoiceOverlay,
    follow_bottom: bool,
    background: Option<(Arc<dyn BackgroundProvider>, String)>,
}

impl TextBox {
    pub fn new(rect: Rect<i32>, fonts: FontCache, theme: Theme, params: RevealParams) -> Self {
        Self {
            rect,
            view: TextView::new(fonts.clone(), theme.clone()),
            choice: ChoiceOverlay::new(fonts, theme.clone()),
            theme,
            opacity: 1.0,
            queue: RevealQueue::new(params),
            scroll: ScrollModel::default(),
            follow_bottom: true,
            background: None,
        }
    }

    // ---------- authoring ----------

    pub fn reveal_params(&self) -> &RevealParams {
        self.queue.params()
    }

    pub fn set_reveal_params(&mut self, params: RevealParams) {
        self.queue.set_params(params);
    }

    /// Replace all content with one settled line and scroll to the top.
    pub fn set_text(&mut self, text: &str) -> EntryId {
        let id = self.queue.set_text(text);
        self.scroll.to_top();
        id
    }

    pub fn clear(&mut self) {
        self.queue.clear();
        self.scroll.to_top();
    }

    /// Queue one line per line of `block`.
    pub fn queue_lines(&mut self, block: &str, wait_for_input: bool) -> Vec<EntryId> {
        self.queue.enqueue_text(block, wait_for_input)
    }

    pub fn append_line(&mut self, line: &str, animated: bool, wait_for_input: bool) -> EntryId {
        let id = self.queue.enqueue_line(line, animated, wait_for_input);
        if !(animated || wait_for_input) && self.near_bottom() {
            self.sync_scroll_metrics();
            self.scroll.to_bottom();
        }
        id
    }

    /// Add lines straight to the visible list.
    pub fn append_visible_lines<I, S>(&mut self, lines: I, animated: bool) -> Vec<EntryId>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let was_near_bottom = self.near_bottom();
        let ids = self.queue.enqueue_immediate(lines, animated);
        if was_near_bottom || self.follow_bottom {
            self.sync_scroll_metrics();
            self.scroll.to_bottom();
        }
        ids
    }

    /// Echo the player's pick into the transcript.
    pub fn append_player_choice(&mut self, text: &str) -> EntryId {
        let id = self.queue.enqueue_player_choice(text);
        if self.follow_bottom {
            self.sync_scroll_metrics();
            self.scroll.to_bottom();
        }
        id
    }

    /// Remove up to `n` of the oldest visible lines.
    pub fn trim_front(&mut self, n: usize) -> usize {
        let removed = self.queue.trim_front(n);
        if removed > 0 {
            self.sync_scroll_metrics();
            if self.follow_bottom {
                self.scroll.to_bottom();
            }
        }
        removed
    }

    pub fn visible_entries(&self) -> &[Entry] {
        self.queue.visible_entries()
    }

    pub fn pending_count(&self) -> usize {
        self.queue.pending_count()
    }

    /// No pending lines and the last line finished animating.
    pub fn is_settled(&self) -> bool {
        self.queue.is_settled()
    }

    // ---------- lifecycle ----------

    pub fn rect(&self) -> Rect<i32> {
        self.rect
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity.clamp(0.0, 1.0);
    }

    pub fn follow_bottom(&self) -> bool {
        self.follow_bottom
    }

    pub fn set_follow_bottom(&mut self, on: bool) {
        self.follow_bottom = on;
    }

    pub fn bind_background(&mut self, provider: Arc<dyn BackgroundProvider>, slot: impl Into<String>) {
        self.background = Some((provider, slot.into()));
    }

    pub fn unbind_background(&mut self) {
        self.background = None;
    }

    /// Move or resize the widget, keeping the reader's place.
    pub fn on_resize(&mut self, rect: Rect<i32>) {
        self.sync_scroll_metrics();
        let was_bottom = self.scroll.is_at_bottom();
        let ratio = self.scroll.ratio();

        self.rect = rect;
        let viewport = self.view.viewport_rect(rect);
        self.view.ensure_layout(viewport.width, self.queue.visible_entries());
        self.sync_scroll_metrics();

        if was_bottom {
            self.scroll.to_bottom();
        } else {
            self.scroll.set_ratio(ratio);
        }
        tracing::debug!(
            "Text box resized to {}x{} (bottom: {}, ratio: {:.3})",
            rect.width,
            rect.height,
            was_bottom,
            ratio
        );
    }

    pub fn set_theme(&mut self, theme: Theme) {
        tracing::debug!("Text box theme changed");
        self.view.set_theme(theme.clone());
        self.choice.set_theme(theme.clone());
        self.theme = theme;
        self.sync_scroll_metrics();
    }

    /// Advance animations and keep the view anchored.
    pub fn update(&mut self, dt: f32) {
        profile_function!();

        let flags = self.queue.advance(dt);
        self.view.update(dt);
        let choice_advanced = self.choice.tick(dt);
        self.sync_scroll_metrics();

        if flags.released || flags.animating || choice_advanced {
            let threshold = self.queue.params().stick_to_bottom_threshold_px;
            let anchor = self.follow_bottom
                || self.scroll.near_bottom(threshold)
                || (choice_advanced && self.choice.anchor_to_bottom());
            if anchor {
                self.scroll.to_bottom();
                self.follow_bottom = true;
            }
            tracing::trace!(
                "Anchoring: released={} animating={} choice={} -> {}",
                flags.released,
                flags.animating,
                choice_advanced,
                anchor
            );
        }
    }

    /// Click or confirm key: finish the current animation or release the next line.
    pub fn on_player_press(&mut self) -> bool {
        let changed = self.queue.on_player_input();
        if changed && (self.follow_bottom || self.near_bottom()) {
            self.sync_scroll_metrics();
            self.scroll.to_bottom();
        }
        changed
    }

    /// Release the next pending line immediately.
    pub fn advance_line_now(&mut self) -> bool {
        let changed = self.queue.advance_line_now();
        if changed && (self.follow_bottom || self.near_bottom()) {
            self.sync_scroll_metrics();
            self.scroll.to_bottom();
        }
        changed
    }

    // ---------- choices ----------

    /// Open the choice panel below the dialogue.
    pub fn show_choice_box(&mut self, labels: Vec<String>) {
        let was_near_bottom = self.near_bottom();
        self.choice.show(labels, was_near_bottom);
        self.sync_scroll_metrics();
        if was_near_bottom {
            self.scroll.to_bottom();
        }
    }

    pub fn hide_choice_box(&mut self) {
        self.choice.hide();
        self.sync_scroll_metrics();
    }

    pub fn choice_active(&self) -> bool {
        self.choice.is_active()
    }

    pub fn choice_overlay(&self) -> &ChoiceOverlay {
        &self.choice
    }

    pub fn choice_move_cursor(&mut self, delta: i32) {
        self.choice.move_selection(delta);
    }

    pub fn choice_selected_index(&self) -> Option<usize> {
        self.choice.selected()
    }

    /// Update the hovered row from a window-space pointer position.
    pub fn choice_hover_at(&mut self, window_pos: Vec2) {
        if !self.choice.is_active() {
            return;
        }
        let index = self.choice_row_at(window_pos, false);
        self.choice.set_hover(index);
    }

    /// The row whose text was clicked, if any.
    pub fn choice_click(&mut self, window_pos: Vec2) -> Option<usize> {
        let index = self.choice_row_at(window_pos, true)?;
        self.choice.set_hover(Some(index));
        Some(index)
    }

    fn choice_row_at(&mut self, window_pos: Vec2, strict: bool) -> Option<usize> {
        if !self.choice.is_active() {
            return None;
        }
        self.sync_scroll_metrics();
        let local = (
            window_pos.x.floor() as i32 - self.rect.x,
            window_pos.y.floor() as i32 - self.rect.y,
        );
        let viewport = self.view.viewport_rect(self.rect);
        let anchor = self.choice_anchor_y(viewport);
        self.choice.hit_test(viewport, anchor, local, strict)
    }

    /// Flow position directly below the last line, where the choice panel starts.
    fn choice_anchor_y(&self, viewport: Rect<i32>) -> i32 {
        let entries = self.queue.visible_entries();
        viewport.y - self.scroll.offset().round() as i32
            + self.view.content_height(entries)
            + self.queue.last_entry_anim_offset()
            + self.theme.choice_gap_above()
    }

    // ---------- scrolling ----------

    /// Scroll by `dy` pixels; positive values move towards the bottom.
    pub fn scroll(&mut self, dy: f32) {
        if dy == 0.0 {
            return;
        }
        self.sync_scroll_metrics();
        let was_bottom = self.scroll.is_at_bottom();
        self.scroll.scroll(dy);
        let at_bottom = self.scroll.is_at_bottom();
        if !at_bottom && (was_bottom || dy < 0.0) {
            self.follow_bottom = false;
        }
        if at_bottom {
            self.follow_bottom = true;
        }
    }

    pub fn scroll_offset(&self) -> f32 {
        self.scroll.offset()
    }

    pub fn scroll_model(&self) -> &ScrollModel {
        &self.scroll
    }

    pub fn max_scroll(&mut self) -> f32 {
        self.sync_scroll_metrics();
        self.scroll.max_offset()
    }

    pub fn scroll_to_top(&mut self) {
        self.scroll.to_top();
        self.follow_bottom = false;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.sync_scroll_metrics();
        self.scroll.to_bottom();
        self.follow_bottom = true;
    }

    pub fn is_at_top(&self) -> bool {
        self.scroll.is_at_top()
    }

    pub fn is_at_bottom(&self) -> bool {
        self.scroll.is_at_bottom()
    }

    /// Text area in widget-local coordinates.
    pub fn viewport_rect(&self) -> Rect<i32> {
        self.view.viewport_rect(self.rect)
    }

    pub fn viewport_height(&self) -> i32 {
        self.viewport_rect().height
    }

    fn near_bottom(&mut self) -> bool {
        self.sync_scroll_metrics();
        self.scroll
            .near_bottom(self.queue.params().stick_to_bottom_threshold_px)
    }

    /// Content height including the remaining slide of the last line and the choice panel.
    pub fn visual_content_height(&mut self) -> i32 {
        let viewport = self.view.viewport_rect(self.rect);
        self.view
            .ensure_layout(viewport.width, self.queue.visible_entries());
        let mut height = self.view.content_height(self.queue.visible_entries())
            + self.queue.last_entry_anim_offset();
        if self.choice.is_active() {
            height += self.theme.choice_gap_above() + self.choice.panel_height(viewport);
        }
        height
    }

    fn sync_scroll_metrics(&mut self) {
        let content = self.visual_content_height();
        let viewport = self.view.viewport_rect(self.rect);
        self.scroll.set_metrics(content, viewport.height);
        // Reaching the bottom by any route (trim, resize, shrink) re-attaches the view.
        if self.scroll.is_at_bottom() && !self.follow_bottom {
            tracing::trace!("View reached the bottom, following again");
            self.follow_bottom = true;
        }
    }

    // ---------- drawing ----------

    /// Render the widget into `target` at its rect.
    pub fn draw(&mut self, target: &mut Canvas) {
        profile_function!();
        if self.rect.is_empty() || self.opacity <= 0.0 || self.viewport_rect().is_empty() {
            return;
        }
        let mut layer = match Canvas::new(self.rect.width as u32, self.rect.height as u32) {
            Ok(layer) => layer,
            Err(err) => {
                tracing::warn!("Skipping text box draw: {}", err);
                return;
            }
        };

        self.sync_scroll_metrics();
        let viewport = self.view.viewport_rect(self.rect);

        let background = self.background.as_ref().map(|(provider, slot)| BackgroundBinding {
            provider: provider.as_ref(),
            slot: slot.as_str(),
        });
        self.view.draw_into(
            &mut layer,
            self.rect,
            self.queue.visible_entries(),
            self.scroll.offset(),
            background,
        );

        if let Some(geometry) = scrollbar_geometry(
            &self.theme,
            self.rect,
            viewport.height,
            self.scroll.content_height(),
            self.scroll.offset(),
            self.scroll.max_offset(),
        ) {
            draw_scrollbar(&mut layer, &self.theme, geometry);
        }

        if self.choice.is_active() {
            let anchor = self.choice_anchor_y(viewport);
            layer.set_clip(Some(viewport));
            self.choice.draw(&mut layer, viewport, anchor);
            layer.set_clip(None);
        }

        target.draw_canvas(&layer, self.rect.x, self.rect.y, self.opacity);
    }
}
