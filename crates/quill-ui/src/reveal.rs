//! The dialogue queue and its reveal timing.
//!
//! Lines wait in a pending FIFO and move to the visible list one at a time, either
//! after `per_line_delay` once the previous line has finished animating, or on player
//! input for lines that are gated on it. Visible entries then animate in by sliding
//! and fading, or by typing out character by character.

use std::collections::VecDeque;

use quill_text::StyledText;

use crate::animation::{EasingFunction, progress};
use crate::typewriter::{chars_to_show, reveal_curve};

const SETTLE_EPSILON: f32 = 1e-4;

/// Stable handle of an entry; never reused within one queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(u64);

impl EntryId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// How animated entries appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RevealMode {
    /// Slide up and fade in as a whole line.
    #[default]
    SlideFade,
    /// Type out one character at a time with punctuation pauses.
    Typewriter,
}

/// Timing of the reveal queue.
#[derive(Debug, Clone, PartialEq)]
pub struct RevealParams {
    /// Delay before an automatic release once the previous line settled.
    pub per_line_delay: f32,
    pub intro_duration: f32,
    pub intro_offset_px: i32,
    /// Distance from the bottom within which the view keeps following new lines.
    pub stick_to_bottom_threshold_px: i32,
    pub chars_per_sec: f32,
    /// Pause after `,` `;` `:`.
    pub pause_short: f32,
    /// Pause after `.` `!` `?` and line breaks.
    pub pause_long: f32,
    /// Pause inside `...`.
    pub pause_ellipsis: f32,
    pub mode: RevealMode,
}

impl Default for RevealParams {
    fn default() -> Self {
        Self {
            per_line_delay: 0.15,
            intro_duration: 0.18,
            intro_offset_px: 10,
            stick_to_bottom_threshold_px: 24,
            chars_per_sec: 45.0,
            pause_short: 0.06,
            pause_long: 0.25,
            pause_ellipsis: 0.35,
            mode: RevealMode::SlideFade,
        }
    }
}

impl RevealParams {
    pub fn typewriter() -> Self {
        Self {
            mode: RevealMode::Typewriter,
            ..Self::default()
        }
    }
}

/// One logical line of dialogue.
#[derive(Debug, Clone)]
pub struct Entry {
    id: EntryId,
    text: String,
    elapsed: f32,
    duration: f32,
    intro_offset_px: i32,
    visible: bool,
    wait_for_input: bool,
    reveal_curve: Option<Vec<f32>>,
    is_player_choice: bool,
}

impl Entry {
    pub fn id(&self) -> EntryId {
        self.id
    }

    /// Source text, possibly with `{b}`/`{i}` markers.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn intro_offset_px(&self) -> i32 {
        self.intro_offset_px
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn wait_for_input(&self) -> bool {
        self.wait_for_input
    }

    pub fn reveal_curve(&self) -> Option<&[f32]> {
        self.reveal_curve.as_deref()
    }

    pub fn is_player_choice(&self) -> bool {
        self.is_player_choice
    }

    pub fn is_settled(&self) -> bool {
        self.elapsed >= self.duration - SETTLE_EPSILON
    }

    pub fn is_animating(&self) -> bool {
        !self.is_settled()
    }

    /// Linear animation progress in `0..=1`.
    pub fn progress(&self) -> f32 {
        progress(self.elapsed, self.duration)
    }

    fn eased(&self) -> f32 {
        EasingFunction::CubicOut.apply(self.progress())
    }

    /// Opacity of the entry; typed entries are drawn opaque.
    pub fn alpha(&self) -> f32 {
        if self.reveal_curve.is_some() {
            1.0
        } else {
            self.eased()
        }
    }

    /// Current downward slide in pixels.
    pub fn slide_offset(&self) -> i32 {
        ((1.0 - self.eased()) * self.intro_offset_px as f32) as i32
    }

    /// Characters revealed so far, `None` when the whole line is shown at once.
    pub fn chars_to_show(&self) -> Option<usize> {
        self.reveal_curve
            .as_deref()
            .map(|curve| chars_to_show(curve, self.elapsed, self.duration))
    }

    fn settle(&mut self) {
        self.elapsed = self.duration;
    }
}

/// What happened during one [`RevealQueue::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AdvanceFlags {
    /// A pending line became visible.
    pub released: bool,
    /// At least one visible entry moved its animation forward.
    pub animating: bool,
}

/// Ordered visible entries plus a FIFO of pending ones.
#[derive(Debug, Default)]
pub struct RevealQueue {
    params: RevealParams,
    visible: Vec<Entry>,
    pending: VecDeque<Entry>,
    release_timer: f32,
    next_id: u64,
}

impl RevealQueue {
    pub fn new(params: RevealParams) -> Self {
        Self {
            params,
            ..Self::default()
        }
    }

    pub fn params(&self) -> &RevealParams {
        &self.params
    }

    /// Replace the timing; applies to entries created afterwards.
    pub fn set_params(&mut self, params: RevealParams) {
        self.params = params;
    }

    /// Drop every entry, visible and pending.
    pub fn clear(&mut self) {
        self.visible.clear();
        self.pending.clear();
        self.release_timer = 0.0;
    }

    /// Replace everything with one settled line.
    pub fn set_text(&mut self, text: &str) -> EntryId {
        self.clear();
        let mut entry = self.make_entry(text, false, false);
        entry.visible = true;
        let id = entry.id;
        self.visible.push(entry);
        id
    }

    /// Queue one animated entry per line of `block`.
    pub fn enqueue_text(&mut self, block: &str, wait_for_input: bool) -> Vec<EntryId> {
        block
            .lines()
            .map(|line| self.enqueue_line(line, true, wait_for_input))
            .collect()
    }

    /// Queue a single line. Lines that neither animate nor wait are shown immediately.
    pub fn enqueue_line(&mut self, line: &str, animated: bool, wait_for_input: bool) -> EntryId {
        let mut entry = self.make_entry(line, animated, wait_for_input);
        let id = entry.id;
        if animated || wait_for_input {
            self.pending.push_back(entry);
        } else {
            entry.visible = true;
            self.visible.push(entry);
        }
        id
    }

    /// Append lines straight to the visible list, skipping the pending queue.
    pub fn enqueue_immediate<I, S>(&mut self, lines: I, animated: bool) -> Vec<EntryId>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        lines
            .into_iter()
            .map(|line| {
                let mut entry = self.make_entry(line.as_ref(), animated, false);
                entry.visible = true;
                let id = entry.id;
                self.visible.push(entry);
                id
            })
            .collect()
    }

    /// Show the player's own choice as an animated, visible entry.
    pub fn enqueue_player_choice(&mut self, text: &str) -> EntryId {
        let mut entry = self.make_entry(text, true, false);
        entry.visible = true;
        entry.is_player_choice = true;
        let id = entry.id;
        self.visible.push(entry);
        id
    }

    /// Move time forward by `dt` seconds.
    pub fn advance(&mut self, dt: f32) -> AdvanceFlags {
        let dt = dt.max(0.0);
        let mut flags = AdvanceFlags::default();

        let head_is_automatic = self.pending.front().is_some_and(|e| !e.wait_for_input);
        if head_is_automatic && self.last_settled() {
            self.release_timer += dt;
            if self.release_timer >= self.params.per_line_delay {
                self.release_timer = 0.0;
                flags.released = self.release_next();
            }
        }

        for entry in &mut self.visible {
            if entry.elapsed < entry.duration {
                entry.elapsed = (entry.elapsed + dt).min(entry.duration);
                flags.animating = true;
            }
        }

        flags
    }

    /// React to a click or key press.
    ///
    /// Finishes the running animation of the last line if there is one; otherwise
    /// releases the next pending line. Returns whether anything changed.
    pub fn on_player_input(&mut self) -> bool {
        if let Some(last) = self.visible.last_mut()
            && last.is_animating()
        {
            last.settle();
            tracing::trace!("Skipped animation of entry {}", last.id.0);
            return true;
        }
        if !self.pending.is_empty() {
            self.release_timer = 0.0;
            return self.release_next();
        }
        false
    }

    /// Release the next pending line regardless of running animations.
    pub fn advance_line_now(&mut self) -> bool {
        if self.pending.is_empty() {
            return false;
        }
        self.release_timer = 0.0;
        self.release_next()
    }

    /// Remove up to `n` of the oldest visible entries, returning how many were removed.
    pub fn trim_front(&mut self, n: usize) -> usize {
        let n = n.min(self.visible.len());
        self.visible.drain(..n);
        n
    }

    pub fn visible_entries(&self) -> &[Entry] {
        &self.visible
    }

    pub fn last_visible(&self) -> Option<&Entry> {
        self.visible.last()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Remaining slide distance of the last visible entry.
    ///
    /// Uses linear progress so the reserved height shrinks steadily while the line slides.
    pub fn last_entry_anim_offset(&self) -> i32 {
        match self.visible.last() {
            Some(e) if e.duration > 0.0 && e.elapsed < e.duration => {
                ((1.0 - e.progress()) * e.intro_offset_px as f32) as i32
            }
            _ => 0,
        }
    }

    /// Nothing pending and the last visible line finished animating.
    pub fn is_settled(&self) -> bool {
        self.pending.is_empty() && self.last_settled()
    }

    fn last_settled(&self) -> bool {
        self.visible.last().is_none_or(Entry::is_settled)
    }

    fn release_next(&mut self) -> bool {
        match self.pending.pop_front() {
            Some(mut entry) => {
                entry.visible = true;
                tracing::debug!(
                    "Released entry {} ({} pending)",
                    entry.id.0,
                    self.pending.len()
                );
                self.visible.push(entry);
                true
            }
            None => false,
        }
    }

    fn make_entry(&mut self, text: &str, animated: bool, wait_for_input: bool) -> Entry {
        let id = EntryId(self.next_id);
        self.next_id += 1;

        let (duration, intro_offset_px, curve) = match (animated, self.params.mode) {
            (false, _) => (0.0, 0, None),
            (true, RevealMode::SlideFade) => {
                (self.params.intro_duration.max(0.0), self.params.intro_offset_px, None)
            }
            (true, RevealMode::Typewriter) => {
                let plain = StyledText::parse(text);
                match reveal_curve(plain.text(), &self.params) {
                    Some(curve) => (curve.duration, 0, Some(curve.fractions)),
                    None => (0.0, 0, None),
                }
            }
        };

        Entry {
            id,
            text: text.to_owned(),
            elapsed: 0.0,
            duration,
            intro_offset_px,
            visible: false,
            wait_for_input,
            reveal_curve: curve,
            is_player_choice: false,
        }
    }
}
