//! Quill UI - visual-novel dialogue box
//!
//! This crate turns queued dialogue lines into a scrolling, animated text panel:
//! - [`RevealQueue`]: pending lines, release timing and per-entry animation
//! - [`TextView`]: wrap/render cache keyed by entry, drawing only what is on screen
//! - [`ScrollModel`]: clamped scroll offset with stick-to-bottom queries
//! - [`ChoiceOverlay`]: blurred choice panel that flows under the last line
//! - [`TextBox`]: the widget that wires them into one update/draw/input cycle
//! - [`NodePresenter`]: plays a branching [`Story`] through a text box
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use quill_core::Rect;
//! use quill_text::FontCache;
//! use quill_ui::{Canvas, RevealParams, TextBox, Theme};
//!
//! let mut text_box = TextBox::new(
//!     Rect::new(40, 400, 720, 180),
//!     FontCache::with_system_fonts(),
//!     Theme::default(),
//!     RevealParams::default(),
//! );
//! text_box.queue_lines("Hello.\nIs anyone there?", true);
//!
//! let mut frame = Canvas::new(800, 600).unwrap();
//! // Per frame:
//! text_box.on_player_press();
//! text_box.update(1.0 / 60.0);
//! text_box.draw(&mut frame);
//! ```

pub mod animation;
pub mod background;
pub mod canvas;
pub mod choice;
pub mod indicator;
pub mod presenter;
pub mod reveal;
pub mod scroll;
pub mod scrollbar;
pub mod text_box;
pub mod theme;
pub mod typewriter;
pub mod view;

pub use animation::EasingFunction;
pub use background::{BackgroundProvider, ImageSlots};
pub use canvas::Canvas;
pub use choice::ChoiceOverlay;
pub use presenter::{Choice, Node, NodePresenter, PresenterConfig, Story};
pub use reveal::{AdvanceFlags, Entry, EntryId, RevealMode, RevealParams, RevealQueue};
pub use scroll::ScrollModel;
pub use text_box::TextBox;
pub use theme::{
    ChoiceStyle, IndicatorAlign, ScrollbarStyle, Theme, ThemeBuilder, ThemeOverrides,
    WaitIndicatorStyle,
};
pub use typewriter::{RevealCurve, chars_to_show, reveal_curve};
pub use view::{EntryLayout, LayoutLine, TextView};
