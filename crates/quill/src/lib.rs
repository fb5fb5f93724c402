//! Quill - a visual-novel dialogue reveal and layout engine
//!
//! Lines stream into a dialogue box over time, optionally waiting for the player,
//! animate in (slide/fade or a punctuation-aware typewriter), wrap to the box width and
//! scroll with stick-to-bottom anchoring. A choice panel can open below the last line.
//!
//! - [`core`]: logging, profiling, geometry and color
//! - [`text`] (feature `text`): font cache, `{b}`/`{i}` markup, word wrap
//! - [`ui`] (feature `ui`): the reveal queue, `TextBox` widget and story presenter
//!
//! # Quick Start
//!
//! ```no_run
//! use quill::prelude::*;
//!
//! quill::init();
//!
//! let mut text_box = TextBox::new(
//!     Rect::new(40, 400, 720, 180),
//!     FontCache::with_system_fonts(),
//!     Theme::default(),
//!     RevealParams::typewriter(),
//! );
//! text_box.queue_lines("Hello there.\nIt's been a while...", true);
//!
//! let mut clock = FrameClock::new();
//! let mut frame = Canvas::new(800, 600).unwrap();
//! loop {
//!     text_box.update(clock.tick());
//!     text_box.draw(&mut frame);
//! #   break;
//! }
//! ```

pub mod clock;

pub use clock::FrameClock;

pub use quill_core as core;
pub use quill_core::math;

#[cfg(feature = "text")]
pub use quill_text as text;

#[cfg(feature = "ui")]
pub use quill_ui as ui;

/// Install the default `tracing` subscriber (see [`quill_core::logging::DEFAULT_FILTER`]).
pub fn init() {
    quill_core::logging::init();
    tracing::debug!("Quill {} initialized", env!("CARGO_PKG_VERSION"));
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::clock::FrameClock;

    pub use quill_core::math::Vec2;
    pub use quill_core::{Color, Insets, Rect};

    #[cfg(feature = "text")]
    pub use quill_text::{FontCache, FontKey, StyledText, TextLayout, TextStyle};

    #[cfg(feature = "ui")]
    pub use quill_ui::{
        BackgroundProvider, Canvas, Choice, ImageSlots, Node, NodePresenter, PresenterConfig,
        RevealMode, RevealParams, Story, TextBox, Theme, ThemeOverrides,
    };
}
