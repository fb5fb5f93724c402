//! Quill Text - font caching, markup runs and word wrapping
//!
//! This crate provides the text building blocks of the dialogue engine:
//! - [`FontCache`]: resolves a [`FontKey`] (typeface, size, weight, style) to a cached
//!   [`FontFace`] and memoizes measurements
//! - [`FontBackend`]: the shaping/rasterization seam, implemented by [`CosmicBackend`]
//! - [`StyledText`]: `{b}`/`{i}` run markup
//! - [`TextLayout`]: greedy word wrap with hard splitting, line images and prefix widths
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use quill_text::{FontCache, FontKey, TextLayout, TextStyle};
//!
//! let fonts = FontCache::with_system_fonts();
//! let layout = TextLayout::new(fonts, TextStyle {
//!     font: FontKey::sans(22),
//!     ..TextStyle::default()
//! });
//!
//! for line in layout.wrap("A long line of dialogue that needs wrapping", 240) {
//!     println!("{line}");
//! }
//! ```

pub mod cache;
pub mod error;
pub mod font;
pub mod layout;
pub mod rich_text;
pub mod shaping;

pub use cache::{CacheStats, FontBackend, FontCache};
pub use error::{TextError, TextResult};
pub use font::{FaceId, FaceMetrics, FontDatabase, FontFace, FontKey, FontStyle, FontWeight};
pub use layout::{LineImage, TextLayout, TextStyle, line_ranges, wrap_ranges};
pub use rich_text::{RunStyle, StyledRun, StyledText};
pub use shaping::{CosmicBackend, line_height_for};

// Re-export the raster type line images are stored in
pub use tiny_skia::Pixmap;

pub use quill_core::Color;
