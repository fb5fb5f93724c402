//! Quill Core
//!
//! This crate contains the shared building blocks for the Quill dialogue engine:
//! logging setup, profiling hooks, hash collections, geometry and colors.

pub mod alloc;
pub mod color;
pub mod geometry;
pub mod logging;
pub mod math;
pub mod profiling;

pub use color::Color;
pub use geometry::{Insets, Rect};
