//! Vector math re-exported from [`glam`].
//!
//! Pointer positions handed to the dialogue widgets are [`Vec2`] in window space.
//!
//! [`glam`]: https://docs.rs/glam

pub use glam::{IVec2, Vec2};
