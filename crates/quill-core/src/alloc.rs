//! Hash collections used across Quill.
//!
//! Re-exports the AHash based map and set so every crate hashes the same way.

pub use ahash::{AHashMap as HashMap, AHashSet as HashSet, RandomState};
