//! Adaptive caption layout.
//!
//! Given an image's pixel dimensions, a caption string, and the run style,
//! the engine picks a clamped font size, wraps the caption to the image's
//! text-width budget, and bounds the caption band height. Wrapping runs in
//! two passes behind one strategy type: a cheap estimated word fill for the
//! common case, and an exact measured character fill when the estimate
//! degenerates.

mod wrap;

pub mod engine;

pub use engine::{compute_layout, Layout, LayoutError};
