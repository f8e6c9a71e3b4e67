//! Core value types shared across the crate

mod geometry;

pub use geometry::{Dimensions, FrameExtents, Position, Rect, WindowId};
