//! Geometric types for window coordinates and sizes
//!
//! Provides type-safe wrappers for positions, sizes, rectangles and frame
//! extents to avoid common integer confusion (e.g., swapping width/height
//! or mixing outer and client sizes).

use serde::{Deserialize, Serialize};

/// Native window identifier (an X11 window XID).
pub type WindowId = u32;

/// A position in 2D screen space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Position {
    pub x: i16,
    pub y: i16,
}

impl Position {
    /// Create a new position
    pub fn new(x: i16, y: i16) -> Self {
        Self { x, y }
    }
}

impl From<(i16, i16)> for Position {
    fn from(tuple: (i16, i16)) -> Self {
        Self::new(tuple.0, tuple.1)
    }
}

impl From<Position> for (i16, i16) {
    fn from(pos: Position) -> Self {
        (pos.x, pos.y)
    }
}

/// Window dimensions (width × height)
/// Using a newtype prevents accidentally swapping width and height
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Dimensions {
    pub width: u16,
    pub height: u16,
}

impl Dimensions {
    /// Create new dimensions
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    /// Outer size obtained by adding window chrome to this client size
    pub fn with_frame(self, frame: FrameExtents) -> Self {
        Self {
            width: self.width.saturating_add(frame.horizontal()),
            height: self.height.saturating_add(frame.vertical()),
        }
    }
}

impl From<(u16, u16)> for Dimensions {
    fn from(tuple: (u16, u16)) -> Self {
        Self::new(tuple.0, tuple.1)
    }
}

impl From<Dimensions> for (u16, u16) {
    fn from(dims: Dimensions) -> Self {
        (dims.width, dims.height)
    }
}

/// A rectangle in destination-window coordinates (the compositor dest rect)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Rect {
    pub x: i16,
    pub y: i16,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    /// Create a new rectangle
    pub fn new(x: i16, y: i16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle covering the given client size at the origin
    pub fn from_client(size: Dimensions) -> Self {
        Self::new(0, 0, size.width, size.height)
    }
}

/// Window chrome thickness on each edge (the frame-to-client delta)
///
/// A borderless window has all-zero extents; outer size equals client size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct FrameExtents {
    pub left: u16,
    pub right: u16,
    pub top: u16,
    pub bottom: u16,
}

impl FrameExtents {
    /// Create new frame extents
    pub fn new(left: u16, right: u16, top: u16, bottom: u16) -> Self {
        Self {
            left,
            right,
            top,
            bottom,
        }
    }

    /// Total horizontal chrome (left + right)
    pub fn horizontal(&self) -> u16 {
        self.left.saturating_add(self.right)
    }

    /// Total vertical chrome (top + bottom)
    pub fn vertical(&self) -> u16 {
        self.top.saturating_add(self.bottom)
    }
}
