//! Live thumbnail windows mirroring other clients' content.
//!
//! Each [`view::ThumbnailView`] pairs a compositor thumbnail registration
//! with a small container window, an overlay label and an optional
//! activation hotkey. The view reconciles window-system events with the
//! compositor through a dirty-flag refresh cycle and reports everything of
//! interest to its owner as [`view::ViewEvent`]s keyed by the source window.
//!
//! The platform binding lives in [`x11`]; the [`backend`] and [`compositor`]
//! traits are the seam between it and the view logic.

pub mod backend;
pub mod compositor;
pub mod constants;
pub mod geometry;
pub mod types;
pub mod view;
pub mod x11;

#[cfg(test)]
mod testing;

pub use compositor::{Compositor, CompositorError, ThumbnailHandle, ThumbnailProperties};
pub use geometry::ZoomAnchor;
pub use types::{Dimensions, FrameExtents, Position, Rect, WindowId};
pub use view::{KeyCombo, ThumbnailView, ViewEvent, ViewEventKind};
