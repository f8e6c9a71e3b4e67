//! Events forwarded from a view to the external manager
//!
//! The view never consumes window-system events for itself beyond its
//! internal bookkeeping; everything of interest to the manager is re-emitted
//! as a tagged event keyed by the source window id.

use crate::types::WindowId;

/// What happened to a thumbnail view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewEventKind {
    /// The container window moved
    Moved,
    /// The container window's client area was resized
    Resized,
    /// The container window gained input focus
    Focused,
    /// The container window lost input focus
    LostFocus,
    /// The view was activated (overlay left-click or hotkey press)
    Activated,
}

/// A view event, keyed by the mirrored source window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewEvent {
    pub source: WindowId,
    pub kind: ViewEventKind,
}

impl ViewEvent {
    pub fn new(source: WindowId, kind: ViewEventKind) -> Self {
        Self { source, kind }
    }
}
