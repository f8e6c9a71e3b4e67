//! Window-system operations consumed by the view
//!
//! These traits are the seam between the view state machine and the
//! platform binding in `x11`. Keeping them narrow lets the geometry and
//! ordering invariants run against a recording mock.

use anyhow::Result;

use crate::types::{Dimensions, FrameExtents, Position, WindowId};
use crate::view::hotkey::{HotkeyError, KeyCombo};

/// Native window operations for the container and overlay windows.
///
/// All methods act on windows this crate created; failures here are
/// invariant breaks, not the recoverable source-vanished conditions of the
/// compositor, so they surface as plain errors.
pub trait WindowOps {
    /// Create the container window hosting the mirrored content.
    ///
    /// The window is managed by the window manager (frames can be toggled)
    /// but excluded from the taskbar and pager presentation.
    fn create_container(
        &self,
        location: Position,
        size: Dimensions,
        title: &str,
    ) -> Result<WindowId>;

    /// Create the unmanaged overlay label window for a container
    fn create_overlay(&self, container: WindowId) -> Result<WindowId>;

    fn map_window(&self, window: WindowId) -> Result<()>;
    fn unmap_window(&self, window: WindowId) -> Result<()>;
    fn destroy_window(&self, window: WindowId) -> Result<()>;

    fn move_window(&self, window: WindowId, location: Position) -> Result<()>;
    fn resize_window(&self, window: WindowId, size: Dimensions) -> Result<()>;
    fn raise_window(&self, window: WindowId) -> Result<()>;

    /// Window-level opacity, 0.0 (clear) to 1.0 (opaque)
    fn set_opacity(&self, window: WindowId, opacity: f64) -> Result<()>;
    fn set_always_on_top(&self, window: WindowId, enabled: bool) -> Result<()>;

    /// Toggle the window manager frame (bordered vs borderless)
    fn set_frames(&self, window: WindowId, enabled: bool) -> Result<()>;
    fn set_size_limits(&self, window: WindowId, min: Dimensions, max: Dimensions) -> Result<()>;
    fn set_title(&self, window: WindowId, title: &str) -> Result<()>;

    /// Draw the overlay label text
    fn set_label(&self, window: WindowId, text: &str) -> Result<()>;

    /// Current chrome thickness of a managed window; zero when borderless
    /// or when the window manager does not report extents.
    fn frame_extents(&self, window: WindowId) -> Result<FrameExtents>;
}

/// System-wide key grabs.
///
/// Registration is best-effort: the caller is expected to swallow
/// [`HotkeyError`] and continue without the hotkey.
pub trait Hotkeys {
    /// Install a system-wide grab for `combo` on behalf of `owner`
    fn grab_key(&self, owner: WindowId, combo: &KeyCombo) -> Result<(), HotkeyError>;

    /// Remove a grab. Best-effort; a stale grab is not an error.
    fn ungrab_key(&self, owner: WindowId, combo: &KeyCombo);
}
