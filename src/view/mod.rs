//! Thumbnail view state machine
//!
//! Ties one compositor thumbnail registration, one overlay label window and
//! an optional hotkey binding together, and reconciles window-system events
//! with the compositor through a coalescing refresh cycle.
//!
//! All state transitions run on the host event-loop thread; the only
//! concurrency concern is the temporal ordering of window-system events,
//! which the dirty flags absorb.

pub mod events;
pub mod hotkey;
pub mod overlay;

pub use events::{ViewEvent, ViewEventKind};
pub use hotkey::{HotkeyBinding, HotkeyError, KeyCombo};
pub use overlay::OverlayWindow;

use std::sync::mpsc::Sender;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{debug, error, info, warn};

use crate::backend::{Hotkeys, WindowOps};
use crate::compositor::{Compositor, CompositorError, ThumbnailHandle, ThumbnailProperties};
use crate::constants::{compositor::FULL_OPACITY, mouse, timing};
use crate::geometry::{self, ZoomAnchor};
use crate::types::{Dimensions, FrameExtents, Position, Rect, WindowId};

/// Pending geometry work, set by window-system notifications and consumed
/// by the next refresh pass. Move and resize notifications arrive in bursts
/// faster than refresh ticks; these flags coalesce them.
#[derive(Debug, Clone, Copy)]
struct DirtyFlags {
    position: bool,
    size: bool,
}

impl DirtyFlags {
    /// Initial state: everything dirty, so the first refresh performs full setup
    fn all() -> Self {
        Self {
            position: true,
            size: true,
        }
    }
}

/// Geometry captured before a zoom-in and restored verbatim on zoom-out.
/// At most one snapshot is outstanding; zooming while zoomed overwrites it.
#[derive(Debug, Clone, Copy)]
struct GeometrySnapshot {
    client_size: Dimensions,
    location: Position,
}

/// A live thumbnail view mirroring one source window.
///
/// Owns its container window, overlay label, compositor registration and
/// optional hotkey binding; none are shared across views. The external
/// manager routes window-system events here (`notify_*`), drives the
/// refresh cycle and consumes [`ViewEvent`]s from the channel supplied at
/// construction.
pub struct ThumbnailView<'a, B: Compositor + WindowOps + Hotkeys> {
    backend: &'a B,
    events: Sender<ViewEvent>,

    container: WindowId,
    overlay: OverlayWindow<'a, B>,
    handle: ThumbnailHandle<'a, B>,
    hotkey: Option<HotkeyBinding<'a, B>>,

    source: WindowId,
    title: String,
    active: bool,
    overlay_enabled: bool,
    opacity: f64,
    frames_enabled: bool,

    location: Position,
    client_size: Dimensions,
    frame: FrameExtents,

    dirty: DirtyFlags,
    suppress_resize_until: Instant,
    frame_query_pending: bool,
    snapshot: Option<GeometrySnapshot>,
}

impl<'a, B: Compositor + WindowOps + Hotkeys> ThumbnailView<'a, B> {
    /// Create a view with its container and overlay windows.
    ///
    /// No source is assigned yet; set one with [`Self::set_source`] before
    /// the first [`Self::show`]. The thumbnail itself is registered lazily
    /// on the first refresh, not here.
    pub fn new(
        backend: &'a B,
        events: Sender<ViewEvent>,
        location: Position,
        client_size: Dimensions,
        title: &str,
    ) -> Result<Self> {
        let container = backend
            .create_container(location, client_size, title)
            .context("Failed to create container window")?;
        let mut overlay = OverlayWindow::new(backend, container)?;
        overlay.set_label(title)?;

        info!(container = container, title = %title, "Created thumbnail view");

        Ok(Self {
            backend,
            events,
            container,
            overlay,
            handle: ThumbnailHandle::new(backend),
            hotkey: None,
            source: 0,
            title: title.to_string(),
            active: false,
            overlay_enabled: false,
            opacity: 1.0,
            frames_enabled: false,
            location,
            client_size,
            frame: FrameExtents::default(),
            dirty: DirtyFlags::all(),
            suppress_resize_until: Instant::now(),
            frame_query_pending: false,
            snapshot: None,
        })
    }

    // Accessors

    /// The mirrored source window
    pub fn source(&self) -> WindowId {
        self.source
    }

    /// Assign the source window to mirror; identity key for all events
    pub fn set_source(&mut self, source: WindowId) {
        self.source = source;
    }

    /// Native handle of the container window
    pub fn container(&self) -> WindowId {
        self.container
    }

    /// Native handle of the overlay label window
    pub fn overlay_window(&self) -> WindowId {
        self.overlay.window()
    }

    /// Current window title (also the overlay label default)
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Whether the container currently carries a window manager frame
    pub fn frames_enabled(&self) -> bool {
        self.frames_enabled
    }

    /// Whether the view is currently shown
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Whether a zoom snapshot is outstanding
    pub fn zoomed(&self) -> bool {
        self.snapshot.is_some()
    }

    /// Cached container location (outer top-left)
    pub fn location(&self) -> Position {
        self.location
    }

    /// Cached client-area size
    pub fn client_size(&self) -> Dimensions {
        self.client_size
    }

    /// Outer size: client area plus current chrome
    pub fn outer_size(&self) -> Dimensions {
        self.client_size.with_frame(self.frame)
    }

    /// True if `handle` is the source, the container or the overlay window.
    /// The manager uses this to route window-system notifications.
    pub fn is_known_handle(&self, handle: WindowId) -> bool {
        handle == self.source || handle == self.container || handle == self.overlay.window()
    }

    // Lifecycle

    /// Map the container and run a full refresh.
    ///
    /// The thumbnail is registered during this refresh cycle, so the first
    /// compositor call happens on display rather than at construction.
    pub fn show(&mut self) -> Result<()> {
        self.backend
            .map_window(self.container)
            .context("Failed to map container window")?;
        self.refresh(false)?;
        self.active = true;
        Ok(())
    }

    /// Unmap the container and overlay. The thumbnail registration is kept:
    /// re-showing is cheap.
    pub fn hide(&mut self) -> Result<()> {
        self.active = false;
        self.overlay.hide()?;
        self.backend
            .unmap_window(self.container)
            .context("Failed to unmap container window")?;
        Ok(())
    }

    /// Release every native resource owned by the view.
    ///
    /// Consuming `self` makes the call-once precondition structural: there
    /// is no view left to close twice.
    pub fn close(mut self) {
        self.active = false;
        self.handle.release();
        info!(source = self.source, container = self.container, "Closed thumbnail view");
        // Overlay, hotkey grab and container are released by Drop impls
    }

    // Refresh cycle

    /// Reconcile pending geometry changes with the compositor and overlay.
    ///
    /// `force_refresh` re-registers the thumbnail; the previous registration
    /// is torn down only after the new one is installed so no blank frame is
    /// ever visible.
    pub fn refresh(&mut self, force_refresh: bool) -> Result<()> {
        if self.frame_query_pending && Instant::now() >= self.suppress_resize_until {
            self.frame_query_pending = false;
            match self.backend.frame_extents(self.container) {
                Ok(frame) if frame != self.frame => {
                    self.frame = frame;
                    self.dirty.size = true;
                }
                Ok(_) => {}
                Err(e) => {
                    debug!(container = self.container, error = %e, "frame extents unavailable");
                }
            }
        }

        let mut obsolete = None;
        if !self.handle.is_registered() || force_refresh {
            match self.handle.register(self.container, self.source) {
                Ok(previous) => {
                    if previous.is_none() {
                        // A fresh registration (first display, or recovery
                        // after the source vanished) has no destination rect
                        // yet; properties must be pushed below
                        self.dirty.size = true;
                    }
                    obsolete = previous;
                }
                Err(CompositorError::SourceUnavailable) => {
                    debug!(
                        source = self.source,
                        "source unavailable during registration; retrying next refresh"
                    );
                }
                Err(e) => {
                    warn!(source = self.source, error = %e, "thumbnail registration failed");
                }
            }
        }

        let size_changed = self.dirty.size || force_refresh;
        let position_changed = self.dirty.position || force_refresh;

        if size_changed {
            let props = self.thumbnail_properties();
            if let Err(e) = self.handle.update_properties(&props) {
                debug!(source = self.source, error = %e, "thumbnail property update skipped");
            }
            // Cleared even on failure: a transient error must not spin-retry
            // every tick; the next real resize event re-dirties the flag.
            self.dirty.size = false;
        }

        if let Some(token) = obsolete.take() {
            self.backend.unregister(token);
        }

        if !self.overlay_enabled {
            if self.overlay.is_visible() {
                self.overlay.hide()?;
            }
            return Ok(());
        }

        if !self.overlay.is_visible() {
            self.overlay.show()?;
        } else if !(size_changed || position_changed) {
            // Visible and properly placed already
            return Ok(());
        }

        let (location, size) =
            geometry::overlay_rect(self.location, self.client_size, self.outer_size());
        self.dirty.position = false;
        self.overlay.set_geometry(location, size)?;
        Ok(())
    }

    fn thumbnail_properties(&self) -> ThumbnailProperties {
        ThumbnailProperties {
            dest_rect: Rect::from_client(self.client_size),
            opacity: (self.opacity * f64::from(FULL_OPACITY)).round() as u8,
            visible: true,
            source_client_area_only: true,
        }
    }

    // Zoom

    /// Grow the client area by `factor`, keeping the anchor point fixed.
    ///
    /// Chrome does not scale. The window is resized before it is moved:
    /// moving first can bounce focus off the source application and
    /// re-trigger the zoom in a feedback loop.
    pub fn zoom_in(&mut self, anchor: ZoomAnchor, factor: u16) -> Result<()> {
        self.snapshot = Some(GeometrySnapshot {
            client_size: self.client_size,
            location: self.location,
        });

        let old_outer = self.outer_size();
        let new_client = geometry::zoomed_client_size(factor, self.client_size);
        let new_outer = new_client.with_frame(self.frame);

        self.backend
            .resize_window(self.container, new_client)
            .context("Failed to resize container for zoom")?;

        let target = geometry::zoom_placement(anchor, self.location, old_outer, new_outer);
        if target != self.location {
            self.backend
                .move_window(self.container, target)
                .context("Failed to move container for zoom")?;
        }

        self.client_size = new_client;
        self.location = target;
        debug!(source = self.source, anchor = ?anchor, factor = factor, "zoomed in");
        Ok(())
    }

    /// Restore the geometry captured by the last [`Self::zoom_in`].
    ///
    /// Without a prior zoom-in there is nothing to restore and the call is
    /// a no-op; the view never resets itself to a zero snapshot.
    pub fn zoom_out(&mut self) -> Result<()> {
        let Some(snapshot) = self.snapshot.take() else {
            debug!(source = self.source, "zoom_out without prior zoom_in ignored");
            return Ok(());
        };

        self.backend
            .resize_window(self.container, snapshot.client_size)
            .context("Failed to restore container size")?;
        self.backend
            .move_window(self.container, snapshot.location)
            .context("Failed to restore container location")?;

        self.client_size = snapshot.client_size;
        self.location = snapshot.location;
        debug!(source = self.source, "zoomed out");
        Ok(())
    }

    // Configuration

    /// Toggle the window manager frame.
    ///
    /// Arms the resize suppression window: the window manager replays a
    /// spurious resize during the style transition, which must not count as
    /// a real geometry change. Size is marked dirty so the next refresh
    /// recomputes geometry once the transition settles.
    pub fn set_frames(&mut self, enable: bool) -> Result<()> {
        self.suppress_resize_until = Instant::now() + timing::RESIZE_SUPPRESSION;
        self.backend
            .set_frames(self.container, enable)
            .context("Failed to toggle container frames")?;
        self.frames_enabled = enable;
        if enable {
            // The window manager applies the decoration change and updates
            // _NET_FRAME_EXTENTS asynchronously; querying now would return
            // the pre-toggle extents. Defer until the suppression lapses.
            self.frame_query_pending = true;
        } else {
            self.frame = FrameExtents::default();
            self.frame_query_pending = false;
        }
        self.dirty.size = true;
        Ok(())
    }

    /// Window-level opacity, clamped to 0.0–1.0; applied immediately to the
    /// container and carried into the thumbnail properties on next refresh.
    pub fn set_opacity(&mut self, opacity: f64) -> Result<()> {
        self.opacity = opacity.clamp(0.0, 1.0);
        self.backend
            .set_opacity(self.container, self.opacity)
            .context("Failed to set container opacity")
    }

    /// Keep the view above other windows
    pub fn set_top_most(&mut self, enabled: bool) -> Result<()> {
        self.backend
            .set_always_on_top(self.container, enabled)
            .context("Failed to set container always-on-top")?;
        self.overlay.set_top_most(enabled)
    }

    /// Minimum and maximum client sizes enforced by the window manager
    pub fn set_size_limitations(&mut self, min: Dimensions, max: Dimensions) -> Result<()> {
        self.backend
            .set_size_limits(self.container, min, max)
            .context("Failed to set container size limits")
    }

    /// Enable or disable the overlay label; consumed on the next refresh
    pub fn set_overlay_enabled(&mut self, enabled: bool) {
        self.overlay_enabled = enabled;
    }

    /// Update only the overlay label text
    pub fn set_overlay_label(&mut self, text: &str) -> Result<()> {
        self.overlay.set_label(text)
    }

    /// Update the window title and the overlay label together
    pub fn set_title(&mut self, title: &str) -> Result<()> {
        self.title = title.to_string();
        self.backend
            .set_title(self.container, title)
            .context("Failed to set container title")?;
        self.overlay.set_label(title)
    }

    // Hotkey

    /// Install a system-wide hotkey, replacing any previous binding.
    ///
    /// `None` clears the binding. Registration failures are swallowed: the
    /// hotkey is best-effort and must never block view operation.
    pub fn register_hotkey(&mut self, combo: Option<KeyCombo>) {
        // Dropping the old binding ungrabs it before the new grab is tried
        self.hotkey = None;
        let Some(combo) = combo else {
            return;
        };
        match HotkeyBinding::register(self.backend, self.container, combo) {
            Ok(binding) => self.hotkey = Some(binding),
            Err(e) => {
                debug!(source = self.source, error = %e, "hotkey unavailable for this view");
            }
        }
    }

    /// Remove the active hotkey binding, if any
    pub fn unregister_hotkey(&mut self) {
        self.hotkey = None;
    }

    // Window-system notifications, routed by the external manager

    /// The container window moved
    pub fn notify_moved(&mut self, location: Position) {
        if location == self.location {
            return;
        }
        self.location = location;
        self.dirty.position = true;
        self.emit(ViewEventKind::Moved);
    }

    /// The container window's client area was resized.
    ///
    /// Ignored inside the suppression window armed by [`Self::set_frames`].
    pub fn notify_resized(&mut self, client_size: Dimensions) {
        if Instant::now() < self.suppress_resize_until {
            debug!(container = self.container, "resize notification suppressed");
            return;
        }
        if client_size == self.client_size {
            return;
        }
        self.client_size = client_size;
        self.dirty.size = true;
        self.emit(ViewEventKind::Resized);
    }

    /// The container window gained or lost input focus
    pub fn notify_focus(&mut self, focused: bool) {
        self.emit(if focused {
            ViewEventKind::Focused
        } else {
            ViewEventKind::LostFocus
        });
    }

    /// A pointer button was pressed on one of the view's windows.
    /// Only a left press on the overlay activates; other buttons are
    /// reserved and currently ignored.
    pub fn notify_button_press(&mut self, window: WindowId, button: u8) {
        if window == self.overlay.window() && button == mouse::BUTTON_LEFT {
            self.emit(ViewEventKind::Activated);
        }
    }

    /// A grabbed key was pressed; activates when it matches the binding
    pub fn notify_key_press(&mut self, key_code: u8, state: u16) {
        if let Some(binding) = &self.hotkey
            && binding.combo().matches(key_code, state)
        {
            self.emit(ViewEventKind::Activated);
        }
    }

    /// Rewind the suppression deadline instead of waiting it out
    #[cfg(test)]
    fn expire_suppression(&mut self) {
        self.suppress_resize_until = Instant::now();
    }

    fn emit(&self, kind: ViewEventKind) {
        if self.events.send(ViewEvent::new(self.source, kind)).is_err() {
            debug!(source = self.source, "view event receiver dropped");
        }
    }
}

impl<B: Compositor + WindowOps + Hotkeys> Drop for ThumbnailView<'_, B> {
    fn drop(&mut self) {
        // Release the compositor token before the container it draws into
        self.handle.release();
        if let Err(e) = self.backend.destroy_window(self.container) {
            error!(container = self.container, error = %e, "Failed to destroy container window");
        }
    }
}
