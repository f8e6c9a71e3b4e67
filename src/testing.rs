//! Recording backend for view and geometry tests
//!
//! Implements all three backend traits against plain counters so tests can
//! assert call ordering and arguments without a display connection.

use std::cell::{Cell, RefCell};

use anyhow::Result;

use crate::backend::{Hotkeys, WindowOps};
use crate::compositor::{Compositor, CompositorError, ThumbnailProperties};
use crate::types::{Dimensions, FrameExtents, Position, Rect, WindowId};
use crate::view::hotkey::{HotkeyError, KeyCombo};

/// One recorded backend call
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateContainer {
        location: Position,
        size: Dimensions,
        title: String,
    },
    CreateOverlay {
        container: WindowId,
    },
    Map(WindowId),
    Unmap(WindowId),
    Destroy(WindowId),
    Move {
        window: WindowId,
        location: Position,
    },
    Resize {
        window: WindowId,
        size: Dimensions,
    },
    Raise(WindowId),
    SetOpacity {
        window: WindowId,
        opacity: f64,
    },
    SetAlwaysOnTop {
        window: WindowId,
        enabled: bool,
    },
    SetFrames {
        window: WindowId,
        enabled: bool,
    },
    SetSizeLimits {
        window: WindowId,
        min: Dimensions,
        max: Dimensions,
    },
    SetTitle {
        window: WindowId,
        text: String,
    },
    SetLabel {
        window: WindowId,
        text: String,
    },
    Register {
        container: WindowId,
        source: WindowId,
        token: u64,
    },
    UpdateProperties {
        token: u64,
        dest: Rect,
        opacity: u8,
    },
    Unregister {
        token: u64,
    },
    GrabKey {
        key_code: u8,
    },
    UngrabKey {
        key_code: u8,
    },
}

/// In-memory backend recording every call in order.
///
/// The `fail_*` toggles inject the corresponding error on the next matching
/// call; queries such as [`WindowOps::frame_extents`] are answered from the
/// `frame` cell and are not recorded.
pub struct MockBackend {
    pub calls: RefCell<Vec<Call>>,
    pub frame: Cell<FrameExtents>,
    pub fail_register: Cell<bool>,
    pub fail_update: Cell<bool>,
    pub fail_grab: Cell<bool>,
    next_window: Cell<WindowId>,
    next_token: Cell<u64>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            frame: Cell::new(FrameExtents::default()),
            fail_register: Cell::new(false),
            fail_update: Cell::new(false),
            fail_grab: Cell::new(false),
            next_window: Cell::new(100),
            next_token: Cell::new(1),
        }
    }

    /// Drain and return everything recorded so far
    pub fn take_calls(&self) -> Vec<Call> {
        std::mem::take(&mut *self.calls.borrow_mut())
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    fn new_window(&self) -> WindowId {
        let id = self.next_window.get();
        self.next_window.set(id + 1);
        id
    }
}

impl WindowOps for MockBackend {
    fn create_container(
        &self,
        location: Position,
        size: Dimensions,
        title: &str,
    ) -> Result<WindowId> {
        self.record(Call::CreateContainer {
            location,
            size,
            title: title.to_string(),
        });
        Ok(self.new_window())
    }

    fn create_overlay(&self, container: WindowId) -> Result<WindowId> {
        self.record(Call::CreateOverlay { container });
        Ok(self.new_window())
    }

    fn map_window(&self, window: WindowId) -> Result<()> {
        self.record(Call::Map(window));
        Ok(())
    }

    fn unmap_window(&self, window: WindowId) -> Result<()> {
        self.record(Call::Unmap(window));
        Ok(())
    }

    fn destroy_window(&self, window: WindowId) -> Result<()> {
        self.record(Call::Destroy(window));
        Ok(())
    }

    fn move_window(&self, window: WindowId, location: Position) -> Result<()> {
        self.record(Call::Move { window, location });
        Ok(())
    }

    fn resize_window(&self, window: WindowId, size: Dimensions) -> Result<()> {
        self.record(Call::Resize { window, size });
        Ok(())
    }

    fn raise_window(&self, window: WindowId) -> Result<()> {
        self.record(Call::Raise(window));
        Ok(())
    }

    fn set_opacity(&self, window: WindowId, opacity: f64) -> Result<()> {
        self.record(Call::SetOpacity { window, opacity });
        Ok(())
    }

    fn set_always_on_top(&self, window: WindowId, enabled: bool) -> Result<()> {
        self.record(Call::SetAlwaysOnTop { window, enabled });
        Ok(())
    }

    fn set_frames(&self, window: WindowId, enabled: bool) -> Result<()> {
        self.record(Call::SetFrames { window, enabled });
        Ok(())
    }

    fn set_size_limits(&self, window: WindowId, min: Dimensions, max: Dimensions) -> Result<()> {
        self.record(Call::SetSizeLimits { window, min, max });
        Ok(())
    }

    fn set_title(&self, window: WindowId, title: &str) -> Result<()> {
        self.record(Call::SetTitle {
            window,
            text: title.to_string(),
        });
        Ok(())
    }

    fn set_label(&self, window: WindowId, text: &str) -> Result<()> {
        self.record(Call::SetLabel {
            window,
            text: text.to_string(),
        });
        Ok(())
    }

    fn frame_extents(&self, _window: WindowId) -> Result<FrameExtents> {
        Ok(self.frame.get())
    }
}

impl Compositor for MockBackend {
    type Token = u64;

    fn register(&self, container: WindowId, source: WindowId) -> Result<u64, CompositorError> {
        if self.fail_register.get() {
            return Err(CompositorError::SourceUnavailable);
        }
        let token = self.next_token.get();
        self.next_token.set(token + 1);
        self.record(Call::Register {
            container,
            source,
            token,
        });
        Ok(token)
    }

    fn update_properties(
        &self,
        token: &u64,
        properties: &ThumbnailProperties,
    ) -> Result<(), CompositorError> {
        if self.fail_update.get() {
            return Err(CompositorError::Backend("injected update failure".into()));
        }
        self.record(Call::UpdateProperties {
            token: *token,
            dest: properties.dest_rect,
            opacity: properties.opacity,
        });
        Ok(())
    }

    fn unregister(&self, token: u64) {
        self.record(Call::Unregister { token });
    }
}

impl Hotkeys for MockBackend {
    fn grab_key(&self, _owner: WindowId, combo: &KeyCombo) -> Result<(), HotkeyError> {
        if self.fail_grab.get() {
            return Err(HotkeyError::RegistrationFailed(
                "injected grab failure".into(),
            ));
        }
        self.record(Call::GrabKey {
            key_code: combo.key_code,
        });
        Ok(())
    }

    fn ungrab_key(&self, _owner: WindowId, combo: &KeyCombo) {
        self.record(Call::UngrabKey {
            key_code: combo.key_code,
        });
    }
}
