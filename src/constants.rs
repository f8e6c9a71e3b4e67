//! Application-wide constants
//!
//! This module contains all magic numbers used throughout the crate,
//! providing a single source of truth for constant values.

/// Overlay label window layout
pub mod overlay {
    /// Inset of the label window from each client-area edge, in pixels
    pub const LABEL_INSET: u16 = 5;

    /// Text baseline offset from the label window's top-left corner
    pub const LABEL_BASELINE: i16 = 14;

    /// Core X11 font used for the label text
    pub const LABEL_FONT: &[u8] = b"fixed";

    /// Horizontal indent of the label text from the window's left edge
    pub const LABEL_TEXT_INDENT: i16 = 4;

    /// image_text8 carries at most this many bytes per request
    pub const LABEL_MAX_LEN: usize = 255;
}

/// Event timing windows
pub mod timing {
    use std::time::Duration;

    /// How long resize notifications are ignored after a frame style toggle.
    /// The window manager replays a synthetic configure with inconsistent
    /// client size during the decoration change.
    pub const RESIZE_SUPPRESSION: Duration = Duration::from_millis(450);
}

/// Compositor thumbnail property values
pub mod compositor {
    /// Fully opaque thumbnail content (opacity byte range is 0-255)
    pub const FULL_OPACITY: u8 = 255;

    /// Fixed-point multiplier for X11 render transforms (2^16)
    pub const FIXED_POINT_MULTIPLIER: f32 = 65536.0;
}

/// Mouse button constants
pub mod mouse {
    /// Left mouse button number
    pub const BUTTON_LEFT: u8 = 1;
    /// Right mouse button number
    pub const BUTTON_RIGHT: u8 = 3;
}

/// X11 modifier mask bits (xproto ModMask values)
pub mod modifiers {
    pub const SHIFT: u16 = 1 << 0;
    pub const CONTROL: u16 = 1 << 2;
    pub const ALT: u16 = 1 << 3;
    pub const SUPER: u16 = 1 << 6;

    /// Bits compared when matching a hotkey; lock and numlock are ignored
    pub const RELEVANT: u16 = SHIFT | CONTROL | ALT | SUPER;

    /// Caps lock modifier bit
    pub const LOCK: u16 = 1 << 1;

    /// Numlock modifier bit (Mod2 on stock keymaps)
    pub const NUM_LOCK: u16 = 1 << 4;

    /// Lock-state combinations a key grab must cover so the hotkey fires
    /// regardless of caps lock and numlock
    pub const LOCK_COMBINATIONS: [u16; 4] = [0, LOCK, NUM_LOCK, LOCK | NUM_LOCK];
}

/// Motif window manager hint words (_MOTIF_WM_HINTS)
pub mod hints {
    /// Flag selecting the decorations word
    pub const MWM_HINTS_DECORATIONS: u32 = 1 << 1;

    /// Decorations value: full frame
    pub const MWM_DECOR_ALL: u32 = 1;

    /// Decorations value: borderless
    pub const MWM_DECOR_NONE: u32 = 0;
}

/// X11 protocol constants
pub mod x11 {
    /// Override redirect flag for unmanaged windows
    pub const OVERRIDE_REDIRECT: u32 = 1;

    /// Source indication for _NET_WM_STATE requests (2 = pager/direct user action)
    pub const STATE_SOURCE_PAGER: u32 = 2;

    /// _NET_WM_STATE action: remove property
    pub const NET_WM_STATE_REMOVE: u32 = 0;

    /// _NET_WM_STATE action: add property
    pub const NET_WM_STATE_ADD: u32 = 1;

    /// Number of cardinals in _NET_FRAME_EXTENTS (left, right, top, bottom)
    pub const FRAME_EXTENTS_LEN: u32 = 4;
}
