//! X11 implementation of the window operations and hotkey traits

use anyhow::{Context, Result};
use tracing::{debug, error, info};
use x11rb::connection::Connection;
use x11rb::errors::ReplyError;
use x11rb::properties::WmSizeHints;
use x11rb::protocol::xproto::*;
use x11rb::rust_connection::RustConnection;
use x11rb::wrapper::ConnectionExt as WrapperExt;

use crate::backend::{Hotkeys, WindowOps};
use crate::constants::{hints, modifiers, overlay, x11};
use crate::types::{Dimensions, FrameExtents, Position, WindowId};
use crate::view::hotkey::{HotkeyError, KeyCombo};

use super::context::{CachedAtoms, CachedFormats};

const WM_CLASS: &[u8] = b"window-mirror\0window-mirror\0";

/// Live X11 binding: one connection, one screen, cached atoms and formats.
///
/// Implements every backend trait the view consumes; all windows it creates
/// are tagged with this process' PID so the event loop can tell its own
/// windows from foreign ones.
pub struct X11Backend<'a> {
    pub(super) conn: &'a RustConnection,
    pub(super) screen: &'a Screen,
    pub(super) atoms: CachedAtoms,
    pub(super) formats: CachedFormats,
    label_font: Font,
}

impl<'a> X11Backend<'a> {
    pub fn new(conn: &'a RustConnection, screen: &'a Screen) -> Result<Self> {
        let atoms = CachedAtoms::new(conn)?;
        let formats = CachedFormats::new(conn, screen)?;

        let label_font = conn
            .generate_id()
            .context("Failed to generate ID for label font")?;
        conn.open_font(label_font, overlay::LABEL_FONT)
            .context("Failed to open overlay label font")?
            .check()
            .context("Overlay label font is not available")?;

        Ok(Self {
            conn,
            screen,
            atoms,
            formats,
            label_font,
        })
    }

    fn set_decorations(&self, window: Window, decorations: u32) -> Result<()> {
        let motif_hints = [hints::MWM_HINTS_DECORATIONS, 0, decorations, 0, 0];
        self.conn
            .change_property32(
                PropMode::REPLACE,
                window,
                self.atoms.motif_wm_hints,
                self.atoms.motif_wm_hints,
                &motif_hints,
            )
            .context(format!("Failed to set decoration hints for {window}"))?;
        Ok(())
    }

    /// Ask the window manager to add or remove a _NET_WM_STATE property.
    /// Only effective on mapped windows; the WM owns the property after map.
    fn request_state(&self, window: Window, action: u32, state: Atom) -> Result<()> {
        let event = ClientMessageEvent::new(
            32,
            window,
            self.atoms.net_wm_state,
            [action, state, 0, x11::STATE_SOURCE_PAGER, 0],
        );
        self.conn
            .send_event(
                false,
                self.screen.root,
                EventMask::SUBSTRUCTURE_REDIRECT | EventMask::SUBSTRUCTURE_NOTIFY,
                event,
            )
            .context(format!("Failed to send state request for {window}"))?;
        Ok(())
    }
}

impl WindowOps for X11Backend<'_> {
    fn create_container(
        &self,
        location: Position,
        size: Dimensions,
        title: &str,
    ) -> Result<WindowId> {
        let window = self
            .conn
            .generate_id()
            .context("Failed to generate X11 window ID")?;
        self.conn
            .create_window(
                self.screen.root_depth,
                window,
                self.screen.root,
                location.x,
                location.y,
                size.width,
                size.height,
                0,
                WindowClass::INPUT_OUTPUT,
                self.screen.root_visual,
                &CreateWindowAux::new()
                    .background_pixel(self.screen.black_pixel)
                    .event_mask(
                        EventMask::STRUCTURE_NOTIFY
                            | EventMask::FOCUS_CHANGE
                            | EventMask::BUTTON_PRESS
                            | EventMask::EXPOSURE,
                    ),
            )
            .context(format!("Failed to create container window for '{title}'"))?;

        // Tag with our PID so the event loop can identify its own windows
        let pid = std::process::id();
        self.conn
            .change_property32(
                PropMode::REPLACE,
                window,
                self.atoms.net_wm_pid,
                AtomEnum::CARDINAL,
                &[pid],
            )
            .context(format!("Failed to set _NET_WM_PID for '{title}'"))?;

        self.conn
            .change_property8(
                PropMode::REPLACE,
                window,
                self.atoms.wm_class,
                AtomEnum::STRING,
                WM_CLASS,
            )
            .context(format!("Failed to set WM_CLASS for '{title}'"))?;

        self.set_title(window, title)?;

        // Mirrors are utility surfaces: keep them out of the taskbar and pager
        self.conn
            .change_property32(
                PropMode::REPLACE,
                window,
                self.atoms.net_wm_state,
                AtomEnum::ATOM,
                &[
                    self.atoms.net_wm_state_skip_taskbar,
                    self.atoms.net_wm_state_skip_pager,
                ],
            )
            .context(format!("Failed to set window state for '{title}'"))?;

        // Views start borderless; frames are opted into afterwards
        self.set_decorations(window, hints::MWM_DECOR_NONE)?;

        self.conn.flush().context("Failed to flush X11 connection")?;
        info!(window = window, title = %title, "Created container window");
        Ok(window)
    }

    fn create_overlay(&self, container: WindowId) -> Result<WindowId> {
        let window = self
            .conn
            .generate_id()
            .context("Failed to generate ID for overlay window")?;
        // Unmanaged: the owning view places it directly over the container
        self.conn
            .create_window(
                self.screen.root_depth,
                window,
                self.screen.root,
                0,
                0,
                1,
                1,
                0,
                WindowClass::INPUT_OUTPUT,
                self.screen.root_visual,
                &CreateWindowAux::new()
                    .override_redirect(x11::OVERRIDE_REDIRECT)
                    .background_pixel(self.screen.black_pixel)
                    .event_mask(EventMask::BUTTON_PRESS | EventMask::EXPOSURE),
            )
            .context(format!(
                "Failed to create overlay window for container {container}"
            ))?;
        debug!(window = window, container = container, "Created overlay window");
        Ok(window)
    }

    fn map_window(&self, window: WindowId) -> Result<()> {
        self.conn
            .map_window(window)
            .context(format!("Failed to map window {window}"))?;
        self.conn.flush().context("Failed to flush X11 connection")?;
        Ok(())
    }

    fn unmap_window(&self, window: WindowId) -> Result<()> {
        self.conn
            .unmap_window(window)
            .context(format!("Failed to unmap window {window}"))?;
        self.conn.flush().context("Failed to flush X11 connection")?;
        Ok(())
    }

    fn destroy_window(&self, window: WindowId) -> Result<()> {
        self.conn
            .destroy_window(window)
            .context(format!("Failed to destroy window {window}"))?;
        self.conn.flush().context("Failed to flush X11 connection")?;
        Ok(())
    }

    fn move_window(&self, window: WindowId, location: Position) -> Result<()> {
        self.conn
            .configure_window(
                window,
                &ConfigureWindowAux::new()
                    .x(i32::from(location.x))
                    .y(i32::from(location.y)),
            )
            .context(format!(
                "Failed to move window {window} to ({}, {})",
                location.x, location.y
            ))?;
        self.conn.flush().context("Failed to flush X11 connection")?;
        Ok(())
    }

    fn resize_window(&self, window: WindowId, size: Dimensions) -> Result<()> {
        self.conn
            .configure_window(
                window,
                &ConfigureWindowAux::new()
                    .width(u32::from(size.width))
                    .height(u32::from(size.height)),
            )
            .context(format!("Failed to resize window {window}"))?;
        self.conn.flush().context("Failed to flush X11 connection")?;
        Ok(())
    }

    fn raise_window(&self, window: WindowId) -> Result<()> {
        self.conn
            .configure_window(window, &ConfigureWindowAux::new().stack_mode(StackMode::ABOVE))
            .context(format!("Failed to raise window {window}"))?;
        Ok(())
    }

    fn set_opacity(&self, window: WindowId, opacity: f64) -> Result<()> {
        let value = (opacity.clamp(0.0, 1.0) * f64::from(u32::MAX)) as u32;
        self.conn
            .change_property32(
                PropMode::REPLACE,
                window,
                self.atoms.net_wm_window_opacity,
                AtomEnum::CARDINAL,
                &[value],
            )
            .context(format!("Failed to set opacity for window {window}"))?;
        self.conn.flush().context("Failed to flush X11 connection")?;
        Ok(())
    }

    fn set_always_on_top(&self, window: WindowId, enabled: bool) -> Result<()> {
        let action = if enabled {
            x11::NET_WM_STATE_ADD
        } else {
            x11::NET_WM_STATE_REMOVE
        };
        self.request_state(window, action, self.atoms.net_wm_state_above)?;
        self.conn.flush().context("Failed to flush X11 connection")?;
        Ok(())
    }

    fn set_frames(&self, window: WindowId, enabled: bool) -> Result<()> {
        let decorations = if enabled {
            hints::MWM_DECOR_ALL
        } else {
            hints::MWM_DECOR_NONE
        };
        self.set_decorations(window, decorations)?;
        self.conn.flush().context("Failed to flush X11 connection")?;
        Ok(())
    }

    fn set_size_limits(&self, window: WindowId, min: Dimensions, max: Dimensions) -> Result<()> {
        let mut size_hints = WmSizeHints::new();
        size_hints.min_size = Some((i32::from(min.width), i32::from(min.height)));
        size_hints.max_size = Some((i32::from(max.width), i32::from(max.height)));
        size_hints
            .set_normal_hints(self.conn, window)
            .context(format!("Failed to set size hints for window {window}"))?;
        self.conn.flush().context("Failed to flush X11 connection")?;
        Ok(())
    }

    fn set_title(&self, window: WindowId, title: &str) -> Result<()> {
        self.conn
            .change_property8(
                PropMode::REPLACE,
                window,
                AtomEnum::WM_NAME,
                AtomEnum::STRING,
                title.as_bytes(),
            )
            .context(format!("Failed to set title for window {window}"))?;
        Ok(())
    }

    fn set_label(&self, window: WindowId, text: &str) -> Result<()> {
        self.conn
            .clear_area(false, window, 0, 0, 0, 0)
            .context(format!("Failed to clear overlay window {window}"))?;

        let bytes = &text.as_bytes()[..text.len().min(overlay::LABEL_MAX_LEN)];
        if !bytes.is_empty() {
            let gc = self
                .conn
                .generate_id()
                .context("Failed to generate ID for label GC")?;
            self.conn
                .create_gc(
                    gc,
                    window,
                    &CreateGCAux::new()
                        .font(self.label_font)
                        .foreground(self.screen.white_pixel)
                        .background(self.screen.black_pixel),
                )
                .context("Failed to create label GC")?;
            self.conn
                .image_text8(window, gc, overlay::LABEL_TEXT_INDENT, overlay::LABEL_BASELINE, bytes)
                .context(format!("Failed to draw label on window {window}"))?;
            self.conn
                .free_gc(gc)
                .context("Failed to free label GC")?;
        }

        self.conn.flush().context("Failed to flush X11 connection")?;
        Ok(())
    }

    fn frame_extents(&self, window: WindowId) -> Result<FrameExtents> {
        let cookie = self
            .conn
            .get_property(
                false,
                window,
                self.atoms.net_frame_extents,
                AtomEnum::CARDINAL,
                0,
                x11::FRAME_EXTENTS_LEN,
            )
            .context(format!("Failed to query _NET_FRAME_EXTENTS for {window}"))?;
        let reply = match cookie.reply() {
            Ok(reply) => reply,
            Err(ReplyError::X11Error(err))
                if err.error_kind == x11rb::protocol::ErrorKind::Window =>
            {
                debug!(window = window, "Window destroyed before frame extents reply");
                return Ok(FrameExtents::default());
            }
            Err(err) => {
                return Err(err)
                    .context(format!("Failed to get _NET_FRAME_EXTENTS reply for {window}"));
            }
        };

        // Property order is left, right, top, bottom. Absent or short means
        // the window manager has not decorated the window (yet).
        let Some(values) = reply.value32() else {
            return Ok(FrameExtents::default());
        };
        let values: Vec<u32> = values.collect();
        if values.len() < x11::FRAME_EXTENTS_LEN as usize {
            return Ok(FrameExtents::default());
        }
        Ok(FrameExtents {
            left: values[0] as u16,
            right: values[1] as u16,
            top: values[2] as u16,
            bottom: values[3] as u16,
        })
    }
}

impl Hotkeys for X11Backend<'_> {
    fn grab_key(&self, owner: WindowId, combo: &KeyCombo) -> Result<(), HotkeyError> {
        // Grab every lock-state variant so caps lock or numlock cannot mask
        // the hotkey. An Access error from any variant means another client
        // holds the combination.
        for locks in modifiers::LOCK_COMBINATIONS {
            self.conn
                .grab_key(
                    false,
                    self.screen.root,
                    ModMask::from(combo.modifier_bits() | locks),
                    combo.key_code,
                    GrabMode::ASYNC,
                    GrabMode::ASYNC,
                )
                .map_err(|e| HotkeyError::RegistrationFailed(e.to_string()))?
                .check()
                .map_err(|e| HotkeyError::RegistrationFailed(e.to_string()))?;
        }
        debug!(owner = owner, combo = %combo.display_name(), "Grabbed hotkey");
        Ok(())
    }

    fn ungrab_key(&self, owner: WindowId, combo: &KeyCombo) {
        for locks in modifiers::LOCK_COMBINATIONS {
            if let Err(e) = self.conn.ungrab_key(
                combo.key_code,
                self.screen.root,
                ModMask::from(combo.modifier_bits() | locks),
            ) {
                debug!(owner = owner, error = %e, "Failed to ungrab hotkey");
            }
        }
        let _ = self.conn.flush();
    }
}

impl Drop for X11Backend<'_> {
    fn drop(&mut self) {
        if let Err(e) = self.conn.close_font(self.label_font) {
            error!(font = self.label_font, error = %e, "Failed to close label font");
        }
        let _ = self.conn.flush();
    }
}
