//! Overlay label window
//!
//! A lightweight always-on-top window drawing a text label over the
//! thumbnail. It never handles input itself beyond receiving button press
//! events, which the owning view routes and filters.

use anyhow::{Context, Result};
use tracing::error;

use crate::backend::WindowOps;
use crate::types::{Dimensions, Position, WindowId};

/// The label window over a thumbnail container.
///
/// Visibility is cached so show/hide are idempotent; geometry is pushed by
/// the owning view during its refresh cycle. The native window is destroyed
/// on drop.
pub struct OverlayWindow<'a, B: WindowOps> {
    backend: &'a B,
    window: WindowId,
    visible: bool,
    top_most: bool,
    label: String,
}

impl<'a, B: WindowOps> OverlayWindow<'a, B> {
    /// Create the overlay window for a container; starts hidden and unlabeled
    pub fn new(backend: &'a B, container: WindowId) -> Result<Self> {
        let window = backend
            .create_overlay(container)
            .context("Failed to create overlay window")?;
        Ok(Self {
            backend,
            window,
            visible: false,
            top_most: false,
            label: String::new(),
        })
    }

    /// Native handle of the overlay window
    pub fn window(&self) -> WindowId {
        self.window
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_top_most(&self) -> bool {
        self.top_most
    }

    /// Map the overlay and redraw its label
    pub fn show(&mut self) -> Result<()> {
        if self.visible {
            return Ok(());
        }
        self.backend
            .map_window(self.window)
            .context("Failed to map overlay window")?;
        self.backend.set_label(self.window, &self.label)?;
        self.visible = true;
        Ok(())
    }

    pub fn hide(&mut self) -> Result<()> {
        if !self.visible {
            return Ok(());
        }
        self.backend
            .unmap_window(self.window)
            .context("Failed to unmap overlay window")?;
        self.visible = false;
        Ok(())
    }

    /// Move and resize the overlay, keeping it above the container
    pub fn set_geometry(&self, location: Position, size: Dimensions) -> Result<()> {
        self.backend
            .resize_window(self.window, size)
            .context("Failed to resize overlay window")?;
        self.backend
            .move_window(self.window, location)
            .context("Failed to move overlay window")?;
        // The container may itself be top-most; re-raise so the label stays above it
        self.backend.raise_window(self.window)?;
        if self.visible {
            self.backend.set_label(self.window, &self.label)?;
        }
        Ok(())
    }

    /// Update the label text, redrawing when visible
    pub fn set_label(&mut self, text: &str) -> Result<()> {
        self.label = text.to_string();
        self.backend
            .set_label(self.window, &self.label)
            .context("Failed to draw overlay label")
    }

    /// Whether the overlay should stay above other windows.
    ///
    /// The overlay is unmanaged, so this only re-raises it immediately;
    /// subsequent geometry updates keep re-raising regardless.
    pub fn set_top_most(&mut self, enabled: bool) -> Result<()> {
        self.top_most = enabled;
        if enabled {
            self.backend.raise_window(self.window)?;
        }
        Ok(())
    }
}

impl<B: WindowOps> Drop for OverlayWindow<'_, B> {
    fn drop(&mut self) {
        if let Err(e) = self.backend.destroy_window(self.window) {
            error!(window = self.window, error = %e, "Failed to destroy overlay window");
        }
    }
}
