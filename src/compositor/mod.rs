//! Compositor thumbnail registration
//!
//! The compositor owns the pixels: this crate only registers a mirroring
//! relationship between a container window and a source window, pushes
//! geometry/visual properties to it, and tears it down again. The trait
//! keeps the view testable and the platform binding swappable.

use thiserror::Error;
use tracing::debug;

use crate::types::{Rect, WindowId};

/// Visual properties pushed to a live thumbnail registration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThumbnailProperties {
    /// Destination rectangle in container client coordinates
    pub dest_rect: Rect,
    /// Thumbnail content opacity, 0 (clear) to 255 (opaque)
    pub opacity: u8,
    /// Whether the mirrored content is drawn at all
    pub visible: bool,
    /// Mirror only the source's client area, excluding its chrome
    pub source_client_area_only: bool,
}

/// Failures talking to the compositor.
///
/// `SourceUnavailable` is the expected, recoverable case: the mirrored
/// window closed between issuing a call and its completion. Callers swallow
/// it and let the next refresh retry.
#[derive(Debug, Error)]
pub enum CompositorError {
    /// The source window vanished mid-call; retry on the next refresh
    #[error("source window is no longer available")]
    SourceUnavailable,

    /// Any other compositor-side failure
    #[error("compositor request failed: {0}")]
    Backend(String),
}

/// A compositor-provided thumbnailing facility.
///
/// Each token represents one live mirroring relationship; tokens are
/// disjoint across views, so no in-process synchronization is needed.
pub trait Compositor {
    /// Opaque handle for a live thumbnail registration
    type Token;

    /// Ask the compositor to mirror `source` into `container`
    fn register(
        &self,
        container: WindowId,
        source: WindowId,
    ) -> Result<Self::Token, CompositorError>;

    /// Push new geometry and visual flags to an existing registration
    fn update_properties(
        &self,
        token: &Self::Token,
        props: &ThumbnailProperties,
    ) -> Result<(), CompositorError>;

    /// Tear down a registration. Best-effort: unregistering a token whose
    /// source already died is treated as success inside the implementation.
    fn unregister(&self, token: Self::Token);
}

/// Owner of at most one live compositor token.
///
/// `register` installs the replacement token first and hands the previous
/// one back, so the caller can defer its teardown until after the new
/// thumbnail is on screen (no visible blank frame). A failed registration
/// leaves the current token untouched. The remaining token is released on
/// [`ThumbnailHandle::release`] or, as a backstop, on drop.
pub struct ThumbnailHandle<'a, C: Compositor> {
    compositor: &'a C,
    token: Option<C::Token>,
}

impl<'a, C: Compositor> ThumbnailHandle<'a, C> {
    /// Create an empty handle; nothing is registered yet
    pub fn new(compositor: &'a C) -> Self {
        Self {
            compositor,
            token: None,
        }
    }

    /// Whether a thumbnail registration is currently live
    pub fn is_registered(&self) -> bool {
        self.token.is_some()
    }

    /// Register a new thumbnail, returning the previously installed token
    /// (if any) for deferred teardown by the caller.
    pub fn register(
        &mut self,
        container: WindowId,
        source: WindowId,
    ) -> Result<Option<C::Token>, CompositorError> {
        let token = self.compositor.register(container, source)?;
        Ok(self.token.replace(token))
    }

    /// Push properties to the live registration.
    ///
    /// With no live token this reports `SourceUnavailable`: there is
    /// nothing to update, and the caller's retry path already covers it.
    pub fn update_properties(&self, props: &ThumbnailProperties) -> Result<(), CompositorError> {
        match &self.token {
            Some(token) => self.compositor.update_properties(token, props),
            None => Err(CompositorError::SourceUnavailable),
        }
    }

    /// Release the live registration, if any
    pub fn release(&mut self) {
        if let Some(token) = self.token.take() {
            debug!("releasing thumbnail registration");
            self.compositor.unregister(token);
        }
    }
}

impl<C: Compositor> Drop for ThumbnailHandle<'_, C> {
    fn drop(&mut self) {
        self.release();
    }
}
