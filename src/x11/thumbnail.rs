//! RENDER-based thumbnail compositing
//!
//! The X11 compositor registration is a pair of RENDER pictures plus a
//! DAMAGE handle on the source window. Compositing pulls the source picture
//! through a scaling transform into the container window whenever the view
//! pushes updated properties.

use tracing::{debug, error, info};
use x11rb::connection::Connection;
use x11rb::errors::{ConnectionError, ReplyError, ReplyOrIdError};
use x11rb::protocol::ErrorKind;
use x11rb::protocol::composite::{ConnectionExt as CompositeExt, Redirect};
use x11rb::protocol::damage::{ConnectionExt as DamageExt, Damage, ReportLevel};
use x11rb::protocol::render::{
    ConnectionExt as RenderExt, CreatePictureAux, PictOp, Picture, Transform,
};
use x11rb::protocol::xproto::ConnectionExt;

use crate::compositor::{Compositor, CompositorError, ThumbnailProperties};
use crate::types::WindowId;

use super::backend::X11Backend;
use super::context::to_fixed;

/// Resources backing one live thumbnail registration.
///
/// Owned by the compositor token and freed in `unregister`; the token is
/// deliberately not `Drop` so teardown order stays under the caller's
/// control during re-registration.
#[derive(Debug)]
pub struct X11ThumbnailToken {
    source: WindowId,
    src_picture: Picture,
    dst_picture: Picture,
    damage: Damage,
}

impl X11ThumbnailToken {
    /// The source window this registration mirrors
    pub fn source(&self) -> WindowId {
        self.source
    }

    /// The DAMAGE handle reporting source content changes
    pub fn damage(&self) -> Damage {
        self.damage
    }
}

/// A vanished source window surfaces as `SourceUnavailable`; everything
/// else is an opaque backend failure.
fn reply_error(err: ReplyError) -> CompositorError {
    match err {
        ReplyError::X11Error(ref x11_err)
            if matches!(
                x11_err.error_kind,
                ErrorKind::Window | ErrorKind::Drawable | ErrorKind::Match
            ) =>
        {
            CompositorError::SourceUnavailable
        }
        other => CompositorError::Backend(other.to_string()),
    }
}

fn connection_error(err: ConnectionError) -> CompositorError {
    CompositorError::Backend(err.to_string())
}

fn id_error(err: ReplyOrIdError) -> CompositorError {
    CompositorError::Backend(err.to_string())
}

impl X11Backend<'_> {
    fn free_pictures(&self, pictures: &[Picture]) {
        for &picture in pictures {
            if let Err(e) = self.conn.render_free_picture(picture) {
                error!(picture = picture, error = %e, "Failed to free picture");
            }
        }
        let _ = self.conn.flush();
    }

    /// Undo a partially completed registration
    fn abandon_registration(&self, source: WindowId, pictures: &[Picture]) {
        // The source may already be gone; both calls are best-effort
        if let Err(e) = self.conn.composite_unredirect_window(source, Redirect::AUTOMATIC) {
            debug!(source = source, error = %e, "Failed to unredirect source");
        }
        self.free_pictures(pictures);
    }
}

impl Compositor for X11Backend<'_> {
    type Token = X11ThumbnailToken;

    fn register(
        &self,
        container: WindowId,
        source: WindowId,
    ) -> Result<Self::Token, CompositorError> {
        // Checked synchronously: a Window error here is the source vanishing
        // between discovery and registration. Redirecting keeps the source
        // content capturable even while obscured.
        self.conn
            .composite_redirect_window(source, Redirect::AUTOMATIC)
            .map_err(connection_error)?
            .check()
            .map_err(reply_error)?;

        let src_picture = match self.conn.generate_id().map_err(id_error) {
            Ok(id) => id,
            Err(e) => {
                self.abandon_registration(source, &[]);
                return Err(e);
            }
        };
        if let Err(e) = self
            .conn
            .render_create_picture(
                src_picture,
                source,
                self.formats.rgb,
                &CreatePictureAux::new(),
            )
            .map_err(connection_error)
            .and_then(|cookie| cookie.check().map_err(reply_error))
        {
            self.abandon_registration(source, &[]);
            return Err(e);
        }

        // Bilinear filtering keeps downscaled text readable
        if let Err(e) = self
            .conn
            .render_set_picture_filter(src_picture, b"bilinear", &[])
            .map_err(connection_error)
        {
            self.abandon_registration(source, &[src_picture]);
            return Err(e);
        }

        let dst_picture = match self.conn.generate_id().map_err(id_error) {
            Ok(id) => id,
            Err(e) => {
                self.abandon_registration(source, &[src_picture]);
                return Err(e);
            }
        };
        if let Err(e) = self
            .conn
            .render_create_picture(
                dst_picture,
                container,
                self.formats.rgb,
                &CreatePictureAux::new(),
            )
            .map_err(connection_error)
            .and_then(|cookie| cookie.check().map_err(reply_error))
        {
            self.abandon_registration(source, &[src_picture]);
            return Err(e);
        }

        let damage = match self.conn.generate_id().map_err(id_error) {
            Ok(id) => id,
            Err(e) => {
                self.abandon_registration(source, &[src_picture, dst_picture]);
                return Err(e);
            }
        };
        if let Err(e) = self
            .conn
            .damage_create(damage, source, ReportLevel::NON_EMPTY)
            .map_err(connection_error)
            .and_then(|cookie| cookie.check().map_err(reply_error))
        {
            self.abandon_registration(source, &[src_picture, dst_picture]);
            return Err(e);
        }

        info!(source = source, container = container, "Registered thumbnail");
        Ok(X11ThumbnailToken {
            source,
            src_picture,
            dst_picture,
            damage,
        })
    }

    fn update_properties(
        &self,
        token: &Self::Token,
        properties: &ThumbnailProperties,
    ) -> Result<(), CompositorError> {
        let dest = properties.dest_rect;
        if !properties.visible || dest.width == 0 || dest.height == 0 {
            return Ok(());
        }

        let geometry = self
            .conn
            .get_geometry(token.source)
            .map_err(connection_error)?
            .reply()
            .map_err(reply_error)?;

        let transform = Transform {
            matrix11: to_fixed(f32::from(geometry.width) / f32::from(dest.width)),
            matrix22: to_fixed(f32::from(geometry.height) / f32::from(dest.height)),
            matrix33: to_fixed(1.0),
            ..Default::default()
        };
        self.conn
            .render_set_picture_transform(token.src_picture, transform)
            .map_err(connection_error)?;

        // Opacity rides on the container window property, so the blit itself
        // stays a plain SRC
        self.conn
            .render_composite(
                PictOp::SRC,
                token.src_picture,
                0u32,
                token.dst_picture,
                0,
                0,
                0,
                0,
                dest.x,
                dest.y,
                dest.width,
                dest.height,
            )
            .map_err(connection_error)?;
        self.conn.flush().map_err(connection_error)?;

        debug!(
            source = token.source,
            width = dest.width,
            height = dest.height,
            "Composited thumbnail"
        );
        Ok(())
    }

    fn unregister(&self, token: Self::Token) {
        // Each resource is released independently so one failure cannot
        // leak the rest
        if let Err(e) = self.conn.damage_destroy(token.damage) {
            error!(damage = token.damage, error = %e, "Failed to destroy damage");
        }
        self.abandon_registration(token.source, &[token.src_picture, token.dst_picture]);
        debug!(source = token.source, "Unregistered thumbnail");
    }
}
