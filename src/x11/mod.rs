//! X11 platform binding
//!
//! Implements the backend traits on top of x11rb: core windows for the
//! container and overlay, RENDER for thumbnail compositing, DAMAGE for
//! source change tracking and root-window key grabs for hotkeys.

mod backend;
mod context;
mod thumbnail;

pub use backend::X11Backend;
pub use context::{CachedAtoms, CachedFormats, to_fixed};
pub use thumbnail::X11ThumbnailToken;
