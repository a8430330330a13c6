//! Bevy plugins
//!
//! This module contains custom Bevy plugins: the backdrop itself and the
//! GPU readback that delivers its frames to the page.

pub mod backdrop;
pub mod readback;

pub use backdrop::{BackdropPlugin, BackdropSystems};
pub use readback::SurfaceReadbackPlugin;
