//! Bridge layer between the hosting page and Bevy
//!
//! This module handles all communication between the page and the Bevy
//! rendering backend: shared state, the host handle, frame encoding and,
//! with the `desktop` feature, the Tauri command and protocol handlers.

pub mod shared_state;
pub mod host;
pub mod encoding;
#[cfg(feature = "desktop")]
pub mod commands;
#[cfg(feature = "desktop")]
pub mod protocol;

// Re-export commonly used types
pub use host::BackdropHost;
pub use shared_state::{
    Frame, FrameResponse, HostRequest, PointerPosition, RendererStats, SharedFrameBuffer,
    SharedHostControl, SharedPointer, SharedStats, ViewportSize,
};
