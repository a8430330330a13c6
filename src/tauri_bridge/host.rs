//! Host-side handle to the backdrop renderer
//!
//! The hosting page owns one `BackdropHost`. Every call only records a
//! request in shared state; the Bevy app picks requests up at the start of
//! its next tick, so the host never blocks on the render thread.

use crate::error::Result;

use super::shared_state::{
    Frame, HostRequest, PointerPosition, RendererStats, SharedFrameBuffer, SharedHostControl,
    SharedPointer, SharedStats, ViewportSize,
};

/// Cloneable, thread-safe handle the page uses to drive the backdrop
#[derive(Clone, Default)]
pub struct BackdropHost {
    pub frame_buffer: SharedFrameBuffer,
    pub pointer: SharedPointer,
    pub control: SharedHostControl,
    pub stats: SharedStats,
}

impl BackdropHost {
    /// Create a host for a viewport of the given size
    pub fn new(viewport: ViewportSize) -> Result<Self> {
        let host = Self::default();
        host.control.resize(viewport)?;
        Ok(host)
    }

    pub fn mount(&self) -> Result<()> {
        self.control.push(HostRequest::Mount)
    }

    pub fn unmount(&self) -> Result<()> {
        self.control.push(HostRequest::Unmount)
    }

    /// Arm continuous frame scheduling
    pub fn start(&self) -> Result<()> {
        self.control.push(HostRequest::Start)
    }

    /// No frame runs once the render loop has observed this request
    pub fn stop(&self) -> Result<()> {
        self.control.push(HostRequest::Stop)
    }

    /// Push a normalized pointer position; values are clamped to [-1, 1]
    pub fn set_pointer(&self, x: f32, y: f32) -> Result<()> {
        self.pointer.set(PointerPosition::new(x, y))
    }

    /// Push a pointer event in client pixels
    pub fn pointer_moved(&self, client_x: f32, client_y: f32) -> Result<()> {
        let viewport = self.control.viewport()?;
        self.pointer
            .set(PointerPosition::from_client(client_x, client_y, viewport))
    }

    /// Report a new viewport size; applied on the next frame
    pub fn resize(&self, width: u32, height: u32) -> Result<()> {
        self.control.resize(ViewportSize::new(width, height)?)
    }

    pub fn viewport(&self) -> Result<ViewportSize> {
        self.control.viewport()
    }

    pub fn latest_frame(&self) -> Result<Frame> {
        self.frame_buffer.latest()
    }

    pub fn stats(&self) -> Result<RendererStats> {
        self.stats.snapshot()
    }
}
