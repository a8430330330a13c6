//! Shared state structures for communication between the page host and Bevy
//!
//! This module defines thread-safe data structures that allow bidirectional
//! communication between the hosting page and the Bevy render backend.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::config::{DEFAULT_VIEWPORT_HEIGHT, DEFAULT_VIEWPORT_WIDTH};
use crate::error::{BackdropError, Result};

fn lock<'a, T>(mutex: &'a Mutex<T>, what: &'static str) -> Result<MutexGuard<'a, T>> {
    mutex.lock().map_err(|_| BackdropError::Poisoned(what))
}

// =============================================================================
// Frame Buffer
// =============================================================================

/// One published frame of RGBA8 pixels (4 bytes per pixel, no row padding)
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl Frame {
    /// Build a frame, checking the pixel data matches the declared size
    pub fn new(width: u32, height: u32, rgba: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected {
            return Err(BackdropError::InvalidFrame {
                width,
                height,
                len: rgba.len(),
            });
        }
        Ok(Self { width, height, rgba })
    }
}

/// Thread-safe frame buffer shared between Bevy and the host
///
/// Holds the latest frame only. `None` means the surface is detached.
#[derive(Clone, Default)]
pub struct SharedFrameBuffer(pub Arc<Mutex<Option<Frame>>>);

impl SharedFrameBuffer {
    pub fn publish(&self, frame: Frame) -> Result<()> {
        *lock(&self.0, "frame buffer")? = Some(frame);
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        *lock(&self.0, "frame buffer")? = None;
        Ok(())
    }

    /// Clone out the latest frame
    pub fn latest(&self) -> Result<Frame> {
        lock(&self.0, "frame buffer")?
            .clone()
            .ok_or(BackdropError::FrameNotReady)
    }
}

/// Frame response containing Base64-encoded RGBA pixel data
#[derive(Serialize, Deserialize)]
pub struct FrameResponse {
    /// Base64-encoded RGBA pixel data (avoids slow JSON array serialization)
    pub data: String,
    pub width: u32,
    pub height: u32,
}

// =============================================================================
// Pointer Input
// =============================================================================

/// Normalized pointer position, each axis in [-1, 1]
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerPosition {
    pub x: f32,
    pub y: f32,
}

impl PointerPosition {
    /// Clamp into the normalized range; non-finite input maps to the centre
    pub fn new(x: f32, y: f32) -> Self {
        let norm = |v: f32| if v.is_finite() { v.clamp(-1.0, 1.0) } else { 0.0 };
        Self {
            x: norm(x),
            y: norm(y),
        }
    }

    /// Normalize a pointer event given in client pixels (y grows downwards)
    pub fn from_client(client_x: f32, client_y: f32, viewport: ViewportSize) -> Self {
        Self::new(
            client_x / viewport.width as f32 * 2.0 - 1.0,
            -(client_y / viewport.height as f32) * 2.0 + 1.0,
        )
    }
}

/// Thread-safe pointer position shared between the host and Bevy
#[derive(Clone, Default)]
pub struct SharedPointer(pub Arc<Mutex<PointerPosition>>);

impl SharedPointer {
    pub fn set(&self, position: PointerPosition) -> Result<()> {
        *lock(&self.0, "pointer")? = position;
        Ok(())
    }

    pub fn get(&self) -> Result<PointerPosition> {
        Ok(*lock(&self.0, "pointer")?)
    }
}

// =============================================================================
// Viewport
// =============================================================================

/// Size of the hosting viewport in pixels
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ViewportSize {
    pub width: u32,
    pub height: u32,
}

impl ViewportSize {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(BackdropError::InvalidViewport { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

impl Default for ViewportSize {
    fn default() -> Self {
        Self {
            width: DEFAULT_VIEWPORT_WIDTH,
            height: DEFAULT_VIEWPORT_HEIGHT,
        }
    }
}

// =============================================================================
// Host Control
// =============================================================================

/// Lifecycle and frame-loop requests pushed by the host
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum HostRequest {
    Mount,
    Unmount,
    Start,
    Stop,
}

impl HostRequest {
    /// Mount and unmount change the Bevy state and can only apply once per tick
    pub fn is_lifecycle(self) -> bool {
        matches!(self, HostRequest::Mount | HostRequest::Unmount)
    }
}

/// Requests waiting for the next tick, in submission order
#[derive(Default, Debug)]
pub struct HostControl {
    pub requests: VecDeque<HostRequest>,
    /// Latest viewport size reported by the host, not yet applied
    pub pending_viewport: Option<ViewportSize>,
    /// Latest applied or pending viewport size
    pub viewport: ViewportSize,
}

impl HostControl {
    /// Take the requests that may apply in one tick
    ///
    /// Stops after the first lifecycle request so that mount and unmount
    /// queued back to back each get their own state transition.
    pub fn take_tick_requests(&mut self) -> Vec<HostRequest> {
        let mut taken = Vec::new();
        while let Some(request) = self.requests.pop_front() {
            taken.push(request);
            if request.is_lifecycle() {
                break;
            }
        }
        taken
    }
}

/// Thread-safe host control queue
#[derive(Clone, Default)]
pub struct SharedHostControl(pub Arc<Mutex<HostControl>>);

impl SharedHostControl {
    pub fn push(&self, request: HostRequest) -> Result<()> {
        lock(&self.0, "host control")?.requests.push_back(request);
        Ok(())
    }

    pub fn resize(&self, viewport: ViewportSize) -> Result<()> {
        let mut guard = lock(&self.0, "host control")?;
        guard.pending_viewport = Some(viewport);
        guard.viewport = viewport;
        Ok(())
    }

    pub fn viewport(&self) -> Result<ViewportSize> {
        Ok(lock(&self.0, "host control")?.viewport)
    }

    /// Drain what applies to the next tick: requests and a pending resize
    pub fn take_tick(&self) -> Result<(Vec<HostRequest>, Option<ViewportSize>)> {
        let mut guard = lock(&self.0, "host control")?;
        let requests = guard.take_tick_requests();
        Ok((requests, guard.pending_viewport.take()))
    }
}

// =============================================================================
// Renderer Statistics
// =============================================================================

/// Renderer statistics for debugging and monitoring
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct RendererStats {
    pub mounted: bool,
    pub frame_loop_running: bool,
    pub frames_run: u64,
    pub frames_published: u64,
    pub surface_width: u32,
    pub surface_height: u32,
    pub graphics_available: bool,
    pub resources_acquired: usize,
    pub resources_released: usize,
}

/// Thread-safe renderer statistics
#[derive(Clone, Default)]
pub struct SharedStats(pub Arc<Mutex<RendererStats>>);

impl SharedStats {
    pub fn snapshot(&self) -> Result<RendererStats> {
        Ok(lock(&self.0, "stats")?.clone())
    }

    pub fn update(&self, f: impl FnOnce(&mut RendererStats)) -> Result<()> {
        f(&mut *lock(&self.0, "stats")?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_is_clamped_and_sanitized() {
        assert_eq!(PointerPosition::new(2.0, -3.0), PointerPosition { x: 1.0, y: -1.0 });
        assert_eq!(PointerPosition::new(f32::NAN, 0.25), PointerPosition { x: 0.0, y: 0.25 });
    }

    #[test]
    fn client_coordinates_normalize_with_y_up() {
        let viewport = ViewportSize::new(800, 600).unwrap();
        assert_eq!(
            PointerPosition::from_client(400.0, 300.0, viewport),
            PointerPosition { x: 0.0, y: 0.0 }
        );
        assert_eq!(
            PointerPosition::from_client(0.0, 0.0, viewport),
            PointerPosition { x: -1.0, y: 1.0 }
        );
        assert_eq!(
            PointerPosition::from_client(800.0, 600.0, viewport),
            PointerPosition { x: 1.0, y: -1.0 }
        );
    }

    #[test]
    fn zero_viewport_is_rejected() {
        assert!(matches!(
            ViewportSize::new(0, 600),
            Err(BackdropError::InvalidViewport { width: 0, height: 600 })
        ));
        assert_eq!(ViewportSize::new(1200, 800).unwrap().aspect_ratio(), 1.5);
    }

    #[test]
    fn lifecycle_requests_apply_one_per_tick() {
        let mut control = HostControl::default();
        control.requests.extend([
            HostRequest::Stop,
            HostRequest::Mount,
            HostRequest::Unmount,
            HostRequest::Start,
        ]);

        assert_eq!(
            control.take_tick_requests(),
            vec![HostRequest::Stop, HostRequest::Mount]
        );
        assert_eq!(control.take_tick_requests(), vec![HostRequest::Unmount]);
        assert_eq!(control.take_tick_requests(), vec![HostRequest::Start]);
        assert!(control.take_tick_requests().is_empty());
    }

    #[test]
    fn resize_is_taken_once() {
        let control = SharedHostControl::default();
        let size = ViewportSize::new(1200, 800).unwrap();
        control.resize(size).unwrap();

        assert_eq!(control.take_tick().unwrap().1, Some(size));
        assert_eq!(control.take_tick().unwrap().1, None);
        assert_eq!(control.viewport().unwrap(), size);
    }

    #[test]
    fn frame_buffer_reports_missing_frame() {
        let buffer = SharedFrameBuffer::default();
        assert!(matches!(buffer.latest(), Err(BackdropError::FrameNotReady)));

        buffer.publish(Frame::new(1, 1, vec![0, 0, 0, 255]).unwrap()).unwrap();
        assert_eq!(buffer.latest().unwrap().width, 1);

        buffer.clear().unwrap();
        assert!(buffer.latest().is_err());
    }

    #[test]
    fn frame_size_must_match_pixels() {
        assert!(matches!(
            Frame::new(2, 2, vec![0; 15]),
            Err(BackdropError::InvalidFrame { len: 15, .. })
        ));
    }
}
