//! Host synchronisation systems
//!
//! Pull the page's requests in at the start of a tick and push renderer
//! statistics back out at the end of it.

use bevy::{prelude::*, render::renderer::RenderDevice};

use crate::backdrop::resources::{
    BackdropState, CurrentPointer, FrameLoop, HostLink, ResourceLedger, Viewport,
};
use crate::tauri_bridge::HostRequest;

/// Apply queued lifecycle/loop requests, the pointer and any pending resize
pub fn sync_host_requests(
    host: Option<Res<HostLink>>,
    state: Res<State<BackdropState>>,
    mut next_state: ResMut<NextState<BackdropState>>,
    mut frame_loop: ResMut<FrameLoop>,
    mut pointer: ResMut<CurrentPointer>,
    mut viewport: ResMut<Viewport>,
) {
    let Some(host) = host else { return };

    let (requests, resize) = match host.control.take_tick() {
        Ok(tick) => tick,
        Err(e) => {
            warn!("[Backdrop] Skipping host requests: {e}");
            return;
        }
    };

    let mounted = *state.get() == BackdropState::Mounted;
    for request in requests {
        debug!("[Backdrop] Host request: {request:?}");
        match request {
            HostRequest::Mount => next_state.set(BackdropState::Mounted),
            HostRequest::Unmount => next_state.set(BackdropState::Unmounted),
            // Mount arms the loop itself
            HostRequest::Start if !mounted => {
                warn!("[Backdrop] Ignoring start while unmounted");
            }
            HostRequest::Start => frame_loop.start(),
            HostRequest::Stop => frame_loop.stop(),
        }
    }

    if let Some(size) = resize {
        viewport.pending = Some(size);
    }

    match host.pointer.get() {
        Ok(position) => pointer.0 = position,
        Err(e) => warn!("[Backdrop] Keeping last pointer position: {e}"),
    }
}

/// Promote an armed loop so the next tick runs a frame
pub fn schedule_next_frame(mut frame_loop: ResMut<FrameLoop>) {
    frame_loop.schedule_next();
}

/// Publish renderer statistics to the host
pub fn publish_stats(
    host: Option<Res<HostLink>>,
    state: Res<State<BackdropState>>,
    frame_loop: Res<FrameLoop>,
    ledger: Res<ResourceLedger>,
    viewport: Res<Viewport>,
    render_device: Option<Res<RenderDevice>>,
) {
    let Some(host) = host else { return };

    let mounted = *state.get() == BackdropState::Mounted;
    let result = host.stats.update(|stats| {
        stats.mounted = mounted;
        stats.frame_loop_running = frame_loop.is_running();
        stats.frames_run = frame_loop.frames_run();
        stats.surface_width = if mounted { viewport.size.width } else { 0 };
        stats.surface_height = if mounted { viewport.size.height } else { 0 };
        stats.graphics_available = render_device.is_some();
        stats.resources_acquired = ledger.acquired;
        stats.resources_released = ledger.released;
    });
    if let Err(e) = result {
        warn!("[Backdrop] Could not publish stats: {e}");
    }
}
